//! `PoolConfig`: TOML-backed configuration, loaded/defaulted/overridden the
//! way `jiopad::config::Config` is.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    pub network: NetworkConfig,
    pub stratum: StratumConfig,
    pub http: HttpConfig,
    pub rpc: RpcConfig,
    pub fee: PoolFeeConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub network_id: String,
}

/// Stratum listener + core pool timing knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StratumConfig {
    pub listen_address: String,
    pub pay_address: String,
    pub coinbase_identity: String,
    pub initial_difficulty: f64,
    pub daa_window_size: usize,
    pub pplns_window_size: usize,
    pub submit_retry_sleep_secs: u64,
    pub submit_retry_cap_secs: u64,
    pub cleanup_tick_secs: u64,
    pub hashrate_snapshot_secs: u64,
    pub hashrate_history_capacity: usize,
    pub miner_inactive_after_secs: u64,
    pub share_history_retention_secs: u64,
    pub block_record_retention_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub node_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolFeeConfig {
    /// Percentage of each block's gross coinbase reward credited to the
    /// pool operator's own balance before the remainder is split PPLNS.
    pub fee_percent: f64,
    pub payment_threshold_sompi: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl PoolConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| format!("failed to read config file: {}", e))?;
            toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
        } else {
            Ok(PoolConfig::default())
        }
    }

    pub fn apply_cli_overrides(&mut self, args: &crate::cli::Args) {
        if let Some(listen) = &args.listen_address {
            self.stratum.listen_address = listen.clone();
        }
        if let Some(pay_address) = &args.pay_address {
            self.stratum.pay_address = pay_address.clone();
        }
        if let Some(endpoint) = &args.node_endpoint {
            self.rpc.node_endpoint = endpoint.clone();
        }
        if let Some(data_dir) = &args.data_dir {
            self.storage.data_dir = data_dir.clone();
        }
        if let Some(http_port) = args.http_port {
            self.http.port = http_port;
        }
        if args.no_http {
            self.http.enabled = false;
        }
        if let Some(network) = &args.network {
            self.network.network_id = network.clone();
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig { network_id: "mainnet".to_string() },
            stratum: StratumConfig {
                listen_address: "0.0.0.0:5555".to_string(),
                pay_address: String::new(),
                coinbase_identity: "jio-pool".to_string(),
                initial_difficulty: 1.0,
                daa_window_size: 2_641,
                pplns_window_size: 100_000,
                submit_retry_sleep_secs: 5,
                submit_retry_cap_secs: 600,
                cleanup_tick_secs: 60,
                hashrate_snapshot_secs: 60,
                hashrate_history_capacity: 100,
                miner_inactive_after_secs: 3_600,
                share_history_retention_secs: 86_400,
                block_record_retention_secs: 172_800,
            },
            http: HttpConfig { enabled: true, bind_address: "0.0.0.0".to_string(), port: 8080 },
            rpc: RpcConfig { node_endpoint: "127.0.0.1:16110".to_string() },
            fee: PoolFeeConfig { fee_percent: 1.0, payment_threshold_sompi: 1_000_000_000 },
            storage: StorageConfig { data_dir: PathBuf::from("./pool-data") },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_self_consistent() {
        let config = PoolConfig::default();
        assert_eq!(config.stratum.daa_window_size, 2_641);
        assert_eq!(config.stratum.pplns_window_size, 100_000);
        assert!(config.http.enabled);
    }

    #[test]
    fn load_falls_back_to_default_when_file_missing() {
        let config = PoolConfig::load(Path::new("/nonexistent/pool.toml")).unwrap();
        assert_eq!(config.network.network_id, "mainnet");
    }
}
