//! `Daemon`: sequential component wiring mirroring
//! `jiopad::daemon::Daemon::new`'s `ui::print_component_status` bracketing.
//! Fixed to concrete component types the way `jiopad::Daemon` is — a pool
//! binary talks to exactly one node over the wire, one store, and (for now)
//! one payout strategy.

use crate::block_account::BlockAccount;
use crate::config::PoolConfig;
use crate::node_rpc::RpcApiNodeClient;
use crate::orchestrator::{OrchestratorConfig, PoolOrchestrator};
use crate::payout::NullPayoutSender;
use crate::rpc_client::WsRpcClient;
use crate::store::RocksDbStore;
use crate::template::TemplateService;
use crate::ui;
use rpc_core::RpcApi;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::info;

/// How long the startup handshake waits for the node to answer before the
/// daemon gives up and treats it as unreachable.
const NODE_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

type NodeClient = RpcApiNodeClient<WsRpcClient>;
type Orchestrator = PoolOrchestrator<NodeClient, RocksDbStore, NullPayoutSender>;

pub struct Daemon {
    config: PoolConfig,
    shutdown_tx: broadcast::Sender<()>,
    orchestrator: Arc<Orchestrator>,
    store: Arc<RocksDbStore>,
    block_account: Arc<BlockAccount<RocksDbStore, NullPayoutSender>>,
    started_at: Instant,
}

impl Daemon {
    pub async fn new(config: PoolConfig) -> Result<Self, crate::error::PoolError> {
        ui::print_section("Initializing Components");
        let (shutdown_tx, _) = broadcast::channel(1);

        ui::print_component_status("Storage", ui::ComponentStatus::Starting);
        info!(target: "pool::daemon", dir = ?config.storage.data_dir, "opening pool store");
        let store = Arc::new(RocksDbStore::open(&config.storage.data_dir)?);
        ui::print_component_status("Storage", ui::ComponentStatus::Running);

        ui::print_component_status("Node RPC Client", ui::ComponentStatus::Starting);
        info!(target: "pool::daemon", endpoint = %config.rpc.node_endpoint, "connecting to node rpc endpoint");
        let ws_client = Arc::new(WsRpcClient::new(&config.rpc.node_endpoint));
        match tokio::time::timeout(NODE_HANDSHAKE_TIMEOUT, ws_client.get_block_count()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(crate::error::PoolError::NodeUnreachable(e.to_string())),
            Err(_) => return Err(crate::error::PoolError::NodeUnreachable(format!("handshake timed out after {}s", NODE_HANDSHAKE_TIMEOUT.as_secs()))),
        }
        let node_client = Arc::new(RpcApiNodeClient::new(ws_client));
        ui::print_component_status("Node RPC Client", ui::ComponentStatus::Running);

        ui::print_component_status("Template Service", ui::ComponentStatus::Starting);
        let template_service = Arc::new(TemplateService::new(
            node_client,
            config.stratum.pay_address.clone(),
            config.stratum.coinbase_identity.as_bytes().to_vec(),
            config.stratum.daa_window_size,
            Duration::from_secs(config.stratum.submit_retry_sleep_secs),
            Duration::from_secs(config.stratum.submit_retry_cap_secs),
        ));
        ui::print_component_status("Template Service", ui::ComponentStatus::Running);

        ui::print_component_status("Block Account", ui::ComponentStatus::Starting);
        // No wallet key material is configured for this deployment, so payouts
        // are recorded against miner balances but not broadcast on-chain until
        // a real `PayoutSender` is wired in; see DESIGN.md.
        let payout = Arc::new(NullPayoutSender::new());
        let block_account = Arc::new(BlockAccount::new(
            store.clone(),
            payout,
            config.stratum.pay_address.clone(),
            config.fee.fee_percent,
            config.fee.payment_threshold_sompi,
        ));
        ui::print_component_status("Block Account", ui::ComponentStatus::Running);

        ui::print_component_status("Pool Orchestrator", ui::ComponentStatus::Starting);
        let orchestrator_config = OrchestratorConfig {
            listen_address: config.stratum.listen_address.clone(),
            initial_difficulty: config.stratum.initial_difficulty,
            cleanup_tick: Duration::from_secs(config.stratum.cleanup_tick_secs),
            hashrate_snapshot_tick: Duration::from_secs(config.stratum.hashrate_snapshot_secs),
            miner_inactive_after: Duration::from_secs(config.stratum.miner_inactive_after_secs),
            share_history_retention: Duration::from_secs(config.stratum.share_history_retention_secs),
            block_record_retention: Duration::from_secs(config.stratum.block_record_retention_secs),
        };
        let orchestrator = Arc::new(PoolOrchestrator::new(
            orchestrator_config,
            template_service,
            block_account.clone(),
            store.clone(),
            config.stratum.pplns_window_size,
        ));
        ui::print_component_status("Pool Orchestrator", ui::ComponentStatus::Running);

        ui::print_status("ok", "all components initialized", ui::StatusType::Success);
        Ok(Self { config, shutdown_tx, orchestrator, store, block_account, started_at: Instant::now() })
    }

    pub async fn run(self) -> Result<(), crate::error::PoolError> {
        ui::print_section("Starting Services");
        info!(target: "pool::daemon", "starting jio-pool daemon");

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        let orchestrator_task = {
            let orchestrator = self.orchestrator.clone();
            tokio::spawn(async move { orchestrator.run().await })
        };

        let http_task = if self.config.http.enabled {
            let state = crate::http::HttpState {
                ledger: self.orchestrator.ledger(),
                broadcaster: self.orchestrator.broadcaster(),
                block_account: self.block_account.clone(),
                store: self.store.clone(),
                started_at: self.started_at,
            };
            let bind = format!("{}:{}", self.config.http.bind_address, self.config.http.port);
            ui::print_component_status("HTTP Status API", ui::ComponentStatus::Starting);
            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .map_err(|e| crate::error::PoolError::Bind(bind.clone(), e))?;
            ui::print_component_status("HTTP Status API", ui::ComponentStatus::Running);
            info!(target: "pool::daemon", addr = %bind, "http status api listening");
            Some(tokio::spawn(async move {
                let router = crate::http::router(state);
                axum::serve(listener, router).await
            }))
        } else {
            ui::print_status("info", "http status api disabled", ui::StatusType::Info);
            None
        };

        ui::print_status("ok", "jio-pool is now running", ui::StatusType::Success);

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                ui::print_status("info", "received ctrl+c, shutting down", ui::StatusType::Warning);
            }
            _ = shutdown_rx.recv() => {
                ui::print_status("info", "received shutdown signal", ui::StatusType::Info);
            }
        }

        orchestrator_task.abort();
        if let Some(task) = http_task {
            task.abort();
        }
        info!(target: "pool::daemon", "jio-pool daemon stopped");
        Ok(())
    }
}
