//! Persistent state the pool must survive a restart with: miner balances,
//! payout history, and hashrate snapshots.
//!
//! Grounded in `database::Database`, generalized via `Database::open_with_cfs`
//! so the pool gets its own column families instead of the node's.

use crate::payout::PayoutOutput;
use async_trait::async_trait;
use database::Database;
use serde::{Deserialize, Serialize};

const CF_MINERS: &str = "miners";
const CF_PAYOUTS: &str = "payouts";
const CF_HASHRATE_HISTORY: &str = "hashrate_history";

const HASHRATE_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MinerRecord {
    pub address: String,
    pub balance_sompi: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub address: String,
    pub amount_sompi: u64,
    pub txid: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashrateSample {
    pub timestamp_ms: u64,
    pub hashrate: f64,
}

#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn get_miner(&self, address: &str) -> Result<MinerRecord, crate::error::PoolError>;
    /// Adds (or subtracts, if negative) `delta_sompi` to a miner's balance,
    /// returning the new balance. Must be transactional with respect to
    /// concurrent calls for the same address.
    async fn add_balance(&self, address: &str, delta_sompi: i64) -> Result<i64, crate::error::PoolError>;
    /// Resets each output's persisted balance to zero and records its payout
    /// entry in one transaction, so a crash between the two steps can't
    /// leave a balance reset without a matching payout record (or vice
    /// versa).
    async fn settle_payout(&self, outputs: &[PayoutOutput], txids: &[String], timestamp_ms: u64) -> Result<(), crate::error::PoolError>;
    async fn get_recent_payouts(&self, address: &str, limit: usize) -> Result<Vec<PayoutRecord>, crate::error::PoolError>;
    async fn record_hashrate(&self, timestamp_ms: u64, hashrate: f64) -> Result<(), crate::error::PoolError>;
    async fn get_hashrate_history(&self) -> Result<Vec<HashrateSample>, crate::error::PoolError>;
}

/// RocksDB-backed implementation.
pub struct RocksDbStore {
    db: Database,
}

impl RocksDbStore {
    pub fn open(path: &std::path::Path) -> Result<Self, crate::error::PoolError> {
        let db = Database::open_with_cfs(path, &[CF_MINERS, CF_PAYOUTS, CF_HASHRATE_HISTORY])
            .map_err(|e| crate::error::PoolError::Database(e))?;
        Ok(Self { db })
    }

    fn miner_key(address: &str) -> Vec<u8> {
        address.as_bytes().to_vec()
    }
}

#[async_trait]
impl PersistentStore for RocksDbStore {
    async fn get_miner(&self, address: &str) -> Result<MinerRecord, crate::error::PoolError> {
        match self.db.get(CF_MINERS, &Self::miner_key(address))? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(|e| crate::error::PoolError::Other(e.to_string()))?),
            None => Ok(MinerRecord { address: address.to_string(), balance_sompi: 0 }),
        }
    }

    async fn add_balance(&self, address: &str, delta_sompi: i64) -> Result<i64, crate::error::PoolError> {
        // RocksDB has no read-modify-write primitive exposed by this wrapper;
        // callers serialize per-address updates through `BlockAccount`'s
        // single lock, so a plain read-then-write is safe here.
        let mut record = self.get_miner(address).await?;
        record.balance_sompi += delta_sompi;
        let bytes = bincode::serialize(&record).map_err(|e| crate::error::PoolError::Other(e.to_string()))?;
        self.db.put(CF_MINERS, &Self::miner_key(address), &bytes)?;
        Ok(record.balance_sompi)
    }

    async fn settle_payout(&self, outputs: &[PayoutOutput], txids: &[String], timestamp_ms: u64) -> Result<(), crate::error::PoolError> {
        let txid = txids.first().cloned().unwrap_or_default();
        let mut batch = self.db.batch();
        for output in outputs {
            let zeroed = MinerRecord { address: output.address.clone(), balance_sompi: 0 };
            let miner_bytes = bincode::serialize(&zeroed).map_err(|e| crate::error::PoolError::Other(e.to_string()))?;
            self.db.batch_put(&mut batch, CF_MINERS, &Self::miner_key(&output.address), &miner_bytes)?;

            let record = PayoutRecord { address: output.address.clone(), amount_sompi: output.amount_sompi, txid: txid.clone(), timestamp_ms };
            let payout_bytes = bincode::serialize(&record).map_err(|e| crate::error::PoolError::Other(e.to_string()))?;
            let key = format!("{}:{}", output.address, timestamp_ms);
            self.db.batch_put(&mut batch, CF_PAYOUTS, key.as_bytes(), &payout_bytes)?;
        }
        self.db.write_batch(batch)?;
        Ok(())
    }

    async fn get_recent_payouts(&self, address: &str, limit: usize) -> Result<Vec<PayoutRecord>, crate::error::PoolError> {
        let prefix = format!("{}:", address);
        let mut records: Vec<PayoutRecord> = self
            .db
            .iterator(CF_PAYOUTS, rocksdb::IteratorMode::Start)?
            .filter_map(Result::ok)
            .filter(|(key, _)| key.starts_with(prefix.as_bytes()))
            .filter_map(|(_, value)| bincode::deserialize(&value).ok())
            .collect();
        records.sort_by(|a: &PayoutRecord, b: &PayoutRecord| b.timestamp_ms.cmp(&a.timestamp_ms));
        records.truncate(limit);
        Ok(records)
    }

    async fn record_hashrate(&self, timestamp_ms: u64, hashrate: f64) -> Result<(), crate::error::PoolError> {
        let mut history = self.get_hashrate_history().await?;
        history.push(HashrateSample { timestamp_ms, hashrate });
        while history.len() > HASHRATE_HISTORY_CAPACITY {
            history.remove(0);
        }
        let bytes = bincode::serialize(&history).map_err(|e| crate::error::PoolError::Other(e.to_string()))?;
        self.db.put(CF_HASHRATE_HISTORY, b"history", &bytes)?;
        Ok(())
    }

    async fn get_hashrate_history(&self) -> Result<Vec<HashrateSample>, crate::error::PoolError> {
        match self.db.get(CF_HASHRATE_HISTORY, b"history")? {
            Some(bytes) => Ok(bincode::deserialize(&bytes).map_err(|e| crate::error::PoolError::Other(e.to_string()))?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory `PersistentStore` double for unit tests that don't need an
    /// actual RocksDB instance.
    pub struct InMemoryStore {
        miners: Mutex<HashMap<String, i64>>,
        payouts: Mutex<Vec<PayoutRecord>>,
        hashrate: Mutex<Vec<HashrateSample>>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self { miners: Mutex::new(HashMap::new()), payouts: Mutex::new(Vec::new()), hashrate: Mutex::new(Vec::new()) }
        }

        pub async fn balance(&self, address: &str) -> i64 {
            *self.miners.lock().await.get(address).unwrap_or(&0)
        }
    }

    impl Default for InMemoryStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PersistentStore for InMemoryStore {
        async fn get_miner(&self, address: &str) -> Result<MinerRecord, crate::error::PoolError> {
            let balance = *self.miners.lock().await.get(address).unwrap_or(&0);
            Ok(MinerRecord { address: address.to_string(), balance_sompi: balance })
        }

        async fn add_balance(&self, address: &str, delta_sompi: i64) -> Result<i64, crate::error::PoolError> {
            let mut miners = self.miners.lock().await;
            let entry = miners.entry(address.to_string()).or_insert(0);
            *entry += delta_sompi;
            Ok(*entry)
        }

        async fn settle_payout(&self, outputs: &[PayoutOutput], txids: &[String], timestamp_ms: u64) -> Result<(), crate::error::PoolError> {
            let txid = txids.first().cloned().unwrap_or_default();
            let mut miners = self.miners.lock().await;
            let mut payouts = self.payouts.lock().await;
            for output in outputs {
                miners.insert(output.address.clone(), 0);
                payouts.push(PayoutRecord { address: output.address.clone(), amount_sompi: output.amount_sompi, txid: txid.clone(), timestamp_ms });
            }
            Ok(())
        }

        async fn get_recent_payouts(&self, address: &str, limit: usize) -> Result<Vec<PayoutRecord>, crate::error::PoolError> {
            let mut matching: Vec<PayoutRecord> = self.payouts.lock().await.iter().filter(|p| p.address == address).cloned().collect();
            matching.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
            matching.truncate(limit);
            Ok(matching)
        }

        async fn record_hashrate(&self, timestamp_ms: u64, hashrate: f64) -> Result<(), crate::error::PoolError> {
            self.hashrate.lock().await.push(HashrateSample { timestamp_ms, hashrate });
            Ok(())
        }

        async fn get_hashrate_history(&self) -> Result<Vec<HashrateSample>, crate::error::PoolError> {
            Ok(self.hashrate.lock().await.clone())
        }
    }
}
