//! Outbound payment interface the pool drives once a miner crosses the
//! payment threshold.

use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct PayoutOutput {
    pub address: String,
    pub amount_sompi: u64,
}

#[async_trait]
pub trait PayoutSender: Send + Sync {
    /// Sends a batch of outputs as a single transaction, returning one txid
    /// per output batch sent (implementations may coalesce outputs into
    /// fewer on-chain transactions than entries in `outputs`).
    async fn send(&self, outputs: Vec<PayoutOutput>) -> Result<Vec<String>, crate::error::PoolError>;
}

/// Test/dry-run double that records what it would have sent without
/// touching a wallet.
pub struct NullPayoutSender {
    sent: tokio::sync::Mutex<Vec<PayoutOutput>>,
}

impl NullPayoutSender {
    pub fn new() -> Self {
        Self { sent: tokio::sync::Mutex::new(Vec::new()) }
    }

    pub async fn sent_outputs(&self) -> Vec<PayoutOutput> {
        self.sent.lock().await.clone()
    }
}

impl Default for NullPayoutSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PayoutSender for NullPayoutSender {
    async fn send(&self, outputs: Vec<PayoutOutput>) -> Result<Vec<String>, crate::error::PoolError> {
        let txid = format!("null-{}", outputs.len());
        self.sent.lock().await.extend(outputs);
        Ok(vec![txid])
    }
}

#[cfg(test)]
pub mod mock {
    pub use super::NullPayoutSender;
}
