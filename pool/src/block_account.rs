//! `BlockAccount`: PPLNS snapshot on block-accepted, reward computation on
//! coinbase maturity, payout batching.

use crate::ledger::Contribution;
use crate::payout::{PayoutOutput, PayoutSender};
use crate::store::PersistentStore;
use consensus_core::constants::SOMPI_PER_JIO;
use consensus_core::Hash;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Raised by `SessionManager` once `TemplateService::submit` succeeds for a
/// block-hitting share. Carries the PPLNS snapshot taken at acceptance time,
/// not just the triggering share, so the whole window is recorded against
/// the block.
#[derive(Debug, Clone)]
pub struct BlockAccepted {
    pub hash: Hash,
    pub contributions: Vec<Contribution>,
    pub accepted_at_ms: u64,
}

/// Delivered by the external UTXO processor once a block's coinbase output
/// matures.
#[derive(Debug, Clone)]
pub struct CoinbaseMaturity {
    pub hash: Hash,
    /// Gross coinbase reward in sompi, before the pool's operator fee is
    /// deducted.
    pub gross_amount_sompi: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BlockStatus {
    Submitted,
    Mature,
    Orphaned,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockRecord {
    pub hash: Hash,
    pub contributions: Vec<Contribution>,
    pub submitted_at_ms: u64,
    pub status: BlockStatus,
}

/// Converts a percentage (e.g. `1.5` for 1.5%) into whole-sompi fee owed on
/// `gross_sompi`, rounding the percentage to basis points before dividing so
/// the multiply happens before the divide.
fn fee_sompi(gross_sompi: u64, fee_percent: f64) -> u64 {
    let basis_points = (fee_percent * 100.0).round().max(0.0) as u128;
    ((gross_sompi as u128 * basis_points) / 10_000) as u64
}

pub struct BlockAccount<P: PersistentStore, S: PayoutSender> {
    store: Arc<P>,
    payout: Arc<S>,
    operator_address: String,
    fee_percent: f64,
    payment_threshold_sompi: u64,
    records: tokio::sync::Mutex<HashMap<Hash, BlockRecord>>,
}

impl<P: PersistentStore, S: PayoutSender> BlockAccount<P, S> {
    pub fn new(store: Arc<P>, payout: Arc<S>, operator_address: String, fee_percent: f64, payment_threshold_sompi: u64) -> Self {
        Self { store, payout, operator_address, fee_percent, payment_threshold_sompi, records: tokio::sync::Mutex::new(HashMap::new()) }
    }

    /// Snapshots the current PPLNS window and stores it against `hash`. The
    /// caller must have taken `snapshot` at the moment of acceptance, before
    /// further shares arrive — see `ledger::ShareLedger::snapshot_window`.
    pub async fn record_block_accepted(&self, hash: Hash, snapshot: Vec<Contribution>, now_ms: u64) {
        let mut records = self.records.lock().await;
        records.insert(hash, BlockRecord { hash, contributions: snapshot, submitted_at_ms: now_ms, status: BlockStatus::Submitted });
        info!(target: "pool::block_account", hash = %hash, "block recorded as submitted");
    }

    /// Checks the block's color and either computes proportional rewards
    /// (blue) or marks the record orphaned.
    pub async fn on_coinbase_mature(&self, maturity: CoinbaseMaturity, is_blue: bool) -> Result<(), crate::error::PoolError> {
        let mut records = self.records.lock().await;
        let Some(record) = records.get_mut(&maturity.hash) else {
            warn!(target: "pool::block_account", hash = %maturity.hash, "coinbase maturity event for unknown block");
            return Ok(());
        };

        if !is_blue {
            record.status = BlockStatus::Orphaned;
            info!(target: "pool::block_account", hash = %maturity.hash, "block orphaned, no rewards distributed");
            return Ok(());
        }

        let contributions = record.contributions.clone();
        record.status = BlockStatus::Mature;
        drop(records);

        self.distribute_rewards(maturity.hash, &contributions, maturity.gross_amount_sompi).await
    }

    /// Deducts the operator fee, then splits what remains across
    /// contributors: `totalWork = Σ difficulty`, `reward_c = floor(net ×
    /// share_c)`, computed with multiply-first / divide-last integer math so
    /// rounding dust never exceeds the contributor count.
    async fn distribute_rewards(&self, block_hash: Hash, contributions: &[Contribution], gross_amount_sompi: u64) -> Result<(), crate::error::PoolError> {
        if contributions.is_empty() {
            return Ok(());
        }

        let fee_sompi = fee_sompi(gross_amount_sompi, self.fee_percent);
        if fee_sompi > 0 {
            self.store.add_balance(&self.operator_address, fee_sompi as i64).await?;
        }
        let net_amount_sompi = gross_amount_sompi.saturating_sub(fee_sompi);

        // Aggregate per-address difficulty first: PPLNS splits by address,
        // not by individual share.
        let mut by_address: HashMap<String, u128> = HashMap::new();
        for c in contributions {
            // difficulty is a decimal in the wire protocol; scale by 10^6 to
            // get an integer numerator without losing practical precision.
            let scaled = (c.difficulty * 1_000_000.0).round() as u128;
            *by_address.entry(c.address.clone()).or_insert(0) += scaled;
        }
        let total_work: u128 = by_address.values().sum();
        if total_work == 0 {
            return Ok(());
        }

        let mut payout_batch = Vec::new();
        for (address, work) in by_address {
            let reward = (net_amount_sompi as u128 * work / total_work) as u64;
            if reward == 0 {
                continue;
            }
            let new_balance = self.store.add_balance(&address, reward as i64).await?;
            if new_balance as u64 >= self.payment_threshold_sompi {
                payout_batch.push(PayoutOutput { address, amount_sompi: new_balance as u64 });
            }
        }

        if !payout_batch.is_empty() {
            let txids = self.payout.send(payout_batch.clone()).await?;
            // Resetting the persisted balance and recording the payout happen
            // in one store transaction, so a crash between the two can't lose
            // a miner's credited balance without a matching payout record.
            self.store.settle_payout(&payout_batch, &txids, crate::ledger::now_ms()).await?;
            info!(target: "pool::block_account", hash = %block_hash, outputs = payout_batch.len(), "payout batch sent");
        }
        Ok(())
    }

    pub async fn record(&self, hash: &Hash) -> Option<BlockRecord> {
        self.records.lock().await.get(hash).cloned()
    }

    pub async fn all_records(&self) -> Vec<BlockRecord> {
        self.records.lock().await.values().cloned().collect()
    }

    /// Drops terminal block records older than `retention_ms`.
    pub async fn cleanup(&self, retention_ms: u64, now_ms: u64) {
        let mut records = self.records.lock().await;
        records.retain(|_, r| {
            let terminal = matches!(r.status, BlockStatus::Mature | BlockStatus::Orphaned);
            !(terminal && now_ms.saturating_sub(r.submitted_at_ms) > retention_ms)
        });
    }
}

/// Converts a sompi amount to its JIO-denominated display value (reporting
/// only; floating point is fine here).
pub fn sompi_to_jio(sompi: u64) -> f64 {
    sompi as f64 / SOMPI_PER_JIO as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::mock::NullPayoutSender;
    use crate::store::mock::InMemoryStore;

    fn contribution(address: &str, difficulty: f64) -> Contribution {
        Contribution { address: address.to_string(), worker_name: "w1".to_string(), difficulty, timestamp_ms: 0 }
    }

    #[tokio::test]
    async fn splits_reward_proportionally_after_fee() {
        let store = Arc::new(InMemoryStore::new());
        let payout = Arc::new(NullPayoutSender::new());
        let account = BlockAccount::new(store.clone(), payout.clone(), "pool-operator".to_string(), 10.0, 500);

        let hash = Hash::default();
        let snapshot = vec![contribution("A", 1.0), contribution("B", 3.0)];
        account.record_block_accepted(hash, snapshot, 0).await;

        account.on_coinbase_mature(CoinbaseMaturity { hash, gross_amount_sompi: 1000 }, true).await.unwrap();

        // 10% of 1000 sompi goes to the operator, leaving 900 to split 1:3.
        assert_eq!(store.balance("pool-operator").await, 100);
        assert_eq!(store.balance("A").await, 225);
        // B crossed the payment threshold and was reset to zero after payout.
        assert_eq!(store.balance("B").await, 0);
        assert_eq!(payout.sent_outputs().await.len(), 1);
        assert_eq!(payout.sent_outputs().await[0].amount_sompi, 675);
    }

    #[tokio::test]
    async fn orphaned_block_distributes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let payout = Arc::new(NullPayoutSender::new());
        let account = BlockAccount::new(store.clone(), payout, "pool-operator".to_string(), 1.0, 500);

        let hash = Hash::default();
        account.record_block_accepted(hash, vec![contribution("A", 1.0)], 0).await;
        account.on_coinbase_mature(CoinbaseMaturity { hash, gross_amount_sompi: 1000 }, false).await.unwrap();

        assert_eq!(store.balance("A").await, 0);
        assert_eq!(store.balance("pool-operator").await, 0);
        let record = account.record(&hash).await.unwrap();
        assert_eq!(record.status, BlockStatus::Orphaned);
    }

    #[tokio::test]
    async fn zero_fee_distributes_full_amount() {
        let store = Arc::new(InMemoryStore::new());
        let payout = Arc::new(NullPayoutSender::new());
        let account = BlockAccount::new(store.clone(), payout, "pool-operator".to_string(), 0.0, 500);

        let hash = Hash::default();
        account.record_block_accepted(hash, vec![contribution("A", 1.0), contribution("B", 3.0)], 0).await;
        account.on_coinbase_mature(CoinbaseMaturity { hash, gross_amount_sompi: 1000 }, true).await.unwrap();

        assert_eq!(store.balance("pool-operator").await, 0);
        assert_eq!(store.balance("A").await, 250);
        assert_eq!(store.balance("B").await, 0);
    }
}
