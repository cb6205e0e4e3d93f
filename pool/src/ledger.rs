//! `ShareLedger`: nonce de-duplication, target validation, PPLNS window,
//! per-miner live stats.

use consensus_core::Hash;
use primitive_types::U256;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

/// Compact-bits minimum-difficulty target, converted once and reused as the
/// base for `calculateTarget(difficulty) = MIN_TARGET / difficulty`.
fn min_target() -> U256 {
    consensus_core::hashing::header::bits_to_target(consensus_core::constants::MIN_DIFFICULTY_BITS)
}

pub fn calculate_target(difficulty: f64) -> U256 {
    if difficulty <= 0.0 {
        return min_target();
    }
    let base = min_target();
    // base / difficulty, computed in floating point then rounded back to U256;
    // difficulty here is a reporting/session knob, not a reward-affecting
    // quantity, so float precision is acceptable.
    let base_f = base.to_f64_lossy();
    U256::from_f64_lossy(base_f / difficulty)
}

/// `primitive_types::U256` has no native f64 conversion; these helpers keep
/// the lossy float math localized to this one call site.
trait U256F64Ext {
    fn to_f64_lossy(&self) -> f64;
    fn from_f64_lossy(value: f64) -> U256;
}

impl U256F64Ext for U256 {
    fn to_f64_lossy(&self) -> f64 {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        let mut acc = 0f64;
        for b in bytes {
            acc = acc * 256.0 + b as f64;
        }
        acc
    }

    fn from_f64_lossy(value: f64) -> U256 {
        if value <= 0.0 {
            return U256::zero();
        }
        // Decompose into 64-bit big-endian limbs to avoid precision loss from
        // a single f64 -> u128 cast on very large magnitudes.
        let mut value = value;
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let shift = 2f64.powi(64 * (3 - i) as i32);
            let limb = (value / shift).floor();
            limbs[i] = limb as u64;
            value -= limb * shift;
        }
        U256::from(limbs[0]) << 192 | U256::from(limbs[1]) << 128 | U256::from(limbs[2]) << 64 | U256::from(limbs[3])
    }
}

pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// A single accepted share.
#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    pub address: String,
    pub worker_name: String,
    pub difficulty: f64,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct WorkerStats {
    pub shares_count: u64,
    pub recent_share_difficulties: VecDeque<(u64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct MinerStats {
    pub shares_count: u64,
    pub hashrate_accumulator: f64,
    pub last_active_ms: u64,
    pub workers: HashMap<String, WorkerStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    JobNotFound,
    DuplicateShare,
    LowDifficultyShare,
}

#[derive(Debug, Clone)]
pub struct SubmitAccepted {
    pub is_block: bool,
    pub contribution: Contribution,
}

const HASHRATE_WINDOW_SECS: u64 = 600;
const HASHRATE_SHARES_PER_WORKER: usize = 100;

/// Single-writer component; all mutation happens through `&mut self` methods,
/// so the owner serializes access with one `tokio::sync::Mutex` (see
/// `PoolOrchestrator`).
pub struct ShareLedger {
    capacity: usize,
    seen_nonces: HashSet<u64>,
    window: VecDeque<Contribution>,
    miner_stats: HashMap<String, MinerStats>,
    share_history: VecDeque<u64>,
}

impl ShareLedger {
    pub fn new(pplns_window: usize) -> Self {
        Self {
            capacity: pplns_window,
            seen_nonces: HashSet::new(),
            window: VecDeque::new(),
            miner_stats: HashMap::new(),
            share_history: VecDeque::new(),
        }
    }

    /// Dedups by nonce, checks the share against `difficulty`'s target,
    /// inserts into the PPLNS window, and updates miner/worker stats. The
    /// caller (`SessionManager`) has already resolved `jobId -> prePoWHash ->
    /// Template` and computed `checkWork`; this method receives the result.
    #[allow(clippy::too_many_arguments)]
    pub fn submit(
        &mut self,
        address: String,
        worker_name: String,
        difficulty: f64,
        nonce: u64,
        is_block: bool,
        target: U256,
    ) -> Result<SubmitAccepted, SubmitRejection> {
        if self.seen_nonces.contains(&nonce) {
            return Err(SubmitRejection::DuplicateShare);
        }
        if target > calculate_target(difficulty) {
            return Err(SubmitRejection::LowDifficultyShare);
        }

        self.seen_nonces.insert(nonce);
        let now = now_ms();
        let contribution = Contribution { address: address.clone(), worker_name: worker_name.clone(), difficulty, timestamp_ms: now };
        self.window.push_back(contribution.clone());
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
        self.share_history.push_back(now);

        let stats = self.miner_stats.entry(address).or_default();
        stats.shares_count += 1;
        stats.last_active_ms = now;
        let worker_stats = stats.workers.entry(worker_name).or_default();
        worker_stats.shares_count += 1;
        worker_stats.recent_share_difficulties.push_back((now, difficulty));
        while worker_stats.recent_share_difficulties.len() > HASHRATE_SHARES_PER_WORKER {
            worker_stats.recent_share_difficulties.pop_front();
        }

        Ok(SubmitAccepted { is_block, contribution })
    }

    /// `job-not-found` path: there is no nonce to mark seen yet, so callers
    /// should use this directly rather than `submit`.
    pub fn reject_job_not_found() -> SubmitRejection {
        SubmitRejection::JobNotFound
    }

    /// Snapshot of the live window, in timestamp order. Copy, not drain: the
    /// window is not cleared on a block hit, since later blocks still need
    /// the same trailing share history.
    pub fn snapshot_window(&self) -> Vec<Contribution> {
        self.window.iter().cloned().collect()
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Per-worker hashrate estimate: `H ≈ (Σ share_difficulty × 2³²) /
    /// window_seconds` over a trailing 10-minute window.
    pub fn worker_hashrate(&self, address: &str, worker_name: &str) -> f64 {
        let Some(stats) = self.miner_stats.get(address) else { return 0.0 };
        let Some(worker) = stats.workers.get(worker_name) else { return 0.0 };
        let now = now_ms();
        let cutoff = now.saturating_sub(HASHRATE_WINDOW_SECS * 1000);
        let sum_difficulty: f64 = worker.recent_share_difficulties.iter().filter(|(ts, _)| *ts >= cutoff).map(|(_, d)| d).sum();
        if sum_difficulty == 0.0 {
            return 0.0;
        }
        (sum_difficulty * 2f64.powi(32)) / (HASHRATE_WINDOW_SECS as f64)
    }

    /// Pool-wide hashrate: sum of all per-worker hashrates.
    pub fn pool_hashrate(&self) -> f64 {
        self.miner_stats
            .iter()
            .flat_map(|(addr, stats)| stats.workers.keys().map(move |w| (addr.clone(), w.clone())))
            .map(|(addr, worker)| self.worker_hashrate(&addr, &worker))
            .sum()
    }

    /// Per-miner hashrate: sum of that address's workers' hashrates (used by
    /// the HTTP status API's `/miner` and `/miners` endpoints).
    pub fn miner_hashrate(&self, address: &str) -> f64 {
        let Some(stats) = self.miner_stats.get(address) else { return 0.0 };
        stats.workers.keys().map(|worker| self.worker_hashrate(address, worker)).sum()
    }

    pub fn miner_stats(&self, address: &str) -> Option<&MinerStats> {
        self.miner_stats.get(address)
    }

    pub fn all_miner_stats(&self) -> &HashMap<String, MinerStats> {
        &self.miner_stats
    }

    /// Cleanup tick: drops miner stats inactive longer than
    /// `inactive_after_ms`, and prunes `shareHistory` older than
    /// `history_retention_ms`.
    pub fn cleanup(&mut self, inactive_after_ms: u64, history_retention_ms: u64) {
        let now = now_ms();
        self.miner_stats.retain(|_, stats| now.saturating_sub(stats.last_active_ms) <= inactive_after_ms);
        let cutoff = now.saturating_sub(history_retention_ms);
        while matches!(self.share_history.front(), Some(ts) if *ts < cutoff) {
            self.share_history.pop_front();
        }
    }
}

/// A job's pre-PoW hash, used only to make `SessionManager` callers type the
/// pair consistently when they look a job up via `JobRegistry::lookup`.
pub type PrePowHash = Hash;

#[cfg(test)]
mod tests {
    use super::*;

    fn low_target() -> U256 {
        U256::zero()
    }

    #[test]
    fn rejects_duplicate_nonce() {
        let mut ledger = ShareLedger::new(10);
        let t = low_target();
        assert!(ledger.submit("addr".into(), "w1".into(), 1.0, 1, false, t).is_ok());
        let err = ledger.submit("addr".into(), "w1".into(), 1.0, 1, false, t).unwrap_err();
        assert_eq!(err, SubmitRejection::DuplicateShare);
    }

    #[test]
    fn rejects_low_difficulty_share() {
        let mut ledger = ShareLedger::new(10);
        let weak_target = U256::MAX;
        let err = ledger.submit("addr".into(), "w1".into(), 1_000.0, 1, false, weak_target).unwrap_err();
        assert_eq!(err, SubmitRejection::LowDifficultyShare);
    }

    #[test]
    fn window_is_bounded_fifo() {
        let mut ledger = ShareLedger::new(2);
        for nonce in 0..5u64 {
            let _ = ledger.submit("addr".into(), "w1".into(), 1.0, nonce, false, low_target());
        }
        assert_eq!(ledger.window_len(), 2);
        let snap = ledger.snapshot_window();
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn snapshot_does_not_drain() {
        let mut ledger = ShareLedger::new(10);
        let _ = ledger.submit("addr".into(), "w1".into(), 1.0, 1, false, low_target());
        let _ = ledger.snapshot_window();
        assert_eq!(ledger.window_len(), 1);
    }
}
