//! `JobRegistry`: short session-facing job IDs ↔ pre-PoW hashes.

use consensus_core::Hash;
use std::collections::{HashMap, VecDeque};

/// Ordered mapping `jobId -> prePoWHash`, FIFO-evicted in lockstep with
/// `TemplateCache`. `mint` is idempotent: minting the same hash twice returns
/// the existing id instead of creating a new one.
pub struct JobRegistry {
    order: VecDeque<String>,
    by_id: HashMap<String, Hash>,
    by_hash: HashMap<Hash, String>,
    next_id: u64,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self { order: VecDeque::new(), by_id: HashMap::new(), by_hash: HashMap::new(), next_id: 1 }
    }

    /// Returns the existing job id for `pre_pow_hash` if one is live, else
    /// mints and registers a new one.
    pub fn mint(&mut self, pre_pow_hash: Hash) -> String {
        if let Some(existing) = self.by_hash.get(&pre_pow_hash) {
            return existing.clone();
        }
        let id = format!("{:x}", self.next_id);
        self.next_id += 1;
        self.order.push_back(id.clone());
        self.by_id.insert(id.clone(), pre_pow_hash);
        self.by_hash.insert(pre_pow_hash, id.clone());
        id
    }

    pub fn lookup(&self, job_id: &str) -> Option<Hash> {
        self.by_id.get(job_id).copied()
    }

    /// Removes the oldest job id, returning it if the registry was non-empty.
    pub fn expire_oldest(&mut self) -> Option<String> {
        let id = self.order.pop_front()?;
        if let Some(hash) = self.by_id.remove(&id) {
            self.by_hash.remove(&hash);
        }
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(b: u8) -> Hash {
        Hash::from([b; 32])
    }

    #[test]
    fn mint_is_idempotent() {
        let mut reg = JobRegistry::new();
        let id1 = reg.mint(h(1));
        let id2 = reg.mint(h(1));
        assert_eq!(id1, id2);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn distinct_hashes_get_distinct_ids() {
        let mut reg = JobRegistry::new();
        let id1 = reg.mint(h(1));
        let id2 = reg.mint(h(2));
        assert_ne!(id1, id2);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn lookup_recovers_hash() {
        let mut reg = JobRegistry::new();
        let id = reg.mint(h(7));
        assert_eq!(reg.lookup(&id), Some(h(7)));
        assert_eq!(reg.lookup("nonexistent"), None);
    }

    #[test]
    fn expire_oldest_is_fifo() {
        let mut reg = JobRegistry::new();
        let id1 = reg.mint(h(1));
        let _id2 = reg.mint(h(2));
        let expired = reg.expire_oldest().unwrap();
        assert_eq!(expired, id1);
        assert_eq!(reg.lookup(&id1), None);
        assert_eq!(reg.len(), 1);
    }
}
