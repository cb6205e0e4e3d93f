//! `TemplateCache`: recent block templates keyed by pre-PoW hash, bounded by
//! the DAA window size.

use consensus_core::block::Block;
use consensus_core::Hash;
use std::collections::{HashMap, VecDeque};

/// A cached block template paired with its PoW state. `pow` wraps
/// `consensus_pow::State`, which exposes `check_pow(nonce) -> (solves_block,
/// target)` — the direct implementation of `checkWork`.
pub struct Template {
    pub block: Block,
    pub pre_pow_hash: Hash,
    pow: consensus_pow::State,
}

impl Template {
    pub fn new(block: Block) -> Self {
        let pow = consensus_pow::State::new(&block.header);
        let pre_pow_hash = consensus_core::hashing::header::hash_override_nonce_time(&block.header, 0, 0);
        Self { block, pre_pow_hash, pow }
    }

    /// `checkWork(nonce) -> (solvesBlock, target)`.
    pub fn check_work(&self, nonce: u64) -> (bool, primitive_types::U256) {
        self.pow.check_pow(nonce)
    }
}

/// Bounded `prePoWHash -> Template` map, oldest entry evicted first.
/// Invariant: for every job id alive in `JobRegistry` there is a matching
/// entry here, and `|TemplateCache| <= DAA_WINDOW`.
pub struct TemplateCache {
    capacity: usize,
    order: VecDeque<Hash>,
    templates: HashMap<Hash, Template>,
}

impl TemplateCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, order: VecDeque::new(), templates: HashMap::new() }
    }

    pub fn contains(&self, pre_pow_hash: &Hash) -> bool {
        self.templates.contains_key(pre_pow_hash)
    }

    pub fn get(&self, pre_pow_hash: &Hash) -> Option<&Template> {
        self.templates.get(pre_pow_hash)
    }

    /// Inserts a new template. No-op if `pre_pow_hash` is already present
    /// (idempotent ingest). Returns `true` if a new entry was inserted.
    pub fn insert(&mut self, template: Template) -> bool {
        let hash = template.pre_pow_hash;
        if self.templates.contains_key(&hash) {
            return false;
        }
        self.order.push_back(hash);
        self.templates.insert(hash, template);
        true
    }

    /// Evicts the oldest template if the cache is over capacity. Returns the
    /// evicted hash, if any.
    pub fn evict_if_over_capacity(&mut self) -> Option<Hash> {
        if self.templates.len() <= self.capacity {
            return None;
        }
        let oldest = self.order.pop_front()?;
        self.templates.remove(&oldest);
        Some(oldest)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consensus_core::header::Header;

    fn block_with_nonce(nonce: u64) -> Block {
        let header = Header::new_finalized(
            1,
            vec![vec![Hash::default()]],
            Hash::default(),
            Hash::default(),
            Hash::default(),
            1_700_000_000_000,
            0x1f00_ffff,
            nonce,
            0,
            0u64.into(),
            0,
            Hash::default(),
        );
        Block::new(header, Vec::new())
    }

    #[test]
    fn insert_and_lookup() {
        let mut cache = TemplateCache::new(2);
        let tpl = Template::new(block_with_nonce(0));
        let hash = tpl.pre_pow_hash;
        assert!(cache.insert(tpl));
        assert!(cache.contains(&hash));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut cache = TemplateCache::new(2);
        let tpl1 = Template::new(block_with_nonce(0));
        let tpl2 = Template::new(block_with_nonce(0));
        assert!(cache.insert(tpl1));
        assert!(!cache.insert(tpl2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_oldest_over_capacity() {
        let mut cache = TemplateCache::new(1);
        // Distinct timestamps produce distinct pre-pow hashes.
        let mut first = block_with_nonce(0);
        first.header.timestamp = 1;
        first.header.finalize();
        let first_hash = Template::new(first.clone()).pre_pow_hash;
        cache.insert(Template::new(first));

        let mut second = block_with_nonce(0);
        second.header.timestamp = 2;
        second.header.finalize();
        cache.insert(Template::new(second));

        let evicted = cache.evict_if_over_capacity();
        assert_eq!(evicted, Some(first_hash));
        assert_eq!(cache.len(), 1);
    }
}
