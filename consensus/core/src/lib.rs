//! Consensus-layer types shared across the node, the pool and the wallet.
//!
//! `Hash` itself is not defined here: it lives in `jio-hashes` so that the
//! hashing crate has no dependency back on consensus. Everything else that
//! touches block/header/transaction shape lives in this crate.

pub mod acceptance_data;
pub mod api;
pub mod block;
pub mod config;
pub mod constants;
pub mod daa_score_timestamp;
pub mod errors;
pub mod ghostdag;
pub mod hashing;
pub mod header;
pub mod mass;
pub mod merkle;
pub mod mining_rules;
pub mod muhash;
pub mod network;
pub mod pruning;
pub mod script;
pub mod sign;
pub mod subnets;
pub mod trusted;
pub mod tx;
pub mod utxo;

use std::collections::{HashMap, HashSet};

pub use crypto_hashes::{Hash, HASH_SIZE};

/// GHOSTDAG blue anticone size.
pub type KType = u8;

/// Level in the block pyramid used for parent references at multiple levels.
pub type BlockLevel = u8;

pub type BlockHashSet = HashSet<Hash>;
pub type BlockHashMap<V> = HashMap<Hash, V>;

/// Marker trait implemented by the hash maps/sets used across consensus so call
/// sites can stay generic over the underlying hasher.
pub trait HashMapCustomHasher {
    fn new() -> Self;
    fn with_capacity(capacity: usize) -> Self;
}

impl<V> HashMapCustomHasher for BlockHashMap<V> {
    fn new() -> Self {
        HashMap::new()
    }
    fn with_capacity(capacity: usize) -> Self {
        HashMap::with_capacity(capacity)
    }
}

impl HashMapCustomHasher for BlockHashSet {
    fn new() -> Self {
        HashSet::new()
    }
    fn with_capacity(capacity: usize) -> Self {
        HashSet::with_capacity(capacity)
    }
}

pub const ZERO_HASH: Hash = Hash::zeroed_const();

/// Accumulated blue work of a block, expressed as a big-endian 256-bit integer.
///
/// Kept as a thin wrapper over `primitive_types::U256` rather than exposing it
/// directly so header (de)serialization has a single, stable byte layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct BlueWorkType(#[serde(with = "blue_work_serde")] primitive_types::U256);

impl BlueWorkType {
    pub fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.0.to_big_endian(&mut out);
        out
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(primitive_types::U256::from_big_endian(&bytes))
    }

    pub fn as_u256(self) -> primitive_types::U256 {
        self.0
    }
}

impl From<u64> for BlueWorkType {
    fn from(value: u64) -> Self {
        Self(primitive_types::U256::from(value))
    }
}

impl From<primitive_types::U256> for BlueWorkType {
    fn from(value: primitive_types::U256) -> Self {
        Self(value)
    }
}

impl std::ops::Add for BlueWorkType {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::fmt::Display for BlueWorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

mod blue_work_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &primitive_types::U256, s: S) -> Result<S::Ok, S::Error> {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        bytes.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<primitive_types::U256, D::Error> {
        let bytes = <[u8; 32]>::deserialize(d)?;
        Ok(primitive_types::U256::from_big_endian(&bytes))
    }
}
