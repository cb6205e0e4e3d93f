use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::hashing;
use crate::{BlueWorkType, Hash};

/// Block header. `hash` is derived from every other field and is kept in
/// sync by [`Header::finalize`] — callers that mutate a header after
/// construction (new timestamp, new merkle root, ...) must call it again
/// before the header is shared.
#[derive(Clone, Debug, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub hash: Hash,
    pub version: u16,
    pub parents_by_level: Vec<Vec<Hash>>,
    pub hash_merkle_root: Hash,
    pub accepted_id_merkle_root: Hash,
    pub utxo_commitment: Hash,
    pub timestamp: u64,
    pub bits: u32,
    pub nonce: u64,
    pub daa_score: u64,
    pub blue_work: BlueWorkType,
    pub blue_score: u64,
    pub pruning_point: Hash,
}

impl Header {
    /// Builds a header and immediately computes its hash.
    #[allow(clippy::too_many_arguments)]
    pub fn new_finalized(
        version: u16,
        parents_by_level: Vec<Vec<Hash>>,
        hash_merkle_root: Hash,
        accepted_id_merkle_root: Hash,
        utxo_commitment: Hash,
        timestamp: u64,
        bits: u32,
        nonce: u64,
        daa_score: u64,
        blue_work: BlueWorkType,
        blue_score: u64,
        pruning_point: Hash,
    ) -> Self {
        let mut header = Self {
            hash: Hash::zeroed(),
            version,
            parents_by_level,
            hash_merkle_root,
            accepted_id_merkle_root,
            utxo_commitment,
            timestamp,
            bits,
            nonce,
            daa_score,
            blue_work,
            blue_score,
            pruning_point,
        };
        header.finalize();
        header
    }

    /// Recomputes `hash` from the rest of the fields. Must be called after
    /// any in-place mutation (new coinbase payload, updated timestamp, ...).
    pub fn finalize(&mut self) {
        self.hash = hashing::header::calculate_header_hash(self);
    }

    /// Direct parents: the level-0 entry of `parents_by_level`, if present.
    pub fn direct_parents(&self) -> &[Hash] {
        self.parents_by_level.first().map(Vec::as_slice).unwrap_or(&[])
    }
}
