//! Block-hash and block-fetch RPC messages.
//!
//! Hash lists travel as one byte string holding the concatenated 32-byte hashes;
//! [`hashes_to_bytes`] and [`bytes_to_hashes`] convert between the two shapes.

use crate::codec::{CodecError, Result};
use crate::wire_record;

pub const HASH_LEN: usize = 32;

/// A 32-byte block or transaction hash.
pub type Hash = [u8; HASH_LEN];

pub fn hashes_to_bytes(hashes: &[Hash]) -> Vec<u8> {
    hashes.concat()
}

/// Split a concatenated hash list. The length must be a multiple of 32.
pub fn bytes_to_hashes(bytes: &[u8]) -> Result<Vec<Hash>> {
    if bytes.len() % HASH_LEN != 0 {
        return Err(CodecError::Format(format!(
            "hash list of {} bytes is not a multiple of {}",
            bytes.len(),
            HASH_LEN
        )));
    }
    Ok(bytes
        .chunks_exact(HASH_LEN)
        .map(|chunk| {
            let mut h = [0u8; HASH_LEN];
            h.copy_from_slice(chunk);
            h
        })
        .collect())
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct GetHashesFastRequest {
        pub client: Vec<u8> => "client",
        pub block_ids: Vec<u8> => "block_ids",
        pub start_height: u64 => "start_height",
    }
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct GetHashesFastResponse {
        pub block_ids: Vec<u8> => "m_block_ids",
        pub start_height: u64 => "start_height",
        pub current_height: u64 => "current_height",
        pub status: Vec<u8> => "status",
        pub untrusted: bool => "untrusted",
        pub credits: u64 => "credits",
        pub top_hash: Vec<u8> => "top_hash",
    }
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct GetBlocksFastRequest {
        pub client: Vec<u8> => "client",
        pub block_ids: Vec<u8> => "block_ids",
        pub start_height: u64 => "start_height",
        pub prune: bool => "prune",
        pub no_miner_tx: bool => "no_miner_tx",
    }
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BlockCompleteEntry {
        pub pruned: bool => "pruned",
        pub block: Vec<u8> => "block",
        pub block_weight: u64 => "block_weight",
        pub txs: Vec<Vec<u8>> => "txs",
    }
}

wire_record! {
    /// Global output indices of one transaction.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TxOutputIndices {
        pub indices: Vec<u64> => "indices",
    }
}

wire_record! {
    /// Output indices of every transaction in one block.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct BlockOutputIndices {
        pub indices: Vec<TxOutputIndices> => "indices",
    }
}

wire_record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct GetBlocksFastResponse {
        pub blocks: Vec<BlockCompleteEntry> => "blocks",
        pub start_height: u64 => "start_height",
        pub current_height: u64 => "current_height",
        pub status: Vec<u8> => "status",
        pub output_indices: Vec<BlockOutputIndices> => "output_indices",
        pub untrusted: bool => "untrusted",
        pub credits: u64 => "credits",
        pub top_hash: Vec<u8> => "top_hash",
    }
}

macro_rules! hash_list_accessors {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                pub fn set_hashes(&mut self, hashes: &[Hash]) {
                    self.block_ids = hashes_to_bytes(hashes);
                }

                pub fn hashes(&self) -> Result<Vec<Hash>> {
                    bytes_to_hashes(&self.block_ids)
                }
            }
        )*
    };
}

hash_list_accessors!(GetHashesFastRequest, GetHashesFastResponse, GetBlocksFastRequest);
