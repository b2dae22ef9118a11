//! Assembly of leaf-operation arguments from read-API responses.
//!
//! Transfer, delegate, and burn all require the current leaf contents and a
//! Merkle proof of inclusion. Neither lives in an account; both come from
//! the read API and are replayed to the NFT program as instruction
//! arguments plus proof-path accounts.

use {
    crate::{
        error::ClientError,
        read_api::{decode_hash, decode_pubkey, Asset, AssetProof},
    },
    solana_program::{instruction::AccountMeta, pubkey::Pubkey},
};

/// Everything the Bubblegum leaf instructions need to identify and verify
/// one leaf: the tree, the current owner and delegate, the tree root, the
/// leaf hashes, and the leaf position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafClaim {
    pub tree: Pubkey,
    pub owner: Pubkey,
    pub delegate: Pubkey,
    pub root: [u8; 32],
    pub data_hash: [u8; 32],
    pub creator_hash: [u8; 32],
    pub nonce: u64,
    pub index: u32,
}

impl LeafClaim {
    pub fn from_read_api(asset: &Asset, proof: &AssetProof) -> Result<Self, ClientError> {
        if !asset.compression.compressed {
            return Err(ClientError::Proof(format!(
                "asset {} is not compressed",
                asset.id
            )));
        }
        if asset.burnt {
            return Err(ClientError::Proof(format!(
                "asset {} is already burnt",
                asset.id
            )));
        }
        let owner = decode_pubkey(&asset.ownership.owner)?;
        // An absent delegate means the owner delegates to itself.
        let delegate = match &asset.ownership.delegate {
            Some(delegate) => decode_pubkey(delegate)?,
            None => owner,
        };
        let index = u32::try_from(asset.compression.leaf_id)
            .map_err(|_| ClientError::parse("leaf index", asset.compression.leaf_id))?;
        Ok(Self {
            tree: decode_pubkey(&asset.compression.tree)?,
            owner,
            delegate,
            root: decode_hash(&proof.root)?,
            data_hash: decode_hash(&asset.compression.data_hash)?,
            creator_hash: decode_hash(&asset.compression.creator_hash)?,
            nonce: asset.compression.leaf_id,
            index,
        })
    }
}

/// Convert a read-API proof into the readonly accounts a leaf instruction
/// expects, dropping the trailing nodes already cached in the tree's
/// on-chain canopy.
pub fn proof_accounts(
    proof: &AssetProof,
    canopy_depth: u32,
) -> Result<Vec<AccountMeta>, ClientError> {
    let canopy_depth = canopy_depth as usize;
    if proof.proof.len() < canopy_depth {
        return Err(ClientError::Proof(format!(
            "proof of {} nodes is shorter than canopy depth {}",
            proof.proof.len(),
            canopy_depth
        )));
    }
    proof.proof[..proof.proof.len() - canopy_depth]
        .iter()
        .map(|node| Ok(AccountMeta::new_readonly(decode_pubkey(node)?, false)))
        .collect()
}
