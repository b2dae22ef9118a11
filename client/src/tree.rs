//! Geometry of concurrent merkle tree accounts.
//!
//! The account layout is header + tree body + optional canopy. The tree
//! itself is maintained on-chain by the compression program; the client only
//! needs the byte sizes to fund account creation and the header fields to
//! inspect existing trees.

use {crate::error::ClientError, solana_program::pubkey::Pubkey};

/// Byte size of the versioned account header.
pub const CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1: usize = 56;

const ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE: u8 = 1;
const HEADER_VERSION_V1: u8 = 0;

/// Depth/buffer permutations supported by the on-chain compression program.
const VALID_DEPTH_BUFFER_PAIRS: &[(u32, &[u32])] = &[
    (14, &[64, 256, 1024, 2048]),
    (20, &[64, 256, 1024, 2048]),
    (24, &[64, 256, 512, 1024, 2048]),
    (26, &[64, 256, 512, 1024, 2048]),
    (30, &[512, 1024, 2048]),
];

/// Parameters for a new merkle tree account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeGeometry {
    pub max_depth: u32,
    pub max_buffer_size: u32,
    pub canopy_depth: u32,
}

impl TreeGeometry {
    pub fn new(
        max_depth: u32,
        max_buffer_size: u32,
        canopy_depth: u32,
    ) -> Result<Self, ClientError> {
        let geometry = Self {
            max_depth,
            max_buffer_size,
            canopy_depth,
        };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        let buffer_sizes = VALID_DEPTH_BUFFER_PAIRS
            .iter()
            .find(|(depth, _)| *depth == self.max_depth)
            .map(|(_, sizes)| *sizes)
            .ok_or_else(|| {
                ClientError::Geometry(format!("unsupported max depth {}", self.max_depth))
            })?;
        if !buffer_sizes.contains(&self.max_buffer_size) {
            return Err(ClientError::Geometry(format!(
                "max buffer size {} is not supported at depth {}",
                self.max_buffer_size, self.max_depth
            )));
        }
        if self.canopy_depth >= self.max_depth {
            return Err(ClientError::Geometry(format!(
                "canopy depth {} must be smaller than max depth {}",
                self.canopy_depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// Total byte size of the tree account.
    pub fn account_size(&self) -> usize {
        CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1
            + tree_body_size(self.max_depth, self.max_buffer_size)
            + canopy_size(self.canopy_depth)
    }

    /// Number of leaves the tree can hold.
    pub fn capacity(&self) -> u64 {
        1u64 << self.max_depth
    }
}

/// Byte size of one change-log entry or the rightmost path: a root node,
/// `max_depth` path nodes, a leaf index and padding.
fn changelog_entry_size(max_depth: u32) -> usize {
    32 * max_depth as usize + 40
}

/// Byte size of the tree body: sequence number, active index, buffer size,
/// the change-log ring buffer, and the rightmost path.
fn tree_body_size(max_depth: u32, max_buffer_size: u32) -> usize {
    24 + (max_buffer_size as usize + 1) * changelog_entry_size(max_depth)
}

/// Byte size of the canopy, the cached top `canopy_depth` levels of the tree
/// that spare clients from submitting full proofs.
pub fn canopy_size(canopy_depth: u32) -> usize {
    ((1usize << (canopy_depth + 1)) - 2) * 32
}

/// Header fields of an initialized tree account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeHeader {
    pub max_buffer_size: u32,
    pub max_depth: u32,
    pub authority: Pubkey,
    pub creation_slot: u64,
}

/// Parse the versioned header from raw tree account data.
pub fn read_header(data: &[u8]) -> Result<TreeHeader, ClientError> {
    if data.len() < CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1 {
        return Err(ClientError::parse(
            "tree header",
            format!("account data too short: {} bytes", data.len()),
        ));
    }
    if data[0] != ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE {
        return Err(ClientError::parse(
            "tree header",
            format!("unexpected account type {}", data[0]),
        ));
    }
    if data[1] != HEADER_VERSION_V1 {
        return Err(ClientError::parse(
            "tree header",
            format!("unsupported header version {}", data[1]),
        ));
    }
    let max_buffer_size = u32::from_le_bytes(data[2..6].try_into().unwrap());
    let max_depth = u32::from_le_bytes(data[6..10].try_into().unwrap());
    let authority = Pubkey::try_from(&data[10..42])
        .map_err(|err| ClientError::parse("tree authority", err))?;
    let creation_slot = u64::from_le_bytes(data[42..50].try_into().unwrap());
    Ok(TreeHeader {
        max_buffer_size,
        max_depth,
        authority,
        creation_slot,
    })
}

/// Recover the canopy depth of an existing tree account from its data
/// length. Proofs fetched from the read API must be truncated by this many
/// nodes before being passed as instruction accounts.
pub fn canopy_depth_for_account(
    data_len: usize,
    max_depth: u32,
    max_buffer_size: u32,
) -> Result<u32, ClientError> {
    let fixed = CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1 + tree_body_size(max_depth, max_buffer_size);
    let canopy_bytes = data_len.checked_sub(fixed).ok_or_else(|| {
        ClientError::parse(
            "tree account",
            format!("data length {} below tree size {}", data_len, fixed),
        )
    })?;
    for canopy_depth in 0..max_depth {
        if canopy_size(canopy_depth) == canopy_bytes {
            return Ok(canopy_depth);
        }
    }
    Err(ClientError::parse(
        "tree account",
        format!("{} trailing bytes do not form a canopy", canopy_bytes),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_size_for_smallest_supported_tree() {
        let geometry = TreeGeometry::new(14, 64, 0).unwrap();
        assert_eq!(geometry.account_size(), 31_800);
        assert_eq!(geometry.capacity(), 16_384);
    }

    #[test]
    fn canopy_adds_node_storage() {
        let flat = TreeGeometry::new(14, 64, 0).unwrap();
        let with_canopy = TreeGeometry::new(14, 64, 3).unwrap();
        assert_eq!(
            with_canopy.account_size(),
            flat.account_size() + ((1 << 4) - 2) * 32
        );
    }

    #[test]
    fn rejects_unsupported_permutations() {
        assert!(TreeGeometry::new(13, 64, 0).is_err());
        assert!(TreeGeometry::new(14, 128, 0).is_err());
        assert!(TreeGeometry::new(30, 64, 0).is_err());
    }

    #[test]
    fn rejects_canopy_at_or_above_depth() {
        assert!(TreeGeometry::new(14, 64, 14).is_err());
        assert!(TreeGeometry::new(14, 64, 13).is_ok());
    }

    #[test]
    fn canopy_depth_round_trips_through_account_size() {
        for canopy_depth in [0, 1, 5, 10] {
            let geometry = TreeGeometry::new(20, 256, canopy_depth).unwrap();
            assert_eq!(
                canopy_depth_for_account(geometry.account_size(), 20, 256).unwrap(),
                canopy_depth
            );
        }
    }

    #[test]
    fn canopy_depth_rejects_truncated_accounts() {
        let geometry = TreeGeometry::new(14, 64, 0).unwrap();
        assert!(canopy_depth_for_account(geometry.account_size() - 1, 14, 64).is_err());
    }

    #[test]
    fn header_round_trip() {
        let authority = Pubkey::new_unique();
        let mut data = vec![0u8; CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1];
        data[0] = ACCOUNT_TYPE_CONCURRENT_MERKLE_TREE;
        data[1] = HEADER_VERSION_V1;
        data[2..6].copy_from_slice(&64u32.to_le_bytes());
        data[6..10].copy_from_slice(&14u32.to_le_bytes());
        data[10..42].copy_from_slice(authority.as_ref());
        data[42..50].copy_from_slice(&123_456u64.to_le_bytes());

        let header = read_header(&data).unwrap();
        assert_eq!(
            header,
            TreeHeader {
                max_buffer_size: 64,
                max_depth: 14,
                authority,
                creation_slot: 123_456,
            }
        );
    }

    #[test]
    fn header_rejects_wrong_account_type() {
        let mut data = vec![0u8; CONCURRENT_MERKLE_TREE_HEADER_SIZE_V1];
        data[0] = 0;
        assert!(read_header(&data).is_err());
    }
}
