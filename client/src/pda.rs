//! Program-derived addresses used by the Bubblegum program.

use solana_program::pubkey::Pubkey;

/// Seed prefix for asset identifiers.
pub const ASSET_PREFIX: &[u8] = b"asset";

/// Derive the tree authority (tree config) for a merkle tree account.
///
/// This address signs all mutations of the tree on behalf of the NFT
/// program and doubles as the account holding the tree's mint state.
pub fn find_tree_authority(merkle_tree: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[merkle_tree.as_ref()], &mpl_bubblegum::ID)
}

/// Derive the asset ID of the leaf at `leaf_index` in `merkle_tree`.
///
/// Asset IDs are never backed by an account; they only serve as a
/// deterministic reference to a single compressed NFT.
pub fn find_asset_id(merkle_tree: &Pubkey, leaf_index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            ASSET_PREFIX,
            merkle_tree.as_ref(),
            &leaf_index.to_le_bytes(),
        ],
        &mpl_bubblegum::ID,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_authority_is_deterministic() {
        let tree = Pubkey::new_unique();
        assert_eq!(find_tree_authority(&tree), find_tree_authority(&tree));
        assert_ne!(
            find_tree_authority(&tree).0,
            find_tree_authority(&Pubkey::new_unique()).0
        );
    }

    #[test]
    fn asset_id_is_unique_per_leaf() {
        let tree = Pubkey::new_unique();
        let (first, _) = find_asset_id(&tree, 0);
        let (second, _) = find_asset_id(&tree, 1);
        assert_ne!(first, second);
        assert_eq!(first, find_asset_id(&tree, 0).0);
    }

    #[test]
    fn asset_id_depends_on_tree() {
        let (a, _) = find_asset_id(&Pubkey::new_unique(), 7);
        let (b, _) = find_asset_id(&Pubkey::new_unique(), 7);
        assert_ne!(a, b);
    }
}
