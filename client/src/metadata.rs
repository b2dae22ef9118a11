//! Construction and validation of mint metadata arguments.
//!
//! The NFT program enforces Token Metadata compatibility on-chain; the same
//! limits are checked here so a bad mint fails before it is sent.

use {
    crate::error::ClientError,
    mpl_bubblegum::types::{Creator, MetadataArgs, TokenProgramVersion, TokenStandard},
};

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;
pub const MAX_CREATORS: usize = 5;

const MAX_SELLER_FEE_BASIS_POINTS: u16 = 10_000;

/// Assemble the metadata for a plain non-fungible mint: mutable, unsold,
/// no collection, no uses.
pub fn build_metadata_args(
    name: String,
    symbol: String,
    uri: String,
    seller_fee_basis_points: u16,
    creators: Vec<Creator>,
) -> MetadataArgs {
    MetadataArgs {
        name,
        symbol,
        uri,
        seller_fee_basis_points,
        primary_sale_happened: false,
        is_mutable: true,
        edition_nonce: None,
        token_standard: Some(TokenStandard::NonFungible),
        collection: None,
        uses: None,
        token_program_version: TokenProgramVersion::Original,
        creators,
    }
}

pub fn validate_metadata_args(args: &MetadataArgs) -> Result<(), ClientError> {
    if args.name.len() > MAX_NAME_LEN {
        return Err(ClientError::Metadata(format!(
            "name exceeds {} bytes",
            MAX_NAME_LEN
        )));
    }
    if args.symbol.len() > MAX_SYMBOL_LEN {
        return Err(ClientError::Metadata(format!(
            "symbol exceeds {} bytes",
            MAX_SYMBOL_LEN
        )));
    }
    if args.uri.len() > MAX_URI_LEN {
        return Err(ClientError::Metadata(format!(
            "uri exceeds {} bytes",
            MAX_URI_LEN
        )));
    }
    if args.seller_fee_basis_points > MAX_SELLER_FEE_BASIS_POINTS {
        return Err(ClientError::Metadata(format!(
            "seller fee {} exceeds {} basis points",
            args.seller_fee_basis_points, MAX_SELLER_FEE_BASIS_POINTS
        )));
    }
    if args.creators.len() > MAX_CREATORS {
        return Err(ClientError::Metadata(format!(
            "at most {} creators are allowed",
            MAX_CREATORS
        )));
    }
    if !args.creators.is_empty() {
        let share_total: u16 = args
            .creators
            .iter()
            .map(|creator| u16::from(creator.share))
            .sum();
        if share_total != 100 {
            return Err(ClientError::Metadata(format!(
                "creator shares sum to {}, expected 100",
                share_total
            )));
        }
        for (position, creator) in args.creators.iter().enumerate() {
            if args.creators[..position]
                .iter()
                .any(|other| other.address == creator.address)
            {
                return Err(ClientError::Metadata(format!(
                    "duplicate creator {}",
                    creator.address
                )));
            }
        }
    }
    Ok(())
}
