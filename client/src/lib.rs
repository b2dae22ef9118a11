//! Client library for minting and managing compressed NFTs.
//!
//! Compressed NFTs store their metadata as leaves of an on-chain concurrent
//! Merkle tree maintained by the SPL Account Compression program, with the
//! Bubblegum program acting as the NFT layer on top. This crate provides the
//! client-side plumbing around those programs: program-derived addresses,
//! tree account geometry, change-log event extraction from confirmed
//! transactions, and a read-API client for fetching assets and Merkle proofs.
//!
//! All signing, tree maintenance, and transaction execution are delegated to
//! the cluster and the official program crates.

pub mod changelog;
pub mod error;
pub mod metadata;
pub mod pda;
pub mod proof;
pub mod read_api;
pub mod tree;

pub use error::ClientError;
