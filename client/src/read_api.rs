//! Read-API (DAS) client.
//!
//! Compressed assets have no backing account; ownership, metadata, and
//! Merkle proofs are served by RPC providers implementing the Digital Asset
//! Standard API. This module wraps the three methods the leaf operations
//! need behind a blocking JSON-RPC client.

use {
    crate::error::ClientError,
    log::debug,
    serde::de::DeserializeOwned,
    serde::Deserialize,
    serde_json::json,
    solana_program::pubkey::Pubkey,
    std::str::FromStr,
    std::time::Duration,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ReadApiClient {
    url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub content: Option<AssetContent>,
    pub ownership: AssetOwnership,
    pub compression: AssetCompression,
    #[serde(default)]
    pub royalty: Option<AssetRoyalty>,
    #[serde(default)]
    pub burnt: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetContent {
    #[serde(default)]
    pub json_uri: Option<String>,
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetOwnership {
    pub owner: String,
    #[serde(default)]
    pub delegate: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetCompression {
    pub compressed: bool,
    pub tree: String,
    pub leaf_id: u64,
    pub data_hash: String,
    pub creator_hash: String,
    #[serde(default)]
    pub seq: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetRoyalty {
    pub basis_points: u16,
    #[serde(default)]
    pub primary_sale_happened: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetProof {
    pub root: String,
    pub proof: Vec<String>,
    pub node_index: u64,
    pub leaf: String,
    pub tree_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetList {
    pub total: u64,
    pub limit: u64,
    #[serde(default)]
    pub page: u64,
    pub items: Vec<Asset>,
}

impl ReadApiClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("reqwest client"),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn get_asset(&self, asset_id: &Pubkey) -> Result<Asset, ClientError> {
        self.request("getAsset", json!({ "id": asset_id.to_string() }))
    }

    pub fn get_asset_proof(&self, asset_id: &Pubkey) -> Result<AssetProof, ClientError> {
        self.request("getAssetProof", json!({ "id": asset_id.to_string() }))
    }

    pub fn get_assets_by_owner(
        &self,
        owner: &Pubkey,
        page: u64,
        limit: u64,
    ) -> Result<AssetList, ClientError> {
        self.request(
            "getAssetsByOwner",
            json!({
                "ownerAddress": owner.to_string(),
                "page": page,
                "limit": limit,
            }),
        )
    }

    fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ClientError> {
        debug!("read api request: {} {}", method, params);
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let envelope: RpcEnvelope<T> = self
            .client
            .post(&self.url)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope<T>(envelope: RpcEnvelope<T>) -> Result<T, ClientError> {
    if let Some(error) = envelope.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    envelope.result.ok_or(ClientError::Rpc {
        code: -32603,
        message: "response carries neither result nor error".to_string(),
    })
}

/// Decode a base58 32-byte hash from a read-API response.
pub fn decode_hash(value: &str) -> Result<[u8; 32], ClientError> {
    let bytes = bs58::decode(value)
        .into_vec()
        .map_err(|err| ClientError::parse("hash", err))?;
    bytes.as_slice().try_into().map_err(|_| {
        ClientError::parse("hash", format!("expected 32 bytes, got {}", bytes.len()))
    })
}

/// Decode a base58 public key from a read-API response.
pub fn decode_pubkey(value: &str) -> Result<Pubkey, ClientError> {
    Pubkey::from_str(value).map_err(|err| ClientError::parse("pubkey", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET_FIXTURE: &str = r#"{
        "interface": "V1_NFT",
        "id": "Bu1DqgCKJYtRkVqgUb6JMcBDTYXJAdYGkhZMdjfGzempp",
        "content": {
            "json_uri": "https://example.com/nft.json",
            "metadata": { "name": "Super Sweet NFT", "symbol": "SSNC" }
        },
        "ownership": {
            "frozen": false,
            "delegated": false,
            "delegate": null,
            "owner": "8vzhpyoxdnQJuffmrjJxnJaUDzcNBLq9TDbGIAxuhP9o"
        },
        "compression": {
            "eligible": false,
            "compressed": true,
            "data_hash": "29BdgNWxNB1sinkfmWKFQi3zWXRpsotp2FKoZhoqVa9F",
            "creator_hash": "9vDiVDkhMUv9vpd8iqXuwQMwYNmfkg1jcWWkzSNJzWSz",
            "asset_hash": "ATvjgTcCNFKDjnjnLRT5XJphTfqHbJhUonwGZJ3VCtL1",
            "tree": "6tPaKpS6ZYZ25z8THz2eCxbUpV3SAdBFTmw5o9TGxnpg",
            "seq": 5,
            "leaf_id": 4
        },
        "royalty": {
            "royalty_model": "creators",
            "percent": 0.05,
            "basis_points": 500,
            "primary_sale_happened": false
        },
        "burnt": false
    }"#;

    const PROOF_FIXTURE: &str = r#"{
        "root": "6tPaKpS6ZYZ25z8THz2eCxbUpV3SAdBFTmw5o9TGxnpg",
        "proof": [
            "EmJXiXEAhEN3FfNQtBa5hwR8LC5kHvdLsaGCoERosZjK",
            "7NEfhcNPAwbw3L87fjsPqTz2fQdd1CjoLE138SD58FDQ"
        ],
        "node_index": 16388,
        "leaf": "6YdZXw49M97mfFTwgQb6kxM2c6eqZkHSaW9XhhoZXtzv",
        "tree_id": "6tPaKpS6ZYZ25z8THz2eCxbUpV3SAdBFTmw5o9TGxnpg"
    }"#;

    #[test]
    fn deserializes_asset() {
        let asset: Asset = serde_json::from_str(ASSET_FIXTURE).unwrap();
        assert_eq!(asset.compression.leaf_id, 4);
        assert!(asset.compression.compressed);
        assert!(!asset.burnt);
        assert_eq!(
            asset.content.unwrap().metadata.unwrap().name.unwrap(),
            "Super Sweet NFT"
        );
        assert_eq!(asset.royalty.unwrap().basis_points, 500);
        assert!(asset.ownership.delegate.is_none());
    }

    #[test]
    fn deserializes_proof() {
        let proof: AssetProof = serde_json::from_str(PROOF_FIXTURE).unwrap();
        assert_eq!(proof.proof.len(), 2);
        assert_eq!(proof.node_index, 16388);
    }

    #[test]
    fn envelope_surfaces_rpc_errors() {
        let envelope: RpcEnvelope<AssetProof> = serde_json::from_str(
            r#"{ "jsonrpc": "2.0", "id": 1, "error": { "code": -32601, "message": "method not found" } }"#,
        )
        .unwrap();
        match unwrap_envelope(envelope) {
            Err(ClientError::Rpc { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "method not found");
            }
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn envelope_without_result_is_an_error() {
        let envelope: RpcEnvelope<AssetProof> =
            serde_json::from_str(r#"{ "jsonrpc": "2.0", "id": 1 }"#).unwrap();
        assert!(unwrap_envelope(envelope).is_err());
    }

    #[test]
    fn decode_hash_checks_length() {
        assert!(decode_hash("6tPaKpS6ZYZ25z8THz2eCxbUpV3SAdBFTmw5o9TGxnpg").is_ok());
        assert!(decode_hash("abc").is_err());
        assert!(decode_hash("not-base58!").is_err());
    }
}
