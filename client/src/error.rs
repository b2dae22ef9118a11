use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("read api error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },

    #[error("invalid tree geometry: {0}")]
    Geometry(String),

    #[error("invalid proof: {0}")]
    Proof(String),

    #[error("invalid metadata: {0}")]
    Metadata(String),
}

impl ClientError {
    pub(crate) fn parse(what: &'static str, detail: impl ToString) -> Self {
        Self::Parse {
            what,
            detail: detail.to_string(),
        }
    }
}
