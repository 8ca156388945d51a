/// Errors raised below the coordinator boundary.
///
/// The coordinator converts these into transport result codes; they only
/// reach callers directly on the restore/metadata read path.
#[derive(Debug, thiserror::Error)]
pub enum VaultTransportError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported metadata format: {reason}")]
    Format { reason: String },

    #[error("metadata for restore set {token} could not be retrieved")]
    Retrieval { token: i64 },
}

impl VaultTransportError {
    /// Bytes were readable and authentic but do not match the expected schema.
    pub fn is_format_error(&self) -> bool {
        matches!(self, VaultTransportError::Format { .. })
    }

    /// Bytes could not be obtained or decrypted.
    pub fn is_retrieval_error(&self) -> bool {
        matches!(
            self,
            VaultTransportError::Retrieval { .. }
                | VaultTransportError::Crypto(_)
                | VaultTransportError::Io(_)
        )
    }
}

impl From<rmp_serde::encode::Error> for VaultTransportError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        VaultTransportError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for VaultTransportError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        VaultTransportError::Format {
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VaultTransportError>;
