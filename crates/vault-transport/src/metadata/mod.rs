/// Backup-set metadata: the record describing which device produced a
/// backup set and under which restore token.
///
/// Two layers:
/// - **Writer**: encodes a record and writes it as one encrypted segment
/// - **Reader**: decrypts a fetched record and validates its schema
pub mod reader;
pub mod writer;

use std::fmt;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::config::TransportConfig;
use crate::types::DEFAULT_RESTORE_SET_TOKEN;

pub use reader::{MetadataDecoder, MetadataReaderImpl};
pub use writer::{MetadataWriter, MetadataWriterImpl};

/// Schema version this build writes and accepts.
pub const METADATA_VERSION: u8 = 0;

/// One record per backup set.
///
/// Immutable once built. Encoded as a MessagePack array in field order
/// `[version, token, platform_version, device_name]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    version: u8,
    token: i64,
    platform_version: i32,
    device_name: String,
}

impl BackupMetadata {
    /// Record for `token` at the current schema version.
    pub fn new(token: i64, platform_version: i32, device_name: impl Into<String>) -> Self {
        Self::with_version(METADATA_VERSION, token, platform_version, device_name)
    }

    /// Record with an explicit schema version tag.
    pub fn with_version(
        version: u8,
        token: i64,
        platform_version: i32,
        device_name: impl Into<String>,
    ) -> Self {
        Self {
            version,
            token,
            platform_version,
            device_name: device_name.into(),
        }
    }

    /// Record for `token` describing the device in `config`.
    pub fn from_config(token: i64, config: &TransportConfig) -> Self {
        Self::new(token, config.platform_version, config.device_name.clone())
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn token(&self) -> i64 {
        self.token
    }

    pub fn platform_version(&self) -> i32 {
        self.platform_version
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Default for BackupMetadata {
    fn default() -> Self {
        Self::from_config(DEFAULT_RESTORE_SET_TOKEN, &TransportConfig::new())
    }
}

/// Encrypted record as fetched from storage for one restore set.
///
/// Either carries a readable stream or marks the fetch as failed, never both.
/// Decoding consumes the value, so the stream is dropped on every path.
pub struct EncryptedBackupMetadata {
    token: i64,
    source: Option<Box<dyn Read>>,
}

impl EncryptedBackupMetadata {
    pub fn with_stream(token: i64, stream: impl Read + 'static) -> Self {
        Self {
            token,
            source: Some(Box::new(stream)),
        }
    }

    /// The plugin could not fetch the record for `token`.
    pub fn failed(token: i64) -> Self {
        Self {
            token,
            source: None,
        }
    }

    pub fn token(&self) -> i64 {
        self.token
    }

    pub fn is_error(&self) -> bool {
        self.source.is_none()
    }

    pub(crate) fn into_stream(self) -> Option<Box<dyn Read>> {
        self.source
    }
}

impl fmt::Debug for EncryptedBackupMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedBackupMetadata")
            .field("token", &self.token)
            .field("error", &self.is_error())
            .finish()
    }
}
