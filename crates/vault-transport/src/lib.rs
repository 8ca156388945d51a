//! Backup transport core.
//!
//! Routes each backup session to either the key-value or the full backup
//! engine, keeps the encrypted backup-set metadata on storage in sync with
//! the active restore token, and answers the host with a bounded set of
//! transport result codes.
//!
//! Wire format: MessagePack (compact binary).
//! Crypto: HKDF-SHA256 key derivation + XChaCha20-Poly1305 segments.

pub mod backup;
pub mod config;
pub mod crypto;
pub mod error;
pub mod metadata;
pub mod restore;
pub mod types;

pub use backup::{BackupCoordinator, BackupEngine, BackupNotifier, BackupPlugin, FullBackup, KvBackup};
pub use config::TransportConfig;
pub use crypto::{Crypto, CryptoImpl};
pub use error::{Result, VaultTransportError};
pub use metadata::{
    BackupMetadata, EncryptedBackupMetadata, MetadataDecoder, MetadataReaderImpl, MetadataWriter,
    MetadataWriterImpl, METADATA_VERSION,
};
pub use restore::{RestoreCoordinator, RestorePlugin, RestoreSet};
pub use types::{
    now_ms, PackageInfo, TransportResult, DEFAULT_RESTORE_SET_TOKEN, TRANSPORT_ERROR,
    TRANSPORT_NOT_INITIALIZED, TRANSPORT_OK, TRANSPORT_PACKAGE_REJECTED, TRANSPORT_QUOTA_EXCEEDED,
};
