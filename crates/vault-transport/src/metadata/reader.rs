use std::io::Read;

use crate::crypto::Crypto;
use crate::error::{Result, VaultTransportError};
use crate::metadata::{BackupMetadata, EncryptedBackupMetadata, METADATA_VERSION};

/// Turns a fetched, encrypted record back into [`BackupMetadata`].
pub trait MetadataDecoder {
    /// Fails with `Retrieval` when the fetch failed, `Crypto`/`Io` when the
    /// segment cannot be decrypted, and `Format` when the decrypted record
    /// is not a supported schema for the requested token.
    fn decode(&self, encrypted: EncryptedBackupMetadata) -> Result<BackupMetadata>;
}

pub struct MetadataReaderImpl<C> {
    crypto: C,
}

impl<C: Crypto> MetadataReaderImpl<C> {
    pub fn new(crypto: C) -> Self {
        Self { crypto }
    }
}

impl<C: Crypto> MetadataDecoder for MetadataReaderImpl<C> {
    fn decode(&self, encrypted: EncryptedBackupMetadata) -> Result<BackupMetadata> {
        let token = encrypted.token();
        let Some(mut stream) = encrypted.into_stream() else {
            return Err(VaultTransportError::Retrieval { token });
        };

        let plaintext = self.crypto.decrypt_segment(&mut stream)?;
        // A record is exactly one segment.
        let mut trailing = [0u8; 1];
        if stream.read(&mut trailing)? != 0 {
            return Err(VaultTransportError::Format {
                reason: "trailing data after metadata segment".into(),
            });
        }
        drop(stream);

        let metadata: BackupMetadata = rmp_serde::from_slice(&plaintext)?;
        if metadata.version() != METADATA_VERSION {
            return Err(VaultTransportError::Format {
                reason: format!(
                    "version {} (supported: {METADATA_VERSION})",
                    metadata.version()
                ),
            });
        }
        if metadata.token() != token {
            return Err(VaultTransportError::Format {
                reason: format!(
                    "record holds token {} but was fetched for {token}",
                    metadata.token()
                ),
            });
        }
        Ok(metadata)
    }
}
