use std::io::Write;

use crate::crypto::Crypto;
use crate::error::Result;
use crate::metadata::BackupMetadata;

/// Persists a metadata record to a storage-supplied stream.
pub trait MetadataWriter {
    /// Encode, encrypt and write `metadata`, leaving `out` flushed.
    fn write(&self, out: &mut dyn Write, metadata: &BackupMetadata) -> Result<()>;
}

pub struct MetadataWriterImpl<C> {
    crypto: C,
}

impl<C: Crypto> MetadataWriterImpl<C> {
    pub fn new(crypto: C) -> Self {
        Self { crypto }
    }

    /// MessagePack encoding of `metadata` before encryption.
    pub fn encode(&self, metadata: &BackupMetadata) -> Result<Vec<u8>> {
        rmp_serde::to_vec(metadata).map_err(Into::into)
    }
}

impl<C: Crypto> MetadataWriter for MetadataWriterImpl<C> {
    fn write(&self, out: &mut dyn Write, metadata: &BackupMetadata) -> Result<()> {
        let plaintext = self.encode(metadata)?;
        self.crypto.encrypt_segment(out, &plaintext)?;
        out.flush()?;
        tracing::debug!("wrote metadata for restore set {}", metadata.token());
        Ok(())
    }
}
