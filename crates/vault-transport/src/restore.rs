/// Restore-set discovery: lists the backup sets on storage that this
/// device can decrypt and understand.
use crate::error::Result;
use crate::metadata::{EncryptedBackupMetadata, MetadataDecoder};

/// A backup set offered to the host for restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSet {
    /// Human readable label.
    pub name: String,
    /// Device that produced the set.
    pub device: String,
    pub token: i64,
}

/// Storage backend, read side.
pub trait RestorePlugin {
    /// One encrypted metadata record per backup set on storage.
    fn available_backups(&self) -> Result<Vec<EncryptedBackupMetadata>>;
}

pub struct RestoreCoordinator<P, D> {
    plugin: P,
    decoder: D,
}

impl<P: RestorePlugin, D: MetadataDecoder> RestoreCoordinator<P, D> {
    pub fn new(plugin: P, decoder: D) -> Self {
        Self { plugin, decoder }
    }

    /// Decodable restore sets, or `None` if storage could not be listed.
    ///
    /// Records that fail to decrypt or use an unsupported schema are skipped.
    pub fn available_restore_sets(&self) -> Option<Vec<RestoreSet>> {
        let backups = match self.plugin.available_backups() {
            Ok(backups) => backups,
            Err(e) => {
                tracing::error!("error listing available backups: {e}");
                return None;
            }
        };

        let mut sets = Vec::with_capacity(backups.len());
        for encrypted in backups {
            let token = encrypted.token();
            match self.decoder.decode(encrypted) {
                Ok(metadata) => sets.push(RestoreSet {
                    name: metadata.device_name().to_string(),
                    device: metadata.device_name().to_string(),
                    token: metadata.token(),
                }),
                Err(e) if e.is_format_error() => {
                    tracing::warn!("skipping restore set {token} with unsupported format: {e}");
                }
                Err(e) => {
                    tracing::warn!("skipping restore set {token}, metadata unreadable: {e}");
                }
            }
        }
        tracing::info!("found {} restore sets", sets.len());
        Some(sets)
    }
}
