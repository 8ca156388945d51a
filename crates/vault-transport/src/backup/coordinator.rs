/// BackupCoordinator — the single entry point the host transport driver talks to.
///
/// Owns both engines, the storage plugin and the metadata writer. Holds no
/// session state of its own beyond the active restore token: which engine
/// has pending work is always asked of the engines.
///
/// Every engine or plugin error is converted here into a transport result
/// code. The one exception is `finish_backup` without pending state, which
/// is a host contract breach and panics.
use std::io::Read;
use std::time::Duration;

use crate::backup::engine::{BackupEngine, BackupNotifier, BackupPlugin, FullBackup, KvBackup};
use crate::config::TransportConfig;
use crate::error::Result;
use crate::metadata::{BackupMetadata, MetadataWriter};
use crate::types::{now_ms, PackageInfo, TransportResult, DEFAULT_RESTORE_SET_TOKEN, TRANSPORT_NOT_INITIALIZED};

pub struct BackupCoordinator<P, K, F, W, N> {
    config: TransportConfig,
    plugin: P,
    kv: K,
    full: F,
    metadata_writer: W,
    notifier: N,
    /// Token whose metadata is on storage. `None` until the device is initialized.
    token: Option<i64>,
    /// Last token handed out, kept so new tokens never repeat it.
    last_token: Option<i64>,
}

impl<P, K, F, W, N> BackupCoordinator<P, K, F, W, N>
where
    P: BackupPlugin,
    K: KvBackup,
    F: FullBackup,
    W: MetadataWriter,
    N: BackupNotifier,
{
    pub fn new(
        config: TransportConfig,
        plugin: P,
        kv: K,
        full: F,
        metadata_writer: W,
        notifier: N,
    ) -> Self {
        let token = config.backup_token;
        Self {
            config,
            plugin,
            kv,
            full,
            metadata_writer,
            notifier,
            token,
            last_token: token,
        }
    }

    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    pub fn plugin_mut(&mut self) -> &mut P {
        &mut self.plugin
    }

    pub fn metadata_writer(&self) -> &W {
        &self.metadata_writer
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn full(&self) -> &F {
        &self.full
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Restore token of the active backup set, if the device was initialized.
    pub fn current_token(&self) -> Option<i64> {
        self.token
    }

    // ── Session lifecycle ────────────────────────────────────────────────

    /// Start a fresh backup set on storage.
    ///
    /// On success the metadata for the new token has been written and the
    /// token is active. If storage refuses to initialize, the previous token
    /// stays active. Once storage was reset, no token is active until the new
    /// metadata is on storage, so a failed write leaves the device
    /// uninitialized. Every failure fires the notifier once and returns `Error`.
    pub fn initialize_device(&mut self) -> TransportResult {
        tracing::info!("initialize device");

        if let Err(e) = self.plugin.initialize_device() {
            tracing::error!("error initializing device: {e}");
            self.notifier.on_backup_error();
            return TransportResult::Error;
        }

        // Storage was reset: the previous set's metadata is gone.
        let token = next_token(self.last_token, now_ms() as i64);
        self.last_token = Some(token);
        self.token = None;

        match self.write_backup_metadata(token) {
            Ok(()) => {
                self.token = Some(token);
                tracing::info!("initialized backup set {token}");
                TransportResult::Ok
            }
            Err(e) => {
                tracing::error!("error writing metadata for backup set {token}: {e}");
                self.notifier.on_backup_error();
                TransportResult::Error
            }
        }
    }

    /// The output stream lives only for the duration of this call.
    fn write_backup_metadata(&mut self, token: i64) -> Result<()> {
        let metadata = BackupMetadata::from_config(token, &self.config);
        let mut out = self.plugin.metadata_output_stream()?;
        self.metadata_writer.write(out.as_mut(), &metadata)
    }

    /// Quota of the engine responsible for `package`. Pure delegation.
    pub fn get_backup_quota(&self, package: &PackageInfo, is_full_backup: bool) -> i64 {
        let quota = self.engine(is_full_backup).quota();
        tracing::debug!(
            "quota for {package} ({}): {quota}",
            if is_full_backup { "full" } else { "kv" }
        );
        quota
    }

    /// Erase `package` from the KV engine, then from the full engine.
    ///
    /// A KV failure skips the full engine. Any failure is `Error` even if
    /// some data was already erased, so the host retries.
    pub fn clear_backup_data(&mut self, package: &PackageInfo) -> TransportResult {
        tracing::info!("clear backup data of {package}");
        match self.clear_both(package) {
            Ok(()) => TransportResult::Ok,
            Err(e) => {
                tracing::warn!("error clearing backup data of {package}: {e}");
                TransportResult::Error
            }
        }
    }

    fn clear_both(&mut self, package: &PackageInfo) -> Result<()> {
        self.kv.clear_backup_data(package)?;
        self.full.clear_backup_data(package)
    }

    /// Commit the session on whichever engine holds pending state.
    ///
    /// # Panics
    ///
    /// If neither engine has pending state: the host called this without a
    /// preceding successful backup operation.
    pub fn finish_backup(&mut self) -> i32 {
        let kv_pending = self.kv.has_state();
        let full_pending = self.full.has_state();

        if kv_pending {
            if full_pending {
                tracing::error!("both engines report pending state, finishing KV backup");
            }
            tracing::debug!("finish KV backup");
            self.kv.finish_backup()
        } else if full_pending {
            tracing::debug!("finish full backup");
            self.full.finish_backup()
        } else {
            panic!("finish_backup called but neither KV nor full backup has pending state");
        }
    }

    // ── Per-owner delegation ─────────────────────────────────────────────

    pub fn perform_incremental_backup(
        &mut self,
        package: &PackageInfo,
        data: &mut dyn Read,
        flags: i32,
    ) -> i32 {
        if !self.is_initialized() {
            tracing::warn!("rejecting KV backup of {package}: device not initialized");
            return TRANSPORT_NOT_INITIALIZED;
        }
        self.kv.perform_backup(package, data, flags)
    }

    pub fn check_full_backup_size(&self, size: u64) -> i32 {
        self.full.check_full_backup_size(size)
    }

    pub fn perform_full_backup(
        &mut self,
        package: &PackageInfo,
        input: Box<dyn Read>,
        flags: i32,
    ) -> i32 {
        if !self.is_initialized() {
            tracing::warn!("rejecting full backup of {package}: device not initialized");
            return TRANSPORT_NOT_INITIALIZED;
        }
        self.full.perform_full_backup(package, input, flags)
    }

    pub fn send_backup_data(&mut self, num_bytes: usize) -> i32 {
        self.full.send_backup_data(num_bytes)
    }

    pub fn cancel_full_backup(&mut self) {
        tracing::info!("cancel full backup");
        self.full.cancel_full_backup()
    }

    // ── Scheduling hints ─────────────────────────────────────────────────

    pub fn request_backup_time(&self) -> Duration {
        self.config.kv_backup_interval
    }

    pub fn request_full_backup_time(&self) -> Duration {
        self.config.full_backup_interval
    }

    fn is_initialized(&self) -> bool {
        self.token.is_some()
    }

    fn engine(&self, is_full_backup: bool) -> &dyn BackupEngine {
        if is_full_backup {
            &self.full
        } else {
            &self.kv
        }
    }
}

/// Token for a new backup set: the current time, but always distinct from
/// (and later than) the previous token and the "no restore set" sentinel.
fn next_token(previous: Option<i64>, now: i64) -> i64 {
    let floor = previous.map_or(DEFAULT_RESTORE_SET_TOKEN, |t| t.max(DEFAULT_RESTORE_SET_TOKEN));
    now.max(floor.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_token_uses_clock() {
        assert_eq!(next_token(None, 1_700_000_000_000), 1_700_000_000_000);
        assert_eq!(next_token(Some(5), 1_700_000_000_000), 1_700_000_000_000);
    }

    #[test]
    fn next_token_is_monotonic() {
        assert_eq!(next_token(Some(1_700_000_000_000), 1_700_000_000_000), 1_700_000_000_001);
        assert_eq!(next_token(Some(2_000), 1_000), 2_001);
    }

    #[test]
    fn next_token_never_sentinel() {
        assert_ne!(next_token(None, 0), DEFAULT_RESTORE_SET_TOKEN);
        assert_ne!(next_token(None, -5), DEFAULT_RESTORE_SET_TOKEN);
    }
}
