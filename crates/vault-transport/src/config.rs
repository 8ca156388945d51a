use std::time::Duration;

/// Configuration for a [`BackupCoordinator`](crate::BackupCoordinator).
///
/// All fields have sensible defaults. Use the builder pattern:
///
/// ```rust
/// use vault_transport::TransportConfig;
///
/// let config = TransportConfig::new()
///     .device_name("Fairphone FP5")
///     .platform_version(34);
/// ```
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Producing device, recorded in every metadata record.
    pub(crate) device_name: String,
    /// Producing OS version, recorded for restore diagnostics.
    pub(crate) platform_version: i32,
    /// Returned from `request_backup_time()`. Zero lets the host decide.
    pub(crate) kv_backup_interval: Duration,
    /// Returned from `request_full_backup_time()`.
    pub(crate) full_backup_interval: Duration,
    /// Token of a backup set initialized in an earlier process lifetime.
    pub(crate) backup_token: Option<i64>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportConfig {
    /// Create a new config with defaults.
    ///
    /// `VAULT_DEVICE_NAME` overrides the device name, otherwise it is built
    /// from `VAULT_DEVICE_MANUFACTURER` and `VAULT_DEVICE_MODEL`.
    /// `VAULT_PLATFORM_VERSION` sets the platform version.
    pub fn new() -> Self {
        let device_name = std::env::var("VAULT_DEVICE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_device_name);
        let platform_version = std::env::var("VAULT_PLATFORM_VERSION")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);

        Self {
            device_name,
            platform_version,
            kv_backup_interval: Duration::ZERO,
            full_backup_interval: Duration::ZERO,
            backup_token: None,
        }
    }

    /// Set the device name written to metadata.
    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Set the platform version written to metadata.
    pub fn platform_version(mut self, version: i32) -> Self {
        self.platform_version = version;
        self
    }

    /// Minimum delay the host should wait between KV backup passes.
    pub fn kv_backup_interval(mut self, interval: Duration) -> Self {
        self.kv_backup_interval = interval;
        self
    }

    /// Minimum delay the host should wait between full backup passes.
    pub fn full_backup_interval(mut self, interval: Duration) -> Self {
        self.full_backup_interval = interval;
        self
    }

    /// Resume an already initialized backup set.
    ///
    /// The metadata for `token` must already be on storage.
    pub fn backup_token(mut self, token: i64) -> Self {
        self.backup_token = Some(token);
        self
    }
}

fn default_device_name() -> String {
    let manufacturer = std::env::var("VAULT_DEVICE_MANUFACTURER").unwrap_or_default();
    let model = std::env::var("VAULT_DEVICE_MODEL").unwrap_or_default();
    let name = format!("{} {}", manufacturer.trim(), model.trim());
    let name = name.trim();
    if name.is_empty() {
        "unknown device".to_string()
    } else {
        name.to_string()
    }
}
