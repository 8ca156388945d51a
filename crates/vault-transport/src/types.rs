use std::fmt;

// ── Transport result codes ───────────────────────────────────────────────

/// Operation succeeded.
pub const TRANSPORT_OK: i32 = 0;

/// Recoverable failure; the host may retry the whole operation.
pub const TRANSPORT_ERROR: i32 = -1000;

/// The device has not been initialized for a backup set yet.
pub const TRANSPORT_NOT_INITIALIZED: i32 = -1001;

/// The engine refused to back up this data owner.
pub const TRANSPORT_PACKAGE_REJECTED: i32 = -1002;

/// The data owner's payload exceeds the engine quota.
pub const TRANSPORT_QUOTA_EXCEEDED: i32 = -1005;

/// Token value meaning "no restore set assigned yet".
pub const DEFAULT_RESTORE_SET_TOKEN: i64 = 0;

/// Bounded outcome reported to the host driver for session-level calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportResult {
    Ok,
    Error,
}

impl TransportResult {
    /// Integer code understood by the host transport.
    pub fn code(self) -> i32 {
        match self {
            TransportResult::Ok => TRANSPORT_OK,
            TransportResult::Error => TRANSPORT_ERROR,
        }
    }

    pub fn is_ok(self) -> bool {
        self == TransportResult::Ok
    }
}

impl From<TransportResult> for i32 {
    fn from(result: TransportResult) -> Self {
        result.code()
    }
}

/// Identity of a data owner (application package).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageInfo {
    pub package_name: String,
}

impl PackageInfo {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
        }
    }
}

impl fmt::Display for PackageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package_name)
    }
}

/// Current time in milliseconds since Unix epoch.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
