/// Collaborator contracts the coordinator depends on.
///
/// The KV and full engines share [`BackupEngine`]; everything the
/// coordinator does without knowing which engine it talks to goes
/// through that trait.
use std::io::{Read, Write};

use crate::error::Result;
use crate::types::PackageInfo;

/// Capabilities common to both backup engines.
pub trait BackupEngine {
    /// Whether the last backup operation has not been finalized yet.
    fn has_state(&self) -> bool;

    /// Byte quota for one data owner.
    fn quota(&self) -> i64;

    /// Erase everything this engine stored for `package`.
    fn clear_backup_data(&mut self, package: &PackageInfo) -> Result<()>;

    /// Commit pending state. Returns a transport result code.
    fn finish_backup(&mut self) -> i32;
}

/// Key-value shaped backups of small structured data.
pub trait KvBackup: BackupEngine {
    /// Back up the key-value changes for `package` read from `data`.
    fn perform_backup(&mut self, package: &PackageInfo, data: &mut dyn Read, flags: i32) -> i32;
}

/// Whole-stream backups of arbitrary data.
pub trait FullBackup: BackupEngine {
    /// Whether a payload of `size` bytes will be accepted.
    fn check_full_backup_size(&self, size: u64) -> i32;

    /// Start a full backup of `package`; data arrives through
    /// [`send_backup_data`](FullBackup::send_backup_data).
    fn perform_full_backup(&mut self, package: &PackageInfo, input: Box<dyn Read>, flags: i32) -> i32;

    /// Consume the next `num_bytes` from the stream given to `perform_full_backup`.
    fn send_backup_data(&mut self, num_bytes: usize) -> i32;

    /// Abort the running full backup and drop what was sent so far.
    fn cancel_full_backup(&mut self);
}

/// Storage backend the encrypted bytes end up in.
pub trait BackupPlugin {
    /// Prepare storage for a fresh backup set.
    fn initialize_device(&mut self) -> Result<()>;

    /// Stream the metadata record of the active backup set is written to.
    fn metadata_output_stream(&mut self) -> Result<Box<dyn Write>>;
}

/// Operator-facing side channel for failures.
pub trait BackupNotifier {
    fn on_backup_error(&self);
}
