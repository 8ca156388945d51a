/// Backup side of the transport.
///
/// Two layers:
/// - **Engine**: contracts for the KV and full engines, storage and notifications
/// - **Coordinator**: routes each session call to the engine that owns it
pub mod coordinator;
pub mod engine;

pub use coordinator::BackupCoordinator;
pub use engine::{BackupEngine, BackupNotifier, BackupPlugin, FullBackup, KvBackup};
