//! Session cleanup and database backup, triggered by an external scheduler.

pub mod backup;
pub mod service;

pub use backup::{BackupRunner, PgDumpRunner};
pub use service::MaintenanceService;
