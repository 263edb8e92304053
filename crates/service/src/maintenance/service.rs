use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use super::backup::BackupRunner;
use crate::auth::AuthService;
use crate::errors::ServiceError;

/// Operations the externally scheduled jobs call.
pub struct MaintenanceService {
    auth: Arc<AuthService>,
    runner: Arc<dyn BackupRunner>,
    database_url: String,
    backup_dir: PathBuf,
}

impl MaintenanceService {
    pub fn new(auth: Arc<AuthService>, runner: Arc<dyn BackupRunner>, database_url: String, backup_dir: impl Into<PathBuf>) -> Self {
        Self { auth, runner, database_url, backup_dir: backup_dir.into() }
    }

    /// Number of expired tokens removed.
    #[instrument(skip(self))]
    pub async fn sweep_expired_sessions(&self) -> Result<u64, ServiceError> {
        info!("running session cleanup");
        self.auth.sweep_expired_tokens().await.map_err(|e| {
            error!(error = %e, "session cleanup failed");
            ServiceError::Db(e.to_string())
        })
    }

    /// Dump the database to `{backup_dir}/backup_{YYYYmmdd_HHMMSS}.sql`.
    #[instrument(skip(self), fields(dir = %self.backup_dir.display()))]
    pub async fn backup_database(&self) -> Result<PathBuf, ServiceError> {
        info!("running database backup");
        common::env::ensure_dir(&self.backup_dir)
            .await
            .map_err(|e| ServiceError::Backup(e.to_string()))?;
        let target = self.backup_dir.join(backup_file_name(Utc::now()));
        match self.runner.dump(&self.database_url, &target).await {
            Ok(()) => {
                info!(file = %target.display(), "database backed up");
                Ok(target)
            }
            Err(e) => {
                error!(error = %e, "database backup failed");
                Err(e)
            }
        }
    }
}

pub fn backup_file_name(at: chrono::DateTime<Utc>) -> String {
    format!("backup_{}.sql", at.format("%Y%m%d_%H%M%S"))
}
