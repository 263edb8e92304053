//! One-shot maintenance jobs, meant to be triggered by cron or a similar scheduler.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{error, info};

use service::auth::{repo::SeaOrmAuthRepository, AuthConfig, AuthService};
use service::maintenance::{MaintenanceService, PgDumpRunner};

#[derive(Debug, Parser)]
#[command(name = "jobs", version, about = "Portfolio backend maintenance jobs")]
struct Cli {
    #[command(subcommand)]
    command: Job,
}

#[derive(Debug, Subcommand)]
enum Job {
    /// Delete auth tokens older than `auth.token_max_age_secs`
    CleanupSessions,
    /// Dump the database with pg_dump into the backup directory
    BackupDb {
        /// Overrides `backup.dir`
        #[arg(long)]
        dir: Option<String>,
    },
}

async fn run(job: Job) -> anyhow::Result<()> {
    let cfg = configs::AppConfig::load_or_default()?;
    let db = models::db::connect_with_config(&cfg.database).await?;
    let auth = Arc::new(AuthService::new(Arc::new(SeaOrmAuthRepository::new(db)), AuthConfig::from(&cfg.auth)));

    let backup_dir = match &job {
        Job::BackupDb { dir: Some(dir) } => dir.clone(),
        _ => cfg.backup.dir.clone(),
    };
    let maintenance = MaintenanceService::new(
        auth,
        Arc::new(PgDumpRunner::new(cfg.backup.pg_dump.clone())),
        cfg.database.url.clone(),
        backup_dir,
    );

    match job {
        Job::CleanupSessions => {
            let removed = maintenance.sweep_expired_sessions().await?;
            info!(job = "cleanup-sessions", removed, "session cleanup finished");
        }
        Job::BackupDb { .. } => {
            let file = maintenance.backup_database().await?;
            info!(job = "backup-db", file = %file.display(), "backup finished");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    let cli = Cli::parse();

    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };
    match rt.block_on(run(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(event = "job_failed", error = %e, "maintenance job failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        let cli = Cli::try_parse_from(["jobs", "cleanup-sessions"]).unwrap();
        assert!(matches!(cli.command, Job::CleanupSessions));

        let cli = Cli::try_parse_from(["jobs", "backup-db", "--dir", "/tmp/dumps"]).unwrap();
        assert!(matches!(cli.command, Job::BackupDb { dir: Some(ref d) } if d == "/tmp/dumps"));

        assert!(Cli::try_parse_from(["jobs", "vacuum"]).is_err());
    }
}
