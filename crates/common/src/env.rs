//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist before jobs write to them.

use std::path::Path;

use tracing::debug;

/// Ensure a writable directory exists, creating it (and parents) when missing.
pub async fn ensure_dir(dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let dir = dir.as_ref();
    if tokio::fs::metadata(dir).await.is_ok() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", dir.display()))?;
    debug!(dir = %dir.display(), "created directory");
    Ok(())
}

/// Read an environment variable, treating blank values as unset.
pub fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
