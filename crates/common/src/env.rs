//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::warn;

/// Ensure the data and avatar directories exist before the stores open files
/// inside them. The public assets directory is optional; missing it only
/// means uploaded avatars cannot be served.
pub async fn ensure_env(data_dir: &str, avatars_dir: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    if let Err(e) = tokio::fs::create_dir_all(avatars_dir).await {
        warn!(%avatars_dir, error = %e, "cannot create avatars directory; uploads will fail");
    }
    Ok(())
}
