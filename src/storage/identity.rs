//! Locally persisted alias and emoji

use crate::error::Result;
use crate::types::UserIdentity;
use crate::utils::paths::ensure_dir;
use std::path::Path;
use tokio::fs;

/// Read the identity file; missing or unreadable content means anonymous
pub async fn load_identity(path: &Path) -> UserIdentity {
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => UserIdentity::default(),
    }
}

/// Write the identity file, replacing whatever was there
pub async fn save_identity(path: &Path, identity: &UserIdentity) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(identity)?;
    fs::write(path, content).await?;
    Ok(())
}
