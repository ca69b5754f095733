//! Image attachment storage
//!
//! Uploaded files are written under one directory as
//! `<millis>-<random>-<original name>`. The returned path is relative to the
//! server root (`files/<stored name>`) and is what `/files` serves.

use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "files";

/// Writes attachments into a directory on disk
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `bytes` and return the public path of the stored file
    pub async fn save(&self, original_name: &str, bytes: Bytes) -> io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let stored_name = stored_file_name(original_name);
        let path = self.dir.join(&stored_name);
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Saved upload");
        Ok(format!("{PUBLIC_PREFIX}/{stored_name}"))
    }

    /// Delete a file previously returned by [`UploadStore::save`]
    pub async fn remove(&self, public_path: &str) -> io::Result<()> {
        let stored_name = public_path
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, format!("not an upload path: {public_path}"))
            })?;
        tokio::fs::remove_file(self.dir.join(stored_name)).await
    }
}

/// `<millis>-<random>-<name>` with the name reduced to safe characters
fn stored_file_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4().as_u128() % 1_000_000_000;
    format!("{millis}-{random}-{}", sanitize_file_name(original_name))
}

fn sanitize_file_name(name: &str) -> String {
    // drop any client-supplied directories
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
