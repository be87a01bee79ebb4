//! Disk store for uploaded files.
//!
//! Files are written once under a generated name and never overwritten.
//! Naming and size rules live in [`campusdocs_core::upload`]; this module
//! only performs the I/O.

use std::io::ErrorKind;
use std::path::PathBuf;

use campusdocs_core::error::CoreError;
use campusdocs_core::hierarchy::StoredFileRef;
use campusdocs_core::upload::{check_size, public_url, stored_file_name, SUFFIX_BOUND};
use rand::Rng;
use tokio::io::AsyncWriteExt;

use crate::config::UploadConfig;

/// Fresh names to try if a generated name already exists on disk.
const MAX_NAME_ATTEMPTS: usize = 3;

/// Writes uploaded bytes to the configured directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_base_url: String,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            public_base_url: config.public_base_url.clone(),
            max_bytes: config.max_bytes,
        }
    }

    /// Largest accepted file in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Persist `bytes` under a new collision-resistant name.
    ///
    /// Oversized input is rejected before anything touches the disk. A
    /// partially written file is removed if the write fails.
    pub async fn store(&self, bytes: &[u8], original_name: &str) -> Result<StoredFileRef, CoreError> {
        check_size(bytes.len(), self.max_bytes)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to create upload dir: {e}")))?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let suffix = rand::rng().random_range(0..SUFFIX_BOUND);
            let stored_name =
                stored_file_name(chrono::Utc::now().timestamp_millis(), suffix, original_name);
            let path = self.dir.join(&stored_name);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(CoreError::Internal(format!(
                        "Failed to create upload file: {e}"
                    )))
                }
            };

            let written = async {
                file.write_all(bytes).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
                }
                return Err(CoreError::Internal(format!("Failed to write upload: {e}")));
            }

            tracing::debug!(stored_name = %stored_name, size = bytes.len(), "Stored upload");
            return Ok(StoredFileRef {
                public_url: public_url(&self.public_base_url, &stored_name),
                stored_name,
                original_name: original_name.to_string(),
            });
        }

        Err(CoreError::Internal(
            "Could not allocate a unique upload name".into(),
        ))
    }

    /// Best-effort removal of a stored file, used when the metadata write
    /// that should reference it fails.
    pub async fn remove(&self, stored_name: &str) {
        let path = self.dir.join(stored_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove orphaned upload");
        }
    }
}
