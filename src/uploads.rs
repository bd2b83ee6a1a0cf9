//! Author portrait upload storage.
//!
//! Constructed once from [`UploadsConfig`] and handed to the workflows that
//! need it; the stored entity records only the public relative path, never a
//! filesystem location.

use std::path::PathBuf;

use axum::body::Bytes;
use rand::Rng;
use tokio::fs;

use crate::{config::UploadsConfig, error::AppResult};

/// One file received with a form submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    public_prefix: String,
}

impl UploadStore {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: PathBuf::from(&config.dir),
            public_prefix: config.public_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Persist the file under the configured directory and return the public
    /// path to record on the entity. A random prefix keeps repeated uploads
    /// of the same file name from clobbering each other.
    pub async fn store(&self, file: &UploadedFile) -> AppResult<String> {
        let stored_name = format!(
            "{}-{}",
            rand::thread_rng().gen_range(0..10_000),
            sanitize_file_name(&file.name)
        );

        fs::create_dir_all(&self.dir).await?;
        fs::write(self.dir.join(&stored_name), &file.bytes).await?;

        Ok(format!("{}/{}", self.public_prefix, stored_name))
    }
}

/// Keep only the final path component and drop characters that have no
/// business in a stored file name.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_file_name("portrait.png"), "portrait.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\me.jpg"), "me.jpg");
        assert_eq!(sanitize_file_name("od d<>name.png"), "oddname.png");
        assert_eq!(sanitize_file_name("///"), "upload");
    }

    #[tokio::test]
    async fn store_records_public_path_not_filesystem_path() {
        let dir = std::env::temp_dir().join("atheneum-upload-test");
        let store = UploadStore::new(&UploadsConfig {
            dir: dir.to_string_lossy().into_owned(),
            public_prefix: "/images/".to_string(),
        });

        let path = store
            .store(&UploadedFile {
                name: "portrait.png".to_string(),
                bytes: Bytes::from_static(b"png-bytes"),
            })
            .await
            .unwrap();

        assert!(path.starts_with("/images/"));
        assert!(path.ends_with("-portrait.png"));
        let on_disk = dir.join(path.rsplit('/').next().unwrap());
        assert_eq!(std::fs::read(on_disk).unwrap(), b"png-bytes");
    }
}
