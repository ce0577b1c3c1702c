//! Cover image persistence on the local filesystem.

use std::io;
use std::path::{Path, PathBuf};

use uuid::Uuid;

const FALLBACK_NAME: &str = "portada";

/// An uploaded cover image.
#[derive(Debug, Clone, Default)]
pub struct CoverUpload {
    /// Name the client gave the file, if any.
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl CoverUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            bytes: bytes.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Writes cover images into a single directory under unique names.
#[derive(Debug, Clone)]
pub struct CoverStore {
    dir: PathBuf,
}

impl CoverStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store the upload as `<uuid>_<original name>` and return that name.
    ///
    /// The directory is created on demand. An existing file with the same
    /// name is overwritten.
    pub async fn save(&self, upload: &CoverUpload) -> io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let file_name = format!(
            "{}_{}",
            Uuid::new_v4(),
            base_name(upload.file_name.as_deref())
        );
        tokio::fs::write(self.dir.join(&file_name), &upload.bytes).await?;

        tracing::debug!(
            file = %file_name,
            bytes = upload.bytes.len(),
            dir = %self.dir.display(),
            "cover stored"
        );
        Ok(file_name)
    }
}

/// Last path component of a client-supplied name, so uploads stay inside
/// the covers directory.
fn base_name(original: Option<&str>) -> &str {
    original
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or(FALLBACK_NAME)
}
