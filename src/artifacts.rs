//! Filesystem-backed storage for derived artifacts.
//!
//! QR images, uploaded vendor documents, and rendered investment agreements
//! are written under a configured root directory, each in its own namespace.
//! Rows store the relative reference (`<namespace>/<filename>`) returned by
//! [`ArtifactStore::write`]. Writes happen synchronously inside the request
//! that triggers them; there is no retry or background rendering path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Namespace for vendor QR images (`<username>_qr.png`).
pub const QR_CODES: &str = "qr_codes";
/// Namespace for uploaded vendor documents.
pub const VENDOR_DOCS: &str = "vendor_docs";
/// Namespace for rendered agreements (`investment_<id>.pdf`).
pub const INVESTMENT_AGREEMENTS: &str = "investment_agreements";

/// Errors that can occur while reading or writing artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("invalid artifact name '{name}'")]
    InvalidName { name: String },
    #[error("failed to write artifact {reference}: {source}")]
    Write {
        reference: String,
        source: std::io::Error,
    },
    #[error("failed to read artifact {reference}: {source}")]
    Read {
        reference: String,
        source: std::io::Error,
    },
}

/// Blob store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `bytes` under `<root>/<namespace>/<filename>` and returns the
    /// relative reference to persist in a row.
    pub fn write(
        &self,
        namespace: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, ArtifactError> {
        let filename = sanitize_filename(filename)?;
        let reference = format!("{}/{}", namespace, filename);

        let dir = self.root.join(namespace);
        fs::create_dir_all(&dir).map_err(|source| ArtifactError::Write {
            reference: reference.clone(),
            source,
        })?;

        fs::write(dir.join(&filename), bytes).map_err(|source| ArtifactError::Write {
            reference: reference.clone(),
            source,
        })?;

        Ok(reference)
    }

    /// Reads back the bytes for a previously written reference.
    pub fn read(&self, reference: &str) -> Result<Vec<u8>, ArtifactError> {
        fs::read(self.root.join(reference)).map_err(|source| ArtifactError::Read {
            reference: reference.to_string(),
            source,
        })
    }

    /// Returns the absolute path an artifact reference resolves to.
    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether a caller-supplied name can appear in an artifact filename.
/// Callers that mint artifact names from user input (usernames, upload
/// filenames) should check this at validation time, before any row exists.
pub fn is_safe_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty()
        && !trimmed.contains('/')
        && !trimmed.contains('\\')
        && !trimmed.contains("..")
}

/// Rejects path traversal and separator characters in caller-supplied names.
fn sanitize_filename(filename: &str) -> Result<String, ArtifactError> {
    if !is_safe_name(filename) {
        return Err(ArtifactError::InvalidName {
            name: filename.to_string(),
        });
    }
    Ok(filename.trim().to_string())
}
