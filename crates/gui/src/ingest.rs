//! Asynchronous byte acquisition for a file selection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::ReadError;

/// Where a selection's bytes come from
#[derive(Debug, Clone)]
pub enum ByteSource {
    /// File on disk, read off the interaction thread
    Path(PathBuf),
    /// Bytes already in memory (e.g. a dropped file payload)
    Memory(Arc<[u8]>),
}

/// A user-originated file selection
#[derive(Debug, Clone)]
pub struct FileSelection {
    /// Display name
    pub name: String,
    /// Byte length reported at selection time
    pub size: u64,
    pub source: ByteSource,
}

impl FileSelection {
    /// Build a selection from a path, taking name and size from the filesystem.
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            size: metadata.len(),
            source: ByteSource::Path(path.to_path_buf()),
        })
    }

    /// Build a selection over an in-memory buffer
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            source: ByteSource::Memory(bytes),
        }
    }

    pub fn has_stl_extension(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
    }
}

/// Read all bytes of the selection.
///
/// Fails with `Truncated` if fewer bytes arrive than the selection declared.
pub async fn ingest(selection: &FileSelection) -> Result<Vec<u8>, ReadError> {
    let bytes = match &selection.source {
        ByteSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| ReadError::Unreadable(format!("{}: {e}", path.display())))?,
        ByteSource::Memory(buf) => buf.to_vec(),
    };

    let actual = bytes.len() as u64;
    if actual < selection.size {
        return Err(ReadError::Truncated {
            expected: selection.size,
            actual,
        });
    }

    tracing::debug!("Read {} bytes from {}", actual, selection.name);
    Ok(bytes)
}
