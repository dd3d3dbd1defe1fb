use std::fmt;
use std::path::PathBuf;

/// Opaque handle for a tracked file, unique within a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub(crate) u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Success,
    Error(String),
}

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub path: Option<PathBuf>,
    pub size: u64,
    /// Text loaded for preview. `None` when the file could not be read as UTF-8.
    pub content: Option<String>,
    /// Set once the user saved changes in the editor; the upload then sends
    /// `content` instead of re-reading the file.
    pub edited: bool,
}

impl SelectedFile {
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(file = %name, "Could not load preview: {}", e);
                None
            }
        };

        Self {
            name,
            path: Some(path),
            size,
            content,
            edited: false,
        }
    }

    /// Dropped files on some platforms arrive as bytes without a path.
    pub fn from_bytes(name: String, bytes: &[u8]) -> Self {
        Self {
            name,
            path: None,
            size: bytes.len() as u64,
            content: Some(String::from_utf8_lossy(bytes).into_owned()),
            edited: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedFile {
    pub id: FileId,
    pub file: SelectedFile,
    pub status: UploadStatus,
    pub progress: u8,
}

/// Messages sent from upload tasks back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    Progress(FileId, u8),
    Succeeded(FileId),
    Failed(FileId, String),
    BatchSettled(BatchSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
