use thiserror::Error;

/// Reasons a batch submission is refused before anything is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select files to upload")]
    NoFiles,

    #[error("Please enter a name for your prompts")]
    BlankName,
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::NoFiles => "No files selected",
            ValidationError::BlankName => "Name required",
        }
    }
}

/// Failure of a single file's upload. Never propagates to sibling files.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to send request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prompt creation failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Upload task aborted: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid filter pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Not a folder: {}", .0.display())]
    NotADirectory(std::path::PathBuf),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LANGFUSE_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
