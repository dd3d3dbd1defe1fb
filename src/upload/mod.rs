mod dry_run;
pub mod extract;
mod folder_scan;
mod langfuse;
mod lifecycle;
pub mod payload;
mod transport;
mod types;

pub use dry_run::DryRunTransport;
pub use extract::{extract_variables, scan_placeholders, PlaceholderScan};
pub use folder_scan::{is_supported_file, scan_folder, SUPPORTED_EXTENSIONS};
pub use langfuse::LangfuseClient;
pub use lifecycle::{UploadJob, Uploader};
pub use payload::{CreatePromptRequest, PromptConfig, PromptType};
pub use transport::{CreatedPrompt, ProgressReporter, Transport, READ_SHARE};
pub use types::{BatchSummary, FileId, LifecycleEvent, SelectedFile, TrackedFile, UploadStatus};
