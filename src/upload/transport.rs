use super::dry_run::DryRunTransport;
use super::langfuse::LangfuseClient;
use super::payload::CreatePromptRequest;
use super::types::{FileId, LifecycleEvent};
use crate::error::UploadError;
use std::sync::mpsc::Sender;

/// Share of the progress bar covered by reading the file. The transport
/// reports the remainder.
pub const READ_SHARE: u8 = 40;

/// Forwards progress for one file to the UI thread.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    id: FileId,
    sender: Sender<LifecycleEvent>,
}

impl ProgressReporter {
    pub fn new(id: FileId, sender: Sender<LifecycleEvent>) -> Self {
        Self { id, sender }
    }

    pub fn report(&self, percent: u8) {
        self.sender
            .send(LifecycleEvent::Progress(self.id, percent.min(100)))
            .unwrap_or_default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPrompt {
    pub name: String,
    pub version: u32,
}

/// Where create-prompt requests go.
#[derive(Debug, Clone)]
pub enum Transport {
    Langfuse(LangfuseClient),
    DryRun(DryRunTransport),
}

impl Transport {
    pub async fn create_prompt(
        &self,
        request: &CreatePromptRequest,
        progress: &ProgressReporter,
    ) -> Result<CreatedPrompt, UploadError> {
        match self {
            Transport::Langfuse(client) => client.create_prompt(request, progress).await,
            Transport::DryRun(dry_run) => dry_run.create_prompt(request, progress).await,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Transport::Langfuse(client) => format!("Langfuse at {}", client.host()),
            Transport::DryRun(_) => "Dry run (nothing is sent)".to_string(),
        }
    }
}
