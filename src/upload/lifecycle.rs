use super::payload::{CreatePromptRequest, PromptConfig};
use super::transport::{CreatedPrompt, ProgressReporter, Transport, READ_SHARE};
use super::types::{BatchSummary, FileId, LifecycleEvent, SelectedFile};
use crate::error::UploadError;
use std::collections::HashSet;
use std::io;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::task::JoinSet;
use tracing::{error, info};

const READ_CHUNK: usize = 16 * 1024;

/// One pending file handed to the uploader.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub id: FileId,
    pub prompt_name: String,
    pub file: SelectedFile,
}

/// Drives a batch of files through reading and prompt creation.
#[derive(Clone)]
pub struct Uploader {
    transport: Arc<Transport>,
    config: PromptConfig,
}

impl Uploader {
    pub fn new(transport: Transport, config: PromptConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
        }
    }

    /// Uploads every job concurrently. Each file settles on its own; the
    /// summary is sent once all of them have.
    pub async fn run_batch(
        &self,
        jobs: Vec<UploadJob>,
        status_sender: Sender<LifecycleEvent>,
    ) -> BatchSummary {
        info!(
            files = jobs.len(),
            target = %self.transport.describe(),
            "Starting batch upload"
        );

        let mut unsettled: HashSet<FileId> = jobs.iter().map(|job| job.id).collect();
        let mut tasks = JoinSet::new();
        for job in jobs {
            let uploader = self.clone();
            let sender = status_sender.clone();
            tasks.spawn(async move {
                let id = job.id;
                (id, uploader.upload_file(job, &sender).await)
            });
        }

        let mut summary = BatchSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(created))) => {
                    info!(file = %id, prompt = %created.name, version = created.version, "Prompt created");
                    unsettled.remove(&id);
                    summary.succeeded += 1;
                    status_sender
                        .send(LifecycleEvent::Succeeded(id))
                        .unwrap_or_default();
                }
                Ok((id, Err(e))) => {
                    error!(file = %id, "Upload failed: {}", e);
                    unsettled.remove(&id);
                    summary.failed += 1;
                    status_sender
                        .send(LifecycleEvent::Failed(id, e.to_string()))
                        .unwrap_or_default();
                }
                Err(e) => error!("Upload task did not finish: {}", e),
            }
        }

        // Tasks that panicked never reported their id.
        for id in unsettled {
            summary.failed += 1;
            let message = UploadError::Task("upload task stopped unexpectedly".to_string());
            status_sender
                .send(LifecycleEvent::Failed(id, message.to_string()))
                .unwrap_or_default();
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Batch upload settled"
        );
        status_sender
            .send(LifecycleEvent::BatchSettled(summary))
            .unwrap_or_default();
        summary
    }

    async fn upload_file(
        &self,
        job: UploadJob,
        status_sender: &Sender<LifecycleEvent>,
    ) -> Result<CreatedPrompt, UploadError> {
        let progress = ProgressReporter::new(job.id, status_sender.clone());
        progress.report(0);

        let content = read_content(&job.file, &progress).await?;
        let request = CreatePromptRequest::build(&self.config, job.prompt_name, content);
        self.transport.create_prompt(&request, &progress).await
    }
}

/// Edited files upload what the user saved; everything else is read fresh
/// from disk, reporting progress into the first `READ_SHARE` percent.
async fn read_content(
    file: &SelectedFile,
    progress: &ProgressReporter,
) -> Result<String, UploadError> {
    if file.edited {
        if let Some(content) = &file.content {
            progress.report(READ_SHARE);
            return Ok(content.clone());
        }
    }

    let path = file.path.as_ref().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, format!("{} has no path on disk", file.name))
    })?;

    let mut handle = tokio::fs::File::open(path).await?;
    let total = handle.metadata().await?.len().max(1);
    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        let read = handle.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        let share = (bytes.len() as u64 * READ_SHARE as u64 / total).min(READ_SHARE as u64);
        progress.report(share as u8);
    }
    progress.report(READ_SHARE);

    String::from_utf8(bytes)
        .map_err(|e| UploadError::Read(io::Error::new(io::ErrorKind::InvalidData, e)))
}
