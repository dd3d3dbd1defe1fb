use super::payload::CreatePromptRequest;
use super::transport::{CreatedPrompt, ProgressReporter, READ_SHARE};
use crate::error::UploadError;
use std::time::Duration;
use tracing::info;

/// Stands in for the prompt service when no credentials are configured.
/// Progress climbs in fixed steps with a pause in between; nothing is sent.
#[derive(Debug, Clone)]
pub struct DryRunTransport {
    step_delay: Duration,
}

impl DryRunTransport {
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }

    pub async fn create_prompt(
        &self,
        request: &CreatePromptRequest,
        progress: &ProgressReporter,
    ) -> Result<CreatedPrompt, UploadError> {
        let payload = serde_json::to_string_pretty(request).unwrap_or_default();
        info!(prompt = %request.name, "Dry run, would create prompt:\n{}", payload);

        for percent in (READ_SHARE..=100).step_by(10) {
            tokio::time::sleep(self.step_delay).await;
            progress.report(percent);
        }

        Ok(CreatedPrompt {
            name: request.name.clone(),
            version: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::payload::PromptConfig;
    use crate::upload::types::{FileId, LifecycleEvent};
    use std::sync::mpsc;

    #[tokio::test]
    async fn steps_progress_up_to_complete() {
        let (sender, receiver) = mpsc::channel();
        let reporter = ProgressReporter::new(FileId(3), sender);
        let request = CreatePromptRequest::build(&PromptConfig::default(), "x-a".into(), "body".into());

        let created = DryRunTransport::new(Duration::ZERO)
            .create_prompt(&request, &reporter)
            .await
            .unwrap();

        assert_eq!(created.name, "x-a");
        let steps: Vec<u8> = receiver
            .try_iter()
            .map(|event| match event {
                LifecycleEvent::Progress(_, percent) => percent,
                other => panic!("unexpected event {:?}", other),
            })
            .collect();
        assert_eq!(steps, vec![40, 50, 60, 70, 80, 90, 100]);
    }
}
