//! Langfuse public API client for creating prompts.

use super::payload::CreatePromptRequest;
use super::transport::{CreatedPrompt, ProgressReporter};
use crate::config::ConnectionSettings;
use crate::error::{ConfigError, UploadError};
use derivative::Derivative;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const PROMPTS_PATH: &str = "/api/public/v2/prompts";

#[derive(Deserialize)]
struct PromptResponse {
    name: String,
    #[serde(default)]
    version: u32,
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct LangfuseClient {
    host: String,
    public_key: String,
    #[derivative(Debug = "ignore")]
    secret_key: String,
    #[derivative(Debug = "ignore")]
    client: reqwest::Client,
}

impl LangfuseClient {
    pub fn new(settings: &ConnectionSettings) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            host: settings.host.trim().trim_end_matches('/').to_string(),
            public_key: settings.public_key.trim().to_string(),
            secret_key: settings.secret_key.trim().to_string(),
            client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.host, PROMPTS_PATH)
    }

    pub async fn create_prompt(
        &self,
        request: &CreatePromptRequest,
        progress: &ProgressReporter,
    ) -> Result<CreatedPrompt, UploadError> {
        debug!(prompt = %request.name, url = %self.endpoint(), "Creating prompt");

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .json(request)
            .send()
            .await?;
        progress.report(70);

        match response.status().as_u16() {
            200 | 201 => {
                let created: PromptResponse = response.json().await?;
                progress.report(100);
                Ok(CreatedPrompt {
                    name: created.name,
                    version: created.version,
                })
            }
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                warn!(prompt = %request.name, status, "Langfuse rejected prompt: {}", body);
                Err(UploadError::Api { status, body })
            }
        }
    }
}
