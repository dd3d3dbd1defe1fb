//! Shaping of create-prompt requests from the batch configuration.

use derivative::Derivative;
use serde::Serialize;
use std::collections::HashMap;

pub const CHAT_SYSTEM_MESSAGE: &str = "You are a helpful assistant";

pub const MODEL_CHOICES: [(&str, &str); 4] = [
    ("gpt-4o", "GPT-4O"),
    ("gpt-4", "GPT-4"),
    ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ("claude-3", "Claude 3"),
];

pub const TEMPERATURE_CHOICES: [(f32, &str); 4] = [
    (0.0, "0 - Deterministic"),
    (0.3, "0.3 - Focused"),
    (0.7, "0.7 - Balanced"),
    (1.0, "1 - Creative"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptType {
    #[default]
    Text,
    Chat,
}

impl PromptType {
    pub fn label(&self) -> &'static str {
        match self {
            PromptType::Text => "Text",
            PromptType::Chat => "Chat",
        }
    }
}

/// Settings shared by every prompt in a batch.
#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug, Default)]
pub struct PromptConfig {
    pub name: String,
    pub prompt_type: PromptType,
    #[derivative(Default(value = "\"gpt-4o\".to_string()"))]
    pub model: String,
    #[derivative(Default(value = "0.7"))]
    pub temperature: f32,
    #[derivative(Default(value = "vec![\"production\".to_string()]"))]
    pub labels: Vec<String>,
    #[derivative(Default(value = "vec![\"en\".to_string()]"))]
    pub supported_languages: Vec<String>,
}

impl PromptConfig {
    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PromptBody {
    Text(String),
    Chat(Vec<ChatMessage>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptSettings {
    pub model: String,
    pub temperature: f32,
    pub supported_languages: Vec<String>,
}

/// One create-prompt request, serialized as the service's JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePromptRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub prompt_type: PromptType,
    pub prompt: PromptBody,
    pub labels: Vec<String>,
    pub config: PromptSettings,
}

impl CreatePromptRequest {
    pub fn build(config: &PromptConfig, prompt_name: String, content: String) -> Self {
        let prompt = match config.prompt_type {
            PromptType::Text => PromptBody::Text(content),
            PromptType::Chat => PromptBody::Chat(vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: CHAT_SYSTEM_MESSAGE.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content,
                },
            ]),
        };

        Self {
            name: prompt_name,
            prompt_type: config.prompt_type,
            prompt,
            labels: config.labels.clone(),
            config: PromptSettings {
                model: config.model.clone(),
                temperature: config.temperature,
                supported_languages: config.supported_languages.clone(),
            },
        }
    }
}

/// File name up to its first dot; dotfiles keep their full name.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.split('.').next() {
        Some(stem) if !stem.is_empty() => stem,
        _ => file_name,
    }
}

/// Prompt names for the given file names, in order. Later files whose derived
/// name is already taken get `-2`, `-3`, ... appended.
pub fn prompt_names<'a>(
    batch_name: &str,
    file_names: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let batch_name = batch_name.trim();
    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::new();

    for file_name in file_names {
        let base = format!("{}-{}", batch_name, file_stem(file_name));
        let mut candidate = base.clone();
        let mut counter = taken.get(&base).copied().unwrap_or(1);
        while taken.contains_key(&candidate) {
            counter += 1;
            candidate = format!("{}-{}", base, counter);
        }
        taken.insert(base, counter);
        taken.entry(candidate.clone()).or_insert(1);
        names.push(candidate);
    }

    names
}

/// Comma separated list as typed in the config panel.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
