//! Connection settings for the prompt service, read from the environment.

use crate::error::ConfigError;
use crate::upload::{DryRunTransport, LangfuseClient, Transport};
use derivative::Derivative;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://cloud.langfuse.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DRY_RUN_STEP: Duration = Duration::from_millis(100);

fn redacted(_: &String, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[REDACTED]")
}

#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug, Default)]
pub struct ConnectionSettings {
    #[derivative(Default(value = "DEFAULT_HOST.to_string()"))]
    pub host: String,
    pub public_key: String,
    #[derivative(Debug(format_with = "redacted"))]
    pub secret_key: String,
    #[derivative(Default(value = "DEFAULT_TIMEOUT_SECS"))]
    pub timeout_secs: u64,
    pub force_dry_run: bool,
}

impl ConnectionSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(host) = lookup("LANGFUSE_HOST").filter(|h| !h.trim().is_empty()) {
            settings.host = host.trim().to_string();
        }
        settings.public_key = lookup("LANGFUSE_PUBLIC_KEY").unwrap_or_default();
        settings.secret_key = lookup("LANGFUSE_SECRET_KEY").unwrap_or_default();

        if let Some(raw) = lookup("LANGFUSE_TIMEOUT_SECS") {
            settings.timeout_secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        settings.force_dry_run = lookup("PROMPT_UPLOADER_DRY_RUN").is_some();

        Ok(settings)
    }

    pub fn has_credentials(&self) -> bool {
        !self.public_key.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    pub fn is_dry_run(&self) -> bool {
        self.force_dry_run || !self.has_credentials()
    }

    pub fn build_transport(&self) -> Result<Transport, ConfigError> {
        if self.is_dry_run() {
            Ok(Transport::DryRun(DryRunTransport::new(DRY_RUN_STEP)))
        } else {
            Ok(Transport::Langfuse(LangfuseClient::new(self)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_means_dry_run() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.host, DEFAULT_HOST);
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(settings.is_dry_run());
        assert!(matches!(settings.build_transport().unwrap(), Transport::DryRun(_)));
    }

    #[test]
    fn credentials_select_langfuse() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            ("LANGFUSE_HOST", " http://localhost:3000 "),
            ("LANGFUSE_PUBLIC_KEY", "pk-lf-1"),
            ("LANGFUSE_SECRET_KEY", "sk-lf-1"),
            ("LANGFUSE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(settings.host, "http://localhost:3000");
        assert_eq!(settings.timeout_secs, 5);
        assert!(!settings.is_dry_run());
        assert!(matches!(settings.build_transport().unwrap(), Transport::Langfuse(_)));
    }

    #[test]
    fn dry_run_flag_overrides_credentials() {
        let settings = ConnectionSettings::from_lookup(lookup_from(&[
            ("LANGFUSE_PUBLIC_KEY", "pk"),
            ("LANGFUSE_SECRET_KEY", "sk"),
            ("PROMPT_UPLOADER_DRY_RUN", "1"),
        ]))
        .unwrap();
        assert!(settings.is_dry_run());
    }

    #[test]
    fn bad_timeout_is_an_error() {
        for raw in ["0", "soon", "-3"] {
            let result =
                ConnectionSettings::from_lookup(lookup_from(&[("LANGFUSE_TIMEOUT_SECS", raw)]));
            assert!(matches!(result, Err(ConfigError::InvalidTimeout(_))));
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let settings = ConnectionSettings {
            secret_key: "sk-lf-secret".to_string(),
            ..Default::default()
        };
        let printed = format!("{:?}", settings);
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("sk-lf-secret"));
    }
}
