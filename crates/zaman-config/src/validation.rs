// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::ZamanConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every violation instead of failing on the first one.
pub fn validate_config(config: &ZamanConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let base_url = config.client.base_url.trim();
    match url::Url::parse(base_url) {
        Ok(parsed) if !matches!(parsed.scheme(), "http" | "https") => invalid(format!(
            "client.base_url `{base_url}` must use http or https, not `{}`",
            parsed.scheme()
        )),
        Ok(parsed) if parsed.host_str().is_none_or(str::is_empty) => {
            invalid(format!("client.base_url `{base_url}` has no host"))
        }
        Ok(_) => {}
        Err(e) => invalid(format!(
            "client.base_url `{base_url}` is not a valid URL: {e}"
        )),
    }

    if config.client.max_retries < 1 {
        invalid("client.max_retries must be at least 1".to_string());
    }

    if config.client.request_timeout_ms == 0 {
        invalid("client.request_timeout_ms must be greater than 0".to_string());
    }

    if config.session.token_path.trim().is_empty() {
        invalid("session.token_path must not be empty".to_string());
    }

    let level = config.agent.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ZamanConfig::default()).is_ok());
    }

    #[test]
    fn non_http_base_url_fails() {
        let mut config = ZamanConfig::default();
        config.client.base_url = "ftp://example.com".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("client.base_url")));
    }

    #[test]
    fn base_url_without_host_fails() {
        let mut config = ZamanConfig::default();
        config.client.base_url = "https://".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn base_url_with_space_in_host_fails() {
        let mut config = ZamanConfig::default();
        config.client.base_url = "https://exa mple .com/<>".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(
            messages(&errors)
                .iter()
                .any(|m| m.contains("is not a valid URL")),
            "got: {:?}",
            messages(&errors)
        );
    }

    #[test]
    fn base_url_with_port_and_path_passes() {
        let mut config = ZamanConfig::default();
        config.client.base_url = "http://127.0.0.1:8080/api/".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_retries_fails() {
        let mut config = ZamanConfig::default();
        config.client.max_retries = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors).iter().any(|m| m.contains("max_retries")));
    }

    #[test]
    fn all_violations_are_collected() {
        let mut config = ZamanConfig::default();
        config.client.max_retries = 0;
        config.client.request_timeout_ms = 0;
        config.session.token_path = " ".into();
        config.agent.log_level = "loud".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "got: {:?}", messages(&errors));
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let mut config = ZamanConfig::default();
        config.agent.log_level = "DEBUG".into();
        assert!(validate_config(&config).is_ok());
    }
}
