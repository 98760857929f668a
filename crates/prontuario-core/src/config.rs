//! Clinic configuration, loaded from a JSON file.
//!
//! Every field has a default, so a partial file (or none at all) is fine:
//!
//! ```json
//! { "database_path": "/data/clinica.db", "session_ttl_minutes": 480 }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::DEFAULT_SIMILARITY_THRESHOLD;

/// Longest accepted session lifetime: 30 days.
pub const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinicConfig {
    /// SQLite file for the local store
    pub database_path: PathBuf,
    /// How long a session stays valid after sign-in
    pub session_ttl_minutes: i64,
    /// Jaro-Winkler threshold for the similar-name report
    pub similar_name_threshold: f64,
    /// Shown on exports
    pub practitioner_name: Option<String>,
    /// tracing level filter: error, warn, info, debug, trace
    pub log_level: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("prontuarios.db"),
            session_ttl_minutes: 8 * 60,
            similar_name_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            practitioner_name: None,
            log_level: "info".to_string(),
        }
    }
}

impl ClinicConfig {
    /// Load from a JSON file and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse from a JSON string and validate.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.session_ttl_minutes) {
            return Err(ConfigError::Invalid(format!(
                "session_ttl_minutes must be between 1 and {}, got {}",
                MAX_SESSION_TTL_MINUTES, self.session_ttl_minutes
            )));
        }
        if !(0.0..=1.0).contains(&self.similar_name_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similar_name_threshold must be between 0 and 1, got {}",
                self.similar_name_threshold
            )));
        }
        let level = self.log_level.to_lowercase();
        if !["error", "warn", "info", "debug", "trace"].contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "unknown log_level: {}",
                self.log_level
            )));
        }
        Ok(())
    }

    /// Session lifetime as a duration, capped at [`MAX_SESSION_TTL_MINUTES`].
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes.clamp(0, MAX_SESSION_TTL_MINUTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClinicConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_ttl(), chrono::Duration::hours(8));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ClinicConfig::from_json_str(r#"{ "session_ttl_minutes": 30 }"#).unwrap();
        assert_eq!(config.session_ttl_minutes, 30);
        assert_eq!(config.database_path, PathBuf::from("prontuarios.db"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ClinicConfig::from_json_str(r#"{ "session_ttl_minutes": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClinicConfig::from_json_str(r#"{ "similar_name_threshold": 1.5 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClinicConfig::from_json_str(r#"{ "log_level": "loud" }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClinicConfig::from_json_str("{"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_session_ttl_bounded() {
        assert!(matches!(
            ClinicConfig::from_json_str(r#"{ "session_ttl_minutes": 9223372036854775807 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ClinicConfig::from_json_str(r#"{ "session_ttl_minutes": 43201 }"#),
            Err(ConfigError::Invalid(_))
        ));
        let config = ClinicConfig::from_json_str(r#"{ "session_ttl_minutes": 43200 }"#).unwrap();
        assert_eq!(config.session_ttl(), chrono::Duration::days(30));

        // Built in code, skipping validation
        let config = ClinicConfig {
            session_ttl_minutes: i64::MAX,
            ..ClinicConfig::default()
        };
        assert_eq!(config.session_ttl(), chrono::Duration::days(30));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "database_path": "/tmp/clinica.db", "practitioner_name": "Dra. Helena" }}"#
        )
        .unwrap();

        let config = ClinicConfig::load(file.path()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/clinica.db"));
        assert_eq!(config.practitioner_name.as_deref(), Some("Dra. Helena"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClinicConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
