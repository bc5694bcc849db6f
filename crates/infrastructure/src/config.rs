//! Suite configuration.
//!
//! Values are layered, later layers winning:
//! 1. built-in defaults
//! 2. an optional secrets file (`spoiler.toml`, or `SPOILER_CONFIG_FILE`)
//! 3. `SPOILER_*` environment variables

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use spoiler_domain::Credentials;
use thiserror::Error;
use url::Url;

/// Base URL of the public Story Spoiler deployment.
pub const DEFAULT_BASE_URL: &str = "https://d3s5nxhwblsjbi.cloudfront.net/api";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Secrets file read when `SPOILER_CONFIG_FILE` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "spoiler.toml";

/// Prefix shared by every environment variable.
pub const ENV_PREFIX: &str = "SPOILER";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum SuiteConfigError {
    /// A source could not be read or a field could not be deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is unusable.
    #[error("invalid configuration value for `{field}`: {reason}")]
    Invalid {
        /// Offending key.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Everything the suite needs to reach and log into the service.
#[derive(Clone, Deserialize)]
pub struct SuiteConfig {
    /// Base URL, including the `/api` path prefix.
    pub base_url: Url,
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Where to write the JSON report, if anywhere.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl SuiteConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or invalid.
    pub fn load() -> Result<Self, SuiteConfigError> {
        let file = config_file(|key| std::env::var(key).ok());
        Self::load_from(&file, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from an explicit file and environment source.
    ///
    /// The file does not need to exist. Environment values are taken as
    /// plain strings so credentials reach the service exactly as set.
    ///
    /// # Errors
    ///
    /// Returns an error if a required value is missing or invalid.
    pub fn load_from(file: &Path, env: Environment) -> Result<Self, SuiteConfigError> {
        #[allow(clippy::cast_possible_wrap)]
        let settings = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("timeout_ms", DEFAULT_TIMEOUT_MS as i64)?
            .add_source(File::from(file).required(false))
            .add_source(env)
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialized fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `SuiteConfigError::Invalid` naming the first bad field.
    pub fn validate(&self) -> Result<(), SuiteConfigError> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(SuiteConfigError::Invalid {
                field: "base_url",
                reason: format!("expected an http(s) URL, got {}", self.base_url),
            });
        }
        if self.username.trim().is_empty() {
            return Err(SuiteConfigError::Invalid {
                field: "username",
                reason: "must not be empty".to_string(),
            });
        }
        if self.password.is_empty() {
            return Err(SuiteConfigError::Invalid {
                field: "password",
                reason: "must not be empty".to_string(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(SuiteConfigError::Invalid {
                field: "timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the login pair.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }
}

/// Picks the secrets file: `SPOILER_CONFIG_FILE` if set and non-empty,
/// otherwise `spoiler.toml` in the working directory.
fn config_file(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(&format!("{ENV_PREFIX}_CONFIG_FILE"))
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
}

impl fmt::Debug for SuiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteConfig")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("report_path", &self.report_path)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn missing_file() -> PathBuf {
        PathBuf::from("/nonexistent/spoiler.toml")
    }

    #[test]
    fn test_env_only_uses_defaults() {
        let config = SuiteConfig::load_from(
            &missing_file(),
            env(&[("SPOILER_USERNAME", "reader"), ("SPOILER_PASSWORD", "pw")]),
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.credentials(), Credentials::new("reader", "pw"));
        assert_eq!(config.report_path, None);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "base_url = \"http://localhost:8080/api\"\n\
             username = \"from-file\"\n\
             password = \"file-pw\"\n\
             timeout_ms = 5000"
        )
        .unwrap();

        let config = SuiteConfig::load_from(
            file.path(),
            env(&[
                ("SPOILER_USERNAME", "from-env"),
                ("SPOILER_TIMEOUT_MS", "1500"),
                ("SPOILER_REPORT_PATH", "report.json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.username, "from-env");
        assert_eq!(config.password, "file-pw");
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.report_path, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_missing_credentials() {
        let result = SuiteConfig::load_from(&missing_file(), env(&[]));
        assert!(matches!(result, Err(SuiteConfigError::Load(_))));
    }

    #[test]
    fn test_rejects_empty_password() {
        let result = SuiteConfig::load_from(
            &missing_file(),
            env(&[("SPOILER_USERNAME", "reader"), ("SPOILER_PASSWORD", "")]),
        );
        assert!(matches!(
            result,
            Err(SuiteConfigError::Invalid {
                field: "password",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_non_http_base() {
        let result = SuiteConfig::load_from(
            &missing_file(),
            env(&[
                ("SPOILER_BASE_URL", "ftp://stories.example.com/api"),
                ("SPOILER_USERNAME", "reader"),
                ("SPOILER_PASSWORD", "pw"),
            ]),
        );
        assert!(matches!(
            result,
            Err(SuiteConfigError::Invalid {
                field: "base_url",
                ..
            })
        ));
    }

    #[test]
    fn test_env_values_kept_verbatim() {
        let config = SuiteConfig::load_from(
            &missing_file(),
            env(&[("SPOILER_USERNAME", "0042"), ("SPOILER_PASSWORD", "007")]),
        )
        .unwrap();
        assert_eq!(config.username, "0042");
        assert_eq!(config.password, "007");

        for password in ["True", "1e3", "12.50"] {
            let config = SuiteConfig::load_from(
                &missing_file(),
                env(&[("SPOILER_USERNAME", "reader"), ("SPOILER_PASSWORD", password)]),
            )
            .unwrap();
            assert_eq!(config.password, password);
        }
    }

    #[test]
    fn test_rejects_blank_username() {
        let result = SuiteConfig::load_from(
            &missing_file(),
            env(&[("SPOILER_USERNAME", "   "), ("SPOILER_PASSWORD", "pw")]),
        );
        assert!(matches!(
            result,
            Err(SuiteConfigError::Invalid {
                field: "username",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let result = SuiteConfig::load_from(
            &missing_file(),
            env(&[
                ("SPOILER_USERNAME", "reader"),
                ("SPOILER_PASSWORD", "pw"),
                ("SPOILER_TIMEOUT_MS", "0"),
            ]),
        );
        assert!(matches!(
            result,
            Err(SuiteConfigError::Invalid {
                field: "timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_config_file_from_env() {
        let lookup = |key: &str| {
            (key == "SPOILER_CONFIG_FILE").then(|| "/etc/spoiler/ci.toml".to_string())
        };
        assert_eq!(config_file(lookup), PathBuf::from("/etc/spoiler/ci.toml"));
    }

    #[test]
    fn test_config_file_default() {
        assert_eq!(config_file(|_| None), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(
            config_file(|_| Some(String::new())),
            PathBuf::from(DEFAULT_CONFIG_FILE)
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = SuiteConfig::load_from(
            &missing_file(),
            env(&[("SPOILER_USERNAME", "reader"), ("SPOILER_PASSWORD", "s3cret")]),
        )
        .unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
