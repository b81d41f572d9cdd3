use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::Args;
use clap::builder::RangedU64ValueParser;

use crate::logging::LogFormat;

// =============================================================================
// Upstream constants
// =============================================================================

pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com/";

pub const DEFAULT_GITLAB_API_VERSION: &str = "4";

/// Branch every dependency file is read from
pub const DEFAULT_REF: &str = "master";

pub const LOCK_FILE_PATH: &str = "poetry.lock";

pub const DOCKERFILE_PATH: &str = "Dockerfile";

pub const MANIFEST_PATH: &str = "pyproject.toml";

// =============================================================================
// Service constants
// =============================================================================

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

/// Upper bound of in-flight GitLab requests per fan-out
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Timeout for a single GitLab request in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings whose name contains one of these are masked when displayed
const SENSITIVE_VARIABLES: &[&str] = &["token", "_dsn", "password", "username"];

/// Service settings, read from command line flags or environment variables
#[derive(Clone, Args, PartialEq)]
pub struct Settings {
    /// GitLab access token sent with every API request
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub gitlab_token: String,

    /// GitLab instance URL
    #[arg(long, env = "GITLAB_URL", default_value = DEFAULT_GITLAB_URL)]
    pub gitlab_url: String,

    /// GitLab REST API version
    #[arg(long, env = "GITLAB_API_VERSION", default_value = DEFAULT_GITLAB_API_VERSION)]
    pub gitlab_api_version: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "PACKAGEBUSTERS_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Maximum concurrent GitLab requests per batch
    #[arg(
        long,
        env = "PACKAGEBUSTERS_MAX_CONCURRENCY",
        default_value_t = DEFAULT_MAX_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_concurrency: usize,

    /// Timeout of a single GitLab request in seconds
    #[arg(
        long,
        env = "PACKAGEBUSTERS_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    pub request_timeout_secs: u64,

    /// Age in seconds after which cached files are fetched again (never by default)
    #[arg(long, env = "PACKAGEBUSTERS_CACHE_TTL_SECS")]
    pub cache_ttl_secs: Option<u64>,

    /// Log output format
    #[arg(
        long,
        env = "PACKAGEBUSTERS_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    pub log_format: LogFormat,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("gitlab_token", self.gitlab_token.clone()),
            ("gitlab_url", self.gitlab_url.clone()),
            ("gitlab_api_version", self.gitlab_api_version.clone()),
            ("bind", self.bind.to_string()),
            ("max_concurrency", self.max_concurrency.to_string()),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            (
                "cache_ttl_secs",
                self.cache_ttl_secs
                    .map_or_else(|| "none".to_string(), |ttl| ttl.to_string()),
            ),
            ("log_format", self.log_format.as_str().to_string()),
        ]
    }
}

fn is_sensitive(variable: &str) -> bool {
    SENSITIVE_VARIABLES
        .iter()
        .any(|sensitive| variable.contains(sensitive))
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self
            .fields()
            .into_iter()
            .map(|(variable, value)| {
                if is_sensitive(variable) {
                    format!("{}: ***", variable)
                } else {
                    format!("{}: {}", variable, value)
                }
            })
            .collect();

        write!(f, "{}", values.join(", "))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Settings {{ {} }}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rstest::rstest;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        settings: Settings,
    }

    fn parse(args: &[&str]) -> Result<Settings, clap::Error> {
        TestCli::try_parse_from(std::iter::once("packagebusters").chain(args.iter().copied()))
            .map(|cli| cli.settings)
    }

    #[test]
    fn settings_from_token_only_uses_defaults() {
        let settings = parse(&["--gitlab-token", "glpat-secret"]).unwrap();

        assert_eq!(settings.gitlab_token, "glpat-secret");
        assert_eq!(settings.gitlab_url, DEFAULT_GITLAB_URL);
        assert_eq!(settings.gitlab_api_version, DEFAULT_GITLAB_API_VERSION);
        assert_eq!(settings.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(settings.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(
            settings.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert_eq!(settings.cache_ttl(), None);
        assert_eq!(settings.log_format, LogFormat::Text);
    }

    #[test]
    fn settings_from_all_flags_parses_all_fields() {
        let settings = parse(&[
            "--gitlab-token",
            "t",
            "--gitlab-url",
            "https://gitlab.example.com",
            "--gitlab-api-version",
            "5",
            "--bind",
            "127.0.0.1:9000",
            "--max-concurrency",
            "4",
            "--request-timeout-secs",
            "5",
            "--cache-ttl-secs",
            "600",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(settings.gitlab_url, "https://gitlab.example.com");
        assert_eq!(settings.gitlab_api_version, "5");
        assert_eq!(settings.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(settings.max_concurrency, 4);
        assert_eq!(settings.request_timeout(), Duration::from_secs(5));
        assert_eq!(settings.cache_ttl(), Some(Duration::from_secs(600)));
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn settings_rejects_zero_concurrency() {
        let result = parse(&["--gitlab-token", "t", "--max-concurrency", "0"]);

        assert!(result.is_err());
    }

    #[test]
    fn display_masks_token() {
        let settings = parse(&["--gitlab-token", "glpat-secret"]).unwrap();

        let displayed = settings.to_string();

        assert!(displayed.contains("gitlab_token: ***"));
        assert!(!displayed.contains("glpat-secret"));
        assert!(displayed.contains("gitlab_url: https://gitlab.com/"));
        assert!(displayed.contains("cache_ttl_secs: none"));
        assert!(!format!("{:?}", settings).contains("glpat-secret"));
    }

    #[rstest]
    #[case("gitlab_token", true)]
    #[case("sentry_dsn", true)]
    #[case("db_password", true)]
    #[case("registry_username", true)]
    #[case("gitlab_url", false)]
    #[case("max_concurrency", false)]
    fn is_sensitive_matches_substrings(#[case] variable: &str, #[case] expected: bool) {
        assert_eq!(is_sensitive(variable), expected);
    }
}
