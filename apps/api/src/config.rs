use std::str::FromStr;

use anyhow::{Context, Result};

use crate::screening::pipeline::PipelineSettings;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a number does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Flat directory of stored resumes; created at startup.
    pub candidate_dir: String,
    /// How many ranked candidates get a model verdict.
    pub top_n: usize,
    /// Verdict calls in flight at once. 1 scores strictly one after another.
    pub scoring_concurrency: usize,
    pub imap_host: String,
    pub imap_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            candidate_dir: std::env::var("CANDIDATE_DIR")
                .unwrap_or_else(|_| "candidate_base".to_string()),
            top_n: optional_env("TOP_N", 5)?,
            scoring_concurrency: optional_env::<usize>("SCORING_CONCURRENCY", 1)?.max(1),
            imap_host: std::env::var("IMAP_HOST").unwrap_or_else(|_| "imap.gmail.com".to_string()),
            imap_port: optional_env("IMAP_PORT", 993)?,
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            top_n: self.top_n,
            scoring_concurrency: self.scoring_concurrency,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or_default(key, std::env::var(key).ok().as_deref(), default)
}

fn parse_or_default<T>(key: &str, raw: Option<&str>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_uses_default() {
        assert_eq!(parse_or_default::<u16>("PORT", None, 8080).unwrap(), 8080);
        assert_eq!(parse_or_default::<usize>("TOP_N", Some("  "), 5).unwrap(), 5);
    }

    #[test]
    fn test_value_is_parsed() {
        assert_eq!(parse_or_default::<usize>("TOP_N", Some(" 10 "), 5).unwrap(), 10);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = parse_or_default::<u16>("IMAP_PORT", Some("imaps"), 993).unwrap_err();
        assert!(err.to_string().contains("IMAP_PORT"));
    }
}
