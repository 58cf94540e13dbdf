use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::hr_client::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionsBackend {
    Remote,
    Memory,
}

impl FromStr for PositionsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(PositionsBackend::Remote),
            "memory" => Ok(PositionsBackend::Memory),
            other => bail!("POSITIONS_BACKEND must be 'remote' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default, so an empty environment starts a local setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub hr_api_url: String,
    pub positions_backend: PositionsBackend,
    pub session_file: PathBuf,
    /// Deepest org chart level the nested renderer will produce.
    pub org_chart_max_depth: usize,
    pub http_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let org_chart_max_depth = parse_or(&get, "ORG_CHART_MAX_DEPTH", 64usize)?;
        if org_chart_max_depth == 0 {
            bail!("ORG_CHART_MAX_DEPTH must be at least 1");
        }

        Ok(Config {
            hr_api_url: get("HR_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            positions_backend: parse_or(&get, "POSITIONS_BACKEND", PositionsBackend::Remote)?,
            session_file: get("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".session")),
            org_chart_max_depth,
            http_timeout_secs: parse_or(&get, "HTTP_TIMEOUT_SECS", 30u64)?,
            port: parse_or(&get, "PORT", 8080u16)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.hr_api_url, DEFAULT_BASE_URL);
        assert_eq!(config.positions_backend, PositionsBackend::Remote);
        assert_eq!(config.session_file, PathBuf::from(".session"));
        assert_eq!(config.org_chart_max_depth, 64);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HR_API_URL", "http://hr.internal:9000"),
            ("POSITIONS_BACKEND", "Memory"),
            ("ORG_CHART_MAX_DEPTH", "5"),
            ("PORT", "3000"),
        ])
        .unwrap();
        assert_eq!(config.hr_api_url, "http://hr.internal:9000");
        assert_eq!(config.positions_backend, PositionsBackend::Memory);
        assert_eq!(config.org_chart_max_depth, 5);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(config(&[("PORT", "eighty")]).is_err());
        assert!(config(&[("POSITIONS_BACKEND", "sqlite")]).is_err());
        assert!(config(&[("ORG_CHART_MAX_DEPTH", "0")]).is_err());
    }
}
