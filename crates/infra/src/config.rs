//! Configuration loading and representation.
//!
//! Values come from the process environment; `from_lookup` takes any lookup
//! function so tests never touch the real environment.

use std::time::Duration;

use thiserror::Error;

pub const ADMIN_EMAILS_VAR: &str = "PUNCHCARD_ADMIN_EMAILS";
pub const SIMULATED_LATENCY_VAR: &str = "PUNCHCARD_SIMULATED_LATENCY_MS";
pub const SEED_DEMO_VAR: &str = "PUNCHCARD_SEED_DEMO";

/// Administrator emails used when nothing is configured.
pub const DEFAULT_ADMIN_EMAILS: [&str; 2] =
    ["tom@salesoracle.io", "blackkettleteashoppe@gmail.com"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Emails granted the administrator role.
    pub admin_emails: Vec<String>,
    /// Artificial delay awaited by every service call (zero disables it).
    pub simulated_latency: Duration,
    /// Whether the binary seeds the demo account on startup.
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_emails: DEFAULT_ADMIN_EMAILS.iter().map(|e| e.to_string()).collect(),
            simulated_latency: Duration::ZERO,
            seed_demo: true,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let admin_emails = match lookup(ADMIN_EMAILS_VAR) {
            Some(raw) => parse_email_list(&raw),
            None => {
                tracing::warn!("{ADMIN_EMAILS_VAR} not set; using built-in administrator list");
                defaults.admin_emails
            }
        };

        let simulated_latency = match lookup(SIMULATED_LATENCY_VAR) {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                    var: SIMULATED_LATENCY_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.simulated_latency,
        };

        let seed_demo = match lookup(SEED_DEMO_VAR) {
            Some(raw) => parse_bool(SEED_DEMO_VAR, &raw)?,
            None => defaults.seed_demo,
        };

        Ok(Self {
            admin_emails,
            simulated_latency,
            seed_demo,
        })
    }
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
