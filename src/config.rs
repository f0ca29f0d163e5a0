use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the greenhouse backend, e.g. `http://localhost:5001`.
    pub backend_base_url: String,
    /// Full refresh period (readings + alerts + relays) in seconds.
    pub full_refresh_secs: u64,
    /// Relay-only refresh period in seconds.
    pub relay_refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::build(
            required("BACKEND_BASE_URL")?,
            &optional("FULL_REFRESH_SECS", "60"),
            &optional("RELAY_REFRESH_SECS", "5"),
        )
    }

    fn build(backend_base_url: String, full: &str, relay: &str) -> Result<Self> {
        Ok(Self {
            backend_base_url,
            full_refresh_secs: full
                .parse()
                .context("FULL_REFRESH_SECS must be a positive integer")?,
            relay_refresh_secs: relay
                .parse()
                .context("RELAY_REFRESH_SECS must be a positive integer")?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
