//! Environment-driven server configuration.

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: String,
    /// Google Vision API key; image moderation is disabled when absent.
    pub safesearch_key: Option<String>,
    pub discovery: DiscoveryConfig,
}

/// Values published by the discovery endpoint. Cloned into the router as
/// an `Extension`, so it must stay cheap to clone.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub contact: String,
    pub changeset: String,
    pub base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let bind_addr = env_or("CIVIX_BIND_ADDR", "0.0.0.0:8080");
        let safesearch_key = std::env::var("CIVIX_SAFESEARCH_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let discovery = DiscoveryConfig {
            contact: env_or("CIVIX_DISCOVERY_CONTACT", "support@civix.example"),
            changeset: env_or("CIVIX_DISCOVERY_CHANGESET", "2026-08-01T00:00:00Z"),
            base_url: env_or("CIVIX_BASE_URL", "http://localhost:8080"),
        };
        Ok(Self {
            database_url,
            bind_addr,
            safesearch_key,
            discovery,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_blank() {
        std::env::remove_var("CIVIX_TEST_MISSING");
        assert_eq!(env_or("CIVIX_TEST_MISSING", "fallback"), "fallback");

        std::env::set_var("CIVIX_TEST_BLANK", "   ");
        assert_eq!(env_or("CIVIX_TEST_BLANK", "fallback"), "fallback");

        std::env::set_var("CIVIX_TEST_SET", "value");
        assert_eq!(env_or("CIVIX_TEST_SET", "fallback"), "value");
    }
}
