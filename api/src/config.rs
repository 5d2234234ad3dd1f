use std::env;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite://content.db?mode=rwc";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    /// Per-peer-IP rate limit on the content routes; `None` disables it
    pub rate_limit: Option<RateLimitConfig>,
}

/// Token bucket settings for `tower_governor`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Seconds between quota replenishments (`GovernorConfigBuilder::per_second`)
    pub per_second: u64,
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // One request replenished every 2 seconds, burst of 5
        Self {
            per_second: 2,
            burst_size: 5,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let rate_limit_enabled = lookup("RATE_LIMIT_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
            .unwrap_or(true);
        let defaults = RateLimitConfig::default();

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10),
            port: parse_var(&lookup, "PORT", 8080),
            rate_limit: rate_limit_enabled.then(|| RateLimitConfig {
                per_second: parse_var(&lookup, "RATE_LIMIT_PER_SECOND", defaults.per_second),
                burst_size: parse_var(&lookup, "RATE_LIMIT_BURST", defaults.burst_size),
            }),
        }
    }

    /// Configuration for tests: in-memory SQLite, no rate limiting
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            port: 0,
            rate_limit: None,
        }
    }
}

/// Read a numeric variable, falling back to `default` when unset or malformed
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => parse_or(name, &raw, default),
        None => default,
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(name: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
        default
    })
}
