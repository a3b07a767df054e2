use std::path::Path;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use config::File;
use mt_ratelimit::RateLimitPolicy;
use mt_ratelimit::tiers;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct GatewayConfigFile {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub rate_limit: RateLimitSection,

    /// How often the background sweeper evicts idle buckets, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Idle time after which a bucket is evicted, in seconds
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitSection {
    /// Named tier preset (`public`, `authenticated`, `login`, `reports`);
    /// the explicit values below apply when unset
    #[serde(default)]
    pub tier: Option<String>,

    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

impl Default for RateLimitSection {
    fn default() -> Self {
        Self { tier: None, max_requests: default_max_requests(), window_ms: default_window_ms() }
    }
}

impl RateLimitSection {
    /// Resolve this section into a policy, preferring the named tier.
    pub fn policy(&self) -> RateLimitPolicy {
        if let Some(tier) = self.tier.as_deref() {
            match tier {
                "public" => return tiers::public_api(),
                "authenticated" => return tiers::authenticated_api(),
                "login" => return tiers::login(),
                "reports" => return tiers::reports(),
                other => tracing::warn!("Unknown rate limit tier '{other}', using explicit values"),
            }
        }

        RateLimitPolicy::new(self.max_requests, Duration::from_millis(self.window_ms))
    }
}

impl Default for GatewayConfigFile {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            rate_limit: RateLimitSection::default(),
            sweep_interval_secs: default_sweep_interval_secs(),
            retention_secs: default_retention_secs(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_retention_secs() -> u64 {
    60 * 60
}

pub fn load_gateway_config<P: AsRef<Path>>(path: P) -> Result<GatewayConfigFile, ConfigError> {
    let config = Config::builder().add_source(File::from(path.as_ref())).build()?;

    config.try_deserialize()
}

/// Load gateway config with fallback to default
pub fn load_gateway_config_or_default(path: &str) -> GatewayConfigFile {
    match load_gateway_config(path) {
        Ok(config) => {
            tracing::info!("Loaded gateway config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("Failed to load gateway config from {}: {}. Using defaults.", path, err);
            GatewayConfigFile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfigFile::default();

        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.sweep_interval_secs, 300);
        assert_eq!(config.retention_secs, 3_600);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_gateway_config_or_default("does/not/exist.toml");
        assert_eq!(config.rate_limit.max_requests, 100);
    }

    #[test]
    fn test_tier_names_resolve_to_presets() {
        let section = RateLimitSection { tier: Some("login".to_string()), ..RateLimitSection::default() };
        assert_eq!(section.policy(), tiers::login());

        let section = RateLimitSection { tier: Some("reports".to_string()), ..RateLimitSection::default() };
        assert_eq!(section.policy(), tiers::reports());
    }

    #[test]
    fn test_unknown_tier_uses_explicit_values() {
        let section = RateLimitSection { tier: Some("platinum".to_string()), max_requests: 7, window_ms: 1_000 };
        assert_eq!(section.policy(), RateLimitPolicy::new(7, Duration::from_millis(1_000)));
    }

    #[test]
    fn test_no_tier_uses_explicit_values() {
        let section = RateLimitSection::default();
        assert_eq!(section.policy(), RateLimitPolicy::default());
    }
}
