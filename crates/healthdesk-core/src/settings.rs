//! Gateway settings.
//!
//! | Source | Example |
//! |--------|---------|
//! | defaults | port 3000, store `./data/healthdesk`, public dir `public` |
//! | TOML file | `HEALTHDESK_CONFIG` path, else `config/gateway.toml` if present |
//! | prefixed env | `HEALTHDESK__PORT`, `HEALTHDESK__ORACLE_MODEL`, ... |
//! | plain env | `PORT`, `STORE_PATH`, `OPENROUTER_API_KEY` |
//!
//! Later rows win. An empty or missing oracle key selects fallback-only chatbot mode.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chatbot::{DEFAULT_MODEL, OPENROUTER_API_BASE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub port: u16,
    pub bind_addr: String,
    /// Sled directory; the persistence connection string.
    pub store_path: String,
    /// Static front end served at `/`.
    pub public_dir: String,
    #[serde(default)]
    pub oracle_api_key: Option<String>,
    pub oracle_model: String,
    pub oracle_base_url: String,
    pub oracle_timeout_secs: u64,
    pub persist_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub session_max_turns: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_addr: "0.0.0.0".to_string(),
            store_path: "./data/healthdesk".to_string(),
            public_dir: "public".to_string(),
            oracle_api_key: None,
            oracle_model: DEFAULT_MODEL.to_string(),
            oracle_base_url: OPENROUTER_API_BASE.to_string(),
            oracle_timeout_secs: 20,
            persist_timeout_secs: 5,
            session_ttl_secs: 30 * 60,
            session_max_turns: 20,
        }
    }
}

impl GatewayConfig {
    /// Load from defaults, optional TOML file, and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("HEALTHDESK_CONFIG").unwrap_or_else(|_| "config/gateway.toml".to_string());
        let defaults = GatewayConfig::default();

        let builder = config::Config::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("store_path", defaults.store_path)?
            .set_default("public_dir", defaults.public_dir)?
            .set_default("oracle_model", defaults.oracle_model)?
            .set_default("oracle_base_url", defaults.oracle_base_url)?
            .set_default("oracle_timeout_secs", defaults.oracle_timeout_secs)?
            .set_default("persist_timeout_secs", defaults.persist_timeout_secs)?
            .set_default("session_ttl_secs", defaults.session_ttl_secs)?
            .set_default("session_max_turns", defaults.session_max_turns as u64)?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let builder = builder
            .add_source(config::Environment::with_prefix("HEALTHDESK").separator("__"))
            .set_override_option("port", env_opt("PORT"))?
            .set_override_option("store_path", env_opt("STORE_PATH"))?
            .set_override_option("oracle_api_key", env_opt("OPENROUTER_API_KEY"))?;

        let mut cfg: GatewayConfig = builder.build()?.try_deserialize()?;
        cfg.oracle_api_key = cfg
            .oracle_api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Ok(cfg)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs.max(1))
    }

    pub fn persist_timeout(&self) -> Duration {
        Duration::from_secs(self.persist_timeout_secs.max(1))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_fallback_mode() {
        let cfg = GatewayConfig::default();
        assert!(cfg.oracle_api_key.is_none());
        assert_eq!(cfg.listen_addr(), "0.0.0.0:3000");
        assert_eq!(cfg.persist_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn zero_timeouts_are_clamped() {
        let cfg = GatewayConfig {
            oracle_timeout_secs: 0,
            persist_timeout_secs: 0,
            ..GatewayConfig::default()
        };
        assert_eq!(cfg.oracle_timeout(), Duration::from_secs(1));
        assert_eq!(cfg.persist_timeout(), Duration::from_secs(1));
    }

    /// Every layer in one test: the process environment is shared between test threads.
    #[test]
    fn load_applies_file_then_prefixed_env_then_plain_env() {
        const VARS: [&str; 6] = [
            "HEALTHDESK_CONFIG",
            "HEALTHDESK__PORT",
            "HEALTHDESK__PUBLIC_DIR",
            "PORT",
            "STORE_PATH",
            "OPENROUTER_API_KEY",
        ];
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gateway.toml");
        std::fs::write(
            &file,
            "port = 8123\npublic_dir = \"site\"\nstore_path = \"toml-store\"\nsession_max_turns = 5\n",
        )
        .unwrap();
        std::env::set_var("HEALTHDESK_CONFIG", &file);
        std::env::remove_var("STORE_PATH");

        // TOML over defaults.
        for var in &VARS[1..] {
            std::env::remove_var(var);
        }
        let cfg = GatewayConfig::load().unwrap();
        assert_eq!(cfg.port, 8123);
        assert_eq!(cfg.public_dir, "site");
        assert_eq!(cfg.store_path, "toml-store");
        assert_eq!(cfg.session_max_turns, 5);
        assert_eq!(cfg.bind_addr, "0.0.0.0");

        // Prefixed env over TOML.
        std::env::set_var("HEALTHDESK__PORT", "9001");
        std::env::set_var("HEALTHDESK__PUBLIC_DIR", "env-site");
        let cfg = GatewayConfig::load().unwrap();
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.public_dir, "env-site");

        // Plain PORT over both; an empty key selects fallback mode.
        std::env::set_var("PORT", "9555");
        std::env::set_var("OPENROUTER_API_KEY", "");
        let cfg = GatewayConfig::load().unwrap();
        assert_eq!(cfg.port, 9555);
        assert_eq!(cfg.store_path, "toml-store");
        assert!(cfg.oracle_api_key.is_none());

        std::env::set_var("OPENROUTER_API_KEY", "  sk-test  ");
        std::env::set_var("STORE_PATH", "env-store");
        let cfg = GatewayConfig::load().unwrap();
        assert_eq!(cfg.oracle_api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.store_path, "env-store");

        for var in VARS {
            std::env::remove_var(var);
        }
    }
}
