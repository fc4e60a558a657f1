use crate::error::{ConfigError, Result};
use std::env;

pub struct Config {
    pub eth_rpc_url: String,
    pub chain_id: u64,
    pub eth_private_key: Option<String>,
    pub manifest_path: String,
    pub deployment_dir: String,
    pub confirmations: Option<u64>,
    pub dry_run: bool,
}

fn validate_http_url(name: &str, raw: &str) -> Result<()> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        ConfigError::InvalidConfig(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidConfig(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))
        .into()),
    }
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

impl Config {
    pub fn load() -> Result<Self> {
        let eth_rpc_url = env::var("ETH_RPC_URL")
            .map_err(|_| ConfigError::MissingConfig("ETH_RPC_URL must be set".to_string()))?;
        validate_http_url("ETH_RPC_URL", &eth_rpc_url)?;

        let chain_id_raw = env::var("CHAIN_ID")
            .map_err(|_| ConfigError::MissingConfig("CHAIN_ID must be set".to_string()))?;
        let chain_id = chain_id_raw.parse::<u64>().map_err(|_| {
            ConfigError::InvalidConfig(format!("CHAIN_ID must be a valid u64, got `{chain_id_raw}`"))
        })?;

        let eth_private_key = env::var("ETH_PRIVATE_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        // Early sanity check: catch non-hex secrets before the signer parses them.
        if let Some(pk) = eth_private_key.as_deref() {
            let trimmed = pk.trim_start_matches("0x");
            let hexish = !trimmed.is_empty()
                && trimmed.len() % 2 == 0
                && trimmed.as_bytes().iter().all(|b| b.is_ascii_hexdigit());
            if !hexish {
                return Err(ConfigError::InvalidConfig(
                    "ETH_PRIVATE_KEY must be hex (optionally 0x-prefixed)".to_string(),
                )
                .into());
            }
        }

        let manifest_path =
            env::var("MANIFEST_PATH").unwrap_or_else(|_| "manifests/synths.json".to_string());
        let deployment_dir =
            env::var("DEPLOYMENT_DIR").unwrap_or_else(|_| "deployments".to_string());

        let confirmations = match env::var("CONFIRMATIONS") {
            Ok(raw) => {
                let parsed = raw.trim().parse::<u64>().map_err(|_| {
                    ConfigError::InvalidConfig(format!(
                        "CONFIRMATIONS must be a valid u64, got `{raw}`"
                    ))
                })?;
                Some(parsed)
            }
            Err(_) => None,
        };

        Ok(Self {
            eth_rpc_url,
            chain_id,
            eth_private_key,
            manifest_path,
            deployment_dir,
            confirmations,
            dry_run: parse_bool_env("PUBLISH_DRY_RUN", false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_publisher_env() {
        for key in [
            "ETH_RPC_URL",
            "CHAIN_ID",
            "ETH_PRIVATE_KEY",
            "MANIFEST_PATH",
            "DEPLOYMENT_DIR",
            "CONFIRMATIONS",
            "PUBLISH_DRY_RUN",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn load_requires_rpc_url() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        let err = Config::load().expect_err("load should fail");
        assert!(
            err.to_string().contains("ETH_RPC_URL"),
            "unexpected error message: {err}"
        );
        clear_publisher_env();
    }

    #[test]
    fn load_rejects_non_http_rpc_url() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        std::env::set_var("ETH_RPC_URL", "ws://localhost:8546");
        std::env::set_var("CHAIN_ID", "1");
        let err = Config::load().expect_err("load should fail");
        assert!(
            err.to_string().contains("http(s) scheme"),
            "unexpected error message: {err}"
        );
        clear_publisher_env();
    }

    #[test]
    fn load_rejects_non_hex_private_key() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        std::env::set_var("ETH_RPC_URL", "http://localhost:8545");
        std::env::set_var("CHAIN_ID", "31337");
        std::env::set_var("ETH_PRIVATE_KEY", "not-a-key");
        let err = Config::load().expect_err("load should fail");
        assert!(
            err.to_string().contains("ETH_PRIVATE_KEY"),
            "unexpected error message: {err}"
        );
        clear_publisher_env();
    }

    #[test]
    fn load_applies_defaults_and_flags() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        std::env::set_var("ETH_RPC_URL", "http://localhost:8545");
        std::env::set_var("CHAIN_ID", "31337");
        std::env::set_var("PUBLISH_DRY_RUN", "true");
        std::env::set_var("CONFIRMATIONS", "3");

        let config = Config::load().expect("load should succeed");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.manifest_path, "manifests/synths.json");
        assert_eq!(config.deployment_dir, "deployments");
        assert_eq!(config.confirmations, Some(3));
        assert!(config.dry_run);
        assert!(config.eth_private_key.is_none());

        clear_publisher_env();
    }
}
