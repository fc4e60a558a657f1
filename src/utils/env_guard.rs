use std::fs;
use std::io::Write;
use std::path::Path;

const ENV_TEMPLATE: &str = r#"# Synth publisher configuration

ETH_RPC_URL="https://mainnet.infura.io/v3/CHANGE_ME"
CHAIN_ID="1"
# ETH_PRIVATE_KEY="0xCHANGE_ME"

MANIFEST_PATH="manifests/synths.json"
DEPLOYMENT_DIR="deployments"
PUBLISH_DRY_RUN="false"

RUST_LOG="info"
"#;

fn seed_template(path: &Path) {
    if path.exists() {
        return;
    }
    match fs::File::create(path) {
        Ok(mut file) => {
            if let Err(err) = file.write_all(ENV_TEMPLATE.as_bytes()) {
                eprintln!("[ENV] Failed to write {}: {err}", path.display());
            }
        }
        Err(err) => eprintln!("[ENV] Failed to create {}: {err}", path.display()),
    }
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn load_dot_env() {
    let content = match fs::read_to_string(".env") {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
        Err(err) => {
            eprintln!("[ENV] Failed to read .env: {err}");
            return;
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        // The process environment wins over .env values.
        if std::env::var_os(key).is_some() {
            continue;
        }
        let value = value.split('#').next().unwrap_or("").trim();
        std::env::set_var(key, strip_quotes(value));
    }
}

/// Seeds `.env`/`.env.example` on first run, loads `.env` without overriding
/// the process environment, and warns about the keys the publisher cannot
/// start without.
pub fn harden_env_setup() {
    seed_template(Path::new(".env.example"));
    seed_template(Path::new(".env"));
    load_dot_env();
    for key in ["ETH_RPC_URL", "CHAIN_ID"] {
        if std::env::var(key).is_err() {
            eprintln!("[ENV] WARN: {key} is not set");
        }
    }
}
