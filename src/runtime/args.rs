#[derive(Debug, Clone, Copy)]
pub struct RuntimeArgs {
    pub explain_config: bool,
}

fn env_flag(key: &str) -> bool {
    let Ok(raw) = std::env::var(key) else {
        return false;
    };
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn parse_runtime_args_from_iter<I, S>(args: I) -> anyhow::Result<RuntimeArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let supplied: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_owned()).collect();
    if !supplied.is_empty() {
        anyhow::bail!(
            "CLI arguments are disabled in this build. Configure .env keys instead \
             (PUBLISH_DRY_RUN, PUBLISH_EXPLAIN_CONFIG, MANIFEST_PATH, DEPLOYMENT_DIR). \
             Received args: {}",
            supplied.join(" ")
        );
    }

    Ok(RuntimeArgs {
        explain_config: env_flag("PUBLISH_EXPLAIN_CONFIG"),
    })
}

pub fn parse_runtime_args() -> anyhow::Result<RuntimeArgs> {
    parse_runtime_args_from_iter(std::env::args().skip(1))
}

#[cfg(test)]
mod tests {
    use super::{env_flag, parse_runtime_args_from_iter};
    use std::sync::{Mutex, OnceLock};

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_publisher_env() {
        std::env::remove_var("PUBLISH_EXPLAIN_CONFIG");
    }

    #[test]
    fn runtime_args_default_to_publishing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        let parsed =
            parse_runtime_args_from_iter(Vec::<&str>::new()).expect("parse should succeed");
        assert!(!parsed.explain_config);
        clear_publisher_env();
    }

    #[test]
    fn runtime_args_parse_explain_from_env() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        std::env::set_var("PUBLISH_EXPLAIN_CONFIG", "yes");
        let parsed =
            parse_runtime_args_from_iter(Vec::<&str>::new()).expect("parse should succeed");
        assert!(parsed.explain_config);
        clear_publisher_env();
    }

    #[test]
    fn unknown_flag_values_fall_back_to_false() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        std::env::set_var("PUBLISH_EXPLAIN_CONFIG", "maybe");
        assert!(!env_flag("PUBLISH_EXPLAIN_CONFIG"));
        clear_publisher_env();
    }

    #[test]
    fn runtime_args_reject_cli_flags() {
        let _guard = env_lock().lock().expect("env lock");
        clear_publisher_env();
        let err = parse_runtime_args_from_iter(vec!["--dry-run"]).expect_err("parse should fail");
        assert!(
            err.to_string().contains("CLI arguments are disabled"),
            "unexpected error message: {err}"
        );
        clear_publisher_env();
    }
}
