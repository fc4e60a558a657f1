//! Read-only drift audit: runs the full configuration plan in dry-run mode
//! and exits 0 when the chain already matches the manifest, 1 when any step
//! would write, 2 when the audit itself fails.

use std::sync::Arc;

use synth_publisher::config::chains::ChainProfile;
use synth_publisher::environment::{self, Environment};
use synth_publisher::manifest::Manifest;
use synth_publisher::publish;
use synth_publisher::registry::AddressBook;
use synth_publisher::runner::{RunSummary, StepRunner};
use synth_publisher::utils::Config;

async fn audit() -> anyhow::Result<(ChainProfile, RunSummary)> {
    let config = Config::load()?;
    let chain = ChainProfile::get(config.chain_id);

    let env: Arc<dyn Environment> =
        environment::evm::connect_read_only(&config.eth_rpc_url, &chain)?;
    let book = AddressBook::load(&config.deployment_dir, &chain.slug, chain.chain_id)?;
    let manifest = Manifest::load(&config.manifest_path)?;

    let plan = publish::assemble_plan(&env, &book, &manifest)?;
    let runner = StepRunner::new(true, chain.max_tx_gas);
    let summary = runner.run_plan(&plan).await?;
    Ok((chain, summary))
}

#[tokio::main]
async fn main() {
    synth_publisher::utils::env_guard::harden_env_setup();

    // Reports stay quiet unless the operator asks for more.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let (chain, summary) = match audit().await {
        Ok(result) => result,
        Err(err) => {
            eprintln!("[DRIFT] audit failed: {err:#}");
            std::process::exit(2);
        }
    };

    println!(
        "[DRIFT] network={} total={} satisfied={} would_write={} elapsed_ms={}",
        chain.slug, summary.total, summary.satisfied, summary.would_write, summary.elapsed_ms
    );

    if summary.drift() == 0 {
        std::process::exit(0);
    }
    std::process::exit(1);
}
