//! Operator binary: reconciles on-chain protocol configuration toward the
//! manifest, one idempotent step at a time.
//!
//! Env-driven (`.env` is bootstrapped on first run). `PUBLISH_DRY_RUN=true`
//! audits the same plan without submitting anything.

use alloy::providers::{Provider, ProviderBuilder};
use anyhow::Context;
use std::sync::Arc;
use synth_publisher::config::chains::ChainProfile;
use synth_publisher::environment::{self, Environment};
use synth_publisher::error::ConfigError;
use synth_publisher::manifest::Manifest;
use synth_publisher::publish;
use synth_publisher::registry::AddressBook;
use synth_publisher::runner::StepRunner;
use synth_publisher::runtime::parse_runtime_args;
use synth_publisher::utils::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Operator surface is env-driven; CLI args are rejected with a pointer
    // to the .env keys.
    let runtime_args = parse_runtime_args()?;

    // .env bootstrap must run before tracing init.
    synth_publisher::utils::env_guard::harden_env_setup();

    match std::env::var("RUST_LOG") {
        Ok(val) => println!("[STARTUP] RUST_LOG is set to: '{}'", val),
        Err(_) => println!("[STARTUP] RUST_LOG is unset."),
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        println!("[STARTUP] RUST_LOG invalid or unset; defaulting to 'info'");
        tracing_subscriber::EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    println!("[STARTUP] Tracing initialized.");

    let config = Config::load()?;
    let chain = ChainProfile::get(config.chain_id);
    let confirmations = config.confirmations.unwrap_or(chain.confirmations);

    if runtime_args.explain_config {
        println!(
            "[CONFIG] chain={} ({}) record={}/{}.json manifest={} confirmations={} dry_run={}",
            chain.chain_id,
            chain.name,
            config.deployment_dir,
            chain.slug,
            config.manifest_path,
            confirmations,
            config.dry_run
        );
        return Ok(());
    }

    // Connectivity probe before any chain state is read.
    {
        let rpc_url = config.eth_rpc_url.clone();
        println!(
            "[STARTUP] Checking connectivity to ETH_RPC_URL: {}...",
            if rpc_url.len() > 10 {
                format!("{}...", &rpc_url[..10])
            } else {
                rpc_url.clone()
            }
        );
        match ProviderBuilder::new()
            .on_http(
                rpc_url
                    .parse()
                    .unwrap_or_else(|_| "http://localhost:8545".parse().unwrap()),
            )
            .get_block_number()
            .await
        {
            Ok(n) => println!("[STARTUP] CONNECTIVITY OK. Latest Block: {}", n),
            Err(e) => println!("[STARTUP] CONNECTIVITY FAILURE: {}", e),
        }
    }

    let book = AddressBook::load(&config.deployment_dir, &chain.slug, chain.chain_id)
        .context("deployment record load failed")?;
    let manifest = Manifest::load(&config.manifest_path).context("manifest load failed")?;
    println!(
        "[STARTUP] Deployment record: {} contracts on {}.",
        book.len(),
        chain.name
    );
    println!("[STARTUP] Manifest: {} synths.", manifest.synths.len());

    let env: Arc<dyn Environment> = if config.dry_run && config.eth_private_key.is_none() {
        tracing::info!("[STARTUP] Dry run without a key; connecting read-only.");
        environment::evm::connect_read_only(&config.eth_rpc_url, &chain)?
    } else {
        let key = config.eth_private_key.as_deref().ok_or_else(|| {
            ConfigError::MissingConfig(
                "ETH_PRIVATE_KEY must be set for live publishing".to_string(),
            )
        })?;
        environment::evm::connect(&config.eth_rpc_url, key, &chain, confirmations)?
    };
    tracing::info!("[STARTUP] Operator account: {:#x}", env.operator());

    // Registry drift preview; every hydration read resolves before any write.
    let snapshot = publish::hydrate_registry(Arc::clone(&env), &book).await?;
    let stale = snapshot.stale(&book);
    if stale.is_empty() {
        tracing::info!("[PLAN] Registry hydration: every recorded entry is current.");
    } else {
        tracing::warn!(
            "[PLAN] Registry hydration: {} stale entries: {}",
            stale.len(),
            stale.join(", ")
        );
    }

    let plan = publish::assemble_plan(&env, &book, &manifest)?;
    tracing::info!(
        "[PLAN] {} configuration steps for {}.",
        plan.len(),
        chain.name
    );

    let runner = StepRunner::new(config.dry_run, chain.max_tx_gas);
    let summary = runner.run_plan(&plan).await?;

    println!(
        "[PUBLISH] network={} total={} satisfied={} written={} would_write={} elapsed_ms={}",
        chain.slug,
        summary.total,
        summary.satisfied,
        summary.written,
        summary.would_write,
        summary.elapsed_ms
    );
    Ok(())
}
