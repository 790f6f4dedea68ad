//! Voting-power daemon: entry point for one-off eligibility checks.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use vp_power::{FetchCoordinator, GatewayConfig, PowerConfig};
use vp_types::{Address, BlockTag, GovernanceItem};

#[derive(Parser)]
#[command(name = "vp-daemon", about = "Voting-power fetch-and-cache coordinator")]
struct Cli {
    /// Score service per network, as `network=url` (comma-separated).
    /// Replaces the file's gateways when given.
    #[arg(long, env = "VP_GATEWAYS", value_delimiter = ',')]
    gateway: Vec<String>,

    /// Whole-request timeout for gateway calls, in seconds.
    #[arg(long, env = "VP_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VP_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "VP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Fetch voting power for one item and print the resulting entry.
    Check {
        /// JSON file holding a space or proposal (`"type": "space"|"proposal"`).
        #[arg(long)]
        item: PathBuf,

        /// Account to evaluate.
        #[arg(long)]
        account: String,

        /// Block to evaluate at; latest when omitted.
        #[arg(long)]
        block: Option<u64>,
    },

    /// Print the default configuration as TOML.
    #[command(name = "init-config")]
    InitConfig,
}

fn parse_gateway(s: &str) -> anyhow::Result<GatewayConfig> {
    let (network, url) = s
        .split_once('=')
        .with_context(|| format!("gateway {s:?} is not of the form network=url"))?;
    Ok(GatewayConfig {
        network: network.trim().into(),
        url: url.trim().to_string(),
    })
}

fn load_config(cli: &Cli) -> anyhow::Result<PowerConfig> {
    let mut config = match &cli.config {
        Some(path) => PowerConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => PowerConfig::default(),
    };

    if !cli.gateway.is_empty() {
        config.gateways = cli
            .gateway
            .iter()
            .map(|s| parse_gateway(s))
            .collect::<anyhow::Result<_>>()?;
    }
    if let Some(secs) = cli.request_timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate()?;
    Ok(config)
}

async fn check(
    config: &PowerConfig,
    item: PathBuf,
    account: String,
    block: Option<u64>,
) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&item)
        .with_context(|| format!("failed to read item {}", item.display()))?;
    let item: GovernanceItem =
        serde_json::from_str(&raw).context("item is not a space or proposal")?;
    let account = Address::new(account);
    let block = BlockTag::from(block);

    let coordinator = Arc::new(FetchCoordinator::new(config.build_registry()?));
    let outcome = coordinator.fetch(&item, &account, block).await;
    tracing::info!(?outcome, key = %item.cache_key(block), "fetch finished");

    let entry = coordinator
        .entry(&item, block)
        .context("no entry was committed")?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    vp_power::init_logging(config.log_format()?, &config.log_level);

    match cli.command {
        Command::Check {
            item,
            account,
            block,
        } => check(&config, item, account, block).await?,
        Command::InitConfig => print!("{}", PowerConfig::default().to_toml_string()?),
    }

    Ok(())
}
