mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stellar_viewer_core::bridge::StaticBridge;
#[cfg(unix)]
use stellar_viewer_core::bridge::ExtensionBridge;
use stellar_viewer_core::network::TESTNET_PASSPHRASE;
use stellar_viewer_core::{Network, Session, ViewerError, WalletBridge};

#[derive(Parser)]
#[command(name = "stellar-viewer", about = "Stellar account viewer", version)]
struct Cli {
    /// Network to query: testnet (default) or public
    #[arg(long, default_value = "testnet")]
    network: String,

    /// Custom Horizon URL (overrides --network)
    #[arg(long)]
    horizon: Option<String>,

    /// Network passphrase for --horizon (default: testnet passphrase)
    #[arg(long)]
    passphrase: Option<String>,

    /// Allow connecting to non-HTTPS Horizon URLs
    #[arg(long)]
    insecure: bool,

    /// Account id to view, bypassing the wallet bridge
    #[arg(long, env = "STELLAR_ACCOUNT")]
    account: Option<String>,

    /// Socket of the wallet-extension host (default: ~/.stellar-viewer/agent.sock)
    #[arg(long)]
    agent_socket: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the connected account (default)
    Account,
    /// List supported networks
    Networks,
}

impl Cli {
    fn network(&self) -> Result<Network> {
        if let Some(url) = &self.horizon {
            let passphrase = self.passphrase.as_deref().unwrap_or(TESTNET_PASSPHRASE);
            return Network::custom("custom", passphrase, url, self.insecure);
        }
        Network::by_name(&self.network).with_context(|| {
            let known: Vec<String> = stellar_viewer_core::networks()
                .iter()
                .map(|n| n.name.clone())
                .collect();
            format!(
                "Unknown network '{}'. Supported: {}.",
                self.network,
                known.join(", ")
            )
        })
    }

    #[cfg(unix)]
    fn agent_socket_path(&self) -> Result<PathBuf> {
        match &self.agent_socket {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::home_dir()
                .context("Cannot determine home directory. Set $HOME or use --agent-socket.")?
                .join(".stellar-viewer")
                .join("agent.sock")),
        }
    }

    fn bridge(&self) -> Result<Box<dyn WalletBridge>> {
        if let Some(account) = &self.account {
            return Ok(Box::new(StaticBridge::new(account.clone())));
        }
        #[cfg(unix)]
        {
            let path = self.agent_socket_path()?;
            if !path.exists() {
                // "not installed" rather than a connect error
                return Ok(Box::new(StaticBridge::unavailable()));
            }
            return Ok(Box::new(ExtensionBridge::unix_socket(&path)?));
        }
        #[cfg(not(unix))]
        {
            bail!("No wallet host transport on this platform. Pass --account <G...>.")
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Networks) => render::print_networks(cli.json),
        Some(Command::Account) | None => show_account(&cli).await,
    }
}

async fn show_account(cli: &Cli) -> Result<()> {
    let network = cli.network()?;
    let mut session = Session::new(network, cli.insecure)?;

    let bridge = cli.bridge()?;
    match session.connect(bridge.as_ref()).await {
        Ok(key) => {
            tracing::debug!(%key, "wallet connected");
        }
        Err(ViewerError::ExtensionUnavailable) => {
            bail!(
                "Wallet extension is not available.\n\
                 Get it from https://www.freighter.app/ or pass --account <G...>."
            );
        }
        Err(e) => return Err(e.into()),
    }

    match session.refresh().await {
        Ok(()) => {}
        Err(ViewerError::AccountNotFound(_)) => {
            bail!("Couldn't find account information, check that you have correct network selected.");
        }
        Err(e) => return Err(e.into()),
    }

    let view = session
        .account()
        .context("No account information available")?;
    render::print_account(view, session.network(), cli.json)
}
