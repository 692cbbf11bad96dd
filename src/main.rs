//! Command-line entry point for the dust bot client.

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use dust_client::deposit::{
    lamports_to_sol, ApprovingSigner, KeypairSigner, RpcLedgerClient, SigningAuthority,
    TransferApproval, UnsignedTransfer,
};
use dust_client::presentation::event_channel;
use dust_client::service::HttpServiceClient;
use dust_client::types::{deposit_step_sol, is_whole_step};
use dust_client::{ClientConfig, Dashboard, DepositOrchestrator, Presenter, ServiceController};
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "dust-client", version, about = "Deposit to and control the Solana dust bot")]
struct Cli {
    /// Solana JSON keypair used as the connected wallet
    #[arg(short, long, env = "DUST_KEYPAIR")]
    keypair: Option<PathBuf>,

    /// RPC endpoint (overrides DUST_RPC_ENDPOINT)
    #[arg(long)]
    rpc_endpoint: Option<String>,

    /// Backend base URL (overrides DUST_API_BASE_URL)
    #[arg(long)]
    api_base_url: Option<String>,

    /// Sign without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the wallet balance
    Balance,
    /// Deposit SOL to the bot wallet
    Deposit {
        /// Amount in SOL, e.g. 0.01
        #[arg(value_parser = parse_amount)]
        amount: Decimal,
    },
    /// Run the dust accumulator
    Run,
    /// Burn and reclaim now
    Burn,
    /// Show bot counters
    Status,
    /// Show recent bot logs
    Logs,
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let amount = Decimal::from_str(raw.trim()).map_err(|e| format!("not a number: {}", e))?;
    if !is_whole_step(amount) {
        return Err(format!(
            "amount must be a multiple of {} SOL",
            deposit_step_sol()
        ));
    }
    Ok(amount)
}

/// Asks on the terminal before every signature.
struct StdinApproval;

#[async_trait]
impl TransferApproval for StdinApproval {
    async fn approve(&self, transfer: &UnsignedTransfer) -> bool {
        let prompt = format!(
            "Send {} SOL from {} to {}? [y/N] ",
            lamports_to_sol(transfer.lamports()),
            transfer.source(),
            transfer.destination()
        );
        let answer = tokio::task::spawn_blocking(move || -> io::Result<String> {
            print!("{}", prompt);
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            Ok(line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Ok(Err(e)) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(endpoint) = cli.rpc_endpoint.clone() {
        config = config.with_rpc_endpoint(endpoint);
    }
    if let Some(base_url) = cli.api_base_url.clone() {
        config = config.with_api_base_url(base_url);
    }
    config.validate()?;
    info!("Starting dust client against {}", config.api_base_url);

    let wallet: Option<Box<dyn SigningAuthority>> = match &cli.keypair {
        Some(path) => {
            let signer = KeypairSigner::from_file(path)?;
            if cli.yes {
                Some(Box::new(signer))
            } else {
                Some(Box::new(ApprovingSigner::new(signer, StdinApproval)))
            }
        }
        None => None,
    };
    let identity = wallet.as_ref().and_then(|w| w.current_identity());

    let (sender, mut receiver) = event_channel(config.event_channel_capacity);
    let presenter = Presenter::new(sender);

    let ledger = Arc::new(RpcLedgerClient::from_config(&config));
    let connector = Arc::new(|| {
        eprintln!("No wallet connected. Pass --keypair <FILE> (or set DUST_KEYPAIR) to connect one.");
    });
    let orchestrator = DepositOrchestrator::new(ledger, presenter.clone(), connector, &config);

    let backend = Arc::new(HttpServiceClient::from_config(&config)?);
    let controller = ServiceController::new(backend, presenter).with_identity(identity);

    let succeeded = match cli.command {
        Command::Balance => orchestrator.refresh_balance(identity).await.is_ok(),
        Command::Deposit { amount } => match orchestrator.deposit(wallet.as_deref(), amount).await {
            Ok(outcome) => {
                println!("{}", outcome.receipt.explorer_url());
                match outcome.balance_refresh.await {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => warn!("Balance not refreshed: {:#}", e),
                    Err(e) => warn!("Balance refresh task failed: {}", e),
                }
                true
            }
            Err(_) => false,
        },
        Command::Run => controller.run_bot().await.is_ok(),
        Command::Burn => controller.burn().await.is_ok(),
        Command::Status => controller.check_status().await.is_ok(),
        Command::Logs => {
            controller.refresh_logs().await;
            true
        }
    };

    drop(orchestrator);
    drop(controller);

    let mut dashboard = Dashboard::new(identity);
    dashboard.drain(&mut receiver);
    for line in dashboard.render() {
        println!("{}", line);
    }

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
