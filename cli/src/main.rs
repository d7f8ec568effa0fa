//! chainvote — vote for blockchain leaders over a wallet RPC endpoint.

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chainvote_ballot::{Ballot, BallotService, Leader};
use chainvote_provider::HttpProvider;
use chainvote_types::{Address, TypeError};
use chainvote_wallet::{
    SessionConfig, SessionEvent, Severity, TransactionSubmitter, WalletSession,
};
use clap::Parser;
use tokio::sync::broadcast;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "chainvote", about = "Leader voting over a wallet JSON-RPC endpoint")]
struct Cli {
    /// RPC endpoint to reach the wallet through. Needs an endpoint that
    /// manages accounts (a dev node or a wallet bridge); defaults to the
    /// configured network's first RPC URL.
    #[arg(long, env = "CHAINVOTE_RPC_URL")]
    rpc_url: Option<String>,

    /// Address vote transfers are sent to.
    #[arg(long, env = "CHAINVOTE_SINK", value_parser = parse_address)]
    sink: Option<Address>,

    /// Seconds between background balance refreshes.
    #[arg(long, env = "CHAINVOTE_POLL_INTERVAL")]
    poll_interval_secs: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "CHAINVOTE_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as newline-delimited JSON.
    #[arg(long, env = "CHAINVOTE_LOG_JSON")]
    log_json: bool,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Connect and print the session state.
    Status,
    /// Print the leaderboard.
    Leaders,
    /// Cast a vote for a leader.
    Vote {
        /// Leader id as shown by `leaders`.
        leader_id: u32,
    },
}

fn parse_address(raw: &str) -> Result<Address, TypeError> {
    Address::parse(raw)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    logging::init_logging(format, &cli.log_level);

    match &cli.command {
        Command::Leaders => {
            print_standings(&Ballot::seeded().standings());
            Ok(())
        }
        Command::Status => run_status(build_session(&cli)?).await,
        Command::Vote { leader_id } => {
            run_vote(build_session(&cli)?, cli.sink.clone(), *leader_id).await
        }
    }
}

fn load_config(cli: &Cli) -> SessionConfig {
    let mut config = match &cli.config {
        Some(path) => match SessionConfig::from_toml_file(path) {
            Ok(config) => {
                tracing::info!("loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config file, using defaults");
                SessionConfig::default()
            }
        },
        None => SessionConfig::default(),
    };
    if let Some(secs) = cli.poll_interval_secs {
        config.poll_interval_secs = secs;
    }
    config
}

fn build_session(cli: &Cli) -> anyhow::Result<Arc<WalletSession>> {
    let config = load_config(cli);
    let endpoint = cli
        .rpc_url
        .clone()
        .or_else(|| config.network.rpc_urls.first().cloned())
        .context("no RPC endpoint configured")?;
    tracing::info!(endpoint = %endpoint, "using rpc endpoint");

    let provider = HttpProvider::new(&endpoint)?;
    Ok(WalletSession::new(Some(Arc::new(provider)), config))
}

/// Print queued session notices; results go to stdout, notices to stderr.
fn print_notices(rx: &mut broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            SessionEvent::Notice(notice) => {
                let tag = match notice.severity {
                    Severity::Info => "note",
                    Severity::Warning => "warn",
                    Severity::Error => "error",
                };
                eprintln!("{tag}: {}", notice.text);
            }
            SessionEvent::Invalidated { chain } => {
                eprintln!("warn: wallet moved to chain {chain}");
            }
        }
    }
}

fn print_standings(leaders: &[Leader]) {
    println!("{:>3}  {:>5}  {:<20} {}", "#", "votes", "leader", "country");
    for (rank, leader) in leaders.iter().enumerate() {
        println!(
            "{:>3}  {:>5}  {:<20} {}",
            rank + 1,
            leader.votes,
            leader.name,
            leader.country
        );
    }
}

async fn run_status(session: Arc<WalletSession>) -> anyhow::Result<()> {
    let mut rx = session.subscribe_events();
    let connected = session.connect().await;
    print_notices(&mut rx);
    let address = connected.context("could not connect a wallet session")?;

    session.refresh_balance().await;
    let state = session.snapshot().await;
    let network = session.network();

    println!("address:  {address}");
    println!("balance:  {} {}", state.balance, network.native_currency.symbol);
    match &state.chain {
        Some(chain) if chain == session.target_chain() => {
            println!("network:  {} ({chain})", network.chain_name);
        }
        Some(chain) => {
            println!(
                "network:  {chain} (target is {} {})",
                network.chain_name,
                session.target_chain()
            );
        }
        None => println!("network:  unknown"),
    }

    session.shutdown();
    Ok(())
}

async fn run_vote(
    session: Arc<WalletSession>,
    sink: Option<Address>,
    leader_id: u32,
) -> anyhow::Result<()> {
    let mut rx = session.subscribe_events();
    let connected = session.connect().await;
    print_notices(&mut rx);
    connected.context("could not connect a wallet session")?;

    let submitter = TransactionSubmitter::new(Arc::clone(&session));
    let service = match sink {
        Some(sink) => BallotService::with_parts(submitter, Ballot::seeded(), sink),
        None => BallotService::new(submitter),
    };

    let outcome = service.vote(leader_id).await;
    print_notices(&mut rx);
    let receipt = outcome.context("vote was not submitted")?;

    println!("voted for {} (#{})", receipt.leader_name, receipt.leader_id);
    println!(
        "cost:     {} {}",
        receipt.amount,
        session.network().native_currency.symbol
    );
    println!("tx:       {}", receipt.tx);
    if let Some(base) = session.network().explorer_url() {
        println!("explorer: {base}/tx/{}", receipt.tx);
    }
    println!();
    print_standings(&service.standings().await);

    session.shutdown();
    Ok(())
}
