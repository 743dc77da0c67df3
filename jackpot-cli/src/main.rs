mod commands;
mod config;
mod session;

use clap::{Parser, Subcommand};
use config::CliConfig;
use jackpot_core::CallError;
use jackpot_game::JackpotError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jackpot")]
#[command(about = "Commit-reveal word guessing jackpot")]
#[command(version)]
struct Cli {
    /// Data directory for game storage
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Label of the account issuing the command
    #[arg(long = "as", global = true, default_value = "admin")]
    caller: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Setup(commands::SetupCommands),

    #[command(flatten)]
    Play(commands::PlayCommands),

    #[command(flatten)]
    Operate(commands::OperateCommands),

    /// Timelocked token and venue swaps
    #[command(subcommand)]
    Governance(commands::GovernanceCommands),

    #[command(flatten)]
    Status(commands::StatusCommands),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = CliConfig::new(cli.data_dir, cli.caller, cli.verbose);

    // Initialize logging
    let log_level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "jackpot={},jackpot_game={},jackpot_core={}",
            log_level, log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Ensure data directory exists
    tokio::fs::create_dir_all(config.data_dir()).await?;

    let result = match cli.command {
        Commands::Setup(cmd) => commands::handle_setup_command(cmd, &config).await,
        Commands::Play(cmd) => commands::handle_play_command(cmd, &config).await,
        Commands::Operate(cmd) => commands::handle_operate_command(cmd, &config).await,
        Commands::Governance(cmd) => commands::handle_governance_command(cmd, &config).await,
        Commands::Status(cmd) => commands::handle_status_command(cmd, &config).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<JackpotError>() {
            Some(JackpotError::Paused) => {
                eprintln!("Error: The game is paused");
                eprintln!("An admin can resume it with 'jackpot unpause'");
            }
            Some(JackpotError::MissingRole { principal, role }) => {
                eprintln!("Error: {} lacks the {} role", principal, role);
                eprintln!("Grant it with 'jackpot grant <label> {}'", role);
            }
            Some(JackpotError::RevealTooEarly { ready_at, current }) => {
                eprintln!("Error: Too early to reveal");
                eprintln!(
                    "Ready at confirmation {}, now {}. Use 'jackpot advance' to move on",
                    ready_at, current
                );
            }
            Some(JackpotError::TimelockActive { remaining_secs }) => {
                eprintln!("Error: The change is still timelocked");
                eprintln!(
                    "{} seconds remaining. Use 'jackpot advance --minutes <n>'",
                    remaining_secs
                );
            }
            Some(JackpotError::UnsettledFees) => {
                eprintln!("Error: {}", e);
                eprintln!("Run 'jackpot settle' first");
            }
            Some(JackpotError::ExternalCall(CallError::InsufficientBalance {
                account,
                need,
                available,
            })) => {
                eprintln!("Error: Insufficient balance for {}", account);
                eprintln!("Need: {}, Available: {}", need, available);
                eprintln!("Top up with 'jackpot mint' or 'jackpot faucet'");
            }
            Some(err) => {
                eprintln!("Error ({:?}): {}", err.kind(), err);
            }
            None => {
                eprintln!("Error: {:#}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
