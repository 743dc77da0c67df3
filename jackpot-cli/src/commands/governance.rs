use crate::config::CliConfig;
use crate::session::Session;
use anyhow::{anyhow, Result};
use chrono::Duration;
use clap::Subcommand;
use dialoguer::Confirm;
use jackpot_core::Address;

#[derive(Subcommand)]
pub enum GovernanceCommands {
    /// Request a swap of the token and/or pricing venue
    Request {
        /// New token label or address
        #[arg(long)]
        token: Option<String>,
        /// New market label or address
        #[arg(long)]
        market: Option<String>,
    },
    /// Execute the pending swap once its delay has passed
    Execute {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Cancel the pending swap
    Cancel,
}

pub async fn handle_governance_command(cmd: GovernanceCommands, config: &CliConfig) -> Result<()> {
    let mut session = Session::open(config).await?;
    let ctx = session.ctx();
    let delay = Duration::seconds(session.game.settings().governance_delay_secs);

    match cmd {
        GovernanceCommands::Request { token, market } => {
            if token.is_none() && market.is_none() {
                return Err(anyhow!("Pass --token and/or --market"));
            }
            let change = session.game.request_change(
                &ctx,
                token.as_deref().map(Address::resolve),
                market.as_deref().map(Address::resolve),
            )?;

            println!("Change requested:");
            println!("  Token: {}", change.new_token);
            println!("  Market: {}", change.new_market);
            println!(
                "  Executable at: {}",
                change.executable_at(delay).format("%Y-%m-%d %H:%M")
            );
        }

        GovernanceCommands::Execute { yes } => {
            let change = session
                .game
                .pending_change()
                .ok_or_else(|| anyhow!("No dependency change is pending"))?;

            if !yes {
                let current = session.game.dependencies();
                println!("Token:  {} -> {}", current.token, change.new_token);
                println!("Market: {} -> {}", current.market, change.new_market);
                let proceed = Confirm::new()
                    .with_prompt("Execute this change?")
                    .default(false)
                    .interact()?;
                if !proceed {
                    println!("Change left pending.");
                    return Ok(());
                }
            }

            let deps = session.game.execute_change(&ctx)?;
            println!("Change executed");
            println!("  Token: {}", deps.token);
            println!("  Market: {}", deps.market);
        }

        GovernanceCommands::Cancel => {
            session.game.cancel_change(&ctx)?;
            println!("Pending change cancelled");
        }
    }

    session.confirm()?;
    session.save().await?;
    Ok(())
}
