use super::{format_tokens, whole_tokens};
use crate::config::CliConfig;
use crate::session::{self, Clock, Session};
use anyhow::Result;
use clap::Subcommand;
use dialoguer::Confirm;
use jackpot_core::{Address, EngineSettings, GameConfig, NativeAmount, Role, Sandbox};
use jackpot_game::{Deployment, JackpotGame};
use std::sync::Arc;

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Create a fresh game in a local sandbox
    Init {
        /// Replace an existing game without asking
        #[arg(short, long)]
        force: bool,
        /// Native base units paid per `rate-denominator` token base units
        #[arg(long, default_value_t = 1)]
        rate_numerator: u128,
        #[arg(long, default_value_t = 1000)]
        rate_denominator: u128,
        /// Native liquidity held by the pricing venue, in base units
        #[arg(long, default_value_t = 1_000_000_000_000_000_000_000_000)]
        venue_reserve: u128,
    },
    /// Mint fee tokens (whole tokens)
    Mint {
        amount: u128,
        /// Recipient label or address, defaults to the caller
        #[arg(long)]
        to: Option<String>,
    },
    /// Credit native currency (base units)
    Faucet {
        amount: u128,
        /// Recipient label or address, defaults to the caller
        #[arg(long)]
        to: Option<String>,
    },
    /// Grant or revoke a role in the authorization registry
    Grant {
        /// Principal label or address
        principal: String,
        /// admin, operator or funder
        role: Role,
        #[arg(long)]
        revoke: bool,
    },
    /// Move the clock forward
    Advance {
        #[arg(short, long, default_value_t = 0)]
        minutes: i64,
        #[arg(short, long, default_value_t = 1)]
        confirmations: u64,
    },
}

pub async fn handle_setup_command(cmd: SetupCommands, config: &CliConfig) -> Result<()> {
    match cmd {
        SetupCommands::Init {
            force,
            rate_numerator,
            rate_denominator,
            venue_reserve,
        } => {
            let (storage, exists) = session::open_storage(config).await?;
            if exists && !force {
                let replace = Confirm::new()
                    .with_prompt("A game already exists. Replace it?")
                    .default(false)
                    .interact()?;
                if !replace {
                    println!("Keeping the existing game.");
                    return Ok(());
                }
            }
            session::reset(&storage).await?;

            let sandbox = Arc::new(Sandbox::new(Address::from_label("jackpot")));
            let token = Address::from_label("token");
            let market = Address::from_label("market");
            let marketing = Address::from_label("marketing");
            sandbox.deploy_token(token);
            sandbox.deploy_venue(market, rate_numerator, rate_denominator);
            sandbox.credit_native(&market, NativeAmount::new(venue_reserve));

            let caller = Address::from_label(&config.caller);
            for role in [Role::Admin, Role::Operator, Role::Funder] {
                sandbox.grant_role(&caller, role);
            }

            let clock = Clock::start();
            let game = JackpotGame::deploy(
                sandbox.clone(),
                EngineSettings::default(),
                Deployment {
                    token,
                    market,
                    marketing_destination: marketing,
                    config: GameConfig::default(),
                },
                clock.now,
            )?;

            let session = Session::create(storage, sandbox, game, clock, config);
            session.save().await?;

            println!("Game created successfully!");
            println!("  ID: {}", session.game.id());
            println!("  Token: {}", token);
            println!("  Market: {}", market);
            println!("  Marketing: {}", marketing);
            println!(
                "  '{}' ({}) holds the admin, operator and funder roles",
                config.caller, caller
            );
            println!();
            println!("Next: jackpot set-secret <word>, then jackpot fund <amount>");
        }

        SetupCommands::Mint { amount, to } => {
            let session = Session::open(config).await?;
            let recipient = to.as_deref().map_or(session.caller, Address::resolve);
            let amount = whole_tokens(amount)?;
            let token = session.game.dependencies().token;

            session.sandbox.mint(&token, &recipient, amount)?;
            session.save().await?;

            println!(
                "Minted {} tokens to {} (balance {})",
                format_tokens(amount),
                recipient,
                format_tokens(session.sandbox.token_balance(&token, &recipient))
            );
        }

        SetupCommands::Faucet { amount, to } => {
            let session = Session::open(config).await?;
            let recipient = to.as_deref().map_or(session.caller, Address::resolve);

            session
                .sandbox
                .credit_native(&recipient, NativeAmount::new(amount));
            session.save().await?;

            println!(
                "Credited {} to {} (balance {})",
                amount,
                recipient,
                session.sandbox.native_balance(&recipient)
            );
        }

        SetupCommands::Grant {
            principal,
            role,
            revoke,
        } => {
            let session = Session::open(config).await?;
            let address = Address::resolve(&principal);

            if revoke {
                session.sandbox.revoke_role(&address, role);
                println!("Revoked {} from '{}' ({})", role, principal, address);
            } else {
                session.sandbox.grant_role(&address, role);
                println!("Granted {} to '{}' ({})", role, principal, address);
            }
            session.save().await?;
        }

        SetupCommands::Advance {
            minutes,
            confirmations,
        } => {
            let mut session = Session::open(config).await?;
            session.clock.advance(minutes, confirmations)?;
            session.save().await?;

            println!(
                "Clock at {} (confirmation {})",
                session.clock.now.format("%Y-%m-%d %H:%M"),
                session.clock.confirmation
            );
        }
    }

    Ok(())
}

