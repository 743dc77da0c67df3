use super::{format_tokens, whole_tokens};
use crate::config::CliConfig;
use crate::session::Session;
use anyhow::Result;
use clap::Subcommand;
use jackpot_core::{Address, NativeAmount};
use jackpot_game::SecretCommitment;

#[derive(Subcommand)]
pub enum OperateCommands {
    /// Add native currency (base units) to the jackpot
    Fund { amount: u128 },
    /// Replace the secret word
    SetSecret { word: String },
    /// Publish a new hint
    AddHint { text: String },
    /// Set the fee split percentages
    Split {
        burn: u8,
        jackpot: u8,
        next_jackpot: u8,
        marketing: u8,
    },
    /// Set guess and hint costs (whole tokens)
    Costs { guess: u128, hint: u128 },
    /// Set the confirmations required between commit and reveal
    RevealDelay { confirmations: u64 },
    /// Set the minutes between fee settlements (0 disables)
    BatchInterval { minutes: u64 },
    /// Set the marketing wallet
    Marketing {
        /// Label or address
        destination: String,
    },
    /// Publish a game update announcement
    Announce { message: String },
    /// Settle accumulated fees now
    Settle,
    /// Pause the game
    Pause,
    /// Resume a paused game
    Unpause,
}

pub async fn handle_operate_command(cmd: OperateCommands, config: &CliConfig) -> Result<()> {
    let mut session = Session::open(config).await?;
    let ctx = session.ctx();
    let game = &session.game;

    match cmd {
        OperateCommands::Fund { amount } => {
            game.fund_jackpot(&ctx, NativeAmount::new(amount))?;
            println!("Jackpot funded with {}", amount);
            println!("  Jackpot: {}", game.jackpot_info().jackpot);
        }

        OperateCommands::SetSecret { word } => {
            let secret = SecretCommitment::from_word(&word);
            let epoch = game.set_secret(&ctx, secret.hash, secret.salt)?;
            println!("Secret set (epoch {})", epoch);
            println!("  Hash: {}", secret.hash);
        }

        OperateCommands::AddHint { text } => {
            let index = game.add_hint(&ctx, &text)?;
            println!("Hint #{} added", index);
        }

        OperateCommands::Split {
            burn,
            jackpot,
            next_jackpot,
            marketing,
        } => {
            let split = game.update_split(&ctx, burn, jackpot, next_jackpot, marketing)?;
            println!(
                "Split updated: burn {}%, jackpot {}%, rollover {}%, marketing {}%",
                split.burn_pct, split.jackpot_pct, split.next_jackpot_pct, split.marketing_pct
            );
        }

        OperateCommands::Costs { guess, hint } => {
            let (guess, hint) = (whole_tokens(guess)?, whole_tokens(hint)?);
            game.set_costs(&ctx, guess, hint)?;
            println!(
                "Costs updated: guess {} tokens, hint {} tokens",
                format_tokens(guess),
                format_tokens(hint)
            );
        }

        OperateCommands::RevealDelay { confirmations } => {
            game.set_reveal_delay(&ctx, confirmations)?;
            println!("Reveal delay set to {} confirmations", confirmations);
        }

        OperateCommands::BatchInterval { minutes } => {
            game.set_batch_interval(&ctx, minutes)?;
            if minutes == 0 {
                println!("Automatic fee settlement disabled");
            } else {
                println!("Fees settle every {} minutes", minutes);
            }
        }

        OperateCommands::Marketing { destination } => {
            let address = Address::resolve(&destination);
            game.set_marketing_destination(&ctx, address)?;
            println!("Marketing destination set to {}", address);
        }

        OperateCommands::Announce { message } => {
            game.emit_game_update(&ctx, &message)?;
            println!("Announcement published");
        }

        OperateCommands::Settle => match game.settle_fees(&ctx)? {
            Some(report) => {
                println!("Settled {} tokens of fees", format_tokens(report.plan.total));
                println!("  Burned: {}", format_tokens(report.plan.burn));
                println!(
                    "  Sold: {} for {}",
                    format_tokens(report.plan.to_sell),
                    report.received
                );
                println!("  Jackpot: +{}", report.proceeds.jackpot_share);
                println!("  Rollover: +{}", report.proceeds.next_jackpot_share);
                println!("  Marketing: {}", report.proceeds.marketing_share);
            }
            None => println!("No fees to settle"),
        },

        OperateCommands::Pause => {
            game.pause(&ctx)?;
            println!("Game paused");
        }

        OperateCommands::Unpause => {
            game.unpause(&ctx)?;
            println!("Game resumed");
        }
    }

    session.confirm()?;
    session.save().await?;
    Ok(())
}
