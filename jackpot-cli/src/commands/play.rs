use super::format_tokens;
use crate::config::CliConfig;
use crate::session::{PendingReveal, Session};
use anyhow::{anyhow, bail, Result};
use clap::Subcommand;
use jackpot_core::Bytes32;
use jackpot_game::{generate_nonce, guess_commitment};

#[derive(Subcommand)]
pub enum PlayCommands {
    /// Pay the guess fee and commit to a hidden guess
    Commit {
        /// Guess of the secret word
        guess: String,
    },
    /// Reveal the committed guess
    Reveal {
        /// Guess to reveal (defaults to the locally stored one)
        #[arg(long, requires = "nonce")]
        guess: Option<String>,
        /// Hex nonce used at commit time
        #[arg(long, requires = "guess")]
        nonce: Option<String>,
    },
    /// Buy the latest hint
    Hint,
    /// Show a hint by index
    ShowHint { index: u64 },
}

pub async fn handle_play_command(cmd: PlayCommands, config: &CliConfig) -> Result<()> {
    match cmd {
        PlayCommands::Commit { guess } => {
            let mut session = Session::open(config).await?;
            let ctx = session.ctx();
            let cost = session.game.config().guess_cost;

            let nonce = generate_nonce();
            let number = session
                .game
                .commit(&ctx, guess_commitment(&guess, &nonce))?;

            let replaced = session.reveals.insert(
                session.caller,
                PendingReveal {
                    guess: guess.clone(),
                    nonce,
                    committed_at: ctx.confirmation,
                },
            );
            session.confirm()?;
            session.save().await?;

            println!("Guess #{} committed for {} tokens", number, format_tokens(cost));
            if let Some(previous) = replaced {
                println!("  Replaced unrevealed guess '{}' (fee not refunded)", previous.guess);
            }
            println!(
                "  Reveal from confirmation {} with: jackpot --as {} reveal",
                reveal_ready_at(ctx.confirmation, session.game.config().reveal_delay),
                session.caller_label
            );
            println!("  Nonce: {}", nonce);
        }

        PlayCommands::Reveal { guess, nonce } => {
            let mut session = Session::open(config).await?;
            let (guess, nonce) = match (guess, nonce) {
                (Some(guess), Some(nonce)) => (guess, nonce.parse::<Bytes32>()?),
                (None, None) => {
                    let pending = session.reveals.get(&session.caller).ok_or_else(|| {
                        anyhow!(
                            "No stored guess for '{}'. Pass --guess and --nonce",
                            session.caller_label
                        )
                    })?;
                    (pending.guess.clone(), pending.nonce)
                }
                _ => bail!("--guess and --nonce must be given together"),
            };

            let ctx = session.ctx();
            let outcome = session.game.reveal(&ctx, &guess, nonce)?;
            session.reveals.remove(&session.caller);
            session.confirm()?;
            session.save().await?;

            match outcome.payout {
                Some(payout) => {
                    println!("'{}' is the secret word!", guess);
                    println!("  Won: {}", payout);
                    println!("  New jackpot: {}", session.game.jackpot_info().jackpot);
                }
                None => println!("'{}' is not the secret word. Better luck next time.", guess),
            }
        }

        PlayCommands::Hint => {
            let mut session = Session::open(config).await?;
            let ctx = session.ctx();
            let cost = session.game.config().hint_cost;

            let hint = session.game.request_hint(&ctx)?;
            session.confirm()?;
            session.save().await?;

            println!("Hint #{} ({} tokens): {}", hint.index, format_tokens(cost), hint.text);
        }

        PlayCommands::ShowHint { index } => {
            let session = Session::open(config).await?;
            let hint = session.game.hint(index)?;
            println!("Hint #{}: {}", hint.index, hint.text);
        }
    }

    Ok(())
}

/// First confirmation at which a guess committed at `committed_at` can be revealed.
fn reveal_ready_at(committed_at: u64, reveal_delay: u64) -> u64 {
    committed_at.saturating_add(reveal_delay)
}
