use super::format_tokens;
use crate::config::CliConfig;
use crate::session::Session;
use anyhow::Result;
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use jackpot_core::{AuthorizationRegistry, EventStore, NativeBank, Role};

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Show pools, configuration and the caller's balances
    Status,
    /// List recent notifications
    Events {
        /// Number of events to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

pub async fn handle_status_command(cmd: StatusCommands, config: &CliConfig) -> Result<()> {
    let session = Session::open(config).await?;
    let game = &session.game;

    match cmd {
        StatusCommands::Status => {
            let pools = game.jackpot_state();
            let stats = game.stats();
            let settings = game.config();
            let deps = game.dependencies();

            println!("Game {}", game.id());
            println!(
                "  Clock: {} (confirmation {})",
                session.clock.now.format("%Y-%m-%d %H:%M"),
                session.clock.confirmation
            );
            println!("  Status: {}", if game.is_paused() { "paused" } else { "live" });
            println!();

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Pool", "Amount"]);
            table.add_row(vec!["Jackpot".to_string(), pools.jackpot_amount.to_string()]);
            table.add_row(vec![
                "Rollover".to_string(),
                pools.next_jackpot_amount.to_string(),
            ]);
            table.add_row(vec![
                "Held".to_string(),
                session.sandbox.held_balance().to_string(),
            ]);
            table.add_row(vec![
                "Unallocated".to_string(),
                game.unallocated_balance().to_string(),
            ]);
            table.add_row(vec![
                "Pending fees (tokens)".to_string(),
                format_tokens(pools.accumulated_fees),
            ]);
            table.add_row(vec![
                "Last settlement".to_string(),
                pools.last_batch_time.format("%Y-%m-%d %H:%M").to_string(),
            ]);
            println!("{}", table);

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Setting", "Value"]);
            table.add_row(vec![
                "Guess cost".to_string(),
                format!("{} tokens", format_tokens(settings.guess_cost)),
            ]);
            table.add_row(vec![
                "Hint cost".to_string(),
                format!("{} tokens", format_tokens(settings.hint_cost)),
            ]);
            table.add_row(vec![
                "Reveal delay".to_string(),
                format!("{} confirmations", settings.reveal_delay),
            ]);
            table.add_row(vec![
                "Batch interval".to_string(),
                format!("{} minutes", settings.batch_interval_minutes),
            ]);
            table.add_row(vec![
                "Split".to_string(),
                format!(
                    "burn {}% / jackpot {}% / rollover {}% / marketing {}%",
                    settings.split.burn_pct,
                    settings.split.jackpot_pct,
                    settings.split.next_jackpot_pct,
                    settings.split.marketing_pct
                ),
            ]);
            table.add_row(vec!["Secret epoch".to_string(), game.secret_epoch().to_string()]);
            table.add_row(vec!["Hints".to_string(), game.hint_count().to_string()]);
            table.add_row(vec!["Token".to_string(), deps.token.to_string()]);
            table.add_row(vec!["Market".to_string(), deps.market.to_string()]);
            table.add_row(vec![
                "Marketing".to_string(),
                game.marketing_destination().to_string(),
            ]);
            println!("{}", table);

            println!("Players: {} unique, {} guesses", stats.unique_players, stats.total_guesses);
            println!("Winners: {} ({} paid)", stats.total_winners, stats.total_payouts);
            if let (Some(winner), Some(at)) = (stats.last_winner, stats.last_win_time) {
                println!("  Last winner: {} at {}", winner, at.format("%Y-%m-%d %H:%M"));
            }
            if let Some(change) = game.pending_change() {
                println!(
                    "Pending change: token {}, market {}, requested {}",
                    change.new_token,
                    change.new_market,
                    change.requested_at.format("%Y-%m-%d %H:%M")
                );
            }
            println!();

            let caller = session.caller;
            let roles: Vec<String> = [Role::Admin, Role::Operator, Role::Funder]
                .into_iter()
                .filter(|role| session.sandbox.has_role(&caller, *role))
                .map(|role| role.to_string())
                .collect();
            println!("Caller '{}' ({})", session.caller_label, caller);
            println!(
                "  Tokens: {}",
                format_tokens(session.sandbox.token_balance(&deps.token, &caller))
            );
            println!("  Native: {}", session.sandbox.native_balance(&caller));
            println!(
                "  Roles: {}",
                if roles.is_empty() { "none".to_string() } else { roles.join(", ") }
            );
            if let Some(player) = game.player(&caller) {
                println!(
                    "  Guesses: {}, hints bought: {}, wins: {}",
                    player.guess_count, player.hints_bought, player.wins
                );
            }
            if let Some(pending) = session.reveals.get(&caller) {
                println!(
                    "  Unrevealed guess '{}' from confirmation {}",
                    pending.guess, pending.committed_at
                );
            }
        }

        StatusCommands::Events { limit } => {
            let events = EventStore::new(session.storage())
                .recent(&game.id().to_string(), limit)
                .await?;

            if events.is_empty() {
                println!("No events recorded yet.");
                return Ok(());
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["#", "Kind", "Recorded", "Details"]);
            for event in events {
                table.add_row(vec![
                    event.seq.to_string(),
                    event.kind,
                    event.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    event.payload.to_string(),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}
