use chrono::{DateTime, Utc};
use jackpot_core::{Address, NativeAmount};
use serde::{Deserialize, Serialize};

/// Aggregate counters across all players.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_guesses: u64,
    pub unique_players: u64,
    pub total_winners: u64,
    pub total_payouts: NativeAmount,
    pub last_winner: Option<Address>,
    pub last_win_time: Option<DateTime<Utc>>,
}

/// Headline numbers announced to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JackpotInfo {
    pub jackpot: NativeAmount,
    pub next_jackpot: NativeAmount,
    pub total_guesses: u64,
    pub unique_players: u64,
}
