pub mod governance;
pub mod operate;
pub mod play;
pub mod setup;
pub mod status;

pub use governance::{handle_governance_command, GovernanceCommands};
pub use operate::{handle_operate_command, OperateCommands};
pub use play::{handle_play_command, PlayCommands};
pub use setup::{handle_setup_command, SetupCommands};
pub use status::{handle_status_command, StatusCommands};

use anyhow::{anyhow, Result};
use jackpot_core::config::TOKEN_UNIT;
use jackpot_core::TokenAmount;

/// Converts a whole-token amount from the command line into base units.
pub(crate) fn whole_tokens(amount: u128) -> Result<TokenAmount> {
    amount
        .checked_mul(TOKEN_UNIT)
        .map(TokenAmount::new)
        .ok_or_else(|| anyhow!("Token amount {} is too large", amount))
}

pub(crate) fn format_tokens(amount: TokenAmount) -> String {
    let whole = amount.get() / TOKEN_UNIT;
    let fraction = amount.get() % TOKEN_UNIT;
    if fraction == 0 {
        return whole.to_string();
    }
    let digits = format!("{:018}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
