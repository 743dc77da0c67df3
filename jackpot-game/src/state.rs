use crate::commitment::SecretCommitment;
use crate::hints::HintCatalog;
use crate::ledger::GuessLedger;
use crate::stats::GlobalStats;
use crate::timelock::{Dependencies, GovernanceTimelock};
use crate::treasury::TreasuryAccountant;
use chrono::{DateTime, Utc};
use jackpot_core::{Address, GameConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Initial wiring of an engine instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub token: Address,
    pub market: Address,
    pub marketing_destination: Address,
    pub config: GameConfig,
}

/// Everything the engine owns. Mutated only by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub id: Uuid,
    pub config: GameConfig,
    pub secret: Option<SecretCommitment>,
    /// Bumped by every secret change; commitments from older epochs are void.
    pub secret_epoch: u64,
    pub ledger: GuessLedger,
    pub treasury: TreasuryAccountant,
    pub hints: HintCatalog,
    pub timelock: GovernanceTimelock,
    pub dependencies: Dependencies,
    pub marketing_destination: Address,
    pub stats: GlobalStats,
}

impl GameState {
    pub fn new(deployment: Deployment, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            config: deployment.config,
            secret: None,
            secret_epoch: 0,
            ledger: GuessLedger::new(),
            treasury: TreasuryAccountant::new(now),
            hints: HintCatalog::new(),
            timelock: GovernanceTimelock::new(),
            dependencies: Dependencies {
                token: deployment.token,
                market: deployment.market,
            },
            marketing_destination: deployment.marketing_destination,
            stats: GlobalStats::default(),
        }
    }
}
