pub mod error;
pub mod ledger;
pub mod stats;
pub mod strategy;
pub mod table;

use serde::{Deserialize, Serialize};

pub use error::TableError;
pub use ledger::{Bankroll, Ledger};
pub use stats::{GameStats, Stat};
pub use strategy::{
    BasicStrategy, DealerMimic, DecisionContext, InsurancePolicy, Strategy, StrategyKind,
};
pub use table::card::{Card, Rank, Suit};
pub use table::hand::Hand;
pub use table::settlement::{HandOutcome, HandSettlement, InsuranceResult, Settlement};
pub use table::shoe::Shoe;
pub use table::snapshot::{HandSnapshot, TableSnapshot};
pub use table::split::{HandAction, HandStatus, SplitHand, SplitManager, SplitPhase};
pub use table::{
    dealer_should_hit, PlayerSide, RoundPhase, Seat, Table, TableEvent, TableEventHandler,
};

/// Table rules.
///
/// The dealer always hits soft 17 and the shoe is a single deck reshuffled
/// before every round. Neither is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Maximum number of simultaneous player hands after splitting.
    pub max_hands: u8,
    /// Whether a hand created by a split may be split again.
    pub allow_resplit: bool,
    pub double_after_split: bool,
    /// How many times the second split card may be burned and redrawn because
    /// it would pair up with the seed card of its hand.
    pub split_draw_retries: u8,
    pub min_bet: u32,
    /// Bounded so that every hand doubled and won, plus insurance, still fits
    /// in a `u32`.
    pub max_bet: u32,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            max_hands: 2,
            allow_resplit: false,
            double_after_split: true,
            split_draw_retries: 10,
            min_bet: 2,
            max_bet: 10_000,
        }
    }
}

impl Rule {
    pub fn validate(&self) -> Result<(), TableError> {
        if self.max_hands == 0 {
            return Err(TableError::InvalidRule(String::from(
                "max_hands must be at least 1",
            )));
        }
        if self.min_bet == 0 || self.min_bet % 2 != 0 {
            return Err(TableError::InvalidRule(String::from(
                "min_bet must be a positive even integer",
            )));
        }
        if self.min_bet > self.max_bet {
            return Err(TableError::InvalidRule(format!(
                "min_bet {} exceeds max_bet {}",
                self.min_bet, self.max_bet
            )));
        }
        // Every hand doubled and winning, plus a winning insurance stake.
        let exposure = 4 * u32::from(self.max_hands) + 2;
        if self.max_bet.checked_mul(exposure).is_none() {
            return Err(TableError::InvalidRule(format!(
                "max_bet {} is too large for {} hands",
                self.max_bet, self.max_hands
            )));
        }
        Ok(())
    }

    pub fn splitting_enabled(&self) -> bool {
        self.max_hands >= 2
    }
}

/// A player decision on the active hand. Insurance is answered separately
/// through `Table::respond_to_insurance`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}
