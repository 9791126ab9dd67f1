use thiserror::Error;

use crate::table::card::Card;
use crate::table::RoundPhase;

/// Every rejected action leaves the table exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("{action} is only allowed in {expected} phase, current phase is {actual:?}")]
    WrongPhase {
        action: &'static str,
        expected: &'static str,
        actual: RoundPhase,
    },
    #[error("No bet has been placed")]
    NoBet,
    #[error("Invalid bet {amount}: {reason}")]
    InvalidBet { amount: u32, reason: &'static str },
    #[error("Insufficient funds: need {required}, balance is {balance}")]
    InsufficientFunds { required: u32, balance: u32 },
    #[error("Cannot split: {0}")]
    CannotSplit(&'static str),
    #[error("Cannot double down: {0}")]
    CannotDouble(&'static str),
    #[error("Hand {0} is no longer playing")]
    HandNotPlaying(usize),
    #[error("Hand index {index} out of range ({len} hands)")]
    HandIndexOutOfRange { index: usize, len: usize },
    #[error("Hand {index} is not the active hand ({active})")]
    NotActiveHand { index: usize, active: usize },
    #[error("The round has already been resolved")]
    AlreadyResolved,
    #[error("Invalid card index {0}")]
    InvalidCardIndex(u8),
    #[error("Cannot parse a card from {0:?}")]
    InvalidCard(String),
    #[error("Card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}
