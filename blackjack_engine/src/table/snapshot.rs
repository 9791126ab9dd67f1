use serde::Serialize;

use super::card::Card;
use super::settlement::{InsuranceResult, Settlement};
use super::split::HandStatus;
use super::RoundPhase;

/// Read-only view of one player hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandSnapshot {
    pub cards: Vec<Card>,
    pub value: u8,
    pub is_soft: bool,
    pub bet: u32,
    pub status: HandStatus,
    pub is_active: bool,
    pub is_doubled_down: bool,
    pub is_split_ace_hand: bool,
}

/// Read-only view of the table for presentation layers.
///
/// The dealer's hole card is `None` until the dealer's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSnapshot {
    pub phase: RoundPhase,
    pub dealer_cards: Vec<Option<Card>>,
    /// Value of the visible dealer cards only.
    pub dealer_value: u8,
    pub player_hands: Vec<HandSnapshot>,
    pub active_hand_index: usize,
    pub current_bet: u32,
    pub original_bet: u32,
    pub total_bet: u32,
    pub insurance_bet: u32,
    pub insurance_result: InsuranceResult,
    pub is_split: bool,
    pub cards_remaining: usize,
    pub result_message: Option<String>,
    /// Total credit owed for the round once it is over.
    pub payout: Option<u32>,
    pub settlement: Option<Settlement>,
}
