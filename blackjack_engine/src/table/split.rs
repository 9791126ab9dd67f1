use serde::{Deserialize, Serialize};

use super::card::Card;
use super::hand::Hand;
use crate::{Rule, TableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Playing,
    Standing,
    Busted,
    Complete,
}

/// Where a player hand came from. Fixed when the hand is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum HandOrigin {
    Dealt,
    Split,
    SplitAces,
}

/// One player hand of a (possibly) split round, with its own bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitHand {
    hand: Hand,
    bet: u32,
    status: HandStatus,
    is_active: bool,
    is_doubled_down: bool,
    origin: HandOrigin,
}

impl SplitHand {
    /// The hand as originally dealt, before any split.
    pub fn dealt(hand: Hand, bet: u32) -> SplitHand {
        SplitHand {
            hand,
            bet,
            status: HandStatus::Playing,
            is_active: false,
            is_doubled_down: false,
            origin: HandOrigin::Dealt,
        }
    }

    fn from_split(seed: Card, drawn: Card, bet: u32) -> SplitHand {
        let origin = if seed.is_ace() {
            HandOrigin::SplitAces
        } else {
            HandOrigin::Split
        };
        let mut split_hand = SplitHand {
            hand: Hand::from_cards(vec![seed]),
            bet,
            status: HandStatus::Playing,
            is_active: false,
            is_doubled_down: false,
            origin,
        };
        split_hand.receive_card(drawn);
        split_hand
    }

    fn receive_card(&mut self, card: Card) {
        self.hand.add_card(card);
        if self.hand.is_bust() {
            self.status = HandStatus::Busted;
        } else if self.origin == HandOrigin::SplitAces {
            // Split aces take exactly one card.
            self.status = HandStatus::Complete;
        }
    }

    fn stand(&mut self) {
        self.status = HandStatus::Standing;
    }

    fn double_down(&mut self, card: Card) {
        self.bet = self.bet.saturating_mul(2);
        self.is_doubled_down = true;
        self.receive_card(card);
        if self.status == HandStatus::Playing {
            self.status = HandStatus::Standing;
        }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn cards(&self) -> &[Card] {
        self.hand.cards()
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_doubled_down(&self) -> bool {
        self.is_doubled_down
    }

    pub fn is_playing(&self) -> bool {
        self.status == HandStatus::Playing
    }

    pub fn is_complete(&self) -> bool {
        !self.is_playing()
    }

    /// True only for hands created by splitting a pair of aces.
    pub fn is_split_ace_hand(&self) -> bool {
        self.origin == HandOrigin::SplitAces
    }

    pub fn is_from_split(&self) -> bool {
        self.origin != HandOrigin::Dealt
    }

    pub fn value(&self) -> u8 {
        self.hand.value()
    }

    pub fn is_soft(&self) -> bool {
        self.hand.is_soft()
    }

    pub fn is_bust(&self) -> bool {
        self.hand.is_bust()
    }

    /// Two-card 21 on a hand created by a split is an ordinary 21.
    pub fn is_blackjack(&self) -> bool {
        self.origin == HandOrigin::Dealt && self.hand.is_blackjack()
    }

    pub fn can_split(&self) -> bool {
        self.hand.can_split()
    }

    pub fn can_double_down(&self) -> bool {
        self.is_playing() && self.hand.len() == 2 && !self.is_split_ace_hand()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPhase {
    None,
    Playing,
    DealerTurn,
    Completed,
}

/// A player action on one split hand. Drawing actions carry their card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandAction {
    Hit(Card),
    Stand,
    DoubleDown(Card),
}

/// Owns the player hands of a round once it has been split, and walks
/// through them in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitManager {
    hands: Vec<SplitHand>,
    active_hand_index: usize,
    phase: SplitPhase,
    total_bet: u32,
}

impl Default for SplitManager {
    fn default() -> Self {
        SplitManager::new()
    }
}

impl SplitManager {
    pub fn new() -> SplitManager {
        SplitManager {
            hands: Vec::new(),
            active_hand_index: 0,
            phase: SplitPhase::None,
            total_bet: 0,
        }
    }

    /// Starts managing the hand as dealt, ready to be split.
    pub fn with_single_hand(hand: Hand, bet: u32) -> SplitManager {
        let mut dealt = SplitHand::dealt(hand, bet);
        dealt.is_active = true;
        SplitManager {
            hands: vec![dealt],
            active_hand_index: 0,
            phase: SplitPhase::Playing,
            total_bet: bet,
        }
    }

    pub fn reset(&mut self) {
        *self = SplitManager::new();
    }

    pub fn hands(&self) -> &[SplitHand] {
        &self.hands
    }

    pub fn hand(&self, index: usize) -> Option<&SplitHand> {
        self.hands.get(index)
    }

    pub fn active_hand_index(&self) -> usize {
        self.active_hand_index
    }

    pub fn active_hand(&self) -> Option<&SplitHand> {
        self.hands.get(self.active_hand_index)
    }

    pub fn phase(&self) -> SplitPhase {
        self.phase
    }

    pub fn total_bet(&self) -> u32 {
        self.total_bet
    }

    pub fn has_split(&self) -> bool {
        self.hands.len() > 1
    }

    pub fn total_hands(&self) -> usize {
        self.hands.len()
    }

    pub fn current_hand_number(&self) -> usize {
        self.active_hand_index + 1
    }

    pub fn playing_hands_remaining(&self) -> usize {
        self.hands.iter().filter(|hand| hand.is_playing()).count()
    }

    pub fn all_hands_complete(&self) -> bool {
        self.hands.iter().all(|hand| hand.is_complete())
    }

    pub fn all_hands_bust(&self) -> bool {
        !self.hands.is_empty() && self.hands.iter().all(|hand| hand.is_bust())
    }

    pub fn can_split_hand(&self, index: usize, rule: &Rule) -> bool {
        self.validate_split(index, rule).is_ok()
    }

    /// Checks every precondition of `split_hand` except the bankroll.
    pub fn validate_split(&self, index: usize, rule: &Rule) -> Result<(), TableError> {
        let hand = self.hands.get(index).ok_or(TableError::HandIndexOutOfRange {
            index,
            len: self.hands.len(),
        })?;
        if self.phase != SplitPhase::Playing {
            return Err(TableError::CannotSplit("no hand is in play"));
        }
        if index != self.active_hand_index {
            return Err(TableError::NotActiveHand {
                index,
                active: self.active_hand_index,
            });
        }
        if !hand.is_playing() {
            return Err(TableError::HandNotPlaying(index));
        }
        if hand.cards().len() != 2 {
            return Err(TableError::CannotSplit("hand must hold exactly two cards"));
        }
        if !hand.can_split() {
            return Err(TableError::CannotSplit("cards do not form a pair"));
        }
        if hand.is_split_ace_hand() {
            return Err(TableError::CannotSplit("split aces cannot be split again"));
        }
        if self.has_split() && !rule.allow_resplit {
            return Err(TableError::CannotSplit("re-splitting is not allowed"));
        }
        if self.hands.len() >= rule.max_hands as usize {
            return Err(TableError::CannotSplit("maximum number of hands reached"));
        }
        Ok(())
    }

    /// Replaces the hand at `index` with two hands, each seeded with one of its
    /// cards plus one new card, and each carrying the original bet. The first
    /// of the two becomes active unless it is already complete (split aces).
    pub fn split_hand(
        &mut self,
        index: usize,
        new_card1: Card,
        new_card2: Card,
        rule: &Rule,
    ) -> Result<(), TableError> {
        self.validate_split(index, rule)?;

        let original = self.hands.remove(index);
        let (first, second) = (original.cards()[0], original.cards()[1]);
        let first_hand = SplitHand::from_split(first, new_card1, original.bet);
        let second_hand = SplitHand::from_split(second, new_card2, original.bet);
        self.hands.insert(index, second_hand);
        self.hands.insert(index, first_hand);
        self.total_bet += original.bet;
        self.active_hand_index = index;

        if self.hands[index].is_playing() {
            self.hands[index].is_active = true;
        } else {
            self.move_to_next_hand();
        }
        Ok(())
    }

    /// Applies an action to the hand at `index`, which must be the active
    /// hand. Returns true when that hand can take no further action and the
    /// caller should call `move_to_next_hand`.
    pub fn process_action(&mut self, index: usize, action: HandAction) -> Result<bool, TableError> {
        let len = self.hands.len();
        let active = self.active_hand_index;
        let hand = self
            .hands
            .get_mut(index)
            .ok_or(TableError::HandIndexOutOfRange { index, len })?;
        if self.phase != SplitPhase::Playing || !hand.is_playing() {
            return Err(TableError::HandNotPlaying(index));
        }
        if index != active {
            return Err(TableError::NotActiveHand { index, active });
        }

        match action {
            HandAction::Hit(card) => {
                hand.receive_card(card);
                Ok(!hand.is_playing())
            }
            HandAction::Stand => {
                hand.stand();
                Ok(true)
            }
            HandAction::DoubleDown(card) => {
                if hand.is_split_ace_hand() {
                    return Err(TableError::CannotDouble("split aces take exactly one card"));
                }
                if hand.cards().len() != 2 {
                    return Err(TableError::CannotDouble(
                        "only a two-card hand can be doubled",
                    ));
                }
                let added = hand.bet;
                hand.double_down(card);
                self.total_bet += added;
                Ok(true)
            }
        }
    }

    /// Deactivates the current hand and activates the next hand still in
    /// play. Returns false when there is none; the phase then moves to
    /// `DealerTurn`.
    pub fn move_to_next_hand(&mut self) -> bool {
        if let Some(hand) = self.hands.get_mut(self.active_hand_index) {
            hand.is_active = false;
        }
        let next = (self.active_hand_index + 1..self.hands.len())
            .find(|&index| self.hands[index].is_playing());
        match next {
            Some(index) => {
                self.active_hand_index = index;
                self.hands[index].is_active = true;
                true
            }
            None => {
                self.phase = SplitPhase::DealerTurn;
                false
            }
        }
    }

    /// Marks every hand still in play as complete and ends the player side.
    pub fn complete_all_hands(&mut self) {
        for hand in &mut self.hands {
            if hand.is_playing() {
                hand.status = HandStatus::Complete;
            }
            hand.is_active = false;
        }
        self.phase = SplitPhase::Completed;
    }
}
