pub mod card;
pub mod hand;
pub mod settlement;
pub mod shoe;
pub mod snapshot;
pub mod split;

use blackjack_macros::allowed_phase;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Decision, Ledger, Rule, Stat, TableError};

use self::{
    card::Card,
    hand::Hand,
    settlement::{HandOutcome, HandSettlement, InsuranceResult, Settlement},
    shoe::Shoe,
    snapshot::{HandSnapshot, TableSnapshot},
    split::{HandAction, HandStatus, SplitManager, SplitPhase},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Betting,
    OfferingInsurance,
    PlayerTurn,
    DealerTurn,
    GameOver,
}

/// The player's hands for the current round. A round starts with a single
/// hand and switches to a `SplitManager` at the first split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSide {
    Single(Hand),
    Split(SplitManager),
}

/// Who received a dealt card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    Dealer { hole: bool },
    Player { hand_index: usize },
}

/// Something that happened at the table, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TableEvent {
    PhaseChanged { from: RoundPhase, to: RoundPhase },
    CardDealt { seat: Seat, card: Card },
    HoleCardRevealed(Card),
    /// A split card that was drawn and discarded because it would have paired
    /// up again.
    CardBurned(Card),
    Reshuffled,
    InsuranceResolved { stake: u32, result: InsuranceResult },
    HandSplit { hands: usize },
    HandAdvanced { index: usize },
    Stat(Stat),
    Settled(Settlement),
}

/// Receives table events through `Table::dispatch_events`.
/// Every method defaults to doing nothing.
pub trait TableEventHandler {
    fn on_phase_changed(&mut self, _from: RoundPhase, _to: RoundPhase) {}
    fn on_card_dealt(&mut self, _seat: Seat, _card: Card) {}
    fn on_hole_card_revealed(&mut self, _card: Card) {}
    fn on_card_burned(&mut self, _card: Card) {}
    fn on_reshuffle(&mut self) {}
    fn on_insurance_resolved(&mut self, _stake: u32, _result: InsuranceResult) {}
    fn on_split(&mut self, _hands: usize) {}
    fn on_hand_advanced(&mut self, _index: usize) {}
    fn on_stat(&mut self, _stat: Stat) {}
    fn on_settled(&mut self, _settlement: &Settlement) {}
}

/// Dealer hits below 17 and on soft 17.
pub fn dealer_should_hit(dealer_hand: &Hand) -> bool {
    let value = dealer_hand.value();
    value < 17 || (value == 17 && dealer_hand.is_soft())
}

fn outcome_stat(outcome: HandOutcome) -> Stat {
    match outcome {
        HandOutcome::Blackjack => Stat::PlayerBlackjack,
        HandOutcome::Win => Stat::PlayerWin,
        HandOutcome::Push => Stat::Push,
        HandOutcome::Loss => Stat::PlayerLoss,
        HandOutcome::Bust => Stat::PlayerBust,
    }
}

/// A single-player Blackjack table running one round at a time.
///
/// Money never lives here. Stakes are debited from the `Ledger` passed to
/// the staking actions and the round's payout is credited by `resolve_bet`.
/// Any action that returns an error leaves the table unchanged.
pub struct Table {
    rule: Rule,

    // Round state
    phase: RoundPhase,
    shoe: Shoe,
    dealer_hand: Hand,
    player: PlayerSide,
    current_bet: u32,
    original_bet: u32,
    insurance_bet: u32,
    insurance_result: InsuranceResult,

    // Settlement
    settlement: Option<Settlement>,
    result_message: Option<String>,
    resolved: bool,

    hole_card_announced: bool,

    events: Vec<TableEvent>,
}

impl Table {
    pub fn new(rule: &Rule) -> Result<Self, TableError> {
        Self::with_shoe(rule, Shoe::from_entropy())
    }

    /// A table whose shuffles are reproducible.
    pub fn with_seed(rule: &Rule, seed: u64) -> Result<Self, TableError> {
        Self::with_shoe(rule, Shoe::with_seed(seed))
    }

    fn with_shoe(rule: &Rule, shoe: Shoe) -> Result<Self, TableError> {
        rule.validate()?;
        Ok(Self {
            rule: *rule,
            phase: RoundPhase::Betting,
            shoe,
            dealer_hand: Hand::new(),
            player: PlayerSide::Single(Hand::new()),
            current_bet: 0,
            original_bet: 0,
            insurance_bet: 0,
            insurance_result: InsuranceResult::NotOffered,
            settlement: None,
            result_message: None,
            resolved: false,
            hole_card_announced: false,
            events: Vec::new(),
        })
    }

    /// Can be called at Betting phase.
    /// Debits `amount` from the ledger. The bet must be even so that the 3:2
    /// payout and the half-bet insurance stake stay whole, and must lie within
    /// the rule's limits. Placing a bet again replaces the previous one, which
    /// is credited back first.
    #[allowed_phase(Betting)]
    pub fn place_bet(&mut self, amount: u32, ledger: &mut impl Ledger) -> Result<(), TableError> {
        if amount == 0 {
            return Err(TableError::InvalidBet {
                amount,
                reason: "bet must be positive",
            });
        }
        if amount % 2 != 0 {
            return Err(TableError::InvalidBet {
                amount,
                reason: "bet must be an even integer to allow insurance",
            });
        }
        if amount < self.rule.min_bet {
            return Err(TableError::InvalidBet {
                amount,
                reason: "bet is below the table minimum",
            });
        }
        if amount > self.rule.max_bet {
            return Err(TableError::InvalidBet {
                amount,
                reason: "bet is above the table maximum",
            });
        }
        let available = ledger.current_balance().saturating_add(self.current_bet);
        if amount > available {
            return Err(TableError::InsufficientFunds {
                required: amount,
                balance: available,
            });
        }

        if self.current_bet > 0 {
            ledger.credit(self.current_bet);
        }
        if !ledger.debit(amount) {
            return Err(TableError::InsufficientFunds {
                required: amount,
                balance: ledger.current_balance(),
            });
        }
        self.current_bet = amount;
        self.original_bet = amount;
        debug!(bet = amount, "bet placed");
        Ok(())
    }

    /// Can be called at Betting phase.
    /// Shuffles the shoe and deals player, dealer, player, dealer.
    #[allowed_phase(Betting)]
    pub fn start_new_round(&mut self) -> Result<(), TableError> {
        if self.current_bet == 0 {
            return Err(TableError::NoBet);
        }
        self.shoe.reset();
        self.events.push(TableEvent::Reshuffled);
        self.deal_initial_cards();
        Ok(())
    }

    /// Can be called at Betting phase.
    /// Same as `start_new_round`, but the shoe deals `firsts` before the
    /// shuffled remainder.
    #[allowed_phase(Betting)]
    pub fn start_new_round_with_firsts(&mut self, firsts: &[Card]) -> Result<(), TableError> {
        if self.current_bet == 0 {
            return Err(TableError::NoBet);
        }
        self.shoe.reset_with_firsts(firsts)?;
        self.events.push(TableEvent::Reshuffled);
        self.deal_initial_cards();
        Ok(())
    }

    fn deal_initial_cards(&mut self) {
        self.dealer_hand.clear();
        self.hole_card_announced = false;
        let mut player_hand = Hand::new();
        for round in 0..2 {
            let card = self.draw_card();
            player_hand.add_card(card);
            self.events.push(TableEvent::CardDealt {
                seat: Seat::Player { hand_index: 0 },
                card,
            });

            let card = self.draw_card();
            self.dealer_hand.add_card(card);
            self.events.push(TableEvent::CardDealt {
                seat: Seat::Dealer { hole: round == 1 },
                card,
            });
        }
        debug!(
            player = ?player_hand.cards(),
            dealer_up = %self.dealer_hand.cards()[0],
            "initial cards dealt"
        );
        self.player = PlayerSide::Single(player_hand);

        if self.dealer_hand.cards()[0].is_ace() {
            self.set_phase(RoundPhase::OfferingInsurance);
        } else {
            self.check_blackjacks();
        }
    }

    /// Can be called at OfferingInsurance phase.
    /// Taking insurance debits half the bet. Either way the dealer's hole
    /// card is checked and the round continues or ends.
    #[allowed_phase(OfferingInsurance)]
    pub fn respond_to_insurance(
        &mut self,
        taken: bool,
        ledger: &mut impl Ledger,
    ) -> Result<InsuranceResult, TableError> {
        let stake = if taken { self.insurance_stake() } else { 0 };
        if stake > 0 && !ledger.debit(stake) {
            return Err(TableError::InsufficientFunds {
                required: stake,
                balance: ledger.current_balance(),
            });
        }

        self.insurance_bet = stake;
        self.insurance_result = if self.dealer_hand.is_blackjack() {
            InsuranceResult::Won
        } else {
            InsuranceResult::Lost
        };
        self.events.push(TableEvent::InsuranceResolved {
            stake,
            result: self.insurance_result,
        });
        debug!(stake, result = ?self.insurance_result, "insurance resolved");

        self.check_blackjacks();
        Ok(self.insurance_result)
    }

    fn check_blackjacks(&mut self) {
        let player_blackjack = match &self.player {
            PlayerSide::Single(hand) => hand.is_blackjack(),
            PlayerSide::Split(_) => false,
        };
        let dealer_blackjack = self.dealer_hand.is_blackjack();

        let outcome = match (player_blackjack, dealer_blackjack) {
            (true, true) => HandOutcome::Push,
            (false, true) => {
                self.events.push(TableEvent::Stat(Stat::DealerBlackjack));
                HandOutcome::Loss
            }
            (true, false) => HandOutcome::Blackjack,
            (false, false) => {
                self.set_phase(RoundPhase::PlayerTurn);
                return;
            }
        };
        self.finish_round(vec![HandSettlement::new(self.current_bet, outcome)]);
    }

    /// Can be called at PlayerTurn phase.
    /// Draws a card to the active hand and returns it.
    #[allowed_phase(PlayerTurn)]
    pub fn hit(&mut self) -> Result<Card, TableError> {
        if let PlayerSide::Split(manager) = &self.player {
            let index = manager.active_hand_index();
            if !manager.active_hand().map_or(false, |hand| hand.is_playing()) {
                return Err(TableError::HandNotPlaying(index));
            }
        }

        let card = self.draw_card();
        match &mut self.player {
            PlayerSide::Single(hand) => {
                hand.add_card(card);
                self.events.push(TableEvent::CardDealt {
                    seat: Seat::Player { hand_index: 0 },
                    card,
                });
                if hand.is_bust() {
                    let bust = HandSettlement::new(self.current_bet, HandOutcome::Bust);
                    self.finish_round(vec![bust]);
                }
            }
            PlayerSide::Split(manager) => {
                let index = manager.active_hand_index();
                let should_advance = manager.process_action(index, HandAction::Hit(card))?;
                self.events.push(TableEvent::CardDealt {
                    seat: Seat::Player { hand_index: index },
                    card,
                });
                if should_advance {
                    self.advance_split_hand();
                }
            }
        }
        Ok(card)
    }

    /// Can be called at PlayerTurn phase.
    #[allowed_phase(PlayerTurn)]
    pub fn stand(&mut self) -> Result<(), TableError> {
        match &mut self.player {
            PlayerSide::Single(_) => self.enter_dealer_turn(),
            PlayerSide::Split(manager) => {
                let index = manager.active_hand_index();
                manager.process_action(index, HandAction::Stand)?;
                self.advance_split_hand();
            }
        }
        Ok(())
    }

    /// Can be called at PlayerTurn phase.
    /// Doubles the active hand's bet, draws exactly one card and stands.
    #[allowed_phase(PlayerTurn)]
    pub fn double_down(&mut self, ledger: &mut impl Ledger) -> Result<Card, TableError> {
        self.validate_double_down(ledger.current_balance())?;
        let stake = self.current_hand_bet();
        if !ledger.debit(stake) {
            return Err(TableError::InsufficientFunds {
                required: stake,
                balance: ledger.current_balance(),
            });
        }

        let card = self.draw_card();
        match &mut self.player {
            PlayerSide::Single(hand) => {
                hand.add_card(card);
                self.current_bet += stake;
                self.events.push(TableEvent::CardDealt {
                    seat: Seat::Player { hand_index: 0 },
                    card,
                });
                debug!(bet = self.current_bet, %card, "doubled down");
                if hand.is_bust() {
                    let bust = HandSettlement::new(self.current_bet, HandOutcome::Bust);
                    self.finish_round(vec![bust]);
                } else {
                    self.enter_dealer_turn();
                }
            }
            PlayerSide::Split(manager) => {
                let index = manager.active_hand_index();
                manager.process_action(index, HandAction::DoubleDown(card))?;
                self.events.push(TableEvent::CardDealt {
                    seat: Seat::Player { hand_index: index },
                    card,
                });
                debug!(hand = index, %card, "doubled down on split hand");
                self.advance_split_hand();
            }
        }
        Ok(card)
    }

    /// Can be called at PlayerTurn phase.
    /// Splits the active pair into two hands, debiting one more bet. The
    /// second new card is redrawn a bounded number of times while it would
    /// pair up with its hand again; redrawn cards are burned.
    #[allowed_phase(PlayerTurn)]
    pub fn split(&mut self, ledger: &mut impl Ledger) -> Result<(), TableError> {
        self.validate_split(ledger.current_balance())?;
        let stake = self.current_hand_bet();
        if !ledger.debit(stake) {
            return Err(TableError::InsufficientFunds {
                required: stake,
                balance: ledger.current_balance(),
            });
        }

        let mut manager = match &self.player {
            PlayerSide::Single(hand) => SplitManager::with_single_hand(hand.clone(), self.current_bet),
            PlayerSide::Split(manager) => manager.clone(),
        };
        let index = manager.active_hand_index();
        let second_seed = manager.hands()[index].cards()[1];

        let first_card = self.draw_card();
        let mut second_card = self.draw_card();
        let mut attempts = 0;
        while second_card.pairs_with(&second_seed) && attempts < self.rule.split_draw_retries {
            debug!(card = %second_card, "burning split card that would pair again");
            self.events.push(TableEvent::CardBurned(second_card));
            second_card = self.draw_card();
            attempts += 1;
        }

        manager.split_hand(index, first_card, second_card, &self.rule)?;
        self.events.push(TableEvent::CardDealt {
            seat: Seat::Player { hand_index: index },
            card: first_card,
        });
        self.events.push(TableEvent::CardDealt {
            seat: Seat::Player {
                hand_index: index + 1,
            },
            card: second_card,
        });
        self.events.push(TableEvent::HandSplit {
            hands: manager.total_hands(),
        });
        debug!(hands = manager.total_hands(), total_bet = manager.total_bet(), "hand split");

        let all_complete = manager.phase() == SplitPhase::DealerTurn;
        self.player = PlayerSide::Split(manager);
        if all_complete {
            self.enter_dealer_turn();
        }
        Ok(())
    }

    /// Can be called at PlayerTurn phase.
    /// Routes a strategy decision to the matching action.
    #[allowed_phase(PlayerTurn)]
    pub fn act(&mut self, decision: Decision, ledger: &mut impl Ledger) -> Result<(), TableError> {
        match decision {
            Decision::Hit => self.hit().map(|_| ()),
            Decision::Stand => self.stand(),
            Decision::Double => self.double_down(ledger).map(|_| ()),
            Decision::Split => self.split(ledger),
        }
    }

    fn advance_split_hand(&mut self) {
        let PlayerSide::Split(manager) = &mut self.player else {
            return;
        };
        if manager.move_to_next_hand() {
            let index = manager.active_hand_index();
            self.events.push(TableEvent::HandAdvanced { index });
        } else {
            self.enter_dealer_turn();
        }
    }

    fn enter_dealer_turn(&mut self) {
        self.reveal_hole_card();
        self.set_phase(RoundPhase::DealerTurn);
    }

    /// Announces the hole card once per round.
    fn reveal_hole_card(&mut self) {
        if self.hole_card_announced {
            return;
        }
        if let Some(&hole) = self.dealer_hand.cards().get(1) {
            self.events.push(TableEvent::HoleCardRevealed(hole));
            self.hole_card_announced = true;
        }
    }

    /// Can be called at DealerTurn phase.
    /// Draws at most one dealer card. Returns true once the dealer is done
    /// and the round has been settled.
    #[allowed_phase(DealerTurn)]
    pub fn draw_one_dealer_card(&mut self) -> Result<bool, TableError> {
        if self.all_player_hands_bust() || !dealer_should_hit(&self.dealer_hand) {
            self.settle_against_dealer();
            return Ok(true);
        }

        let card = self.draw_card();
        self.dealer_hand.add_card(card);
        self.events.push(TableEvent::CardDealt {
            seat: Seat::Dealer { hole: false },
            card,
        });
        debug!(%card, total = self.dealer_hand.value(), "dealer draws");

        if dealer_should_hit(&self.dealer_hand) {
            return Ok(false);
        }
        self.settle_against_dealer();
        Ok(true)
    }

    /// Can be called at DealerTurn phase.
    /// Plays the dealer's hand to the end and settles the round.
    #[allowed_phase(DealerTurn)]
    pub fn play_dealer_turn(&mut self) -> Result<(), TableError> {
        while !self.draw_one_dealer_card()? {}
        Ok(())
    }

    fn all_player_hands_bust(&self) -> bool {
        match &self.player {
            PlayerSide::Single(hand) => hand.is_bust(),
            PlayerSide::Split(manager) => manager.all_hands_bust(),
        }
    }

    fn settle_against_dealer(&mut self) {
        let dealer_total = self.dealer_hand.value();
        let dealer_blackjack = self.dealer_hand.is_blackjack();
        let hands = match &mut self.player {
            PlayerSide::Single(hand) => {
                let outcome = HandOutcome::compare(
                    hand.value(),
                    hand.is_blackjack(),
                    dealer_total,
                    dealer_blackjack,
                );
                vec![HandSettlement::new(self.current_bet, outcome)]
            }
            PlayerSide::Split(manager) => {
                manager.complete_all_hands();
                manager
                    .hands()
                    .iter()
                    .map(|hand| {
                        let outcome = HandOutcome::compare(
                            hand.value(),
                            hand.is_blackjack(),
                            dealer_total,
                            dealer_blackjack,
                        );
                        HandSettlement::new(hand.bet(), outcome)
                    })
                    .collect()
            }
        };
        self.finish_round(hands);
    }

    fn finish_round(&mut self, hands: Vec<HandSettlement>) {
        self.reveal_hole_card();
        let settlement = Settlement {
            hands,
            insurance_bet: self.insurance_bet,
            insurance_result: self.insurance_result,
        };
        for hand in &settlement.hands {
            self.events.push(TableEvent::Stat(outcome_stat(hand.outcome)));
        }
        let outcomes: Vec<HandOutcome> = settlement.hands.iter().map(|hand| hand.outcome).collect();
        info!(
            dealer = self.dealer_hand.value(),
            ?outcomes,
            payout = settlement.total_credit(),
            "round settled"
        );
        self.result_message = Some(settlement.message());
        self.events.push(TableEvent::Settled(settlement.clone()));
        self.settlement = Some(settlement);
        self.set_phase(RoundPhase::GameOver);
    }

    /// Can be called at GameOver phase, once per round.
    /// Credits the main-bet payouts and the insurance payout to the ledger in
    /// one amount and returns the total credited. After a split, the amount
    /// owed to each hand is listed in `Settlement::hands` and
    /// `Settlement::hand_credits`, for ledgers that book one entry per hand.
    #[allowed_phase(GameOver)]
    pub fn resolve_bet(&mut self, ledger: &mut impl Ledger) -> Result<u32, TableError> {
        if self.resolved {
            return Err(TableError::AlreadyResolved);
        }
        let Some(settlement) = &self.settlement else {
            return Err(TableError::AlreadyResolved);
        };
        let credited = settlement.apply_to(ledger);
        self.resolved = true;
        info!(credited, balance = ledger.current_balance(), "bet resolved");
        Ok(credited)
    }

    /// Clears the round and returns to Betting from any phase. Stakes already
    /// debited are not returned.
    pub fn reset(&mut self) {
        if self.phase == RoundPhase::GameOver && !self.resolved {
            warn!("resetting a table whose settlement was never resolved");
        }
        self.dealer_hand.clear();
        self.player = PlayerSide::Single(Hand::new());
        self.current_bet = 0;
        self.original_bet = 0;
        self.insurance_bet = 0;
        self.insurance_result = InsuranceResult::NotOffered;
        self.settlement = None;
        self.result_message = None;
        self.resolved = false;
        self.hole_card_announced = false;
        self.set_phase(RoundPhase::Betting);
    }

    fn set_phase(&mut self, to: RoundPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        debug!(?from, ?to, "phase changed");
        self.phase = to;
        self.events.push(TableEvent::PhaseChanged { from, to });
    }

    fn draw_card(&mut self) -> Card {
        if self.shoe.is_empty() {
            self.events.push(TableEvent::Reshuffled);
        }
        self.shoe.draw()
    }

    /// Can be called at PlayerTurn phase.
    /// Checks every split precondition against `balance` without acting.
    #[allowed_phase(PlayerTurn)]
    pub fn validate_split(&self, balance: u32) -> Result<(), TableError> {
        if !self.rule.splitting_enabled() {
            return Err(TableError::CannotSplit("splitting is disabled"));
        }
        match &self.player {
            PlayerSide::Single(hand) => {
                if !hand.can_split() {
                    return Err(TableError::CannotSplit("cards do not form a pair"));
                }
            }
            PlayerSide::Split(manager) => {
                manager.validate_split(manager.active_hand_index(), &self.rule)?;
            }
        }
        let required = self.current_hand_bet();
        if balance < required {
            return Err(TableError::InsufficientFunds { required, balance });
        }
        Ok(())
    }

    /// Can be called at PlayerTurn phase.
    #[allowed_phase(PlayerTurn)]
    pub fn validate_double_down(&self, balance: u32) -> Result<(), TableError> {
        match &self.player {
            PlayerSide::Single(hand) => {
                if hand.len() != 2 {
                    return Err(TableError::CannotDouble(
                        "only a two-card hand can be doubled",
                    ));
                }
            }
            PlayerSide::Split(manager) => {
                let index = manager.active_hand_index();
                let hand = manager
                    .active_hand()
                    .ok_or(TableError::HandIndexOutOfRange {
                        index,
                        len: manager.total_hands(),
                    })?;
                if !self.rule.double_after_split {
                    return Err(TableError::CannotDouble(
                        "doubling after a split is not allowed",
                    ));
                }
                if hand.is_split_ace_hand() {
                    return Err(TableError::CannotDouble("split aces take exactly one card"));
                }
                if !hand.can_double_down() {
                    return Err(TableError::CannotDouble(
                        "only a two-card hand can be doubled",
                    ));
                }
            }
        }
        let required = self.current_hand_bet();
        if balance < required {
            return Err(TableError::InsufficientFunds { required, balance });
        }
        Ok(())
    }

    pub fn can_split(&self, balance: u32) -> bool {
        self.validate_split(balance).is_ok()
    }

    pub fn can_double_down(&self, balance: u32) -> bool {
        self.validate_double_down(balance).is_ok()
    }

    pub fn can_take_insurance(&self, balance: u32) -> bool {
        self.phase == RoundPhase::OfferingInsurance && balance >= self.insurance_stake()
    }

    /// Half the main bet.
    pub fn insurance_stake(&self) -> u32 {
        self.original_bet / 2
    }

    pub fn can_player_act(&self) -> bool {
        self.phase == RoundPhase::PlayerTurn
    }

    pub fn hand_count(&self) -> usize {
        match &self.player {
            PlayerSide::Single(_) => 1,
            PlayerSide::Split(manager) => manager.total_hands(),
        }
    }

    /// 1-based number of the hand being played.
    pub fn current_hand_number(&self) -> usize {
        match &self.player {
            PlayerSide::Single(_) => 1,
            PlayerSide::Split(manager) => manager.current_hand_number(),
        }
    }

    pub fn remaining_playing_hands(&self) -> usize {
        match &self.player {
            PlayerSide::Single(_) if self.phase == RoundPhase::PlayerTurn => 1,
            PlayerSide::Single(_) => 0,
            PlayerSide::Split(manager) => manager.playing_hands_remaining(),
        }
    }

    /// How many more splits the rule would allow this round.
    pub fn remaining_resplits(&self) -> usize {
        if self.is_split() && !self.rule.allow_resplit {
            return 0;
        }
        (self.rule.max_hands as usize).saturating_sub(self.hand_count())
    }

    /// Everything staked on the main hands this round, doubles and splits
    /// included.
    pub fn total_bet(&self) -> u32 {
        match &self.player {
            PlayerSide::Single(_) => self.current_bet,
            PlayerSide::Split(manager) => manager.total_bet(),
        }
    }

    pub fn current_hand_bet(&self) -> u32 {
        match &self.player {
            PlayerSide::Single(_) => self.current_bet,
            PlayerSide::Split(manager) => manager.active_hand().map_or(0, |hand| hand.bet()),
        }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn player_side(&self) -> &PlayerSide {
        &self.player
    }

    /// The unsplit player hand, if the round has not been split.
    pub fn player_hand(&self) -> Option<&Hand> {
        match &self.player {
            PlayerSide::Single(hand) => Some(hand),
            PlayerSide::Split(_) => None,
        }
    }

    pub fn split_manager(&self) -> Option<&SplitManager> {
        match &self.player {
            PlayerSide::Single(_) => None,
            PlayerSide::Split(manager) => Some(manager),
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self.player, PlayerSide::Split(_))
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn original_bet(&self) -> u32 {
        self.original_bet
    }

    pub fn insurance_bet(&self) -> u32 {
        self.insurance_bet
    }

    pub fn insurance_result(&self) -> InsuranceResult {
        self.insurance_result
    }

    pub fn result_message(&self) -> Option<&str> {
        self.result_message.as_deref()
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn hole_card_visible(&self) -> bool {
        matches!(self.phase, RoundPhase::DealerTurn | RoundPhase::GameOver)
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let hole_visible = self.hole_card_visible();
        let dealer_cards = self
            .dealer_hand
            .cards()
            .iter()
            .enumerate()
            .map(|(index, &card)| (index != 1 || hole_visible).then_some(card))
            .collect();
        let dealer_value = if hole_visible {
            self.dealer_hand.value()
        } else {
            self.dealer_hand.up_card_value()
        };

        let player_hands = match &self.player {
            PlayerSide::Single(hand) if hand.is_empty() => Vec::new(),
            PlayerSide::Single(hand) => {
                let status = if hand.is_bust() {
                    HandStatus::Busted
                } else if self.phase == RoundPhase::PlayerTurn {
                    HandStatus::Playing
                } else {
                    HandStatus::Standing
                };
                vec![HandSnapshot {
                    cards: hand.cards().to_vec(),
                    value: hand.value(),
                    is_soft: hand.is_soft(),
                    bet: self.current_bet,
                    status,
                    is_active: self.phase == RoundPhase::PlayerTurn,
                    is_doubled_down: self.current_bet > self.original_bet,
                    is_split_ace_hand: false,
                }]
            }
            PlayerSide::Split(manager) => manager
                .hands()
                .iter()
                .map(|hand| HandSnapshot {
                    cards: hand.cards().to_vec(),
                    value: hand.value(),
                    is_soft: hand.is_soft(),
                    bet: hand.bet(),
                    status: hand.status(),
                    is_active: hand.is_active(),
                    is_doubled_down: hand.is_doubled_down(),
                    is_split_ace_hand: hand.is_split_ace_hand(),
                })
                .collect(),
        };
        let active_hand_index = match &self.player {
            PlayerSide::Single(_) => 0,
            PlayerSide::Split(manager) => manager.active_hand_index(),
        };

        TableSnapshot {
            phase: self.phase,
            dealer_cards,
            dealer_value,
            player_hands,
            active_hand_index,
            current_bet: self.current_bet,
            original_bet: self.original_bet,
            total_bet: self.total_bet(),
            insurance_bet: self.insurance_bet,
            insurance_result: self.insurance_result,
            is_split: self.is_split(),
            cards_remaining: self.shoe.remaining(),
            result_message: self.result_message.clone(),
            payout: self.settlement.as_ref().map(Settlement::total_credit),
            settlement: self.settlement.clone(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drains the event queue into `handler`, in order.
    pub fn dispatch_events<H: TableEventHandler>(&mut self, handler: &mut H) {
        for event in self.drain_events() {
            match event {
                TableEvent::PhaseChanged { from, to } => handler.on_phase_changed(from, to),
                TableEvent::CardDealt { seat, card } => handler.on_card_dealt(seat, card),
                TableEvent::HoleCardRevealed(card) => handler.on_hole_card_revealed(card),
                TableEvent::CardBurned(card) => handler.on_card_burned(card),
                TableEvent::Reshuffled => handler.on_reshuffle(),
                TableEvent::InsuranceResolved { stake, result } => {
                    handler.on_insurance_resolved(stake, result)
                }
                TableEvent::HandSplit { hands } => handler.on_split(hands),
                TableEvent::HandAdvanced { index } => handler.on_hand_advanced(index),
                TableEvent::Stat(stat) => handler.on_stat(stat),
                TableEvent::Settled(settlement) => handler.on_settled(&settlement),
            }
        }
    }
}
