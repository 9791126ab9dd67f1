use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

use crate::{
    table::{dealer_should_hit, hand::hand_value, hand::is_soft_total},
    Card, Decision, Hand, RoundPhase, Table,
};

/// What a strategy sees when asked for a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionContext {
    pub cards: Vec<Card>,
    pub dealer_up_card: Card,
    pub can_double: bool,
    pub can_split: bool,
}

impl DecisionContext {
    /// Context for the active hand, or `None` when the player cannot act.
    pub fn from_table(table: &Table, balance: u32) -> Option<DecisionContext> {
        if table.phase() != RoundPhase::PlayerTurn {
            return None;
        }
        let cards = match table.player_hand() {
            Some(hand) => hand.cards().to_vec(),
            None => table.split_manager()?.active_hand()?.cards().to_vec(),
        };
        Some(DecisionContext {
            cards,
            dealer_up_card: *table.dealer_hand().cards().first()?,
            can_double: table.can_double_down(balance),
            can_split: table.can_split(balance),
        })
    }
}

pub trait Strategy {
    fn should_take_insurance(&mut self, _player_hand: &Hand) -> bool {
        false
    }

    fn decide(&mut self, context: &DecisionContext) -> Decision;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum StrategyKind {
    Basic,
    DealerMimic,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Basic => Box::new(BasicStrategy::new()),
            StrategyKind::DealerMimic => Box::new(DealerMimic),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum InsurancePolicy {
    Always,
    Never,
    /// Whatever the strategy says.
    FollowStrategy,
}

type Cell = (Decision, Decision);

/// Chart strategy for a single deck, dealer hitting soft 17, no surrender.
///
/// Each cell holds the preferred decision and the one to fall back to when
/// doubling is not possible. Columns run from dealer ace, then 2 through 10.
pub struct BasicStrategy {
    hard_charts: [[Cell; 10]; 14],
    soft_charts: [[Cell; 10]; 9],
    pair_charts: [[Cell; 10]; 10],
}

impl Default for BasicStrategy {
    fn default() -> Self {
        BasicStrategy::new()
    }
}

impl BasicStrategy {
    pub fn new() -> BasicStrategy {
        const H: Cell = (Decision::Hit, Decision::Hit);
        const S: Cell = (Decision::Stand, Decision::Stand);
        const P: Cell = (Decision::Split, Decision::Split);
        const DH: Cell = (Decision::Double, Decision::Hit);
        const DS: Cell = (Decision::Double, Decision::Stand);

        BasicStrategy {
            hard_charts: [
                [H, H, H, H, H, H, H, H, H, H], // 5
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, H, H, H, H, H, H, H, H],
                [H, H, DH, DH, DH, DH, H, H, H, H],
                [H, DH, DH, DH, DH, DH, DH, DH, DH, H],
                [DH, DH, DH, DH, DH, DH, DH, DH, DH, DH],
                [H, H, H, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [H, S, S, S, S, S, H, H, H, H],
                [S, S, S, S, S, S, S, S, S, S], // 17
                [S, S, S, S, S, S, S, S, S, S], // 18, 18+
            ],
            soft_charts: [
                [H, H, H, H, DH, DH, H, H, H, H], // soft 13
                [H, H, H, H, DH, DH, H, H, H, H],
                [H, H, H, DH, DH, DH, H, H, H, H],
                [H, H, H, DH, DH, DH, H, H, H, H],
                [H, H, DH, DH, DH, DH, H, H, H, H],
                [H, DS, DS, DS, DS, DS, S, S, H, H],
                [S, S, S, S, S, DS, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S],
                [S, S, S, S, S, S, S, S, S, S], // soft 21
            ],
            pair_charts: [
                [P, P, P, P, P, P, P, P, P, P], // Double Ace
                [H, P, P, P, P, P, P, H, H, H], // Double 2
                [H, P, P, P, P, P, P, H, H, H],
                [H, H, H, H, P, P, H, H, H, H],
                [H, DH, DH, DH, DH, DH, DH, DH, DH, H],
                [H, P, P, P, P, P, H, H, H, H],
                [H, P, P, P, P, P, P, H, H, H],
                [P, P, P, P, P, P, P, P, P, P],
                [S, P, P, P, P, P, S, P, P, S],
                [S, S, S, S, S, S, S, S, S, S], // Double 10
            ],
        }
    }

    fn column(dealer_up_card: Card) -> usize {
        if dealer_up_card.is_ace() {
            0
        } else {
            (dealer_up_card.value() - 1) as usize
        }
    }

    fn total_cell(&self, cards: &[Card], col: usize) -> Cell {
        let total = hand_value(cards);
        if is_soft_total(cards) {
            let row = (total.max(13) - 13) as usize;
            self.soft_charts[row][col]
        } else {
            let row = (total.clamp(5, 18) - 5) as usize;
            self.hard_charts[row][col]
        }
    }
}

impl Strategy for BasicStrategy {
    fn decide(&mut self, context: &DecisionContext) -> Decision {
        let cards = context.cards.as_slice();
        let col = Self::column(context.dealer_up_card);

        let is_pair = cards.len() == 2 && cards[0].pairs_with(&cards[1]);
        let mut cell = if is_pair {
            let row = Self::column(cards[0]);
            self.pair_charts[row][col]
        } else {
            self.total_cell(cards, col)
        };
        if cell.0 == Decision::Split && !context.can_split {
            cell = self.total_cell(cards, col);
        }

        match cell.0 {
            Decision::Double if !context.can_double => cell.1,
            decision => decision,
        }
    }
}

/// Plays the player hand the way the dealer plays: hit below 17 and on soft
/// 17. Never doubles, splits or insures.
pub struct DealerMimic;

impl Strategy for DealerMimic {
    fn decide(&mut self, context: &DecisionContext) -> Decision {
        if dealer_should_hit(&Hand::from_cards(context.cards.clone())) {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(cards: &[&str], up: &str) -> DecisionContext {
        DecisionContext {
            cards: cards.iter().map(|s| s.parse().unwrap()).collect(),
            dealer_up_card: up.parse().unwrap(),
            can_double: true,
            can_split: true,
        }
    }

    #[test]
    fn hard_totals() {
        let mut strategy = BasicStrategy::new();
        assert_eq!(strategy.decide(&context(&["10S", "6H"], "10C")), Decision::Hit);
        assert_eq!(strategy.decide(&context(&["10S", "6H"], "6C")), Decision::Stand);
        assert_eq!(strategy.decide(&context(&["6S", "5H"], "AC")), Decision::Double);
        assert_eq!(strategy.decide(&context(&["10S", "8H"], "AC")), Decision::Stand);
    }

    #[test]
    fn double_falls_back_when_not_allowed() {
        let mut strategy = BasicStrategy::new();
        let mut ctx = context(&["AS", "7H"], "4C");
        assert_eq!(strategy.decide(&ctx), Decision::Double);
        ctx.can_double = false;
        assert_eq!(strategy.decide(&ctx), Decision::Stand);

        let mut ctx = context(&["6S", "5H"], "5C");
        ctx.can_double = false;
        assert_eq!(strategy.decide(&ctx), Decision::Hit);
    }

    #[test]
    fn pairs() {
        let mut strategy = BasicStrategy::new();
        assert_eq!(strategy.decide(&context(&["8S", "8H"], "10C")), Decision::Split);
        assert_eq!(strategy.decide(&context(&["AS", "AH"], "6C")), Decision::Split);
        assert_eq!(strategy.decide(&context(&["KS", "10H"], "6C")), Decision::Stand);
        assert_eq!(strategy.decide(&context(&["5S", "5H"], "6C")), Decision::Double);
    }

    #[test]
    fn split_falls_back_to_totals() {
        let mut strategy = BasicStrategy::new();
        let mut ctx = context(&["8S", "8H"], "10C");
        ctx.can_split = false;
        assert_eq!(strategy.decide(&ctx), Decision::Hit);

        let mut ctx = context(&["AS", "AH"], "6C");
        ctx.can_split = false;
        assert_eq!(strategy.decide(&ctx), Decision::Double);
    }

    #[test]
    fn multi_card_soft_hand() {
        let mut strategy = BasicStrategy::new();
        assert_eq!(strategy.decide(&context(&["AS", "2H", "5C"], "9D")), Decision::Hit);
        assert_eq!(strategy.decide(&context(&["AS", "2H", "6C"], "9D")), Decision::Stand);
    }

    #[test]
    fn dealer_mimic_hits_soft_seventeen() {
        let mut strategy = DealerMimic;
        assert_eq!(strategy.decide(&context(&["AS", "6H"], "9D")), Decision::Hit);
        assert_eq!(strategy.decide(&context(&["10S", "7H"], "9D")), Decision::Stand);
        assert!(!strategy.should_take_insurance(&Hand::new()));
    }

    #[test]
    fn parses_kinds_from_config_strings() {
        assert_eq!("Basic".parse::<StrategyKind>().unwrap(), StrategyKind::Basic);
        assert_eq!("Never".parse::<InsurancePolicy>().unwrap(), InsurancePolicy::Never);
        assert!("Sometimes".parse::<InsurancePolicy>().is_err());
    }
}
