use serde::{Deserialize, Serialize};

use crate::Ledger;

/// Result of one player hand against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Blackjack,
    Win,
    Push,
    Loss,
    Bust,
}

impl HandOutcome {
    /// Total amount returned to the player for `bet`, stake included.
    /// Saturates at `u32::MAX`.
    pub fn payout(self, bet: u32) -> u32 {
        match self {
            HandOutcome::Blackjack => {
                u32::try_from(u64::from(bet) * 5 / 2).unwrap_or(u32::MAX)
            }
            HandOutcome::Win => bet.saturating_mul(2),
            HandOutcome::Push => bet,
            HandOutcome::Loss | HandOutcome::Bust => 0,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HandOutcome::Blackjack => "Blackjack!",
            HandOutcome::Win => "You win!",
            HandOutcome::Push => "Push!",
            HandOutcome::Loss => "You lose.",
            HandOutcome::Bust => "Bust! You lose!",
        }
    }

    /// Ranks a finished player hand against the finished dealer hand.
    pub(crate) fn compare(
        player_total: u8,
        player_blackjack: bool,
        dealer_total: u8,
        dealer_blackjack: bool,
    ) -> HandOutcome {
        if player_total > 21 {
            return HandOutcome::Bust;
        }
        match (player_blackjack, dealer_blackjack) {
            (true, true) => return HandOutcome::Push,
            (true, false) => return HandOutcome::Blackjack,
            (false, true) => return HandOutcome::Loss,
            (false, false) => {}
        }
        if dealer_total > 21 || player_total > dealer_total {
            HandOutcome::Win
        } else if player_total == dealer_total {
            HandOutcome::Push
        } else {
            HandOutcome::Loss
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsuranceResult {
    NotOffered,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSettlement {
    pub bet: u32,
    pub outcome: HandOutcome,
    pub payout: u32,
}

impl HandSettlement {
    pub fn new(bet: u32, outcome: HandOutcome) -> HandSettlement {
        HandSettlement {
            bet,
            outcome,
            payout: outcome.payout(bet),
        }
    }
}

/// Everything owed to the player for a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub hands: Vec<HandSettlement>,
    pub insurance_bet: u32,
    pub insurance_result: InsuranceResult,
}

impl Settlement {
    /// Insurance pays 2:1, so a winning stake comes back three times over.
    pub fn insurance_payout(&self) -> u32 {
        match self.insurance_result {
            InsuranceResult::Won => self.insurance_bet.saturating_mul(3),
            _ => 0,
        }
    }

    pub fn main_payout(&self) -> u32 {
        self.hands
            .iter()
            .fold(0, |total: u32, hand| total.saturating_add(hand.payout))
    }

    pub fn total_credit(&self) -> u32 {
        self.main_payout().saturating_add(self.insurance_payout())
    }

    /// The main-bet payout owed to each hand, in hand order. Together with
    /// `insurance_payout` this adds up to `total_credit`.
    pub fn hand_credits(&self) -> impl Iterator<Item = u32> + '_ {
        self.hands.iter().map(|hand| hand.payout)
    }

    pub fn total_bet(&self) -> u32 {
        self.hands
            .iter()
            .fold(0, |total: u32, hand| total.saturating_add(hand.bet))
    }

    /// Credits the ledger and returns the amount credited.
    pub fn apply_to(&self, ledger: &mut impl Ledger) -> u32 {
        let credit = self.total_credit();
        if credit > 0 {
            ledger.credit(credit);
        }
        credit
    }

    pub fn message(&self) -> String {
        match self.hands.as_slice() {
            [single] => single.outcome.message().to_owned(),
            hands => hands
                .iter()
                .enumerate()
                .map(|(index, hand)| format!("Hand {}: {}", index + 1, hand.outcome.message()))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
