use serde::{Deserialize, Serialize};

use super::card::Card;

/// Sum with every ace counted as 1, and the number of aces.
fn low_total(cards: &[Card]) -> (u16, u16) {
    cards.iter().fold((0, 0), |(sum, aces), card| {
        if card.is_ace() {
            (sum + 1, aces + 1)
        } else {
            (sum + card.value() as u16, aces)
        }
    })
}

/// Best total of the cards. Aces count 1, and one of them is promoted to 11
/// whenever that keeps the total at or below 21.
pub fn hand_value(cards: &[Card]) -> u8 {
    let (low, aces) = low_total(cards);
    let total = if aces > 0 && low + 10 <= 21 {
        low + 10
    } else {
        low
    };
    total.min(u8::MAX as u16) as u8
}

/// True when an ace is currently counted as 11.
pub fn is_soft_total(cards: &[Card]) -> bool {
    let (low, aces) = low_total(cards);
    aces > 0 && low + 10 <= 21
}

/// An ordered run of cards held by the dealer or by the unsplit player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(4),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Hand {
        Hand { cards }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn value(&self) -> u8 {
        hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_total(&self.cards)
    }

    /// A natural: exactly two cards worth 21.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.value() == 21
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].pairs_with(&self.cards[1])
    }

    /// Value of the first card alone, ace counted as 11. This is what the
    /// player sees of the dealer while the hole card is face down.
    pub fn up_card_value(&self) -> u8 {
        self.cards.first().map_or(0, |card| card.value())
    }
}
