use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use super::card::{Card, Rank, Suit};
use crate::TableError;

pub const DECK_SIZE: usize = 52;

/// Represents the single deck in play. Every one of the 52 cards is present
/// exactly once; dealt cards sit before `current_index`.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    current_index: usize,
    rng: StdRng,
}

impl Shoe {
    /// Creates a new shoe with ordered cards. Call `reset` before dealing.
    pub fn new(rng: StdRng) -> Shoe {
        Shoe {
            cards: ordered_deck(),
            current_index: 0,
            rng,
        }
    }

    pub fn from_entropy() -> Shoe {
        Shoe::new(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Shoe {
        Shoe::new(StdRng::seed_from_u64(seed))
    }

    /// Returns all dealt cards to the shoe and shuffles.
    pub fn reset(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.current_index = 0;
        debug!("shoe reshuffled");
    }

    /// Returns all dealt cards to the shoe and shuffles, making sure the given
    /// cards are dealt first and in order. Fails without touching the shoe if
    /// a card is repeated.
    pub fn reset_with_firsts(&mut self, firsts: &[Card]) -> Result<(), TableError> {
        let mut used = [false; DECK_SIZE];
        for card in firsts {
            let index: u8 = (*card).into();
            if used[index as usize] {
                return Err(TableError::DuplicateCard(*card));
            }
            used[index as usize] = true;
        }

        let mut cards = Vec::with_capacity(DECK_SIZE);
        cards.extend_from_slice(firsts);
        cards.extend(
            ordered_deck()
                .into_iter()
                .filter(|card| !used[u8::from(*card) as usize]),
        );
        cards[firsts.len()..].shuffle(&mut self.rng);

        self.cards = cards;
        self.current_index = 0;
        debug!(stacked = firsts.len(), "shoe reshuffled with stacked cards");
        Ok(())
    }

    /// Deals the top card. An exhausted shoe is reshuffled in full first, so
    /// this always yields a card.
    pub fn draw(&mut self) -> Card {
        if self.is_empty() {
            warn!("shoe exhausted mid-round, reshuffling a full deck");
            self.reset();
        }
        let card = self.cards[self.current_index];
        self.current_index += 1;
        card
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The next `number` cards, without dealing them.
    pub fn preview(&self, number: usize) -> &[Card] {
        let end = (self.current_index + number).min(self.cards.len());
        &self.cards[self.current_index..end]
    }
}

fn ordered_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(DECK_SIZE);
    for suit in Suit::iter() {
        for rank in Rank::iter() {
            cards.push(Card::new(rank, suit));
        }
    }
    cards
}
