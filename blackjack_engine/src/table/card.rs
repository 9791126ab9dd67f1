use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::TableError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Suit {
    Hearts = 0,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }

    fn from_char(c: char) -> Option<Suit> {
        match c {
            'H' | 'h' | '♥' => Some(Suit::Hearts),
            'D' | 'd' | '♦' => Some(Suit::Diamonds),
            'C' | 'c' | '♣' => Some(Suit::Clubs),
            'S' | 's' | '♠' => Some(Suit::Spades),
            _ => None,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// Blackjack value with the ace counted high.
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other as u8,
        }
    }

    pub fn is_ten_valued(self) -> bool {
        self.value() == 10
    }

    /// Returns the rank with the given face value, 1 (ace) through 13 (king).
    pub fn from_face_value(face_value: u8) -> Option<Rank> {
        if face_value == 0 {
            return None;
        }
        Rank::iter().nth((face_value - 1) as usize)
    }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Rank> {
        let rank = match symbol.to_ascii_uppercase().as_str() {
            "A" | "1" => Rank::Ace,
            "T" | "10" => Rank::Ten,
            "J" => Rank::Jack,
            "Q" => Rank::Queen,
            "K" => Rank::King,
            other => {
                let face_value: u8 = other.parse().ok()?;
                if !(2..=9).contains(&face_value) {
                    return None;
                }
                return Rank::from_face_value(face_value);
            }
        };
        Some(rank)
    }
}

/// A playing card. Suit only matters for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }

    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }

    pub fn is_ten_valued(&self) -> bool {
        self.rank.is_ten_valued()
    }

    /// Two cards form a splittable pair when they share a rank or are both
    /// worth ten.
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.rank == other.rank || (self.is_ten_valued() && other.is_ten_valued())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.suit as u8 * 13 + card.rank as u8 - 1
    }
}

impl TryFrom<u8> for Card {
    type Error = TableError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value >= 52 {
            return Err(TableError::InvalidCardIndex(value));
        }
        let suit = Suit::iter()
            .nth((value / 13) as usize)
            .ok_or(TableError::InvalidCardIndex(value))?;
        let rank = Rank::from_face_value(value % 13 + 1).ok_or(TableError::InvalidCardIndex(value))?;
        Ok(Card { rank, suit })
    }
}

/// Parses `"AS"`, `"10h"`, `"TD"`, `"K♣"` and the like: a rank followed by a
/// suit letter or symbol.
impl FromStr for Card {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || TableError::InvalidCard(s.to_string());
        let suit_char = trimmed.chars().last().ok_or_else(invalid)?;
        let suit = Suit::from_char(suit_char).ok_or_else(invalid)?;
        let rank_part = &trimmed[..trimmed.len() - suit_char.len_utf8()];
        let rank = Rank::from_symbol(rank_part).ok_or_else(invalid)?;
        Ok(Card { rank, suit })
    }
}
