use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// One of the four suits of a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Suit {
    /// Spades (♠)
    Spades,
    /// Hearts (♥)
    Hearts,
    /// Diamonds (♦)
    Diamonds,
    /// Clubs (♣)
    Clubs,
}

impl Suit {
    pub fn glyph(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Face value of a card from Two through Ace.
/// The discriminant is the numeric rank used by the evaluator (2..=14).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
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
    Ace,
}

impl Rank {
    /// Values outside 2..=14 saturate to Two or Ace.
    pub fn from_u8(v: u8) -> Rank {
        match v {
            0..=2 => Rank::Two,
            3 => Rank::Three,
            4 => Rank::Four,
            5 => Rank::Five,
            6 => Rank::Six,
            7 => Rank::Seven,
            8 => Rank::Eight,
            9 => Rank::Nine,
            10 => Rank::Ten,
            11 => Rank::Jack,
            12 => Rank::Queen,
            13 => Rank::King,
            _ => Rank::Ace,
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Single-character label used in combo names (`A`, `K`, `T`, `9` ...).
    pub fn to_char(self) -> char {
        rank_char(self.value())
    }
}

pub fn rank_char(v: u8) -> char {
    match v {
        14 => 'A',
        13 => 'K',
        12 => 'Q',
        11 => 'J',
        10 => 'T',
        1 => 'A',
        n => char::from(b'0' + n),
    }
}

/// A single playing card. Immutable value type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rank {
            Rank::Ten => write!(f, "10{}", self.suit.glyph()),
            r => write!(f, "{}{}", r.to_char(), self.suit.glyph()),
        }
    }
}

/// Parses short notation such as `As`, `Td`, `10h` or `7c`.
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || GameError::InvalidCard(s.to_string());
        let mut chars = s.chars();
        let suit_ch = chars.next_back().ok_or_else(bad)?;
        let rank_str: String = chars.collect();
        let rank = match rank_str.to_ascii_uppercase().as_str() {
            "A" => Rank::Ace,
            "K" => Rank::King,
            "Q" => Rank::Queen,
            "J" => Rank::Jack,
            "T" | "10" => Rank::Ten,
            d if d.len() == 1 => match d.as_bytes()[0] {
                b @ b'2'..=b'9' => Rank::from_u8(b - b'0'),
                _ => return Err(bad()),
            },
            _ => return Err(bad()),
        };
        let suit = match suit_ch {
            's' | 'S' | '♠' => Suit::Spades,
            'h' | 'H' | '♥' => Suit::Hearts,
            'd' | 'D' | '♦' => Suit::Diamonds,
            'c' | 'C' | '♣' => Suit::Clubs,
            _ => return Err(bad()),
        };
        Ok(Card { rank, suit })
    }
}

pub fn all_suits() -> [Suit; 4] {
    [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs]
}

pub fn all_ranks() -> [Rank; 13] {
    [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ]
}

pub fn full_deck() -> Vec<Card> {
    let mut v = Vec::with_capacity(52);
    for &r in &all_ranks() {
        for &s in &all_suits() {
            v.push(Card { rank: r, suit: s });
        }
    }
    v
}

/// Space-separated card list, as printed on board and showdown lines.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
