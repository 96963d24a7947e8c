use crate::board::Direction;
use crate::card::Card;
use crate::io::hand_string::format_hand;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How evenly a hand's cards are spread over the suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// 4-3-3-3, 4-4-3-2 or 5-3-3-2.
    Balanced,
    /// No void and no suit longer than six, with one singleton or two
    /// doubletons: 5-4-3-1, 5-4-2-2, 6-3-2-2.
    SemiBalanced,
    Unbalanced,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Balanced => "balanced",
            Shape::SemiBalanced => "semi-balanced",
            Shape::Unbalanced => "unbalanced",
        };
        write!(f, "{}", name)
    }
}

/// The cards one seat currently holds, read out of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub direction: Direction,
    pub name: String,
    pub cards: Vec<Card>,
}

impl Hand {
    pub fn new(direction: Direction, name: impl Into<String>, cards: Vec<Card>) -> Self {
        let mut hand = Self {
            direction,
            name: name.into(),
            cards,
        };
        hand.sort();
        hand
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn has_card(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn hcp(&self) -> u8 {
        self.cards.iter().map(|c| c.rank.hcp()).sum()
    }

    pub fn length(&self, suit: Suit) -> u8 {
        self.cards.iter().filter(|c| c.suit == suit).count() as u8
    }

    /// Suit lengths, spades first.
    pub fn distribution(&self) -> [u8; 4] {
        Suit::DISPLAY_ORDER.map(|suit| self.length(suit))
    }

    /// Spades down to clubs, high cards first within a suit.
    pub fn sort(&mut self) {
        self.cards
            .sort_by(|a, b| b.suit.cmp(&a.suit).then(b.rank.cmp(&a.rank)));
    }

    pub fn shape(&self) -> Shape {
        let mut lengths = self.distribution();
        lengths.sort_unstable();
        match lengths {
            [shortest, next, _, _] if shortest >= 2 && next >= 3 => Shape::Balanced,
            [1, next, _, longest] if next >= 2 && longest <= 6 => Shape::SemiBalanced,
            [2, 2, third, longest] if third >= 3 && longest <= 6 => Shape::SemiBalanced,
            _ => Shape::Unbalanced,
        }
    }
}

/// The hand string, e.g. `sakqh32dt98c765432`.
impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_hand(&self.cards))
    }
}
