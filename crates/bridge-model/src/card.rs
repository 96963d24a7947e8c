use crate::error::{BridgeError, Result};
use crate::rank::Rank;
use crate::strain::Strain;
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the 52 cards. Ownership and played status live in the deck,
/// so a `Card` is a plain value that can be copied around freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Position of the card in a suit-major table of 52 entries.
    pub fn idx(self) -> usize {
        self.suit.idx() * 13 + self.rank.idx()
    }

    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(suit, rank)))
    }

    pub fn from_chars(suit: char, rank: char) -> Result<Self> {
        match (Suit::from_char(suit), Rank::from_char(rank)) {
            (Some(suit), Some(rank)) => Ok(Card::new(suit, rank)),
            _ => Err(BridgeError::MalformedCard(format!("{}{}", suit, rank))),
        }
    }

    /// Two-character lowercase form, e.g. `sa` or `ct`.
    pub fn code(self) -> String {
        format!("{}{}", self.suit.code(), self.rank.code())
    }

    /// Whether this card takes the trick away from `winner`.
    ///
    /// A trump winner can only be beaten by a higher trump. Any other winner
    /// is beaten by a trump or by a higher card of its own suit.
    pub fn beats(self, winner: Card, trump: Strain) -> bool {
        if trump.is_trump(winner.suit) {
            self.suit == winner.suit && self.rank > winner.rank
        } else {
            trump.is_trump(self.suit) || (self.suit == winner.suit && self.rank > winner.rank)
        }
    }
}

impl FromStr for Card {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(suit), Some(rank), None) => {
                Card::from_chars(suit, rank).map_err(|_| BridgeError::MalformedCard(s.to_string()))
            }
            _ => Err(BridgeError::MalformedCard(s.to_string())),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}
