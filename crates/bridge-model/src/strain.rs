use crate::error::{BridgeError, Result};
use crate::suit::Suit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A bid's denomination. The derived order is the bidding order, so
/// `NoTrump > Spades > Hearts > Diamonds > Clubs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strain {
    Clubs = 0,
    Diamonds = 1,
    Hearts = 2,
    Spades = 3,
    NoTrump = 4,
}

/// Letters in bidding order, indexed by `Strain::idx`.
const LETTERS: [char; 5] = ['C', 'D', 'H', 'S', 'N'];

impl Strain {
    pub const ALL: [Strain; 5] = [
        Strain::Clubs,
        Strain::Diamonds,
        Strain::Hearts,
        Strain::Spades,
        Strain::NoTrump,
    ];

    /// Position in bidding order, used to index per-strain tables.
    pub fn idx(self) -> usize {
        self as usize
    }

    pub fn to_char(self) -> char {
        LETTERS[self.idx()]
    }

    /// Lowercase form used by the auction and contract strings.
    pub fn code(self) -> char {
        self.to_char().to_ascii_lowercase()
    }

    pub fn from_char(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        LETTERS
            .iter()
            .position(|&letter| letter == upper)
            .map(|i| Strain::ALL[i])
    }

    /// The trump suit this strain names, none at no-trump.
    pub fn to_suit(self) -> Option<Suit> {
        match self {
            Strain::Clubs => Some(Suit::Clubs),
            Strain::Diamonds => Some(Suit::Diamonds),
            Strain::Hearts => Some(Suit::Hearts),
            Strain::Spades => Some(Suit::Spades),
            Strain::NoTrump => None,
        }
    }

    pub fn is_trump(self, suit: Suit) -> bool {
        self.to_suit() == Some(suit)
    }
}

impl FromStr for Strain {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Strain::from_char(c).ok_or_else(|| BridgeError::InvalidStrain(s.to_string()))
            }
            _ => Err(BridgeError::InvalidStrain(s.to_string())),
        }
    }
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strain_parsing() {
        assert_eq!(Strain::from_char('S'), Some(Strain::Spades));
        assert_eq!(Strain::from_char('N'), Some(Strain::NoTrump));
        assert_eq!(Strain::from_char('x'), None);
        assert_eq!("h".parse::<Strain>(), Ok(Strain::Hearts));
        assert_eq!(
            "p".parse::<Strain>(),
            Err(BridgeError::InvalidStrain("p".to_string()))
        );
    }

    #[test]
    fn test_strain_order() {
        assert!(Strain::NoTrump > Strain::Spades);
        assert!(Strain::Spades > Strain::Hearts);
        assert!(Strain::Hearts > Strain::Diamonds);
        assert!(Strain::Diamonds > Strain::Clubs);
    }

    #[test]
    fn test_trump() {
        assert!(Strain::Spades.is_trump(Suit::Spades));
        assert!(!Strain::Spades.is_trump(Suit::Hearts));
        assert!(!Strain::NoTrump.is_trump(Suit::Clubs));
        assert_eq!(Strain::NoTrump.code(), 'n');
        assert_eq!(Strain::Diamonds.to_suit(), Some(Suit::Diamonds));
        assert_eq!(Strain::NoTrump.to_suit(), None);
    }
}
