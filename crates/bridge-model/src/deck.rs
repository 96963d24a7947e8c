use crate::board::Direction;
use crate::card::Card;
use crate::error::{BridgeError, Result};
use crate::suit::Suit;
use serde::{Deserialize, Serialize};

/// A card together with the hand it was dealt to and whether it has
/// been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealtCard {
    pub card: Card,
    direction: Option<Direction>,
    played: bool,
}

impl DealtCard {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            direction: None,
            played: false,
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_assigned(&self) -> bool {
        self.direction.is_some()
    }

    pub fn is_played(&self) -> bool {
        self.played
    }

    pub fn assign(&mut self, direction: Direction) -> Result<()> {
        if let Some(owner) = self.direction {
            return Err(BridgeError::CardAlreadyAssigned {
                card: self.card,
                direction: owner,
            });
        }
        self.direction = Some(direction);
        Ok(())
    }

    /// Unplayed cards only; a played card stays with its hand.
    pub fn un_assign(&mut self, direction: Direction) -> Result<()> {
        if self.direction != Some(direction) {
            return Err(BridgeError::CardNotAssigned {
                card: self.card,
                direction,
            });
        }
        if self.played {
            return Err(BridgeError::CardAlreadyPlayed { card: self.card });
        }
        self.direction = None;
        Ok(())
    }

    /// Whether `direction` may play this card. Whether it was already
    /// played is left to the play, which may be replacing its own tail.
    pub fn check_owner(&self, direction: Direction) -> Result<()> {
        if self.direction != Some(direction) {
            return Err(BridgeError::CardNotOwned {
                card: self.card,
                direction,
            });
        }
        Ok(())
    }

    fn set_played(&mut self, played: bool) {
        self.played = played;
    }
}

/// Where the play engine records which cards have left the hands.
///
/// `Deck` enforces that a card belongs to the hand on play; `OpenDeck`
/// is used when there is no deal and only rejects a card played twice.
pub trait PlayLedger {
    fn check_owner(&self, card: Card, direction: Direction) -> Result<()>;
    fn is_played(&self, card: Card) -> bool;
    fn mark_played(&mut self, card: Card);
    fn mark_unplayed(&mut self, card: Card);
}

/// The 52-card ownership table shared by the hands and the play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<DealtCard>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    pub fn new() -> Self {
        Self {
            cards: Card::all().map(DealtCard::new).collect(),
        }
    }

    pub fn get(&self, card: Card) -> &DealtCard {
        &self.cards[card.idx()]
    }

    pub fn direction_of(&self, card: Card) -> Option<Direction> {
        self.get(card).direction()
    }

    pub fn has_card(&self, direction: Direction, card: Card) -> bool {
        self.direction_of(card) == Some(direction)
    }

    /// Fails if the hand is full or the card already belongs to someone.
    pub fn check_assign(&self, card: Card, direction: Direction) -> Result<()> {
        if let Some(owner) = self.direction_of(card) {
            return Err(BridgeError::CardAlreadyAssigned {
                card,
                direction: owner,
            });
        }
        if self.count(direction) >= 13 {
            return Err(BridgeError::HandFull(direction));
        }
        Ok(())
    }

    pub fn assign(&mut self, card: Card, direction: Direction) -> Result<()> {
        self.check_assign(card, direction)?;
        self.cards[card.idx()].assign(direction)
    }

    pub fn un_assign(&mut self, card: Card, direction: Direction) -> Result<()> {
        self.cards[card.idx()].un_assign(direction)
    }

    pub fn cards_of(&self, direction: Direction) -> impl Iterator<Item = Card> + '_ {
        self.cards
            .iter()
            .filter(move |dc| dc.direction == Some(direction))
            .map(|dc| dc.card)
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.cards_of(direction).count()
    }

    pub fn count_in(&self, direction: Direction, suit: Suit) -> usize {
        self.cards_of(direction).filter(|c| c.suit == suit).count()
    }

    pub fn unassigned(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|dc| !dc.is_assigned())
            .map(|dc| dc.card)
            .collect()
    }
}

impl PlayLedger for Deck {
    fn check_owner(&self, card: Card, direction: Direction) -> Result<()> {
        self.get(card).check_owner(direction)
    }

    fn is_played(&self, card: Card) -> bool {
        self.get(card).is_played()
    }

    fn mark_played(&mut self, card: Card) {
        self.cards[card.idx()].set_played(true);
    }

    fn mark_unplayed(&mut self, card: Card) {
        self.cards[card.idx()].set_played(false);
    }
}

/// Play ledger with no hands behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDeck {
    played: [bool; 52],
}

impl Default for OpenDeck {
    fn default() -> Self {
        Self {
            played: [false; 52],
        }
    }
}

impl PlayLedger for OpenDeck {
    fn check_owner(&self, _card: Card, _direction: Direction) -> Result<()> {
        Ok(())
    }

    fn is_played(&self, card: Card) -> bool {
        self.played[card.idx()]
    }

    fn mark_played(&mut self, card: Card) {
        self.played[card.idx()] = true;
    }

    fn mark_unplayed(&mut self, card: Card) {
        self.played[card.idx()] = false;
    }
}
