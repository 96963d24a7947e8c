use thiserror::Error;

use crate::board::Direction;
use crate::card::Card;

/// Failures reported by the auction and play engine.
///
/// Every mutating operation validates before it writes, so an `Err` always
/// leaves the object it was called on exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("{0:?} is not a valid call")]
    MalformedCall(String),

    #[error("{0:?} is not a valid card")]
    MalformedCard(String),

    #[error("{call} is not allowed at this point in the auction: {reason}")]
    IllegalCall { call: String, reason: &'static str },

    #[error("{0:?} is not a valid direction")]
    InvalidDirection(String),

    #[error("{0:?} is not a valid strain")]
    InvalidStrain(String),

    #[error("{0:?} is not a valid level")]
    InvalidLevel(String),

    #[error("{0:?} is not a valid vulnerability")]
    InvalidVulnerability(String),

    #[error("{0:?} is not a valid board number")]
    InvalidBoard(String),

    #[error("cannot start play before the auction is complete")]
    AuctionNotComplete,

    #[error("the auction was passed out, there is nothing to play")]
    NoContract,

    #[error("cannot play {card}: it does not belong to {direction}")]
    CardNotOwned { card: Card, direction: Direction },

    #[error("cannot play {card}: it has already been played")]
    CardAlreadyPlayed { card: Card },

    #[error("{card} is already assigned to {direction}")]
    CardAlreadyAssigned { card: Card, direction: Direction },

    #[error("{card} is not assigned to {direction}")]
    CardNotAssigned { card: Card, direction: Direction },

    #[error("{0} already holds 13 cards")]
    HandFull(Direction),

    #[error("unable to assign the remaining {0} cards")]
    UnassignableCards(usize),

    #[error("no plays to remove")]
    NoPlayToRemove,

    #[error("trump and leader cannot change once play has started")]
    PlayAlreadyStarted,

    #[error("replay position {requested} is outside 0..={limit}")]
    ReplayCursorOutOfRange { requested: isize, limit: usize },

    #[error("cannot parse {input:?}: {reason}")]
    StringParse { input: String, reason: String },

    #[error("invalid deal record: {0}")]
    InvalidRecord(String),
}

impl BridgeError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        BridgeError::StringParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
