//! The JSON deal record.

use super::deal_string::{AuctionField, DealFields};
use crate::board::Direction;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};

pub const RECORD_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub direction: String,
    pub name: String,
    pub hand: String,
}

/// Every field is optional on input; what is missing keeps its current
/// value on the deal it is loaded into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub hands: Vec<HandRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play: Option<String>,
}

fn default_version() -> String {
    RECORD_VERSION.to_string()
}

impl DealRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| BridgeError::InvalidRecord(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| BridgeError::InvalidRecord(e.to_string()))
    }

    /// The record as deal string fields, plus the scoring which the deal
    /// string has no key for.
    pub fn into_fields(self) -> Result<(DealFields, Option<String>)> {
        let mut fields = DealFields {
            board: self.board.map(|b| b.to_string()),
            dealer: self.dealer,
            vulnerability: self.vulnerability,
            notes: self.notes,
            auction: self.auction.map(AuctionField::Calls),
            play: self.play,
            ..DealFields::default()
        };
        for hand in self.hands {
            let direction: Direction = hand.direction.parse()?;
            fields.hands[direction.idx()] = Some(hand.hand);
            fields.names[direction.idx()] = Some(hand.name);
        }
        Ok((fields, self.scoring))
    }
}
