//! The BBO handviewer style deal string: `&`-joined `key=value` pairs.
//!
//! Keys: `b` board, `d` dealer, `v` vulnerability, `t` notes, `n`/`e`/`s`/`w`
//! hands, `nn`/`en`/`sn`/`wn` player names, `a` auction (or `-` followed by
//! a contract), `p` play. Unknown keys are ignored and a repeated key keeps
//! its last value. Values are percent-decoded, as in a handviewer link.

use crate::board::Direction;
use crate::error::{BridgeError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::str::FromStr;

/// Characters escaped when a value is written. Brackets stay readable so
/// auctions and plays keep their explanations legible.
const VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'=')
    .add(b'?');

fn decode(input: &str, value: &str) -> Result<String> {
    percent_decode_str(value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| BridgeError::parse(input, format!("{value:?} does not decode to UTF-8")))
}

/// What a deal string says, before any of it is checked against the rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DealFields {
    pub board: Option<String>,
    pub dealer: Option<String>,
    pub vulnerability: Option<String>,
    pub notes: Option<String>,
    /// Indexed by `Direction::idx`.
    pub hands: [Option<String>; 4],
    pub names: [Option<String>; 4],
    pub auction: Option<AuctionField>,
    pub play: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuctionField {
    Calls(String),
    Contract(String),
}

impl AuctionField {
    fn parse(value: &str) -> Self {
        match value.strip_prefix('-') {
            Some(contract) => AuctionField::Contract(contract.to_string()),
            None => AuctionField::Calls(value.to_string()),
        }
    }
}

impl fmt::Display for AuctionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionField::Calls(calls) => write!(f, "{}", calls),
            AuctionField::Contract(contract) => write!(f, "-{}", contract),
        }
    }
}

impl FromStr for DealFields {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = DealFields::default();
        for pair in s.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| BridgeError::parse(s, format!("{:?} has no '='", pair)))?;
            let value = decode(s, value)?;
            match key {
                "b" => fields.board = Some(value),
                "d" => fields.dealer = Some(value),
                "v" => fields.vulnerability = Some(value),
                "t" => fields.notes = Some(value),
                "a" => fields.auction = Some(AuctionField::parse(&value)),
                "p" => fields.play = Some(value),
                _ => {
                    let mut chars = key.chars();
                    match (chars.next().and_then(Direction::from_char), chars.as_str()) {
                        (Some(direction), "") => fields.hands[direction.idx()] = Some(value),
                        (Some(direction), "n") => fields.names[direction.idx()] = Some(value),
                        _ => {}
                    }
                }
            }
        }
        Ok(fields)
    }
}

/// Writes the keys that are present, in the canonical order.
impl fmt::Display for DealFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<String> = Vec::new();
        let mut push = |key: &str, value: &Option<String>| {
            if let Some(value) = value {
                items.push(format!("{}={}", key, utf8_percent_encode(value, VALUE)));
            }
        };
        push("b", &self.board);
        push("d", &self.dealer);
        push("v", &self.vulnerability);
        push("t", &self.notes);
        for direction in Direction::ALL {
            let code = direction.code();
            push(&code.to_string(), &self.hands[direction.idx()]);
            push(&format!("{}n", code), &self.names[direction.idx()]);
        }
        push("a", &self.auction.as_ref().map(|a| a.to_string()));
        push("p", &self.play);
        write!(f, "{}", items.join("&"))
    }
}
