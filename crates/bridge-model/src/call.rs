use crate::board::Direction;
use crate::error::{BridgeError, Result};
use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Call {
    Pass,
    Bid { level: u8, strain: Strain },
    Double,
    Redouble,
}

impl Call {
    /// Every call in bidding-box order: the 35 bids, then pass, double, redouble.
    pub fn all() -> impl Iterator<Item = Call> {
        (1..=7u8)
            .flat_map(|level| Strain::ALL.into_iter().map(move |strain| Call::Bid { level, strain }))
            .chain([Call::Pass, Call::Double, Call::Redouble])
    }

    pub fn bid(level: u8, strain: Strain) -> Result<Self> {
        if !(1..=7).contains(&level) {
            return Err(BridgeError::InvalidLevel(level.to_string()));
        }
        Ok(Call::Bid { level, strain })
    }

    /// Human form used in bidding tables.
    pub fn render(self) -> String {
        match self {
            Call::Pass => "P".to_string(),
            Call::Double => "X".to_string(),
            Call::Redouble => "XX".to_string(),
            Call::Bid { level, strain } => format!("{}{}", level, strain),
        }
    }

    pub fn is_bid(self) -> bool {
        matches!(self, Call::Bid { .. })
    }
}

impl FromStr for Call {
    type Err = BridgeError;

    /// Parses the compact tokens of the auction format: `p`, `x`, `r`, or a
    /// level followed by a strain letter.
    fn from_str(s: &str) -> Result<Self> {
        let malformed = || BridgeError::MalformedCall(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        let mut chars = lower.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('p'), None, None) => Ok(Call::Pass),
            (Some('x'), None, None) => Ok(Call::Double),
            (Some('r'), None, None) => Ok(Call::Redouble),
            (Some(level), Some(strain), None) => {
                let level = level.to_digit(10).ok_or_else(malformed)? as u8;
                let strain = Strain::from_char(strain).ok_or_else(malformed)?;
                if !(1..=7).contains(&level) {
                    return Err(malformed());
                }
                Ok(Call::Bid { level, strain })
            }
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Pass => write!(f, "p"),
            Call::Double => write!(f, "x"),
            Call::Redouble => write!(f, "r"),
            Call::Bid { level, strain } => write!(f, "{}{}", level, strain.code()),
        }
    }
}

/// A call as it was made at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEntry {
    pub call: Call,
    pub direction: Direction,
    pub explanation: Option<String>,
    pub annotation: Option<String>,
}

impl CallEntry {
    pub fn new(call: Call, direction: Direction) -> Self {
        Self {
            call,
            direction,
            explanation: None,
            annotation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation.filter(|e| !e.is_empty());
        self
    }

    pub fn with_annotation(mut self, annotation: Option<String>) -> Self {
        self.annotation = annotation.filter(|a| !a.is_empty());
        self
    }
}

/// `(...)` carries the explanation and `{...}` the annotation.
impl fmt::Display for CallEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.call)?;
        if let Some(explanation) = &self.explanation {
            write!(f, "({})", explanation)?;
        }
        if let Some(annotation) = &self.annotation {
            write!(f, "{{{}}}", annotation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_parsing() {
        assert_eq!("p".parse::<Call>(), Ok(Call::Pass));
        assert_eq!("X".parse::<Call>(), Ok(Call::Double));
        assert_eq!("r".parse::<Call>(), Ok(Call::Redouble));
        assert_eq!(
            "3n".parse::<Call>(),
            Ok(Call::Bid {
                level: 3,
                strain: Strain::NoTrump
            })
        );
        assert_eq!(
            "7S".parse::<Call>(),
            Ok(Call::Bid {
                level: 7,
                strain: Strain::Spades
            })
        );
    }

    #[test]
    fn test_malformed_calls() {
        for token in ["", "a", "8c", "0h", "1x", "1cx", "pp", "xx", "d"] {
            assert_eq!(
                token.parse::<Call>(),
                Err(BridgeError::MalformedCall(token.to_string())),
                "{token}"
            );
        }
    }

    #[test]
    fn test_call_display() {
        assert_eq!(Call::Pass.to_string(), "p");
        assert_eq!(Call::Redouble.to_string(), "r");
        assert_eq!(Call::bid(1, Strain::Clubs).unwrap().to_string(), "1c");
        assert_eq!(Call::bid(4, Strain::Hearts).unwrap().render(), "4H");
        assert_eq!(Call::Redouble.render(), "XX");
        assert!(Call::bid(8, Strain::Clubs).is_err());
    }

    #[test]
    fn test_all_calls() {
        let calls: Vec<Call> = Call::all().collect();
        assert_eq!(calls.len(), 38);
        assert_eq!(calls[0].to_string(), "1c");
        assert_eq!(calls[34].to_string(), "7n");
        assert_eq!(calls[37], Call::Redouble);
    }

    #[test]
    fn test_call_entry_display() {
        let entry = CallEntry::new(Call::Pass, Direction::North)
            .with_explanation(Some("explanation".to_string()))
            .with_annotation(Some("annotation".to_string()));
        assert_eq!(entry.to_string(), "p(explanation){annotation}");

        let bare = CallEntry::new(Call::Double, Direction::East).with_annotation(Some(String::new()));
        assert_eq!(bare.to_string(), "x");
    }
}
