//! The compact auction text format.
//!
//! Calls are written back to back: `p`, `x` (or `d`), `r`, or a level and
//! strain such as `1c`. A call may be followed by `(explanation)` and/or
//! `{annotation}`.

use super::read_bracketed;
use crate::call::{Call, CallEntry};
use crate::error::{BridgeError, Result};

/// A call read from text, before a seat has been attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCall {
    pub call: Call,
    pub explanation: Option<String>,
    pub annotation: Option<String>,
}

pub fn parse_auction(input: &str) -> Result<Vec<ParsedCall>> {
    let chars: Vec<char> = input.chars().collect();
    let mut calls = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let first = chars[i].to_ascii_lowercase();
        i += 1;
        let token = match first {
            'p' | 'x' | 'r' => first.to_string(),
            'd' => "x".to_string(),
            _ => {
                let second = chars
                    .get(i)
                    .ok_or_else(|| BridgeError::parse(input, "auction ends in the middle of a bid"))?;
                i += 1;
                format!("{}{}", first, second)
            }
        };
        let call: Call = token.parse()?;

        let mut explanation = None;
        let mut annotation = None;
        while let Some(&open) = chars.get(i) {
            let (text, next) = match open {
                '(' => read_bracketed(input, &chars, i, ')')?,
                '{' => read_bracketed(input, &chars, i, '}')?,
                _ => break,
            };
            if open == '(' {
                explanation = Some(text);
            } else {
                annotation = Some(text);
            }
            i = next;
        }
        calls.push(ParsedCall {
            call,
            explanation,
            annotation,
        });
    }
    Ok(calls)
}

pub fn format_auction<'a>(entries: impl IntoIterator<Item = &'a CallEntry>) -> String {
    entries.into_iter().map(|entry| entry.to_string()).collect()
}
