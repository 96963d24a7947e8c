//! The compact play text format: two-character cards (`sa`, `ct`) back to
//! back, each optionally followed by `{annotation}`.

use super::read_bracketed;
use crate::card::Card;
use crate::error::{BridgeError, Result};
use crate::played_card::PlayedCard;

pub fn parse_play(input: &str) -> Result<Vec<(Card, Option<String>)>> {
    let chars: Vec<char> = input.chars().collect();
    let mut cards = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let suit = chars[i];
        let rank = *chars
            .get(i + 1)
            .ok_or_else(|| BridgeError::parse(input, "play ends on a suit with no rank"))?;
        i += 2;
        let card = Card::from_chars(suit, rank)?;
        let mut annotation = None;
        if chars.get(i) == Some(&'{') {
            let (text, next) = read_bracketed(input, &chars, i, '}')?;
            annotation = Some(text);
            i = next;
        }
        cards.push((card, annotation));
    }
    Ok(cards)
}

pub fn format_play<'a>(plays: impl IntoIterator<Item = &'a PlayedCard>) -> String {
    plays.into_iter().map(|p| p.to_string()).collect()
}
