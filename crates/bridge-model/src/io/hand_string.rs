//! BBO-style hand strings such as `sakq2h109dc7`: a suit letter followed
//! by the ranks held in it. `10` may be written for the ten.

use crate::card::Card;
use crate::error::{BridgeError, Result};
use crate::rank::Rank;
use crate::suit::Suit;

pub fn parse_hand(input: &str) -> Result<Vec<Card>> {
    let chars: Vec<char> = input.to_ascii_lowercase().chars().collect();
    let mut seen_suits = [false; 4];
    let mut suit: Option<Suit> = None;
    let mut cards: Vec<Card> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let position = i + 1;
        let at = move |reason: String| {
            BridgeError::parse(input, format!("position {}: {}", position, reason))
        };
        i += 1;
        if let Some(next_suit) = Suit::from_char(c) {
            if seen_suits[next_suit.idx()] {
                return Err(at(format!("suit {} appears twice", next_suit.code())));
            }
            seen_suits[next_suit.idx()] = true;
            suit = Some(next_suit);
            continue;
        }
        let current = suit.ok_or_else(|| at(format!("{} found where a suit was expected", c)))?;
        let rank = match c {
            '1' if chars.get(i) == Some(&'0') => {
                i += 1;
                Rank::Ten
            }
            '1' => return Err(at("a 1 must be followed by 0 to make a ten".to_string())),
            _ => Rank::from_char(c).ok_or_else(|| at(format!("{} is not a rank", c)))?,
        };
        let card = Card::new(current, rank);
        if cards.contains(&card) {
            return Err(at(format!("{} appears twice", card.code())));
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Spades first, ranks high to low; empty suits are left out.
pub fn format_hand(cards: &[Card]) -> String {
    let mut out = String::new();
    for suit in Suit::DISPLAY_ORDER {
        let ranks: String = Rank::DISPLAY_ORDER
            .iter()
            .filter(|&&rank| cards.contains(&Card::new(suit, rank)))
            .map(|rank| rank.code())
            .collect();
        if !ranks.is_empty() {
            out.push(suit.code());
            out.push_str(&ranks);
        }
    }
    out
}
