use crate::board::{Direction, Partnership};
use crate::card::Card;
use crate::strain::Strain;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, trace};

/// One card played to a trick, with the running state of the play after it.
///
/// `winning` and `lead` are indices into the list of plays this card
/// belongs to, and may point at the card itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    /// 1-based position in the play.
    pub play_number: usize,
    pub card: Card,
    pub direction: Direction,
    pub next_to_play: Direction,
    pub winning: usize,
    pub lead: usize,
    pub ns_tricks: u8,
    pub ew_tricks: u8,
    pub annotation: Option<String>,
}

impl PlayedCard {
    /// Plays `card` after `plays`, resolving who is winning the trick.
    ///
    /// `trump` and `leader` only matter for the first card; afterwards the
    /// seat comes from the previous play.
    pub fn follow(
        plays: &[PlayedCard],
        card: Card,
        annotation: Option<String>,
        trump: Strain,
        leader: Direction,
    ) -> PlayedCard {
        let index = plays.len();
        let play_number = index + 1;
        let previous = plays.last();
        let direction = previous.map_or(leader, |p| p.next_to_play);
        let mut played = PlayedCard {
            play_number,
            card,
            direction,
            next_to_play: direction.lho(),
            winning: index,
            lead: index,
            ns_tricks: previous.map_or(0, |p| p.ns_tricks),
            ew_tricks: previous.map_or(0, |p| p.ew_tricks),
            annotation: annotation.filter(|a| !a.is_empty()),
        };

        let previous = match previous {
            Some(previous) if play_number % 4 != 1 => previous,
            _ => return played,
        };

        played.lead = previous.lead;
        let winner = &plays[previous.winning];
        if card.beats(winner.card, trump) {
            trace!(%card, beaten = %winner.card, "card takes the lead in the trick");
        } else {
            played.winning = previous.winning;
        }

        if play_number % 4 == 0 {
            let winner = if played.winning == index {
                direction
            } else {
                plays[played.winning].direction
            };
            match winner.partnership() {
                Partnership::NS => played.ns_tricks += 1,
                Partnership::EW => played.ew_tricks += 1,
            }
            played.next_to_play = winner;
            info!(
                trick = played.trick_number(),
                %winner,
                ns = played.ns_tricks,
                ew = played.ew_tricks,
                "trick won"
            );
        }
        played
    }

    /// 1-based number of the trick this card belongs to.
    pub fn trick_number(&self) -> usize {
        (self.play_number - 1) / 4 + 1
    }

    pub fn starts_trick(&self) -> bool {
        (self.play_number - 1) % 4 == 0
    }

    pub fn ends_trick(&self) -> bool {
        self.play_number % 4 == 0
    }

    pub fn tricks(&self, partnership: Partnership) -> u8 {
        match partnership {
            Partnership::NS => self.ns_tricks,
            Partnership::EW => self.ew_tricks,
        }
    }
}

/// The card code followed by `{annotation}` when there is one.
impl fmt::Display for PlayedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.card.code())?;
        if let Some(annotation) = &self.annotation {
            write!(f, "{{{}}}", annotation)?;
        }
        Ok(())
    }
}
