use crate::board::{Direction, Partnership};
use crate::card::Card;
use crate::contract::Contract;
use crate::deck::PlayLedger;
use crate::error::{BridgeError, Result};
use crate::events::{Event, Notifier};
use crate::io::check_bracketed;
use crate::io::play_string::{format_play, parse_play};
use crate::played_card::PlayedCard;
use crate::strain::Strain;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayEvent {
    Initialize { trump: Strain, leader: Direction },
    SetTrump(Strain),
    SetLeader(Direction),
    AddCard(PlayedCard),
    RemoveCard(PlayedCard),
    SetPlay(String),
    PlayCard(PlayedCard),
    PlayCardCompleted(PlayedCard),
    UndoPlayCard(PlayedCard),
    UndoPlayCardCompleted(PlayedCard),
}

impl Event for PlayEvent {
    fn operation(&self) -> &'static str {
        match self {
            PlayEvent::Initialize { .. } => "initialize",
            PlayEvent::SetTrump(_) => "setTrump",
            PlayEvent::SetLeader(_) => "setLeader",
            PlayEvent::AddCard(_) => "addCard",
            PlayEvent::RemoveCard(_) => "removeCard",
            PlayEvent::SetPlay(_) => "setPlay",
            PlayEvent::PlayCard(_) => "playCard",
            PlayEvent::PlayCardCompleted(_) => "playCardCompleted",
            PlayEvent::UndoPlayCard(_) => "undoPlayCard",
            PlayEvent::UndoPlayCardCompleted(_) => "undoPlayCardCompleted",
        }
    }
}

/// The card play of one deal.
///
/// Plays are recorded in order. `position` is how many of them are
/// currently on the table: adding a card after rewinding discards the
/// plays beyond the position, and the replay methods move the position
/// over the recorded plays without changing them.
#[derive(Debug)]
pub struct Play {
    trump: Strain,
    leader: Direction,
    plays: Vec<PlayedCard>,
    position: usize,
    initialized: bool,
    notifier: Notifier<PlayEvent>,
}

impl Default for Play {
    fn default() -> Self {
        Self::new()
    }
}

impl Play {
    /// No-trump with West on lead until told otherwise.
    pub fn new() -> Self {
        Self {
            trump: Strain::NoTrump,
            leader: Direction::West,
            plays: Vec::new(),
            position: 0,
            initialized: false,
            notifier: Notifier::new("play"),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PlayEvent) + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn subscribe_to(
        &mut self,
        operation: &'static str,
        listener: impl FnMut(&PlayEvent) + 'static,
    ) {
        self.notifier.subscribe_to(operation, listener);
    }

    pub fn trump(&self) -> Strain {
        self.trump
    }

    pub fn leader(&self) -> Direction {
        self.leader
    }

    /// Whether trump and leader have been fixed, from a contract or by hand.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Takes trump and leader from a finished auction.
    pub fn initialize(&mut self, contract: &Contract) -> Result<()> {
        if !contract.is_complete() {
            return Err(BridgeError::AuctionNotComplete);
        }
        let (trump, leader) = match (contract.strain(), contract.leader()) {
            (Some(trump), Some(leader)) => (trump, leader),
            _ => return Err(BridgeError::NoContract),
        };
        if !self.plays.is_empty() {
            return Err(BridgeError::PlayAlreadyStarted);
        }
        self.trump = trump;
        self.leader = leader;
        self.initialized = true;
        self.notifier.emit(PlayEvent::Initialize { trump, leader });
        Ok(())
    }

    pub fn set_trump(&mut self, trump: Strain) -> Result<()> {
        if !self.plays.is_empty() {
            return Err(BridgeError::PlayAlreadyStarted);
        }
        self.trump = trump;
        self.initialized = true;
        self.notifier.emit(PlayEvent::SetTrump(trump));
        Ok(())
    }

    pub fn set_leader(&mut self, leader: Direction) -> Result<()> {
        if !self.plays.is_empty() {
            return Err(BridgeError::PlayAlreadyStarted);
        }
        self.leader = leader;
        self.initialized = true;
        self.notifier.emit(PlayEvent::SetLeader(leader));
        Ok(())
    }

    pub fn plays(&self) -> &[PlayedCard] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The most recent play on the table.
    pub fn current(&self) -> Option<&PlayedCard> {
        self.position.checked_sub(1).map(|i| &self.plays[i])
    }

    pub fn next_to_play(&self) -> Direction {
        self.current().map_or(self.leader, |p| p.next_to_play)
    }

    pub fn ns_tricks(&self) -> u8 {
        self.current().map_or(0, |p| p.ns_tricks)
    }

    pub fn ew_tricks(&self) -> u8 {
        self.current().map_or(0, |p| p.ew_tricks)
    }

    pub fn tricks(&self, partnership: Partnership) -> u8 {
        self.current().map_or(0, |p| p.tricks(partnership))
    }

    /// The cards of the trick in progress, in the order they were played.
    /// A finished trick stays on the table until the next lead.
    pub fn current_trick(&self) -> &[PlayedCard] {
        match self.position.checked_sub(1) {
            Some(last) => &self.plays[last - last % 4..self.position],
            None => &[],
        }
    }

    /// The card `index` refers to, e.g. a play's `winning` or `lead`.
    pub fn get(&self, index: usize) -> Option<&PlayedCard> {
        self.plays.get(index)
    }

    /// Plays `card` for whoever is next to play.
    pub fn add_played_card<L: PlayLedger>(
        &mut self,
        ledger: &mut L,
        card: Card,
        annotation: Option<String>,
    ) -> Result<&PlayedCard> {
        check_bracketed(annotation.as_deref(), '}')?;
        let direction = self.next_to_play();
        ledger.check_owner(card, direction)?;
        let replaced = self.plays[self.position..].iter().any(|p| p.card == card);
        if ledger.is_played(card) && !replaced {
            return Err(BridgeError::CardAlreadyPlayed { card });
        }

        let discarded: Vec<PlayedCard> = self.plays.drain(self.position..).collect();
        for played in discarded {
            ledger.mark_unplayed(played.card);
            self.notifier.emit(PlayEvent::RemoveCard(played));
        }
        let played = PlayedCard::follow(&self.plays, card, annotation, self.trump, self.leader);
        ledger.mark_played(card);
        self.plays.push(played.clone());
        self.position = self.plays.len();
        self.notifier.emit(PlayEvent::AddCard(played));
        Ok(&self.plays[self.position - 1])
    }

    pub fn remove_played_card<L: PlayLedger>(&mut self, ledger: &mut L) -> Result<PlayedCard> {
        let played = self.plays.pop().ok_or(BridgeError::NoPlayToRemove)?;
        ledger.mark_unplayed(played.card);
        self.position = self.position.min(self.plays.len());
        self.notifier.emit(PlayEvent::RemoveCard(played.clone()));
        Ok(played)
    }

    pub fn clear_cards<L: PlayLedger>(&mut self, ledger: &mut L) {
        while self.remove_played_card(ledger).is_ok() {}
    }

    /// Clears the plays and forgets trump and leader, so the next play is
    /// taken from whatever contract is current then.
    pub fn reset<L: PlayLedger>(&mut self, ledger: &mut L) {
        self.clear_cards(ledger);
        self.trump = Strain::NoTrump;
        self.leader = Direction::West;
        self.initialized = false;
    }

    /// Replaces the recorded plays with those written in `play`.
    ///
    /// The whole string is checked against a copy of `ledger` first, so a
    /// bad card leaves the play and the ledger as they were.
    pub fn load<L: PlayLedger + Clone>(&mut self, ledger: &mut L, play: &str) -> Result<()> {
        let cards = parse_play(play)?;

        let mut scratch = Play {
            trump: self.trump,
            leader: self.leader,
            initialized: self.initialized,
            ..Play::new()
        };
        let mut scratch_ledger = ledger.clone();
        for played in &self.plays {
            scratch_ledger.mark_unplayed(played.card);
        }
        for (card, annotation) in &cards {
            scratch.add_played_card(&mut scratch_ledger, *card, annotation.clone())?;
        }

        self.clear_cards(ledger);
        for (card, annotation) in cards {
            self.add_played_card(ledger, card, annotation)?;
        }
        self.notifier.emit(PlayEvent::SetPlay(play.to_string()));
        Ok(())
    }

    pub fn play_card(&mut self) -> Result<()> {
        self.play_card_to(self.position + 1)
    }

    /// Moves forward to the end of the current trick, or to the last
    /// recorded play if the trick is unfinished.
    pub fn play_trick(&mut self) -> Result<()> {
        let end = (self.position / 4 + 1) * 4;
        self.play_card_to(end.min(self.plays.len()))
    }

    pub fn play_all(&mut self) -> Result<()> {
        self.play_card_to(self.plays.len())
    }

    /// Moves forward until `position` plays are on the table.
    pub fn play_card_to(&mut self, position: usize) -> Result<()> {
        if position <= self.position || position > self.plays.len() {
            return Err(BridgeError::ReplayCursorOutOfRange {
                requested: position as isize,
                limit: self.plays.len(),
            });
        }
        while self.position < position {
            let played = self.plays[self.position].clone();
            self.position += 1;
            self.notifier.emit(PlayEvent::PlayCard(played));
        }
        let last = self.plays[position - 1].clone();
        self.notifier.emit(PlayEvent::PlayCardCompleted(last));
        Ok(())
    }

    pub fn undo_play_card(&mut self) -> Result<()> {
        match self.position.checked_sub(1) {
            Some(position) => self.undo_play_card_to(position),
            None => Err(BridgeError::ReplayCursorOutOfRange {
                requested: -1,
                limit: self.plays.len(),
            }),
        }
    }

    /// Moves back to the start of the current trick, or of the previous
    /// trick when already at a trick boundary.
    pub fn undo_play_trick(&mut self) -> Result<()> {
        match self.position.checked_sub(1) {
            Some(previous) => self.undo_play_card_to(previous - previous % 4),
            None => Err(BridgeError::ReplayCursorOutOfRange {
                requested: -1,
                limit: self.plays.len(),
            }),
        }
    }

    pub fn undo_play_all(&mut self) -> Result<()> {
        self.undo_play_card_to(0)
    }

    /// Moves back until only `position` plays are on the table.
    pub fn undo_play_card_to(&mut self, position: usize) -> Result<()> {
        if position >= self.position {
            return Err(BridgeError::ReplayCursorOutOfRange {
                requested: position as isize,
                limit: self.plays.len(),
            });
        }
        let mut last = None;
        while self.position > position {
            self.position -= 1;
            let played = self.plays[self.position].clone();
            self.notifier.emit(PlayEvent::UndoPlayCard(played.clone()));
            last = Some(played);
        }
        if let Some(played) = last {
            self.notifier.emit(PlayEvent::UndoPlayCardCompleted(played));
        }
        Ok(())
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_play(&self.plays))
    }
}
