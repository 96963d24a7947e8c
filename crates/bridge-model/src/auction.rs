use crate::board::{Direction, Vulnerability};
use crate::call::{Call, CallEntry};
use crate::contract::{AllowedCalls, Contract, ContractSummary, DoubleStatus};
use crate::error::{BridgeError, Result};
use crate::events::{Event, Notifier};
use crate::io::auction_string::{format_auction, parse_auction, ParsedCall};
use crate::io::check_bracketed;
use std::fmt;
use tracing::info;

/// One recorded call and the contract as it stood right after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionStep {
    pub entry: CallEntry,
    pub contract: Contract,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuctionEvent {
    AddCall { entry: CallEntry, contract: Contract },
    AuctionComplete { entry: CallEntry, contract: Contract },
    RemoveCall(CallEntry),
    SetDealer(Direction),
    SetVulnerability(Vulnerability),
    SetSelectedLevel(Option<u8>),
    SetContract(String),
    SetAuction(String),
    Abstained,
    AdvanceAuction(CallEntry),
    AdvanceAuctionCompleted(CallEntry),
    RewindAuction(CallEntry),
    RewindAuctionCompleted(CallEntry),
}

impl Event for AuctionEvent {
    fn operation(&self) -> &'static str {
        match self {
            AuctionEvent::AddCall { .. } => "addCall",
            AuctionEvent::AuctionComplete { .. } => "auctionComplete",
            AuctionEvent::RemoveCall(_) => "removeCall",
            AuctionEvent::SetDealer(_) => "setDealer",
            AuctionEvent::SetVulnerability(_) => "setVulnerability",
            AuctionEvent::SetSelectedLevel(_) => "setSelectedLevel",
            AuctionEvent::SetContract(_) => "setContract",
            AuctionEvent::SetAuction(_) => "setAuction",
            AuctionEvent::Abstained => "abstained",
            AuctionEvent::AdvanceAuction(_) => "advanceAuction",
            AuctionEvent::AdvanceAuctionCompleted(_) => "advanceAuctionCompleted",
            AuctionEvent::RewindAuction(_) => "rewindAuction",
            AuctionEvent::RewindAuctionCompleted(_) => "rewindAuctionCompleted",
        }
    }
}

/// Folds `calls` from a fresh contract, seating the first call at `dealer`.
fn fold_calls(dealer: Direction, calls: Vec<ParsedCall>) -> Result<Vec<AuctionStep>> {
    let mut steps: Vec<AuctionStep> = Vec::with_capacity(calls.len());
    for (i, parsed) in calls.into_iter().enumerate() {
        let direction = dealer.rotate(i);
        let mut contract = steps
            .last()
            .map_or_else(Contract::new, |step| step.contract.clone());
        contract.apply(parsed.call, direction)?;
        let entry = CallEntry::new(parsed.call, direction)
            .with_explanation(parsed.explanation)
            .with_annotation(parsed.annotation);
        steps.push(AuctionStep { entry, contract });
    }
    Ok(steps)
}

/// The bidding of one deal.
///
/// Calls are only ever pushed and popped at the end, and each carries the
/// contract snapshot it produced.
#[derive(Debug)]
pub struct Auction {
    dealer: Direction,
    vulnerability: Vulnerability,
    history: Vec<AuctionStep>,
    selected_level: Option<u8>,
    /// Number of calls revealed by the replay cursor.
    position: usize,
    notifier: Notifier<AuctionEvent>,
}

impl Default for Auction {
    fn default() -> Self {
        Self::new(Direction::North, Vulnerability::None)
    }
}

impl Auction {
    pub fn new(dealer: Direction, vulnerability: Vulnerability) -> Self {
        Self {
            dealer,
            vulnerability,
            history: Vec::new(),
            selected_level: None,
            position: 0,
            notifier: Notifier::new("auction"),
        }
    }

    /// The same calls, cursor and settings, with no listeners.
    pub(crate) fn detached(&self) -> Auction {
        Auction {
            dealer: self.dealer,
            vulnerability: self.vulnerability,
            history: self.history.clone(),
            selected_level: self.selected_level,
            position: self.position,
            notifier: Notifier::new("auction"),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&AuctionEvent) + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn subscribe_to(
        &mut self,
        operation: &'static str,
        listener: impl FnMut(&AuctionEvent) + 'static,
    ) {
        self.notifier.subscribe_to(operation, listener);
    }

    pub fn dealer(&self) -> Direction {
        self.dealer
    }

    pub fn vulnerability(&self) -> Vulnerability {
        self.vulnerability
    }

    pub fn is_vulnerable(&self, direction: Direction) -> bool {
        self.vulnerability.is_vulnerable(direction)
    }

    pub fn next_to_call(&self) -> Direction {
        self.dealer.rotate(self.history.len())
    }

    pub fn selected_level(&self) -> Option<u8> {
        self.selected_level
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn steps(&self) -> &[AuctionStep] {
        &self.history
    }

    pub fn calls(&self) -> impl Iterator<Item = &CallEntry> + '_ {
        self.history.iter().map(|step| &step.entry)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> + '_ {
        self.history.iter().map(|step| &step.contract)
    }

    /// The latest contract snapshot.
    pub fn contract(&self) -> &Contract {
        self.history
            .last()
            .map_or(&Contract::EMPTY, |step| &step.contract)
    }

    pub fn is_complete(&self) -> bool {
        self.contract().is_complete()
    }

    /// The contract once bidding is over; `None` while bidding continues or
    /// when the deal was passed out.
    pub fn final_contract(&self) -> Option<ContractSummary> {
        if self.is_complete() {
            self.contract().summary()
        } else {
            None
        }
    }

    pub fn legal_calls(&self) -> AllowedCalls {
        self.contract().allowed_calls(self.next_to_call())
    }

    pub fn last_bid(&self) -> Option<&CallEntry> {
        self.calls().filter(|entry| entry.call.is_bid()).last()
    }

    pub fn opener(&self) -> Option<&CallEntry> {
        self.calls().find(|entry| entry.call.is_bid())
    }

    /// Reseats every recorded call starting from `dealer`.
    pub fn set_dealer(&mut self, dealer: Direction) -> Result<()> {
        let calls = self
            .history
            .iter()
            .map(|step| ParsedCall {
                call: step.entry.call,
                explanation: step.entry.explanation.clone(),
                annotation: step.entry.annotation.clone(),
            })
            .collect();
        let history = fold_calls(dealer, calls)?;
        self.dealer = dealer;
        self.history = history;
        self.notifier.emit(AuctionEvent::SetDealer(dealer));
        Ok(())
    }

    pub fn set_vulnerability(&mut self, vulnerability: Vulnerability) {
        self.vulnerability = vulnerability;
        self.notifier
            .emit(AuctionEvent::SetVulnerability(vulnerability));
    }

    pub fn set_selected_level(&mut self, level: u8) -> Result<()> {
        if !(1..=7).contains(&level) {
            return Err(BridgeError::InvalidLevel(level.to_string()));
        }
        self.selected_level = Some(level);
        self.notifier.emit(AuctionEvent::SetSelectedLevel(Some(level)));
        Ok(())
    }

    pub fn unset_selected_level(&mut self) {
        self.selected_level = None;
        self.notifier.emit(AuctionEvent::SetSelectedLevel(None));
    }

    pub fn add_call(&mut self, call: Call) -> Result<()> {
        self.add_call_with(call, None, None)
    }

    pub fn add_call_with(
        &mut self,
        call: Call,
        explanation: Option<String>,
        annotation: Option<String>,
    ) -> Result<()> {
        check_bracketed(explanation.as_deref(), ')')?;
        check_bracketed(annotation.as_deref(), '}')?;
        let direction = self.next_to_call();
        let mut contract = self.contract().clone();
        contract.apply(call, direction)?;
        let entry = CallEntry::new(call, direction)
            .with_explanation(explanation)
            .with_annotation(annotation);
        self.push_step(AuctionStep { entry, contract });
        Ok(())
    }

    fn push_step(&mut self, step: AuctionStep) {
        let complete = step.contract.is_complete();
        let entry = step.entry.clone();
        let contract = step.contract.clone();
        self.history.push(step);
        self.selected_level = None;
        self.notifier.emit(AuctionEvent::AddCall {
            entry: entry.clone(),
            contract: contract.clone(),
        });
        if complete {
            info!(contract = %contract, calls = self.history.len(), "auction complete");
            self.notifier
                .emit(AuctionEvent::AuctionComplete { entry, contract });
        }
    }

    /// Undoes the most recent call. Does nothing on an empty auction.
    pub fn remove_call(&mut self) -> Option<CallEntry> {
        let step = self.history.pop()?;
        self.position = self.position.min(self.history.len());
        self.selected_level = None;
        self.notifier.emit(AuctionEvent::RemoveCall(step.entry.clone()));
        Some(step.entry)
    }

    pub fn clear_calls(&mut self) {
        while self.remove_call().is_some() {}
    }

    /// Passes until the auction is over.
    pub fn add_all_pass(&mut self) -> Result<()> {
        while !self.is_complete() {
            self.add_call(Call::Pass)?;
        }
        Ok(())
    }

    /// Does nothing but tell listeners that the player declined to call.
    pub fn abstain(&mut self) {
        self.notifier.emit(AuctionEvent::Abstained);
    }

    /// Replaces every call with the shortest auction that reaches
    /// `contract`, given in the contract text format.
    pub fn set_contract(&mut self, contract: &str) -> Result<()> {
        let summary: ContractSummary = contract.parse()?;
        let passes = (summary.declarer.idx() + 4 - self.dealer.idx()) % 4;
        let mut calls = vec![Call::Pass; passes];
        calls.push(summary.call());
        if summary.double_status != DoubleStatus::Undoubled {
            calls.push(Call::Double);
        }
        if summary.double_status == DoubleStatus::Redoubled {
            calls.push(Call::Redouble);
        }
        calls.extend([Call::Pass; 3]);
        let parsed = calls
            .into_iter()
            .map(|call| ParsedCall {
                call,
                explanation: None,
                annotation: None,
            })
            .collect();
        self.replace_calls(parsed)?;
        self.notifier
            .emit(AuctionEvent::SetContract(contract.to_string()));
        self.notifier.emit(AuctionEvent::SetAuction(self.to_string()));
        Ok(())
    }

    /// Replaces every call with the auction written in `auction`.
    pub fn load(&mut self, auction: &str) -> Result<()> {
        let parsed = parse_auction(auction)?;
        self.replace_calls(parsed)?;
        self.notifier
            .emit(AuctionEvent::SetAuction(auction.to_string()));
        Ok(())
    }

    /// Validates the whole sequence before touching the recorded calls.
    fn replace_calls(&mut self, calls: Vec<ParsedCall>) -> Result<()> {
        let steps = fold_calls(self.dealer, calls)?;
        self.clear_calls();
        for step in steps {
            self.push_step(step);
        }
        Ok(())
    }

    /// Renders the calls as rows of four seats starting with `start`.
    ///
    /// Seats before the dealer show `-`. While bidding continues and
    /// `mark_pending` is set, the next seat shows `?`.
    pub fn bidding_table(&self, start: Direction, mark_pending: bool) -> Vec<[String; 4]> {
        let lead_in = (self.dealer.idx() + 4 - start.idx()) % 4;
        let mut cells: Vec<String> = vec!["-".to_string(); lead_in];
        cells.extend(self.calls().map(|entry| entry.call.render()));
        if mark_pending && !self.is_complete() {
            cells.push("?".to_string());
        }
        while cells.len() % 4 != 0 {
            cells.push(String::new());
        }
        cells
            .chunks(4)
            .map(|row| [row[0].clone(), row[1].clone(), row[2].clone(), row[3].clone()])
            .collect()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn advance_auction(&mut self) -> Result<()> {
        self.advance_auction_to(self.position + 1)
    }

    pub fn advance_auction_all(&mut self) -> Result<()> {
        self.advance_auction_to(self.history.len())
    }

    /// Reveals calls until `position` of them are showing.
    pub fn advance_auction_to(&mut self, position: usize) -> Result<()> {
        if position <= self.position || position > self.history.len() {
            return Err(BridgeError::ReplayCursorOutOfRange {
                requested: position as isize,
                limit: self.history.len(),
            });
        }
        while self.position < position {
            let entry = self.history[self.position].entry.clone();
            self.position += 1;
            self.notifier.emit(AuctionEvent::AdvanceAuction(entry));
        }
        let last = self.history[position - 1].entry.clone();
        self.notifier
            .emit(AuctionEvent::AdvanceAuctionCompleted(last));
        Ok(())
    }

    pub fn rewind_auction(&mut self) -> Result<()> {
        match self.position.checked_sub(1) {
            Some(position) => self.rewind_auction_to(position),
            None => Err(BridgeError::ReplayCursorOutOfRange {
                requested: -1,
                limit: self.history.len(),
            }),
        }
    }

    pub fn rewind_auction_all(&mut self) -> Result<()> {
        self.rewind_auction_to(0)
    }

    /// Hides calls until only `position` of them are showing.
    pub fn rewind_auction_to(&mut self, position: usize) -> Result<()> {
        if position >= self.position {
            return Err(BridgeError::ReplayCursorOutOfRange {
                requested: position as isize,
                limit: self.history.len(),
            });
        }
        let mut last = None;
        while self.position > position {
            self.position -= 1;
            let entry = self.history[self.position].entry.clone();
            self.notifier.emit(AuctionEvent::RewindAuction(entry.clone()));
            last = Some(entry);
        }
        if let Some(entry) = last {
            self.notifier
                .emit(AuctionEvent::RewindAuctionCompleted(entry));
        }
        Ok(())
    }
}

impl fmt::Display for Auction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_auction(self.calls()))
    }
}
