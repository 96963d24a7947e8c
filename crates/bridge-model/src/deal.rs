use crate::auction::Auction;
use crate::board::{Direction, Vulnerability};
use crate::card::Card;
use crate::deck::{Deck, PlayLedger};
use crate::error::{BridgeError, Result};
use crate::events::{Event, Notifier};
use crate::hand::Hand;
use crate::io::deal_string::{AuctionField, DealFields};
use crate::io::hand_string::{format_hand, parse_hand};
use crate::io::json::{DealRecord, HandRecord, RECORD_VERSION};
use crate::play::Play;
use crate::played_card::PlayedCard;
use crate::suit::Suit;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DealEvent {
    SetBoard(u32),
    SetDealer(Direction),
    SetVulnerability(Vulnerability),
    SetScoring(String),
    SetNotes(String),
    SetName { direction: Direction, name: String },
    AddCard { direction: Direction, card: Card },
    RemoveCard { direction: Direction, card: Card },
    SetHand { direction: Direction, hand: String },
    AssignRest { cards: usize },
    Load(String),
}

impl Event for DealEvent {
    fn operation(&self) -> &'static str {
        match self {
            DealEvent::SetBoard(_) => "setBoard",
            DealEvent::SetDealer(_) => "setDealer",
            DealEvent::SetVulnerability(_) => "setVulnerability",
            DealEvent::SetScoring(_) => "setScoring",
            DealEvent::SetNotes(_) => "setNotes",
            DealEvent::SetName { .. } => "setName",
            DealEvent::AddCard { .. } => "addCard",
            DealEvent::RemoveCard { .. } => "removeCard",
            DealEvent::SetHand { .. } => "setHand",
            DealEvent::AssignRest { .. } => "assignRest",
            DealEvent::Load(_) => "load",
        }
    }
}

/// One board: who holds which card, the header, the auction and the play.
///
/// The deck is the single ownership table. Hands are views over it and the
/// play marks cards in it as they leave the hands.
#[derive(Debug)]
pub struct Deal {
    board: u32,
    dealer: Direction,
    vulnerability: Vulnerability,
    scoring: String,
    notes: String,
    names: [String; 4],
    deck: Deck,
    auction: Auction,
    play: Play,
    notifier: Notifier<DealEvent>,
}

impl Default for Deal {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_board(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|board| *board >= 1 && board.to_string() == value)
        .ok_or_else(|| BridgeError::InvalidBoard(value.to_string()))
}

impl Deal {
    /// Board 1, North deals, nobody vulnerable, KO scoring, no cards dealt.
    pub fn new() -> Self {
        Self {
            board: 1,
            dealer: Direction::North,
            vulnerability: Vulnerability::None,
            scoring: "KO".to_string(),
            notes: String::new(),
            names: Direction::ALL.map(|d| d.name().to_string()),
            deck: Deck::new(),
            auction: Auction::new(Direction::North, Vulnerability::None),
            play: Play::new(),
            notifier: Notifier::new("deal"),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DealEvent) + 'static) {
        self.notifier.subscribe(listener);
    }

    pub fn subscribe_to(
        &mut self,
        operation: &'static str,
        listener: impl FnMut(&DealEvent) + 'static,
    ) {
        self.notifier.subscribe_to(operation, listener);
    }

    pub fn board(&self) -> u32 {
        self.board
    }

    pub fn set_board(&mut self, board: u32) -> Result<()> {
        if board < 1 {
            return Err(BridgeError::InvalidBoard(board.to_string()));
        }
        self.board = board;
        self.notifier.emit(DealEvent::SetBoard(board));
        Ok(())
    }

    pub fn dealer(&self) -> Direction {
        self.dealer
    }

    /// Also reseats the calls already made. A play that has not started
    /// forgets the trump and leader of the old seating.
    pub fn set_dealer(&mut self, dealer: Direction) -> Result<()> {
        self.auction.set_dealer(dealer)?;
        if self.play.is_empty() {
            self.play.reset(&mut self.deck);
        }
        self.dealer = dealer;
        self.notifier.emit(DealEvent::SetDealer(dealer));
        Ok(())
    }

    pub fn vulnerability(&self) -> Vulnerability {
        self.vulnerability
    }

    pub fn set_vulnerability(&mut self, vulnerability: Vulnerability) {
        self.auction.set_vulnerability(vulnerability);
        self.vulnerability = vulnerability;
        self.notifier
            .emit(DealEvent::SetVulnerability(vulnerability));
    }

    pub fn scoring(&self) -> &str {
        &self.scoring
    }

    pub fn set_scoring(&mut self, scoring: impl Into<String>) {
        self.scoring = scoring.into();
        self.notifier
            .emit(DealEvent::SetScoring(self.scoring.clone()));
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.notifier.emit(DealEvent::SetNotes(self.notes.clone()));
    }

    pub fn name(&self, direction: Direction) -> &str {
        &self.names[direction.idx()]
    }

    pub fn set_name(&mut self, direction: Direction, name: impl Into<String>) {
        let name = name.into();
        self.names[direction.idx()] = name.clone();
        self.notifier.emit(DealEvent::SetName { direction, name });
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn auction(&self) -> &Auction {
        &self.auction
    }

    pub fn auction_mut(&mut self) -> &mut Auction {
        &mut self.auction
    }

    pub fn play(&self) -> &Play {
        &self.play
    }

    /// For the replay cursor and listeners. Cards should be played through
    /// [`Deal::add_played_card`] so that ownership is checked.
    pub fn play_mut(&mut self) -> &mut Play {
        &mut self.play
    }

    pub fn hand(&self, direction: Direction) -> Hand {
        Hand::new(
            direction,
            self.name(direction),
            self.deck.cards_of(direction).collect(),
        )
    }

    pub fn has_card(&self, direction: Direction, card: Card) -> bool {
        self.deck.has_card(direction, card)
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.deck.count(direction)
    }

    pub fn count_in(&self, direction: Direction, suit: Suit) -> usize {
        self.deck.count_in(direction, suit)
    }

    pub fn add_card(&mut self, direction: Direction, card: Card) -> Result<()> {
        self.deck.assign(card, direction)?;
        self.notifier.emit(DealEvent::AddCard { direction, card });
        Ok(())
    }

    pub fn remove_card(&mut self, direction: Direction, card: Card) -> Result<()> {
        self.deck.un_assign(card, direction)?;
        self.notifier.emit(DealEvent::RemoveCard { direction, card });
        Ok(())
    }

    /// Removes every card from the hand. Fails, removing nothing, if any of
    /// them has been played.
    pub fn clear_hand(&mut self, direction: Direction) -> Result<()> {
        let held: Vec<Card> = self.deck.cards_of(direction).collect();
        if let Some(&card) = held.iter().find(|&&card| self.deck.is_played(card)) {
            return Err(BridgeError::CardAlreadyPlayed { card });
        }
        for card in held {
            self.remove_card(direction, card)?;
        }
        Ok(())
    }

    /// Replaces the hand with the cards of a hand string.
    ///
    /// Cards held elsewhere, more than 13 cards, or dropping a card that
    /// has been played all fail with the hand unchanged.
    pub fn set_hand(&mut self, direction: Direction, hand: &str) -> Result<()> {
        let cards = parse_hand(hand)?;
        if cards.len() > 13 {
            return Err(BridgeError::HandFull(direction));
        }
        for &card in &cards {
            match self.deck.direction_of(card) {
                Some(owner) if owner != direction => {
                    return Err(BridgeError::CardAlreadyAssigned {
                        card,
                        direction: owner,
                    })
                }
                _ => {}
            }
        }
        let held: Vec<Card> = self.deck.cards_of(direction).collect();
        if let Some(&card) = held
            .iter()
            .find(|&&card| self.deck.is_played(card) && !cards.contains(&card))
        {
            return Err(BridgeError::CardAlreadyPlayed { card });
        }

        for card in held.iter().filter(|card| !cards.contains(card)) {
            self.deck.un_assign(*card, direction)?;
        }
        for card in cards.iter().filter(|card| !held.contains(card)) {
            self.deck.assign(*card, direction)?;
        }
        self.notifier.emit(DealEvent::SetHand {
            direction,
            hand: format_hand(&cards),
        });
        Ok(())
    }

    pub fn assign_rest(&mut self) -> Result<()> {
        self.assign_rest_with(&mut rand::thread_rng())
    }

    /// Shuffles the unassigned cards and deals them out, starting with
    /// North and passing over hands that are already full.
    pub fn assign_rest_with(&mut self, rng: &mut impl rand::Rng) -> Result<()> {
        use rand::seq::SliceRandom;

        let mut unassigned = self.deck.unassigned();
        if unassigned.is_empty() {
            return Ok(());
        }
        let room: usize = Direction::ALL.iter().map(|&d| 13 - self.count(d)).sum();
        if unassigned.len() > room {
            return Err(BridgeError::UnassignableCards(unassigned.len()));
        }
        unassigned.shuffle(rng);

        let mut direction = Direction::North;
        for &card in &unassigned {
            while self.count(direction) >= 13 {
                direction = direction.lho();
            }
            self.deck.assign(card, direction)?;
        }
        info!(cards = unassigned.len(), "assigned the remaining cards");
        self.notifier.emit(DealEvent::AssignRest {
            cards: unassigned.len(),
        });
        Ok(())
    }

    /// Plays `card` for whoever is next. The first card takes trump and
    /// leader from the contract as it stands then.
    pub fn add_played_card(&mut self, card: Card, annotation: Option<String>) -> Result<&PlayedCard> {
        self.ready_to_play()?;
        self.play.add_played_card(&mut self.deck, card, annotation)
    }

    fn ready_to_play(&mut self) -> Result<()> {
        let contract = self.auction.contract();
        if !contract.is_complete() {
            return Err(BridgeError::AuctionNotComplete);
        }
        if self.play.is_empty() {
            self.play.initialize(contract)?;
        }
        Ok(())
    }

    pub fn remove_played_card(&mut self) -> Result<PlayedCard> {
        self.play.remove_played_card(&mut self.deck)
    }

    /// Replaces the play with the cards of a play string.
    pub fn set_play(&mut self, play: &str) -> Result<()> {
        if !play.is_empty() {
            self.ready_to_play()?;
        }
        self.play.load(&mut self.deck, play)
    }

    /// Loads a deal string, see [`DealFields`].
    ///
    /// Keys that are missing keep their current values, except the play,
    /// which is always replaced. Nothing changes if any part is invalid.
    pub fn load(&mut self, deal: &str) -> Result<()> {
        let fields: DealFields = deal.parse()?;
        self.apply(fields, None)?;
        self.notifier.emit(DealEvent::Load(deal.to_string()));
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let (fields, scoring) = DealRecord::from_json(json)?.into_fields()?;
        self.apply(fields, scoring)?;
        self.notifier.emit(DealEvent::Load(self.to_string()));
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut deal = Deal::new();
        deal.load_json(json)?;
        Ok(deal)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_record().to_json()
    }

    pub fn to_record(&self) -> DealRecord {
        DealRecord {
            version: RECORD_VERSION.to_string(),
            board: Some(self.board),
            dealer: Some(self.dealer.code().to_string()),
            vulnerability: Some(self.vulnerability.code().to_string()),
            scoring: Some(self.scoring.clone()),
            notes: Some(self.notes.clone()),
            hands: Direction::ALL
                .iter()
                .map(|&direction| HandRecord {
                    direction: direction.code().to_string(),
                    name: self.name(direction).to_string(),
                    hand: self.hand(direction).to_string(),
                })
                .collect(),
            auction: Some(self.auction.to_string()),
            play: (!self.play.is_empty()).then(|| self.play.to_string()),
        }
    }

    pub fn to_fields(&self) -> DealFields {
        DealFields {
            board: Some(self.board.to_string()),
            dealer: Some(self.dealer.code().to_string()),
            vulnerability: Some(self.vulnerability.code().to_string()),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            hands: Direction::ALL.map(|d| Some(self.hand(d).to_string())),
            names: Direction::ALL.map(|d| Some(self.name(d).to_string())),
            auction: Some(AuctionField::Calls(self.auction.to_string())),
            play: (!self.play.is_empty()).then(|| self.play.to_string()),
        }
    }

    /// A copy of the header, names, hands and calls, with nothing played.
    fn scratch(&self) -> Deal {
        let mut scratch = Deal::new();
        scratch.board = self.board;
        scratch.dealer = self.dealer;
        scratch.vulnerability = self.vulnerability;
        scratch.scoring = self.scoring.clone();
        scratch.notes = self.notes.clone();
        scratch.names = self.names.clone();
        scratch.deck = self.deck.clone();
        for played in self.play.plays() {
            scratch.deck.mark_unplayed(played.card);
        }
        scratch.auction = self.auction.detached();
        scratch
    }

    /// Everything but the play, in dependency order.
    fn apply_setup(&mut self, fields: &DealFields, scoring: Option<&str>) -> Result<()> {
        if let Some(board) = &fields.board {
            self.set_board(parse_board(board)?)?;
        }
        if let Some(dealer) = &fields.dealer {
            self.set_dealer(dealer.parse()?)?;
        }
        if let Some(vulnerability) = &fields.vulnerability {
            self.set_vulnerability(vulnerability.parse()?);
        }
        if let Some(scoring) = scoring {
            self.set_scoring(scoring);
        }
        if let Some(notes) = &fields.notes {
            self.set_notes(notes.as_str());
        }
        let mut complete_hands = 0;
        for direction in Direction::ALL {
            if let Some(hand) = &fields.hands[direction.idx()] {
                self.set_hand(direction, hand)?;
                if self.count(direction) == 13 {
                    complete_hands += 1;
                }
            }
        }
        for direction in Direction::ALL {
            if let Some(name) = &fields.names[direction.idx()] {
                self.set_name(direction, name.as_str());
            }
        }
        if complete_hands == 3 {
            self.assign_rest()?;
        }
        match &fields.auction {
            Some(AuctionField::Calls(calls)) => self.auction.load(calls)?,
            Some(AuctionField::Contract(contract)) => self.auction.set_contract(contract)?,
            None => {}
        }
        Ok(())
    }

    /// Checks everything on a scratch copy, then writes the result here.
    fn apply(&mut self, fields: DealFields, scoring: Option<String>) -> Result<()> {
        let mut scratch = self.scratch();
        scratch.apply_setup(&fields, scoring.as_deref())?;
        let dealt = scratch.deck.clone();
        if let Some(play) = &fields.play {
            scratch.set_play(play)?;
        }

        self.play.reset(&mut self.deck);
        if scratch.board != self.board {
            self.set_board(scratch.board)?;
        }
        if scratch.dealer != self.dealer {
            self.set_dealer(scratch.dealer)?;
        }
        if scratch.vulnerability != self.vulnerability {
            self.set_vulnerability(scratch.vulnerability);
        }
        if scratch.scoring != self.scoring {
            self.set_scoring(scratch.scoring.clone());
        }
        if scratch.notes != self.notes {
            self.set_notes(scratch.notes.clone());
        }
        let before = std::mem::replace(&mut self.deck, dealt);
        for direction in Direction::ALL {
            let hand: Vec<Card> = self.deck.cards_of(direction).collect();
            if before.cards_of(direction).ne(hand.iter().copied()) {
                self.notifier.emit(DealEvent::SetHand {
                    direction,
                    hand: format_hand(&hand),
                });
            }
            if scratch.names[direction.idx()] != self.names[direction.idx()] {
                self.set_name(direction, scratch.name(direction).to_string());
            }
        }
        match &fields.auction {
            Some(AuctionField::Calls(calls)) => self.auction.load(calls)?,
            Some(AuctionField::Contract(contract)) => self.auction.set_contract(contract)?,
            None => {}
        }
        if let Some(play) = &fields.play {
            self.set_play(play)?;
        }
        Ok(())
    }
}

/// The deal string with every key this deal has a value for.
impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fields())
    }
}

impl FromStr for Deal {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut deal = Deal::new();
        deal.load(s)?;
        Ok(deal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::Call;
    use crate::rank::Rank;
    use crate::strain::Strain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;
    use std::rc::Rc;

    const NORTH: &str = "sakqjhakqdakqcakq";
    const EAST: &str = "st98h9876d9876c98";
    const SOUTH: &str = "s765h5432d5432c76";
    const WEST: &str = "s432hjtdjtcjt5432";

    fn card(code: &str) -> Card {
        code.parse().unwrap()
    }

    #[test]
    fn test_defaults() {
        let deal = Deal::new();
        assert_eq!(deal.board(), 1);
        assert_eq!(deal.dealer(), Direction::North);
        assert_eq!(deal.vulnerability(), Vulnerability::None);
        assert_eq!(deal.scoring(), "KO");
        assert_eq!(deal.notes(), "");
        assert_eq!(deal.name(Direction::East), "East");
        assert_eq!(deal.count(Direction::South), 0);
    }

    #[test]
    fn test_header_propagates_to_auction() {
        let mut deal = Deal::new();
        deal.auction_mut().add_call(Call::Pass).unwrap();
        deal.set_dealer(Direction::West).unwrap();
        deal.set_vulnerability(Vulnerability::Both);
        assert_eq!(deal.auction().dealer(), Direction::West);
        assert_eq!(deal.auction().calls().next().unwrap().direction, Direction::West);
        assert!(deal.auction().is_vulnerable(Direction::North));
        assert_eq!(deal.set_board(0), Err(BridgeError::InvalidBoard("0".to_string())));
        assert_eq!(deal.board(), 1);
    }

    #[test]
    fn test_add_and_remove_cards() {
        let mut deal = Deal::new();
        deal.add_card(Direction::North, card("sa")).unwrap();
        assert!(deal.has_card(Direction::North, card("sa")));
        assert_eq!(
            deal.add_card(Direction::East, card("sa")),
            Err(BridgeError::CardAlreadyAssigned {
                card: card("sa"),
                direction: Direction::North
            })
        );
        assert_eq!(
            deal.remove_card(Direction::East, card("sa")),
            Err(BridgeError::CardNotAssigned {
                card: card("sa"),
                direction: Direction::East
            })
        );
        deal.remove_card(Direction::North, card("sa")).unwrap();
        assert_eq!(deal.count(Direction::North), 0);
    }

    #[test]
    fn test_set_hand() {
        let mut deal = Deal::new();
        deal.set_hand(Direction::North, NORTH).unwrap();
        assert_eq!(deal.count(Direction::North), 13);
        assert_eq!(deal.count_in(Direction::North, Suit::Spades), 4);
        assert_eq!(deal.hand(Direction::North).to_string(), NORTH);
        assert_eq!(deal.hand(Direction::North).hcp(), 37);
        assert_eq!(
            deal.add_card(Direction::North, card("s2")),
            Err(BridgeError::HandFull(Direction::North))
        );

        let err = deal.set_hand(Direction::East, "sa").unwrap_err();
        assert!(matches!(err, BridgeError::CardAlreadyAssigned { .. }));
        assert_eq!(deal.count(Direction::East), 0);

        deal.set_hand(Direction::North, "s2").unwrap();
        assert_eq!(deal.hand(Direction::North).to_string(), "s2");
        assert_eq!(
            deal.set_hand(Direction::South, "sakqjt98765432h2"),
            Err(BridgeError::HandFull(Direction::South))
        );
        assert!(matches!(
            deal.set_hand(Direction::South, "shs"),
            Err(BridgeError::StringParse { .. })
        ));
        deal.clear_hand(Direction::North).unwrap();
        assert_eq!(deal.count(Direction::North), 0);
    }

    #[test]
    fn test_assign_rest() {
        let mut deal = Deal::new();
        deal.set_hand(Direction::North, NORTH).unwrap();
        deal.set_hand(Direction::South, "s2").unwrap();
        deal.assign_rest_with(&mut StdRng::seed_from_u64(7)).unwrap();
        for direction in Direction::ALL {
            assert_eq!(deal.count(direction), 13, "{direction}");
        }
        assert_eq!(deal.hand(Direction::North).to_string(), NORTH);
        assert!(deal.has_card(Direction::South, card("s2")));
        assert!(deal.deck().unassigned().is_empty());
        // Nothing left to deal.
        deal.assign_rest().unwrap();
    }

    #[test]
    fn test_load_deal_string() {
        let s = format!("b=5&d=e&v=0&n={NORTH}&e={EAST}&s={SOUTH}&nn=Ann&a=p1nppp&p=cjckc8c6");
        let deal: Deal = s.parse().unwrap();
        assert_eq!(deal.board(), 5);
        assert_eq!(deal.dealer(), Direction::East);
        assert_eq!(deal.vulnerability(), Vulnerability::None);
        assert_eq!(deal.name(Direction::North), "Ann");
        assert_eq!(deal.hand(Direction::West).to_string(), WEST);
        let contract = deal.auction().final_contract().unwrap();
        assert_eq!(contract.declarer, Direction::South);
        assert_eq!(contract.strain, Strain::NoTrump);
        assert_eq!(deal.play().len(), 4);
        assert_eq!(deal.play().ns_tricks(), 1);
        assert_eq!(deal.play().next_to_play(), Direction::North);
    }

    #[test]
    fn test_deal_string_round_trip() {
        let s = format!(
            "b=2&d=s&v=n&t=match&n={NORTH}&nn=A&e={EAST}&en=B&s={SOUTH}&sn=C&w={WEST}&wn=D&a=1cpp1h(natural)ppp&p=s5s2sas8"
        );
        let deal: Deal = s.parse().unwrap();
        assert_eq!(deal.to_string(), s);
    }

    #[test]
    fn test_notes_and_names_with_separators() {
        let mut deal = Deal::new();
        deal.set_notes("NS & EW");
        deal.set_name(Direction::South, "50% Sue");
        let copy: Deal = deal.to_string().parse().unwrap();
        assert_eq!(copy.notes(), "NS & EW");
        assert_eq!(copy.name(Direction::South), "50% Sue");

        deal.load("t=Board%20one&nn=Ann%20Lee").unwrap();
        assert_eq!(deal.notes(), "Board one");
        assert_eq!(deal.name(Direction::North), "Ann Lee");
    }

    #[test]
    fn test_contract_shorthand() {
        let deal: Deal = format!("d=w&n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=-4hxs")
            .parse()
            .unwrap();
        assert_eq!(deal.auction().to_string(), "ppp4hxppp");
        assert_eq!(deal.play().len(), 0);
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=1sppp&p=h9")
            .parse()
            .unwrap();
        let before = deal.to_string();
        for bad in [
            "b=0",
            "b=x&d=s",
            "d=q",
            "v=z",
            "n=sa&e=sa",
            "a=1s1c",
            "p=sa",
            "a=1sppp&p=h9ha",
            "b",
        ] {
            assert!(deal.load(bad).is_err(), "{bad}");
            assert_eq!(deal.to_string(), before, "{bad}");
        }
        assert_eq!(deal.play().len(), 1);
        assert!(deal.deck().is_played(card("h9")));
    }

    #[test]
    fn test_load_replaces_play() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=1sppp&p=h9")
            .parse()
            .unwrap();
        deal.load("a=1nppp").unwrap();
        assert!(deal.play().is_empty());
        assert!(!deal.deck().is_played(card("h9")));
        deal.add_played_card(card("c9"), None).unwrap();
        assert_eq!(deal.play().trump(), Strain::NoTrump);
        assert_eq!(deal.play().leader(), Direction::East);
        assert_eq!(
            deal.add_played_card(card("c2"), None).unwrap_err(),
            BridgeError::CardNotOwned {
                card: card("c2"),
                direction: Direction::South
            }
        );
    }

    #[test]
    fn test_play_requires_finished_auction() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=1s")
            .parse()
            .unwrap();
        assert_eq!(
            deal.add_played_card(card("h9"), None).unwrap_err(),
            BridgeError::AuctionNotComplete
        );
        deal.auction_mut().add_all_pass().unwrap();
        deal.add_played_card(card("h9"), None).unwrap();
        assert_eq!(deal.remove_played_card().unwrap().card, card("h9"));
        assert_eq!(deal.remove_played_card(), Err(BridgeError::NoPlayToRemove));
    }

    #[test]
    fn test_play_follows_current_contract() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=1sppp&p=h9")
            .parse()
            .unwrap();
        deal.remove_played_card().unwrap();
        deal.auction_mut().clear_calls();
        assert_eq!(
            deal.add_played_card(card("h9"), None).unwrap_err(),
            BridgeError::AuctionNotComplete
        );
        assert_eq!(deal.set_play("h9"), Err(BridgeError::AuctionNotComplete));

        deal.auction_mut().load("p1nppp").unwrap();
        let lead = deal.add_played_card(card("s5"), None).unwrap().direction;
        assert_eq!(lead, Direction::South);
        assert_eq!(deal.play().trump(), Strain::NoTrump);
        assert_eq!(deal.play().leader(), Direction::South);

        deal.remove_played_card().unwrap();
        deal.set_dealer(Direction::East).unwrap();
        assert!(!deal.play().is_initialized());
        let lead = deal.add_played_card(card("s4"), None).unwrap().direction;
        assert_eq!(lead, Direction::West);
    }

    #[test]
    fn test_explanations_survive_reload() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}")
            .parse()
            .unwrap();
        assert!(deal
            .auction_mut()
            .add_call_with(Call::Pass, Some("weak (6-10)".to_string()), None)
            .is_err());
        deal.auction_mut()
            .add_call_with(Call::Pass, Some("weak (6-10".to_string()), Some("ok".to_string()))
            .unwrap();
        deal.load("b=2").unwrap();
        assert_eq!(deal.board(), 2);
        let entry = deal.auction().calls().next().unwrap();
        assert_eq!(entry.explanation.as_deref(), Some("weak (6-10"));
        assert_eq!(entry.annotation.as_deref(), Some("ok"));
    }

    #[test]
    fn test_played_cards_stay_in_hand() {
        let mut deal: Deal = format!("n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&a=1sppp&p=h9")
            .parse()
            .unwrap();
        let h9 = card("h9");
        assert_eq!(
            deal.remove_card(Direction::East, h9),
            Err(BridgeError::CardAlreadyPlayed { card: h9 })
        );
        assert_eq!(
            deal.clear_hand(Direction::East),
            Err(BridgeError::CardAlreadyPlayed { card: h9 })
        );
        assert_eq!(deal.count(Direction::East), 13);
    }

    #[test]
    fn test_json_round_trip() {
        let deal: Deal = format!(
            "b=9&d=e&v=b&n={NORTH}&e={EAST}&s={SOUTH}&w={WEST}&wn=Zed&a=p1s(spades)ppp&p=cj{{lead}}"
        )
        .parse()
        .unwrap();
        let json = deal.to_json().unwrap();
        let copy = Deal::from_json(&json).unwrap();
        assert_eq!(copy.to_string(), deal.to_string());
        assert_eq!(copy.scoring(), "KO");
        assert_eq!(copy.play().plays()[0].annotation.as_deref(), Some("lead"));
    }

    #[test]
    fn test_notifications() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut deal = Deal::new();
        let log = Rc::clone(&seen);
        deal.subscribe(move |event| log.borrow_mut().push(event.operation()));
        deal.set_board(3).unwrap();
        deal.set_name(Direction::South, "Sue");
        deal.set_hand(Direction::South, "sa").unwrap();
        deal.add_card(Direction::South, card("sk")).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec!["setBoard", "setName", "setHand", "addCard"]
        );
        assert_eq!(deal.hand(Direction::South).cards[1].rank, Rank::King);
    }
}
