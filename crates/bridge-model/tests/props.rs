//! Property tests for the auction and play invariants.

mod common;

use bridge_model::io::hand_string::{format_hand, parse_hand};
use bridge_model::{
    Auction, Call, Card, ContractSummary, Deal, Direction, PlayLedger, Strain, Vulnerability,
};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn call() -> impl Strategy<Value = Call> {
    prop::sample::select(Call::all().collect::<Vec<_>>())
}

fn strain() -> impl Strategy<Value = Strain> {
    prop::sample::select(Strain::ALL.to_vec())
}

/// Feeds `calls` to a fresh auction, skipping the ones that are illegal at
/// that point.
fn bid(dealer: Direction, calls: &[Call]) -> Auction {
    let mut auction = Auction::new(dealer, Vulnerability::None);
    for &call in calls {
        let _ = auction.add_call(call);
    }
    auction
}

proptest! {
    #![proptest_config(proptest_config())]

    /// Property: the seat to call is the dealer moved left once per call,
    /// and every call has its contract snapshot.
    #[test]
    fn prop_next_to_call_rotates(
        dealer in direction(),
        calls in prop::collection::vec(call(), 0..48),
    ) {
        let mut auction = Auction::new(dealer, Vulnerability::None);
        let mut accepted = 0;
        for call in calls {
            if auction.add_call(call).is_ok() {
                accepted += 1;
            }
            prop_assert_eq!(auction.len(), accepted);
            prop_assert_eq!(auction.contracts().count(), auction.calls().count());
            prop_assert_eq!(auction.next_to_call(), dealer.rotate(accepted));
        }
        for (i, entry) in auction.calls().enumerate() {
            prop_assert_eq!(entry.direction, dealer.rotate(i));
        }
    }

    /// Property: a rejected call leaves the auction untouched.
    #[test]
    fn prop_illegal_call_changes_nothing(
        dealer in direction(),
        calls in prop::collection::vec(call(), 0..24),
        next in call(),
    ) {
        let mut auction = bid(dealer, &calls);
        let before = auction.steps().to_vec();
        if auction.add_call(next).is_err() {
            prop_assert_eq!(auction.steps(), &before[..]);
        }
    }

    /// Property: removing a call right after adding it restores the auction.
    #[test]
    fn prop_add_then_remove_restores(
        dealer in direction(),
        calls in prop::collection::vec(call(), 0..24),
        next in call(),
    ) {
        let mut auction = bid(dealer, &calls);
        let steps = auction.steps().to_vec();
        let next_to_call = auction.next_to_call();
        let selected_level = auction.selected_level();
        if auction.add_call(next).is_ok() {
            let removed = auction.remove_call().unwrap();
            prop_assert_eq!(removed.call, next);
            prop_assert_eq!(auction.steps(), &steps[..]);
            prop_assert_eq!(auction.next_to_call(), next_to_call);
            prop_assert_eq!(auction.selected_level(), selected_level);
        }
    }

    /// Property: an auction written out and read back is the same auction.
    #[test]
    fn prop_auction_string_round_trip(
        dealer in direction(),
        calls in prop::collection::vec(call(), 0..48),
    ) {
        let auction = bid(dealer, &calls);
        let mut reloaded = Auction::new(dealer, Vulnerability::None);
        reloaded.load(&auction.to_string()).unwrap();
        prop_assert_eq!(reloaded.steps(), auction.steps());
        prop_assert_eq!(reloaded.to_string(), auction.to_string());
    }

    /// Property: the shortest auction for a contract produces that contract.
    #[test]
    fn prop_set_contract_reaches_contract(
        dealer in direction(),
        declarer in direction(),
        level in 1u8..=7,
        strain in strain(),
        doubles in 0usize..3,
    ) {
        let text = format!(
            "{}{}{}{}",
            level,
            strain.code(),
            "x".repeat(doubles),
            declarer.code()
        );
        let summary: ContractSummary = text.parse().unwrap();
        let mut auction = Auction::new(dealer, Vulnerability::None);
        auction.set_contract(&text).unwrap();
        prop_assert!(auction.is_complete());
        prop_assert_eq!(auction.final_contract(), Some(summary));
        prop_assert_eq!(auction.contract().to_string(), text);
    }

    /// Property: hand strings list each card once and read back the same.
    #[test]
    fn prop_hand_string_round_trip(
        cards in prop::sample::subsequence(Card::all().collect::<Vec<_>>(), 0..=13),
    ) {
        let text = format_hand(&cards);
        let mut parsed = parse_hand(&text).unwrap();
        parsed.sort_by_key(|c| c.idx());
        prop_assert_eq!(parsed, cards);
        prop_assert_eq!(format_hand(&parse_hand(&text.to_uppercase()).unwrap()), text);
    }

    /// Property: playing out a random deal counts every finished trick
    /// exactly once and never plays a card twice.
    #[test]
    fn prop_tricks_add_up(
        seed in any::<u64>(),
        declarer in direction(),
        strain in strain(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..=52),
    ) {
        common::init_logging();
        let mut deal = Deal::new();
        deal.assign_rest_with(&mut StdRng::seed_from_u64(seed)).unwrap();
        deal.auction_mut()
            .set_contract(&format!("1{}{}", strain.code(), declarer.code()))
            .unwrap();

        for pick in &picks {
            let seat = deal.play().next_to_play();
            let playable: Vec<Card> = deal
                .hand(seat)
                .cards
                .into_iter()
                .filter(|&c| !deal.deck().is_played(c))
                .collect();
            let card = *pick.get(&playable);
            deal.add_played_card(card, None).unwrap();
        }

        let play = deal.play();
        prop_assert_eq!(play.len(), picks.len());
        prop_assert_eq!(
            (play.ns_tricks() + play.ew_tricks()) as usize,
            picks.len() / 4
        );
        let mut seen: Vec<usize> = play.plays().iter().map(|p| p.card.idx()).collect();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), picks.len());
        if let Some(first) = play.plays().first() {
            prop_assert_eq!(first.direction, declarer.lho());
        }

        let copy: Deal = deal.to_string().parse().unwrap();
        prop_assert_eq!(copy.to_string(), deal.to_string());
        prop_assert_eq!(copy.play().plays(), deal.play().plays());
    }
}
