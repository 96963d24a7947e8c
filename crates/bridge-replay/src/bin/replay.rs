use anyhow::{bail, Context, Result};
use bridge_model::{
    AuctionEvent, Deal, DealEvent, Direction, Event, Hand, PlayEvent, PlayedCard, Suit,
};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay the auction and play of a bridge deal", long_about = None)]
struct Args {
    /// Deal string, e.g. "b=1&d=n&n=sakq...&a=1nppp&p=..."
    #[arg(conflicts_with = "json")]
    deal: Option<String>,

    /// Deal string given as an option
    #[arg(long = "deal", value_name = "DEAL", env = "BRIDGE_DEAL")]
    deal_option: Option<String>,

    /// Read a JSON deal record instead of a deal string. Takes precedence over BRIDGE_DEAL
    #[arg(short, long)]
    json: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "bridge_model=trace". Falls back to RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print every change notification raised while loading and replaying
    #[arg(short, long)]
    events: bool,

    /// Walk through the auction and the play one call and one card at a time
    #[arg(short, long)]
    steps: bool,

    /// Seat shown in the first column of the bidding table
    #[arg(long, default_value = "w")]
    start: String,
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn watch(deal: &mut Deal) {
    deal.subscribe(|event: &DealEvent| println!("deal:{} {:?}", event.operation(), event));
    deal.auction_mut()
        .subscribe(|event: &AuctionEvent| println!("auction:{} {:?}", event.operation(), event));
    deal.play_mut()
        .subscribe(|event: &PlayEvent| println!("play:{} {:?}", event.operation(), event));
}

fn format_hand_line(hand: &Hand) -> String {
    let suits: Vec<String> = Suit::DISPLAY_ORDER
        .iter()
        .map(|&suit| {
            let ranks: String = hand
                .cards
                .iter()
                .filter(|c| c.suit == suit)
                .map(|c| c.rank.to_char())
                .collect();
            let ranks = if ranks.is_empty() { "-".to_string() } else { ranks };
            format!("{}{}", suit.symbol(), ranks)
        })
        .collect();
    let shape = if hand.count() == 13 {
        let lengths: Vec<String> = hand.distribution().iter().map(|l| l.to_string()).collect();
        format!("{} {}", lengths.join("-"), hand.shape())
    } else {
        format!("{} cards", hand.count())
    };
    format!(
        "{:<6} {:<12} {:>2} HCP  {}  ({})",
        hand.direction.name(),
        hand.name,
        hand.hcp(),
        suits.join(" "),
        shape
    )
}

fn format_bidding_table(deal: &Deal, start: Direction) -> String {
    let header: Vec<String> = (0..4)
        .map(|offset| format!("{:<6}", start.rotate(offset).name()))
        .collect();
    let mut out = header.concat().trim_end().to_string();
    out.push('\n');
    for row in deal.auction().bidding_table(start, true) {
        let cells: Vec<String> = row.iter().map(|cell| format!("{:<6}", cell)).collect();
        out.push_str(cells.concat().trim_end());
        out.push('\n');
    }
    out
}

fn format_played(played: &PlayedCard) -> String {
    let mut line = format!(
        "{:>2}. {:<5} {}",
        played.play_number,
        played.direction.name(),
        played.card
    );
    if let Some(annotation) = &played.annotation {
        line.push_str(&format!("  {{{}}}", annotation));
    }
    if played.ends_trick() {
        line.push_str(&format!(
            "  trick {} to {} (NS {}, EW {})",
            played.trick_number(),
            played.next_to_play.name(),
            played.ns_tricks,
            played.ew_tricks
        ));
    }
    line
}

fn print_board(deal: &Deal) {
    println!(
        "Board {}  Dealer {}  Vulnerable {}  Scoring {}",
        deal.board(),
        deal.dealer(),
        deal.vulnerability(),
        deal.scoring()
    );
    if !deal.notes().is_empty() {
        println!("Notes: {}", deal.notes());
    }
    println!();
    for direction in Direction::ALL {
        println!("{}", format_hand_line(&deal.hand(direction)));
    }
    println!();
}

fn print_contract(deal: &Deal) {
    let auction = deal.auction();
    match auction.final_contract() {
        Some(contract) => println!("Contract: {}", contract.render()),
        None if auction.is_complete() => println!("Contract: passed out"),
        None => println!("Contract: auction in progress"),
    }
}

fn replay_steps(deal: &mut Deal) -> Result<()> {
    let auction = deal.auction_mut();
    if auction.position() > 0 {
        auction.rewind_auction_all()?;
    }
    while auction.position() < auction.len() {
        auction.advance_auction()?;
        let step = &auction.steps()[auction.position() - 1];
        let entry = &step.entry;
        let mut line = format!("{:<6} {}", entry.direction.name(), entry.call.render());
        if let Some(explanation) = &entry.explanation {
            line.push_str(&format!("  ({})", explanation));
        }
        if let Some(annotation) = &entry.annotation {
            line.push_str(&format!("  {{{}}}", annotation));
        }
        println!("{}", line);
    }
    println!();

    let play = deal.play_mut();
    if play.position() > 0 {
        play.undo_play_all()?;
    }
    while play.position() < play.len() {
        play.play_card()?;
        if let Some(played) = play.current() {
            println!("{}", format_played(played));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level.as_deref());

    let start: Direction = args.start.parse()?;
    let mut deal = Deal::new();
    if args.events {
        watch(&mut deal);
    }

    match (&args.json, args.deal.as_ref().or(args.deal_option.as_ref())) {
        (Some(path), _) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            deal.load_json(&json)
                .with_context(|| format!("Failed to load {}", path.display()))?;
        }
        (None, Some(text)) => deal.load(text).context("Failed to load deal string")?,
        (None, None) => bail!("No deal given: pass a deal string, set BRIDGE_DEAL, or use --json"),
    }
    info!(board = deal.board(), calls = deal.auction().len(), plays = deal.play().len(), "deal loaded");

    print_board(&deal);
    print!("{}", format_bidding_table(&deal, start));
    println!();
    print_contract(&deal);

    if args.steps {
        println!();
        replay_steps(&mut deal)?;
    }

    let play = deal.play();
    if !play.is_empty() {
        println!(
            "Tricks: NS {}  EW {}  ({} of 52 cards played)",
            play.ns_tricks(),
            play.ew_tricks(),
            play.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEAL: &str = "b=3&d=s&n=sakqjhakqdakqcakq&nn=Ann&e=st98h9876d9876c98\
&s=s765h5432d5432c76&w=s432hjtdjtcjt5432&a=1dp1np3nppp&p=s8s5s4sa";

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["replay", "--steps", "-l", "debug", "b=2"]).unwrap();
        assert!(args.steps);
        assert!(!args.events);
        assert_eq!(args.deal.as_deref(), Some("b=2"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.start, "w");
        assert!(Args::try_parse_from(["replay", "b=2", "--json", "deal.json"]).is_err());
    }

    #[test]
    fn test_hand_line() {
        let deal: Deal = DEAL.parse().unwrap();
        assert_eq!(
            format_hand_line(&deal.hand(Direction::North)),
            "North  Ann          37 HCP  ♠AKQJ ♥AKQ ♦AKQ ♣AKQ  (4-3-3-3 balanced)"
        );
        let empty = Deal::new();
        assert_eq!(
            format_hand_line(&empty.hand(Direction::West)),
            "West   West          0 HCP  ♠- ♥- ♦- ♣-  (0 cards)"
        );
    }

    #[test]
    fn test_bidding_table() {
        let deal: Deal = DEAL.parse().unwrap();
        assert_eq!(
            format_bidding_table(&deal, Direction::West),
            "West  North East  South\n\
-     -     -     1D\n\
P     1N    P     3N\n\
P     P     P\n"
        );
    }

    #[test]
    fn test_played_line() {
        let deal: Deal = DEAL.parse().unwrap();
        let plays = deal.play().plays();
        assert_eq!(format_played(&plays[0]), " 1. East  S8");
        assert_eq!(
            format_played(&plays[3]),
            " 4. North SA  trick 1 to North (NS 1, EW 0)"
        );
    }

    #[test]
    fn test_steps_rewind_and_replay() {
        let mut deal: Deal = DEAL.parse().unwrap();
        replay_steps(&mut deal).unwrap();
        assert_eq!(deal.auction().position(), deal.auction().len());
        assert_eq!(deal.play().position(), 4);
        assert_eq!(deal.play().ns_tricks(), 1);
    }
}
