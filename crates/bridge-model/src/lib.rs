pub mod auction;
pub mod board;
pub mod call;
pub mod card;
pub mod contract;
pub mod deal;
pub mod deck;
pub mod error;
pub mod events;
pub mod hand;
pub mod io;
pub mod play;
pub mod played_card;
pub mod rank;
pub mod strain;
pub mod suit;

pub use auction::{Auction, AuctionEvent, AuctionStep};
pub use board::{Direction, Partnership, Vulnerability};
pub use call::{Call, CallEntry};
pub use card::Card;
pub use contract::{AllowedCalls, Contract, ContractSummary, DoubleStatus};
pub use deal::{Deal, DealEvent};
pub use deck::{DealtCard, Deck, OpenDeck, PlayLedger};
pub use error::{BridgeError, Result};
pub use events::Event;
pub use hand::{Hand, Shape};
pub use play::{Play, PlayEvent};
pub use played_card::PlayedCard;
pub use rank::Rank;
pub use strain::Strain;
pub use suit::Suit;
