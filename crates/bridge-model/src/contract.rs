use crate::board::{Direction, Partnership};
use crate::call::Call;
use crate::error::{BridgeError, Result};
use crate::strain::Strain;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DoubleStatus {
    #[default]
    Undoubled,
    Doubled,
    Redoubled,
}

impl DoubleStatus {
    pub fn code(self) -> &'static str {
        match self {
            DoubleStatus::Undoubled => "",
            DoubleStatus::Doubled => "x",
            DoubleStatus::Redoubled => "xx",
        }
    }
}

/// The state of an auction after some number of calls.
///
/// Each call is folded into a copy of the previous snapshot, so an auction
/// keeps one of these per call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Contract {
    level: Option<u8>,
    strain: Option<Strain>,
    double_status: DoubleStatus,
    declarer: Option<Direction>,
    /// First member of each partnership to name each strain, indexed by
    /// strain then partnership.
    first_to_bid: [[Option<Direction>; 2]; 5],
    num_passes: u8,
    is_complete: bool,
}

impl Contract {
    /// Nothing called yet.
    pub const EMPTY: Contract = Contract {
        level: None,
        strain: None,
        double_status: DoubleStatus::Undoubled,
        declarer: None,
        first_to_bid: [[None; 2]; 5],
        num_passes: 0,
        is_complete: false,
    };

    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> Option<u8> {
        self.level
    }

    pub fn strain(&self) -> Option<Strain> {
        self.strain
    }

    pub fn double_status(&self) -> DoubleStatus {
        self.double_status
    }

    pub fn is_doubled(&self) -> bool {
        self.double_status != DoubleStatus::Undoubled
    }

    pub fn is_redoubled(&self) -> bool {
        self.double_status == DoubleStatus::Redoubled
    }

    pub fn declarer(&self) -> Option<Direction> {
        self.declarer
    }

    pub fn num_passes(&self) -> u8 {
        self.num_passes
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Whoever on `direction`'s side first bid `strain`.
    pub fn first_to_bid(&self, strain: Strain, direction: Direction) -> Option<Direction> {
        self.first_to_bid[strain.idx()][direction.partnership().idx()]
    }

    /// The opening leader, left of declarer.
    pub fn leader(&self) -> Option<Direction> {
        self.declarer.map(Direction::lho)
    }

    pub fn summary(&self) -> Option<ContractSummary> {
        match (self.level, self.strain, self.declarer) {
            (Some(level), Some(strain), Some(declarer)) => Some(ContractSummary {
                level,
                strain,
                double_status: self.double_status,
                declarer,
            }),
            _ => None,
        }
    }

    /// Checks `call` by `direction` against the current state without
    /// changing anything.
    pub fn check(&self, call: Call, direction: Direction) -> Result<()> {
        let illegal = |reason| BridgeError::IllegalCall {
            call: call.to_string(),
            reason,
        };
        if self.is_complete {
            return Err(illegal("the auction is already complete"));
        }
        match call {
            Call::Pass => Ok(()),
            Call::Double => match self.declarer {
                None => Err(illegal("there is no bid to double")),
                Some(declarer) if !declarer.is_opponent_of(direction) => {
                    Err(illegal("cannot double your own side's bid"))
                }
                Some(_) if self.is_doubled() => Err(illegal("the bid is already doubled")),
                Some(_) => Ok(()),
            },
            Call::Redouble => match self.declarer {
                _ if self.double_status != DoubleStatus::Doubled => {
                    Err(illegal("only a doubled bid can be redoubled"))
                }
                Some(declarer) if declarer.is_opponent_of(direction) => {
                    Err(illegal("cannot redouble the opponents' bid"))
                }
                _ => Ok(()),
            },
            Call::Bid { level, strain } => {
                if !(1..=7).contains(&level) {
                    return Err(BridgeError::InvalidLevel(level.to_string()));
                }
                match (self.level, self.strain) {
                    (Some(current), Some(current_strain))
                        if (level, strain) <= (current, current_strain) =>
                    {
                        Err(illegal("insufficient bid"))
                    }
                    _ => Ok(()),
                }
            }
        }
    }

    /// Folds one call into this snapshot. Nothing changes on error.
    pub fn apply(&mut self, call: Call, direction: Direction) -> Result<()> {
        self.check(call, direction)?;
        trace!(%call, %direction, "folding call into contract");
        match call {
            Call::Pass => {
                self.num_passes += 1;
                if (self.declarer.is_some() && self.num_passes == 3) || self.num_passes == 4 {
                    self.is_complete = true;
                }
            }
            Call::Double => {
                self.double_status = DoubleStatus::Doubled;
                self.num_passes = 0;
            }
            Call::Redouble => {
                self.double_status = DoubleStatus::Redoubled;
                self.num_passes = 0;
            }
            Call::Bid { level, strain } => {
                self.double_status = DoubleStatus::Undoubled;
                self.num_passes = 0;
                let slot = &mut self.first_to_bid[strain.idx()][direction.partnership().idx()];
                let declarer = *slot.get_or_insert(direction);
                self.declarer = Some(declarer);
                self.level = Some(level);
                self.strain = Some(strain);
            }
        }
        Ok(())
    }

    /// Which calls `direction` could make next.
    pub fn allowed_calls(&self, direction: Direction) -> AllowedCalls {
        let mut bids = [[false; 5]; 7];
        for call in Call::all() {
            if let Call::Bid { level, strain } = call {
                bids[level as usize - 1][strain.idx()] = self.check(call, direction).is_ok();
            }
        }
        let minimum_level = (1..=7u8).find(|level| bids[*level as usize - 1].iter().any(|&b| b));
        let pass = self.check(Call::Pass, direction).is_ok();
        AllowedCalls {
            pass,
            all_pass: pass,
            double: self.check(Call::Double, direction).is_ok(),
            redouble: self.check(Call::Redouble, direction).is_ok(),
            undo: self.strain.is_some() || self.num_passes != 0,
            minimum_level,
            bids,
        }
    }
}

/// `<level><strain>[x|xx]<declarer>`, or empty while nothing has been bid.
impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.summary() {
            Some(summary) => write!(f, "{}", summary),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedCalls {
    pub pass: bool,
    /// Finishing the auction with passes is possible whenever a pass is.
    pub all_pass: bool,
    pub double: bool,
    pub redouble: bool,
    /// Something has been called, so there is a call to take back.
    pub undo: bool,
    /// Lowest level at which some bid is still legal.
    pub minimum_level: Option<u8>,
    bids: [[bool; 5]; 7],
}

impl AllowedCalls {
    pub fn is_allowed(&self, call: Call) -> bool {
        match call {
            Call::Pass => self.pass,
            Call::Double => self.double,
            Call::Redouble => self.redouble,
            Call::Bid { level, strain } if (1..=7).contains(&level) => {
                self.bids[level as usize - 1][strain.idx()]
            }
            Call::Bid { .. } => false,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        Call::all().filter(|call| self.is_allowed(*call)).collect()
    }
}

/// A final contract as written in the contract text format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContractSummary {
    pub level: u8,
    pub strain: Strain,
    pub double_status: DoubleStatus,
    pub declarer: Direction,
}

impl ContractSummary {
    pub fn partnership(&self) -> Partnership {
        self.declarer.partnership()
    }

    pub fn is_game(&self) -> bool {
        match self.strain {
            Strain::NoTrump => self.level >= 3,
            Strain::Hearts | Strain::Spades => self.level >= 4,
            Strain::Clubs | Strain::Diamonds => self.level >= 5,
        }
    }

    pub fn is_slam(&self) -> bool {
        self.level >= 6
    }

    pub fn is_grand_slam(&self) -> bool {
        self.level == 7
    }

    pub fn call(&self) -> Call {
        Call::Bid {
            level: self.level,
            strain: self.strain,
        }
    }

    /// Human form, e.g. `4HX by South`.
    pub fn render(&self) -> String {
        let doubles = match self.double_status {
            DoubleStatus::Undoubled => "",
            DoubleStatus::Doubled => "X",
            DoubleStatus::Redoubled => "XX",
        };
        format!("{}{} by {}", self.call().render(), doubles, self.declarer)
    }
}

static CONTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(?i)^([1-7])([cdhsn])(x{0,2})([nesw])$").unwrap()
});

impl FromStr for ContractSummary {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = CONTRACT_RE
            .captures(s.trim())
            .ok_or_else(|| BridgeError::parse(s, "expected <level><strain>[x[x]]<declarer>"))?;
        let level = caps[1]
            .parse::<u8>()
            .map_err(|_| BridgeError::InvalidLevel(caps[1].to_string()))?;
        let strain = caps[2].parse::<Strain>()?;
        let double_status = match caps[3].len() {
            0 => DoubleStatus::Undoubled,
            1 => DoubleStatus::Doubled,
            _ => DoubleStatus::Redoubled,
        };
        let declarer = caps[4].parse::<Direction>()?;
        Ok(ContractSummary {
            level,
            strain,
            double_status,
            declarer,
        })
    }
}

impl fmt::Display for ContractSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.level,
            self.strain.code(),
            self.double_status.code(),
            self.declarer.code()
        )
    }
}
