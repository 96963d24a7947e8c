use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partnership {
    NS,
    EW,
}

impl Partnership {
    pub fn contains(self, direction: Direction) -> bool {
        direction.partnership() == self
    }

    pub fn idx(self) -> usize {
        match self {
            Partnership::NS => 0,
            Partnership::EW => 1,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Partnership::NS => Partnership::EW,
            Partnership::EW => Partnership::NS,
        }
    }
}

impl Direction {
    /// Clockwise order, which is also the order of the auction.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn partnership(self) -> Partnership {
        match self {
            Direction::North | Direction::South => Partnership::NS,
            Direction::East | Direction::West => Partnership::EW,
        }
    }

    pub fn idx(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Left-hand opponent (next in clockwise bidding order).
    pub fn lho(self) -> Self {
        Direction::ALL[(self.idx() + 1) % 4]
    }

    /// Right-hand opponent (previous in clockwise bidding order).
    pub fn rho(self) -> Self {
        Direction::ALL[(self.idx() + 3) % 4]
    }

    pub fn partner(self) -> Self {
        Direction::ALL[(self.idx() + 2) % 4]
    }

    /// The direction reached by stepping `steps` times to the left.
    pub fn rotate(self, steps: usize) -> Self {
        Direction::ALL[(self.idx() + steps) % 4]
    }

    pub fn is_opponent_of(self, other: Direction) -> bool {
        self.partnership() != other.partnership()
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }

    pub fn code(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::East => 'e',
            Direction::South => 's',
            Direction::West => 'w',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(Direction::North),
            'e' => Some(Direction::East),
            's' => Some(Direction::South),
            'w' => Some(Direction::West),
            _ => None,
        }
    }

    pub fn dealer_from_board_number(board_number: u32) -> Self {
        let index = (board_number + 3) % 4;
        Direction::ALL[index as usize]
    }
}

impl FromStr for Direction {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Direction::from_char(c).ok_or_else(|| BridgeError::InvalidDirection(s.to_string()))
            }
            _ => Direction::ALL
                .into_iter()
                .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
                .ok_or_else(|| BridgeError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Vulnerability {
    #[default]
    None,
    NS,
    EW,
    Both,
}

impl Vulnerability {
    pub const ALL: [Vulnerability; 4] = [
        Vulnerability::None,
        Vulnerability::NS,
        Vulnerability::EW,
        Vulnerability::Both,
    ];

    pub fn is_vulnerable(self, direction: Direction) -> bool {
        match self {
            Vulnerability::None => false,
            Vulnerability::NS => direction.partnership() == Partnership::NS,
            Vulnerability::EW => direction.partnership() == Partnership::EW,
            Vulnerability::Both => true,
        }
    }

    pub fn code(self) -> char {
        match self {
            Vulnerability::None => '-',
            Vulnerability::NS => 'n',
            Vulnerability::EW => 'e',
            Vulnerability::Both => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '-' | '0' => Some(Vulnerability::None),
            'n' => Some(Vulnerability::NS),
            'e' => Some(Vulnerability::EW),
            'b' => Some(Vulnerability::Both),
            _ => None,
        }
    }

    pub fn from_board_number(board_number: u32) -> Self {
        // http://www.jazclass.aust.com/bridge/scoring/score11.htm
        match board_number % 16 {
            1 | 8 | 11 | 14 => Vulnerability::None,
            2 | 5 | 12 | 15 => Vulnerability::NS,
            3 | 6 | 9 | 0 => Vulnerability::EW,
            _ => Vulnerability::Both,
        }
    }
}

impl FromStr for Vulnerability {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Vulnerability::from_char(c)
                .ok_or_else(|| BridgeError::InvalidVulnerability(s.to_string())),
            _ => Err(BridgeError::InvalidVulnerability(s.to_string())),
        }
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vulnerability::None => "None",
            Vulnerability::NS => "North-South",
            Vulnerability::EW => "East-West",
            Vulnerability::Both => "Both",
        };
        write!(f, "{}", name)
    }
}
