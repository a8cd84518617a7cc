//! Lid and window models

use serde::{Deserialize, Serialize};

use crate::error::{StateError, StateResult};

/// Status keys of the lids (doors, hood, trunk) in the status document
pub const LIDS: [&str; 6] = [
    "doorDriverFront",
    "doorPassengerFront",
    "doorDriverRear",
    "doorPassengerRear",
    "hood",
    "trunk",
];

/// Status keys of the windows in the status document
pub const WINDOWS: [&str; 4] = [
    "windowDriverFront",
    "windowPassengerFront",
    "windowDriverRear",
    "windowPassengerRear",
];

/// Possible states of doors, hood, trunk and windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LidState {
    Closed,
    Open,
    Intermediate,
}

impl LidState {
    /// Literal used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            LidState::Closed => "CLOSED",
            LidState::Open => "OPEN",
            LidState::Intermediate => "INTERMEDIATE",
        }
    }
}

impl std::fmt::Display for LidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LidState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLOSED" => Ok(LidState::Closed),
            "OPEN" => Ok(LidState::Open),
            "INTERMEDIATE" => Ok(LidState::Intermediate),
            _ => Err(format!("Unknown lid state: '{}'", s)),
        }
    }
}

/// A lid of the vehicle: a door, the hood or the trunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lid {
    /// Status key of the lid (e.g. "doorDriverFront")
    pub name: String,
    /// Reported state
    pub state: LidState,
}

/// A window of the vehicle. Windows behave exactly like lids.
pub type Window = Lid;

impl Lid {
    /// Create a lid from its status key and the backend literal
    pub fn new(name: impl Into<String>, state: &str) -> StateResult<Self> {
        let name = name.into();
        let state = state
            .parse()
            .map_err(|_| StateError::invalid_value(&name, state))?;
        Ok(Self { name, state })
    }

    /// Check if the lid is closed
    pub fn is_closed(&self) -> bool {
        self.state == LidState::Closed
    }
}

impl std::fmt::Display for Lid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.state)
    }
}
