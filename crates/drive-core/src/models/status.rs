//! Door lock and parking light states

use serde::{Deserialize, Serialize};

/// Possible states of the door locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LockState {
    Locked,
    Secured,
    SelectiveLocked,
    Unlocked,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Locked => "LOCKED",
            LockState::Secured => "SECURED",
            LockState::SelectiveLocked => "SELECTIVELOCKED",
            LockState::Unlocked => "UNLOCKED",
        }
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LockState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCKED" => Ok(LockState::Locked),
            "SECURED" => Ok(LockState::Secured),
            "SELECTIVELOCKED" => Ok(LockState::SelectiveLocked),
            "UNLOCKED" => Ok(LockState::Unlocked),
            _ => Err(format!("Unknown lock state: '{}'", s)),
        }
    }
}

/// Possible states of the parking lights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParkingLightState {
    Left,
    Right,
    Off,
}

impl ParkingLightState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkingLightState::Left => "LEFT",
            ParkingLightState::Right => "RIGHT",
            ParkingLightState::Off => "OFF",
        }
    }
}

impl std::fmt::Display for ParkingLightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParkingLightState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEFT" => Ok(ParkingLightState::Left),
            "RIGHT" => Ok(ParkingLightState::Right),
            "OFF" => Ok(ParkingLightState::Off),
            _ => Err(format!("Unknown parking light state: '{}'", s)),
        }
    }
}
