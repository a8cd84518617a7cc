//! Vehicle position

use serde::{Deserialize, Serialize};

/// Status literal of a position the backend is allowed to report
pub const POSITION_STATUS_OK: &str = "OK";

/// Last known GPS position of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPosition {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<GpsPosition> for (f64, f64) {
    fn from(pos: GpsPosition) -> Self {
        (pos.latitude, pos.longitude)
    }
}

impl std::fmt::Display for GpsPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
