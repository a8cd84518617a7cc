//! drive-core - Typed vehicle state for connected drive backends
//!
//! A [`VehicleState`] holds the last status document fetched for one vehicle
//! and exposes typed views over it (mileage, locks, lids, windows, position,
//! condition based services, parking lights). Fetching is delegated to a
//! [`SessionClient`], which owns authentication and transport.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut state = VehicleState::new(session, "WBAJC51000B000001");
//! state.refresh().await?;
//!
//! if !state.all_lids_closed()? {
//!     for lid in state.open_lids()? {
//!         println!("{}", lid);
//!     }
//! }
//! ```

pub mod error;
mod fields;
pub mod models;
pub mod session;
pub mod state;

pub use error::{SessionError, SessionResult, StateError, StateResult};
pub use models::*;
pub use session::{vehicle_status_url, SessionClient, VEHICLE_STATUS_PATH};
pub use state::{RawAttributes, VehicleState};
