//! Command implementations for drive-cli

pub mod lids;
pub mod position;
pub mod raw;
pub mod services;
pub mod status;

pub use lids::{lids, windows};
pub use position::position;
pub use raw::raw;
pub use services::services;
pub use status::status;
