//! Typed views over the vehicle status document

mod lid;
mod position;
mod service;
mod status;

pub use lid::*;
pub use position::*;
pub use service::*;
pub use status::*;
