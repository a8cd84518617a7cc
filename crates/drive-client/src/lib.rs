//! Connected Drive Client Library
//!
//! Provides an HTTP [`SessionClient`](drive_core::SessionClient) for
//! connected drive backends.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use drive_client::DriveClient;
//! use drive_core::VehicleState;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DriveClient::with_bearer_token("https://backend.example.com", "token")?;
//!
//!     let mut state = VehicleState::new(Arc::new(client), "WBAJC51000B000001");
//!     state.refresh().await?;
//!
//!     println!("Mileage: {:?}", state.mileage()?);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
pub mod testing;

pub use client::DriveClient;
pub use error::{ErrorResponse, Result};

// Re-export core types for convenience
pub use drive_core::{SessionClient, SessionError, VehicleState};
