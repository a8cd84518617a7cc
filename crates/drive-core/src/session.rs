//! SessionClient trait - the capability a vehicle state needs to refresh itself

use async_trait::async_trait;

use crate::error::SessionResult;

/// Path template of the vehicle status resource, relative to the server URL
pub const VEHICLE_STATUS_PATH: &str = "/api/vehicle/dynamic/v1";

/// An authenticated connection to the vendor backend.
///
/// Implementations own authentication, transport and timeouts. A vehicle
/// state only asks for a URL and receives the parsed JSON body.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Base URL of the backend server (e.g. "https://b2vapi.example.com")
    fn server_url(&self) -> &str;

    /// Request a resource and return the parsed JSON body
    async fn request(&self, url: &str) -> SessionResult<serde_json::Value>;
}

/// Build the status URL of a vehicle on the given server
pub fn vehicle_status_url(server_url: &str, vin: &str) -> String {
    format!(
        "{}{}/{}",
        server_url.trim_end_matches('/'),
        VEHICLE_STATUS_PATH,
        vin
    )
}
