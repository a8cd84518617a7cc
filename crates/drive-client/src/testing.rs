//! Test utilities for drive-client
//!
//! Provides an in-process backend for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{DriveClient, Result};
use drive_core::VEHICLE_STATUS_PATH;

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: DriveClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Create a new test server from an axum Router
    ///
    /// # Example
    ///
    /// ```ignore
    /// use drive_client::testing::{status_router, TestServer};
    ///
    /// let server = TestServer::start(status_router(statuses)).await?;
    /// let body = server.client.get_json("/api/vehicle/dynamic/v1/VIN").await?;
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Create a new test server with custom timeouts
    pub async fn start_with_timeout(
        router: Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| drive_core::SessionError::Transport(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| drive_core::SessionError::Transport(e.to_string()))?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let base_url = format!("http://{}", addr);
        let client = DriveClient::with_config(&base_url, timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a reference to the client
    pub fn client(&self) -> &DriveClient {
        &self.client
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Router serving `{"vehicleStatus": ...}` documents keyed by VIN.
///
/// Unknown VINs answer 404 with an `{"error": ...}` body.
pub fn status_router(statuses: HashMap<String, Value>) -> Router {
    Router::new()
        .route(&format!("{}/{{vin}}", VEHICLE_STATUS_PATH), get(vehicle_status))
        .with_state(Arc::new(statuses))
}

async fn vehicle_status(
    State(statuses): State<Arc<HashMap<String, Value>>>,
    Path(vin): Path<String>,
) -> (StatusCode, Json<Value>) {
    match statuses.get(&vin) {
        Some(status) => (StatusCode::OK, Json(json!({ "vehicleStatus": status }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Unknown vehicle: {}", vin) })),
        ),
    }
}
