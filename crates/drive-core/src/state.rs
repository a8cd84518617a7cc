//! VehicleState - typed accessors over the last fetched status document

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

use crate::error::{StateError, StateResult};
use crate::fields;
use crate::models::{
    ConditionBasedServiceReport, GpsPosition, Lid, LockState, ParkingLightState, Window, LIDS,
    POSITION_STATUS_OK, WINDOWS,
};
use crate::session::{vehicle_status_url, SessionClient};

/// Raw status attributes of one vehicle, as returned by the backend
pub type RawAttributes = Map<String, Value>;

/// Format of `updateTime` in the status document
const UPDATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// State of a vehicle.
///
/// Holds the `vehicleStatus` object of the last successful refresh. Until
/// then every backend accessor fails with [`StateError::NoData`]. Keys the
/// backend did not send are logged and reported as `None`.
pub struct VehicleState {
    client: Arc<dyn SessionClient>,
    vin: String,
    attributes: Option<RawAttributes>,
}

impl std::fmt::Debug for VehicleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleState")
            .field("vin", &self.vin)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl VehicleState {
    /// Create an empty state for the vehicle with the given VIN
    pub fn new(client: Arc<dyn SessionClient>, vin: impl Into<String>) -> Self {
        Self {
            client,
            vin: vin.into(),
            attributes: None,
        }
    }

    /// VIN of the vehicle
    pub fn vin(&self) -> &str {
        &self.vin
    }

    /// Check if a status document has been loaded
    pub fn has_data(&self) -> bool {
        self.attributes.is_some()
    }

    /// Read new status data from the server.
    ///
    /// Replaces the previous attributes. Session failures are returned as is.
    pub async fn refresh(&mut self) -> StateResult<()> {
        let url = vehicle_status_url(self.client.server_url(), &self.vin);
        debug!(vin = %self.vin, "Requesting new vehicle status");

        let response = self.client.request(&url).await?;
        self.load_response(response)?;

        debug!(vin = %self.vin, "Received new vehicle status");
        Ok(())
    }

    /// Load a status response (`{"vehicleStatus": {...}}`) obtained elsewhere,
    /// e.g. a stored copy of an earlier response.
    pub fn load_response(&mut self, mut response: Value) -> StateResult<()> {
        let status = response
            .as_object_mut()
            .and_then(|obj| obj.remove("vehicleStatus"))
            .ok_or_else(|| StateError::InvalidResponse("missing vehicleStatus".to_string()))?;

        match status {
            Value::Object(attributes) => {
                self.attributes = Some(attributes);
                Ok(())
            }
            other => Err(StateError::InvalidResponse(format!(
                "vehicleStatus is not an object: {}",
                other
            ))),
        }
    }

    /// Run a read against the attributes.
    ///
    /// Fails with [`StateError::NoData`] before the first refresh. A missing
    /// key is logged and turned into `None`; other errors are returned.
    fn guarded<'a, T>(
        &'a self,
        field: &str,
        read: impl FnOnce(&'a RawAttributes) -> StateResult<T>,
    ) -> StateResult<Option<T>> {
        let attributes = self.attributes.as_ref().ok_or(StateError::NoData)?;

        match read(attributes) {
            Ok(value) => Ok(Some(value)),
            Err(StateError::MissingKey(key)) => {
                error!(vin = %self.vin, field, key = %key, "No data available");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// All attributes from the server, unparsed
    pub fn attributes(&self) -> StateResult<&RawAttributes> {
        self.attributes.as_ref().ok_or(StateError::NoData)
    }

    /// Time the data was recorded by the vehicle
    pub fn timestamp(&self) -> StateResult<Option<DateTime<FixedOffset>>> {
        self.guarded("timestamp", |attrs| {
            let value = fields::string("updateTime", fields::get(attrs, "updateTime")?)?;
            DateTime::parse_from_str(value, UPDATE_TIME_FORMAT)
                .map_err(|_| StateError::invalid_value("updateTime", value))
        })
    }

    /// Last known position of the vehicle.
    ///
    /// Only available while vehicle tracking is enabled.
    pub fn gps_position(&self) -> StateResult<Option<GpsPosition>> {
        self.guarded("gps_position", |attrs| {
            let pos = fields::object("position", fields::get(attrs, "position")?)?;
            let status = fields::string("status", fields::get(pos, "status")?)?;

            if status != POSITION_STATUS_OK {
                warn!("Positioning status of {} is {}", self.vin, status);
                return Ok(None);
            }

            let latitude = fields::float("lat", fields::get(pos, "lat")?)?;
            let longitude = fields::float("lon", fields::get(pos, "lon")?)?;
            Ok(Some(GpsPosition::new(latitude, longitude)))
        })
        .map(Option::flatten)
    }

    /// Check if the position tracking of the vehicle is enabled
    pub fn is_vehicle_tracking_enabled(&self) -> StateResult<Option<bool>> {
        self.guarded("is_vehicle_tracking_enabled", |attrs| {
            let pos = fields::object("position", fields::get(attrs, "position")?)?;
            Ok(fields::get(pos, "status")?.as_str() == Some(POSITION_STATUS_OK))
        })
    }

    /// Mileage of the vehicle
    pub fn mileage(&self) -> StateResult<Option<f64>> {
        self.number("mileage", "mileage")
    }

    /// Remaining range of the vehicle on fuel
    pub fn remaining_range_fuel(&self) -> StateResult<Option<f64>> {
        self.number("remaining_range_fuel", "remainingRangeFuel")
    }

    /// Remaining fuel of the vehicle
    pub fn remaining_fuel(&self) -> StateResult<Option<f64>> {
        self.number("remaining_fuel", "remainingFuel")
    }

    fn number(&self, field: &str, key: &str) -> StateResult<Option<f64>> {
        self.guarded(field, |attrs| fields::float(key, fields::get(attrs, key)?))
    }

    /// All lids (doors, hood, trunk) reported for the vehicle
    pub fn lids(&self) -> StateResult<Option<Vec<Lid>>> {
        self.guarded("lids", |attrs| collect_lids(attrs, &LIDS))
    }

    /// Lids that are not closed
    pub fn open_lids(&self) -> StateResult<Vec<Lid>> {
        Ok(open(self.lids()?))
    }

    /// Check if all lids are closed
    pub fn all_lids_closed(&self) -> StateResult<bool> {
        Ok(self.open_lids()?.is_empty())
    }

    /// All windows reported for the vehicle
    pub fn windows(&self) -> StateResult<Option<Vec<Window>>> {
        self.guarded("windows", |attrs| collect_lids(attrs, &WINDOWS))
    }

    /// Windows that are not closed
    pub fn open_windows(&self) -> StateResult<Vec<Window>> {
        Ok(open(self.windows()?))
    }

    /// Check if all windows are closed
    pub fn all_windows_closed(&self) -> StateResult<bool> {
        Ok(self.open_windows()?.is_empty())
    }

    /// State of the door locks
    pub fn door_lock_state(&self) -> StateResult<Option<LockState>> {
        self.guarded("door_lock_state", |attrs| {
            fields::literal("doorLockState", fields::get(attrs, "doorLockState")?)
        })
    }

    /// Reason for the last state update
    pub fn last_update_reason(&self) -> StateResult<Option<String>> {
        self.guarded("last_update_reason", |attrs| {
            let reason = fields::string("updateReason", fields::get(attrs, "updateReason")?)?;
            Ok(reason.to_string())
        })
    }

    /// Reports of the condition based services
    pub fn condition_based_services(
        &self,
    ) -> StateResult<Option<Vec<ConditionBasedServiceReport>>> {
        self.guarded("condition_based_services", |attrs| {
            let data = fields::get(attrs, "cbsData")?;
            data.as_array()
                .ok_or_else(|| StateError::invalid_value("cbsData", data))?
                .iter()
                .map(ConditionBasedServiceReport::from_json)
                .collect()
        })
    }

    /// Check if every condition based service is OK.
    ///
    /// `None` if the backend did not report any service data.
    pub fn are_all_cbs_ok(&self) -> StateResult<Option<bool>> {
        Ok(self
            .condition_based_services()?
            .map(|services| services.iter().all(ConditionBasedServiceReport::is_ok)))
    }

    /// State of the parking lights
    pub fn parking_lights(&self) -> StateResult<Option<ParkingLightState>> {
        self.guarded("parking_lights", |attrs| {
            fields::literal("parkingLight", fields::get(attrs, "parkingLight")?)
        })
    }

    /// Check if the parking lights are on. `None` if their state is unknown.
    pub fn are_parking_lights_on(&self) -> StateResult<Option<bool>> {
        Ok(self
            .parking_lights()?
            .map(|lights| lights != ParkingLightState::Off))
    }
}

fn collect_lids(attrs: &RawAttributes, names: &[&str]) -> StateResult<Vec<Lid>> {
    let mut result = Vec::new();
    for name in names {
        if let Some(value) = attrs.get(*name) {
            result.push(Lid::new(*name, fields::string(name, value)?)?);
        }
    }
    Ok(result)
}

fn open(lids: Option<Vec<Lid>>) -> Vec<Lid> {
    lids.unwrap_or_default()
        .into_iter()
        .filter(|lid| !lid.is_closed())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SessionError, SessionResult};
    use crate::models::{ConditionBasedServiceStatus, LidState};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    const VIN: &str = "G31NBTEVO000001";

    /// Session that replays queued responses and records requested URLs
    #[derive(Default)]
    struct MockSession {
        responses: Mutex<VecDeque<SessionResult<Value>>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockSession {
        fn with_responses(responses: Vec<SessionResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl SessionClient for MockSession {
        fn server_url(&self) -> &str {
            "https://backend.test"
        }

        async fn request(&self, url: &str) -> SessionResult<Value> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SessionError::Transport("connection refused".into())))
        }
    }

    fn state_with(attributes: Value) -> VehicleState {
        let mut state = VehicleState::new(Arc::new(MockSession::default()), VIN);
        state
            .load_response(json!({ "vehicleStatus": attributes }))
            .unwrap();
        state
    }

    fn sample_status() -> Value {
        json!({
            "mileage": 2201,
            "updateReason": "VEHICLE_SHUTDOWN_SECURED",
            "updateTime": "2018-02-17T12:15:36+0000",
            "doorLockState": "SECURED",
            "parkingLight": "OFF",
            "remainingFuel": 19,
            "remainingRangeFuel": 202,
            "position": {
                "lat": -34.4,
                "lon": 25.26,
                "heading": 121,
                "status": "OK"
            },
            "doorDriverFront": "CLOSED",
            "doorPassengerFront": "CLOSED",
            "doorDriverRear": "CLOSED",
            "doorPassengerRear": "CLOSED",
            "hood": "CLOSED",
            "trunk": "CLOSED",
            "windowDriverFront": "CLOSED",
            "windowPassengerFront": "INTERMEDIATE",
            "windowDriverRear": "CLOSED",
            "windowPassengerRear": "CLOSED",
            "cbsData": [
                {
                    "cbsType": "BRAKE_FLUID",
                    "cbsState": "OK",
                    "cbsDueDate": "2020-02",
                    "cbsDescription": "Next change at specified date at the latest."
                },
                {
                    "cbsType": "OIL",
                    "cbsState": "OK",
                    "cbsDueDate": "02.2019",
                    "cbsRemainingMileage": 15000,
                    "cbsDescription": "Next change at specified date or distance."
                }
            ]
        })
    }

    macro_rules! assert_no_data {
        ($($access:expr),+ $(,)?) => {
            $(assert!(
                matches!($access, Err(StateError::NoData)),
                "{} did not fail with NoData",
                stringify!($access)
            );)+
        };
    }

    #[test]
    fn test_parse() {
        let state = state_with(sample_status());

        assert_eq!(state.mileage().unwrap(), Some(2201.0));

        let expected = NaiveDateTime::parse_from_str("2018-02-17 12:15:36", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(state.timestamp().unwrap().unwrap().naive_utc(), expected);

        let pos = state.gps_position().unwrap().unwrap();
        assert!((pos.latitude - -34.4).abs() < 1e-9);
        assert!((pos.longitude - 25.26).abs() < 1e-9);

        assert!((state.remaining_fuel().unwrap().unwrap() - 19.0).abs() < 1e-9);
        assert!((state.remaining_range_fuel().unwrap().unwrap() - 202.0).abs() < 1e-9);
    }

    #[test]
    fn test_enums_and_passthrough() {
        let state = state_with(sample_status());

        assert_eq!(state.door_lock_state().unwrap(), Some(LockState::Secured));
        assert_eq!(
            state.last_update_reason().unwrap().as_deref(),
            Some("VEHICLE_SHUTDOWN_SECURED")
        );
        assert_eq!(state.parking_lights().unwrap(), Some(ParkingLightState::Off));
        assert_eq!(state.are_parking_lights_on().unwrap(), Some(false));
        assert_eq!(state.is_vehicle_tracking_enabled().unwrap(), Some(true));
    }

    #[test]
    fn test_lids_and_windows() {
        let state = state_with(sample_status());

        let lids = state.lids().unwrap().unwrap();
        assert_eq!(lids.len(), 6);
        assert!(state.all_lids_closed().unwrap());
        assert!(state.open_lids().unwrap().is_empty());

        assert_eq!(state.windows().unwrap().unwrap().len(), 4);
        let open_windows = state.open_windows().unwrap();
        assert_eq!(open_windows.len(), 1);
        assert_eq!(open_windows[0].name, "windowPassengerFront");
        assert_eq!(open_windows[0].state, LidState::Intermediate);
        assert!(!state.all_windows_closed().unwrap());
    }

    #[test]
    fn test_lids_only_lists_reported_keys() {
        let state = state_with(json!({ "hood": "OPEN", "trunk": "CLOSED" }));

        let names: Vec<String> = state
            .lids()
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|lid| lid.name)
            .collect();
        assert_eq!(names, vec!["hood".to_string(), "trunk".to_string()]);
        assert!(state.windows().unwrap().unwrap().is_empty());
        assert!(state.all_windows_closed().unwrap());
    }

    #[test]
    fn test_all_lids_closed_matches_open_lids() {
        let states = ["CLOSED", "OPEN", "INTERMEDIATE"];
        let combinations = states.len().pow(LIDS.len() as u32);

        for mut index in 0..combinations {
            let mut attributes = Map::new();
            for name in LIDS {
                attributes.insert(name.to_string(), json!(states[index % states.len()]));
                index /= states.len();
            }
            let state = state_with(Value::Object(attributes));

            let open_lids = state.open_lids().unwrap();
            assert_eq!(state.all_lids_closed().unwrap(), open_lids.is_empty());
            assert!(open_lids.iter().all(|lid| lid.state != LidState::Closed));
        }
    }

    #[test]
    fn test_condition_based_services() {
        let state = state_with(sample_status());

        let services = state.condition_based_services().unwrap().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[0].due_date, NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(services[0].due_distance, None);
        assert_eq!(services[1].due_date, NaiveDate::from_ymd_opt(2019, 2, 1));
        assert_eq!(services[1].due_distance, Some(15000));
        assert_eq!(state.are_all_cbs_ok().unwrap(), Some(true));
    }

    #[test]
    fn test_cbs_not_ok() {
        let state = state_with(json!({
            "cbsData": [
                { "cbsType": "OIL", "cbsState": "OK", "cbsDueDate": "2018-02", "cbsDescription": "" },
                { "cbsType": "VEHICLE_CHECK", "cbsState": "OVERDUE", "cbsDueDate": "2018-01", "cbsDescription": "" }
            ]
        }));

        let services = state.condition_based_services().unwrap().unwrap();
        assert_eq!(services[1].state, ConditionBasedServiceStatus::Overdue);
        assert_eq!(state.are_all_cbs_ok().unwrap(), Some(false));
    }

    #[test]
    fn test_missing_attribute() {
        let state = state_with(json!({}));

        assert_eq!(state.mileage().unwrap(), None);
        assert_eq!(state.timestamp().unwrap(), None);
        assert_eq!(state.gps_position().unwrap(), None);
        assert_eq!(state.is_vehicle_tracking_enabled().unwrap(), None);
        assert_eq!(state.door_lock_state().unwrap(), None);
        assert_eq!(state.last_update_reason().unwrap(), None);
        assert_eq!(state.condition_based_services().unwrap(), None);
        assert_eq!(state.are_all_cbs_ok().unwrap(), None);
        assert_eq!(state.parking_lights().unwrap(), None);
        assert_eq!(state.are_parking_lights_on().unwrap(), None);
        assert_eq!(state.lids().unwrap(), Some(vec![]));
        assert!(state.all_lids_closed().unwrap());
        assert!(state.attributes().unwrap().is_empty());
    }

    #[test]
    fn test_no_attributes() {
        let state = VehicleState::new(Arc::new(MockSession::default()), VIN);

        assert!(!state.has_data());
        assert_no_data!(
            state.attributes(),
            state.timestamp(),
            state.gps_position(),
            state.is_vehicle_tracking_enabled(),
            state.mileage(),
            state.remaining_range_fuel(),
            state.remaining_fuel(),
            state.lids(),
            state.open_lids(),
            state.all_lids_closed(),
            state.windows(),
            state.open_windows(),
            state.all_windows_closed(),
            state.door_lock_state(),
            state.last_update_reason(),
            state.condition_based_services(),
            state.are_all_cbs_ok(),
            state.parking_lights(),
            state.are_parking_lights_on(),
        );
    }

    #[test]
    fn test_tracking_disabled() {
        let state = state_with(json!({
            "position": { "lat": -34.4, "lon": 25.26, "status": "OK_DISABLED" }
        }));

        assert_eq!(state.gps_position().unwrap(), None);
        assert_eq!(state.is_vehicle_tracking_enabled().unwrap(), Some(false));
    }

    #[test]
    fn test_invalid_literals_fail() {
        let state = state_with(json!({
            "doorLockState": "JAMMED",
            "parkingLight": "BOTH",
            "hood": "AJAR"
        }));

        assert!(matches!(
            state.door_lock_state(),
            Err(StateError::InvalidValue { ref field, ref value }) if field == "doorLockState" && value == "JAMMED"
        ));
        assert!(matches!(
            state.parking_lights(),
            Err(StateError::InvalidValue { .. })
        ));
        assert!(state.are_parking_lights_on().is_err());
        assert!(state.lids().is_err());
    }

    #[test]
    fn test_parking_lights_on() {
        let state = state_with(json!({ "parkingLight": "LEFT" }));
        assert_eq!(state.are_parking_lights_on().unwrap(), Some(true));
    }

    #[test]
    fn test_numeric_strings_and_bad_numbers() {
        let state = state_with(json!({ "mileage": "2201", "remainingFuel": "empty" }));

        assert_eq!(state.mileage().unwrap(), Some(2201.0));
        assert!(matches!(
            state.remaining_fuel(),
            Err(StateError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_response_requires_vehicle_status() {
        let mut state = state_with(sample_status());

        let err = state.load_response(json!({ "status": {} })).unwrap_err();
        assert!(matches!(err, StateError::InvalidResponse(_)));
        // previous data is kept
        assert_eq!(state.mileage().unwrap(), Some(2201.0));

        let err = state
            .load_response(json!({ "vehicleStatus": [1, 2] }))
            .unwrap_err();
        assert!(matches!(err, StateError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_refresh() {
        let session = MockSession::with_responses(vec![
            Err(SessionError::Timeout),
            Ok(json!({ "vehicleStatus": sample_status() })),
            Ok(json!({ "vehicleStatus": { "updateReason": "DOOR_STATE_CHANGED" } })),
        ]);
        let mut state = VehicleState::new(session.clone(), VIN);

        let err = state.refresh().await.unwrap_err();
        assert!(matches!(err, StateError::Session(SessionError::Timeout)));
        assert!(!state.has_data());

        state.refresh().await.unwrap();
        assert_eq!(state.mileage().unwrap(), Some(2201.0));

        // a refresh replaces the attributes, it never merges
        state.refresh().await.unwrap();
        assert_eq!(state.mileage().unwrap(), None);
        assert_eq!(
            state.last_update_reason().unwrap().as_deref(),
            Some("DOOR_STATE_CHANGED")
        );

        let requests = session.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0],
            format!("https://backend.test/api/vehicle/dynamic/v1/{}", VIN)
        );
    }
}
