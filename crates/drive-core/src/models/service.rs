//! Condition based service (CBS) reports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::error::StateResult;
use crate::fields;

/// Status of a condition based service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionBasedServiceStatus {
    Ok,
    Overdue,
    Pending,
}

impl ConditionBasedServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionBasedServiceStatus::Ok => "OK",
            ConditionBasedServiceStatus::Overdue => "OVERDUE",
            ConditionBasedServiceStatus::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for ConditionBasedServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConditionBasedServiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ConditionBasedServiceStatus::Ok),
            "OVERDUE" => Ok(ConditionBasedServiceStatus::Overdue),
            "PENDING" => Ok(ConditionBasedServiceStatus::Pending),
            _ => Err(format!("Unknown service status: '{}'", s)),
        }
    }
}

/// Entry in the list of condition based services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionBasedServiceReport {
    /// Month the service is due, as the first day of that month
    pub due_date: Option<NaiveDate>,
    /// Status of the service
    pub state: ConditionBasedServiceStatus,
    /// Service type (e.g. "OIL", "BRAKE_FLUID")
    pub service_type: String,
    /// Remaining distance until the service is due
    pub due_distance: Option<i64>,
    /// Description of the required service
    pub description: String,
}

impl ConditionBasedServiceReport {
    /// Build a report from one element of `cbsData`
    pub fn from_json(data: &Value) -> StateResult<Self> {
        let data = fields::object("cbsData", data)?;

        let due_date = parse_due_date(fields::string(
            "cbsDueDate",
            fields::get(data, "cbsDueDate")?,
        )?);
        let state = fields::literal("cbsState", fields::get(data, "cbsState")?)?;
        let service_type = fields::string("cbsType", fields::get(data, "cbsType")?)?.to_string();
        let due_distance = data
            .get("cbsRemainingMileage")
            .map(|v| fields::integer("cbsRemainingMileage", v))
            .transpose()?;
        let description =
            fields::string("cbsDescription", fields::get(data, "cbsDescription")?)?.to_string();

        Ok(Self {
            due_date,
            state,
            service_type,
            due_distance,
            description,
        })
    }

    /// Check if the service does not need attention
    pub fn is_ok(&self) -> bool {
        self.state == ConditionBasedServiceStatus::Ok
    }
}

/// Parse a CBS due date ("2018-02" or "02.2018") into the first day of the month.
///
/// Unknown formats are logged and yield `None`.
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    let candidates = [
        (format!("{}-01", value), "%Y-%m-%d"),
        (format!("01.{}", value), "%d.%m.%Y"),
    ];

    let date = candidates
        .iter()
        .find_map(|(s, format)| NaiveDate::parse_from_str(s, format).ok());

    if date.is_none() {
        error!("Unknown time format for CBS: {}", value);
    }
    date
}
