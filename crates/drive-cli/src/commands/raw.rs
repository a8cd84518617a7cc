//! Raw command - dump the status attributes

use anyhow::Result;
use drive_core::VehicleState;

/// Print the unparsed status attributes as JSON
pub fn raw(state: &VehicleState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state.attributes()?)?);
    Ok(())
}
