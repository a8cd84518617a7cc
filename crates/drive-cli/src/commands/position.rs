//! Position command - last known GPS position

use anyhow::Result;
use drive_core::VehicleState;

use crate::output::OutputContext;

/// Show the last known position of the vehicle
pub fn position(state: &VehicleState, ctx: &OutputContext) -> Result<()> {
    match state.gps_position()? {
        Some(pos) => {
            ctx.print_kv(&[
                ("Latitude", pos.latitude.to_string()),
                ("Longitude", pos.longitude.to_string()),
            ]);
        }
        None => ctx.warn("No position available (vehicle tracking disabled?)"),
    }
    Ok(())
}
