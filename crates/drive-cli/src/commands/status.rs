//! Status command - summary of the vehicle state

use anyhow::Result;
use drive_core::VehicleState;

use crate::output::{or_dash, OutputContext};

/// Show a summary of the vehicle state
pub fn status(state: &VehicleState, ctx: &OutputContext) -> Result<()> {
    let yes_no = |value: bool| (if value { "Yes" } else { "No" }).to_string();

    let pairs = vec![
        ("VIN", state.vin().to_string()),
        ("Timestamp", or_dash(state.timestamp()?)),
        ("Mileage", or_dash(state.mileage()?)),
        ("Remaining range", or_dash(state.remaining_range_fuel()?)),
        ("Remaining fuel", or_dash(state.remaining_fuel()?)),
        ("Door lock state", or_dash(state.door_lock_state()?)),
        ("Last update reason", or_dash(state.last_update_reason()?)),
        (
            "Tracking enabled",
            or_dash(state.is_vehicle_tracking_enabled()?.map(yes_no)),
        ),
        ("Parking lights", or_dash(state.parking_lights()?)),
        ("All lids closed", yes_no(state.all_lids_closed()?)),
        ("All windows closed", yes_no(state.all_windows_closed()?)),
        ("All services OK", or_dash(state.are_all_cbs_ok()?.map(yes_no))),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}
