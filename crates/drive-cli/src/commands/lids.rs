//! Lids and windows commands

use anyhow::Result;
use drive_core::{Lid, VehicleState};

use crate::output::{LidRow, OutputContext};

/// List the lids (doors, hood, trunk) of the vehicle
pub fn lids(state: &VehicleState, ctx: &OutputContext) -> Result<()> {
    print_lids(state.lids()?.unwrap_or_default(), ctx);
    Ok(())
}

/// List the windows of the vehicle
pub fn windows(state: &VehicleState, ctx: &OutputContext) -> Result<()> {
    print_lids(state.windows()?.unwrap_or_default(), ctx);
    Ok(())
}

fn print_lids(lids: Vec<Lid>, ctx: &OutputContext) {
    let rows: Vec<LidRow> = lids
        .into_iter()
        .map(|lid| LidRow {
            closed: (if lid.is_closed() { "Yes" } else { "No" }).to_string(),
            state: lid.state.to_string(),
            name: lid.name,
        })
        .collect();

    ctx.print(&rows);
}
