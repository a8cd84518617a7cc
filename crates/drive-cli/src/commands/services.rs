//! Services command - condition based service reports

use anyhow::Result;
use drive_core::VehicleState;

use crate::output::{or_dash, OutputContext, ServiceRow};

/// List the condition based services of the vehicle
pub fn services(state: &VehicleState, ctx: &OutputContext) -> Result<()> {
    let Some(services) = state.condition_based_services()? else {
        ctx.info("No service data reported");
        return Ok(());
    };

    let rows: Vec<ServiceRow> = services
        .into_iter()
        .map(|s| ServiceRow {
            service_type: s.service_type,
            state: s.state.to_string(),
            due_date: or_dash(s.due_date.map(|d| d.format("%Y-%m").to_string())),
            due_distance: or_dash(s.due_distance),
            description: s.description,
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
