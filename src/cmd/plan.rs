use boundary_gen::{plan, BoundaryCrossing};
use pipe_cram::config::HarnessConfig;
use serde::Serialize;

/// JSON output for plan command
#[derive(Serialize)]
pub(crate) struct PlanJsonOutput {
    capacity: usize,
    template: String,
    message_length: usize,
    message_count: usize,
    last_index: usize,
    total_len: usize,
    overflow: usize,
    crossings: Vec<CrossingJson>,
}

#[derive(Serialize)]
pub(crate) struct CrossingJson {
    boundary: usize,
    message_index: usize,
    bytes_before: usize,
    bytes_after: usize,
}

impl From<&BoundaryCrossing> for CrossingJson {
    fn from(c: &BoundaryCrossing) -> Self {
        Self {
            boundary: c.boundary,
            message_index: c.message_index,
            bytes_before: c.bytes_before,
            bytes_after: c.bytes_after,
        }
    }
}

pub fn run(config: &HarnessConfig, json: bool) -> anyhow::Result<()> {
    let template = config.template();
    let plan = plan(config.capacity, &template)?;
    let crossings = plan.boundary_crossings();

    if json {
        let output = PlanJsonOutput {
            capacity: plan.capacity,
            template: template.to_pattern(),
            message_length: plan.message_length,
            message_count: plan.message_count,
            last_index: plan.last_index,
            total_len: plan.total_len,
            overflow: plan.overflow,
            crossings: crossings.iter().map(CrossingJson::from).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Capacity:        {} bytes", plan.capacity);
    println!("Template:        {}", template);
    println!("Message length:  {} bytes", plan.message_length);
    println!(
        "Messages:        {} (indices 0..={})",
        plan.message_count,
        plan.last_index
    );
    println!(
        "Total:           {} bytes ({} past the first boundary)",
        plan.total_len,
        plan.overflow
    );
    println!();

    println!("{:>10} {:>10} {:>8} {:>8}", "Boundary", "Message", "Before", "After");
    println!("{}", "─".repeat(40));
    for c in &crossings {
        println!(
            "{:>10} {:>10} {:>8} {:>8}",
            c.boundary, c.message_index, c.bytes_before, c.bytes_after
        );
    }

    Ok(())
}
