use anyhow::Context;
use boundary_gen::{generate, plan};
use pipe_cram::config::HarnessConfig;
use pipe_cram::sink::cram_path;
use std::time::Instant;

pub fn run(config: &HarnessConfig, dry_run: bool) -> anyhow::Result<()> {
    let template = config.template();
    let fifo = &config.fifo;

    if dry_run {
        let plan = plan(config.capacity, &template)?;
        println!(
            "Dry run: would write {} messages ({} bytes) to {}, last number will be {}",
            plan.message_count,
            plan.total_len,
            fifo.display(),
            plan.last_index
        );
        return Ok(());
    }

    let batch = generate(config.capacity, &template)?;

    println!(
        "Writing {} bytes to {}, last number will be {}",
        batch.total_len(),
        fifo.display(),
        batch.last_index()
    );

    let start_time = Instant::now();
    let report =
        cram_path(fifo, &batch).with_context(|| format!("writing batch to {}", fifo.display()))?;

    println!(
        "✓ Wrote {} messages ({} bytes) in {:.3?}",
        report.message_count,
        report.bytes_written,
        start_time.elapsed()
    );

    Ok(())
}
