use anyhow::Context;
use boundary_gen::generate;
use pipe_cram::config::HarnessConfig;
use pipe_cram::reassembler::ChunkedLineReader;
use serde::Serialize;

/// JSON output for simulate command
#[derive(Serialize)]
pub(crate) struct SimulateJsonOutput {
    capacity: usize,
    message_count: usize,
    reads: u64,
    bytes_read: u64,
    lines: u64,
    split_lines: u64,
    split_indices: Vec<usize>,
    intact: bool,
}

pub fn run(config: &HarnessConfig, json: bool) -> anyhow::Result<()> {
    let template = config.template();
    let batch = generate(config.capacity, &template)?;

    let mut reader = ChunkedLineReader::new(batch.bytes(), batch.capacity());
    let lines = reader
        .read_all()
        .context("reassembling batch through the line reader")?;
    let stats = reader.stats();

    if lines.len() != batch.message_count() {
        anyhow::bail!(
            "reassembled {} lines, expected {}",
            lines.len(),
            batch.message_count()
        );
    }

    for (index, line) in lines.iter().enumerate() {
        if !line.terminated || batch.message(index) != Some(&line.bytes[..]) {
            anyhow::bail!("message {} was not reassembled intact", index);
        }
    }

    let split_indices: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.split)
        .map(|(i, _)| i)
        .collect();

    // The message covering the first boundary has to arrive in two reads.
    if let Some(first) = batch.boundary_crossings().first() {
        if !split_indices.contains(&first.message_index) {
            anyhow::bail!(
                "message {} straddles offset {} but arrived in one read",
                first.message_index,
                first.boundary
            );
        }
    }

    if json {
        let output = SimulateJsonOutput {
            capacity: batch.capacity(),
            message_count: batch.message_count(),
            reads: stats.reads,
            bytes_read: stats.bytes_read,
            lines: stats.lines,
            split_lines: stats.split_lines,
            split_indices,
            intact: true,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Read {} bytes in {} reads of at most {} bytes",
        stats.bytes_read,
        stats.reads,
        batch.capacity()
    );
    println!(
        "✓ All {} messages reassembled intact; {} split across reads: {:?}",
        stats.lines, stats.split_lines, split_indices
    );

    Ok(())
}
