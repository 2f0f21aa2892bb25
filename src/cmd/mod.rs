mod cram;
mod plan;
mod simulate;

use boundary_gen::FixedWidthTemplate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use pipe_cram::config::HarnessConfig;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pipe-cram")]
#[command(version)]
#[command(
    about = "Write line batches that straddle a consumer's read buffer",
    long_about = None
)]
pub struct Cli {
    /// Log diagnostic events to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the batch that would be written for a capacity and template
    Plan {
        /// Consumer read buffer size in bytes (default: 4096)
        #[arg(long)]
        capacity: Option<usize>,

        /// Line template with one {N} placeholder for an N-digit index, e.g. "msg {3}\n"
        #[arg(short, long)]
        template: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the batch to a FIFO or file in a single bulk write
    ///
    /// Opening a FIFO blocks until its consumer has the read end open.
    Cram {
        /// Path to write to (default: /var/spool/syslog-notify)
        #[arg(short, long)]
        fifo: Option<PathBuf>,

        /// Consumer read buffer size in bytes (default: 4096)
        #[arg(long)]
        capacity: Option<usize>,

        /// Line template with one {N} placeholder for an N-digit index
        #[arg(short, long)]
        template: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Preview without writing (dry run)
        #[arg(long)]
        dry_run: bool,
    },

    /// Feed the batch through a capacity-bounded line reader and check every
    /// line comes back intact
    Simulate {
        /// Consumer read buffer size in bytes (default: 4096)
        #[arg(long)]
        capacity: Option<usize>,

        /// Line template with one {N} placeholder for an N-digit index
        #[arg(short, long)]
        template: Option<String>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Plan {
            capacity,
            template,
            config,
            json,
        } => {
            let config = resolve_config(config, capacity, None, template)?;
            plan::run(&config, json)
        }
        Commands::Cram {
            fifo,
            capacity,
            template,
            config,
            dry_run,
        } => {
            let config = resolve_config(config, capacity, fifo, template)?;
            cram::run(&config, dry_run)
        }
        Commands::Simulate {
            capacity,
            template,
            config,
            json,
        } => {
            let config = resolve_config(config, capacity, None, template)?;
            simulate::run(&config, json)
        }
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "pipe-cram", &mut io::stdout());
            Ok(())
        }
    }
}

fn resolve_config(
    path: Option<PathBuf>,
    capacity: Option<usize>,
    fifo: Option<PathBuf>,
    template: Option<String>,
) -> anyhow::Result<HarnessConfig> {
    let template = template
        .map(|t| t.parse::<FixedWidthTemplate>())
        .transpose()
        .map_err(|e: String| anyhow::anyhow!(e))?;
    HarnessConfig::resolve(path.as_deref(), capacity, fifo, template)
}
