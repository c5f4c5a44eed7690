use std::path::PathBuf;

use anyhow::Error;
use clap::Parser;
use trace_tools::{StreamType, parse_format_selection};
use tracegen::TraceConfig;

/// Trace Generator for Various DRAM Simulators
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Address stream type, (r)andom, (s)tream, (m)ix
    #[arg(short, long, default_value = "random")]
    stream_type: String,

    /// Inter-arrival time in cycles
    #[arg(short, long, default_value_t = 10)]
    interarrival: u64,

    /// Trace format, dramsim2, dramsim3, ramulator, drsim, or all
    #[arg(short, long, default_value = "all")]
    format: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Read to write(1) ratio
    #[arg(short, long, default_value_t = 2.0)]
    ratio: f64,

    /// Total number of requests
    #[arg(short, long, default_value_t = 100)]
    num_reqs: u64,

    /// Seed for reproducible traces
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<TraceConfig, Error> {
        Ok(TraceConfig {
            stream_type: StreamType::parse_lenient(&self.stream_type),
            interarrival: self.interarrival,
            formats: parse_format_selection(&self.format)?,
            output_dir: self.output_dir,
            ratio: self.ratio,
            num_reqs: self.num_reqs,
            seed: self.seed,
        })
    }
}

fn main() -> Result<(), Error> {
    let args = Cli::parse();
    tracegen::logging::init(args.verbose)?;

    let config = args.into_config()?;
    let paths = tracegen::run(&config)?;

    log::info!(
        "Generated {} requests into {} trace file(s)",
        config.num_reqs,
        paths.len()
    );

    Ok(())
}
