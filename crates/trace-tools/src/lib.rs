use std::io::Write;

use anyhow::{Error, anyhow};
use rand::Rng;

mod error;
mod format;

/// Address stream generation for synthetic memory traces
pub mod generator;

/// Format-independent representation of memory requests
pub mod generic;
mod output;

pub use error::ConfigError;
pub use format::{TraceFormat, parse_format_selection};
pub use generator::{AddressPattern, StreamGenerator, StreamType};
pub use output::TraceOutputs;

/// Pulls `num_reqs` events from `generator` and appends each of them to all `outputs`.
///
/// Events are written in generation order. The sinks are flushed before returning.
///
/// # Errors
///
/// Fails if a sink can not be written to or if the generator's clock overflows
/// before `num_reqs` events were produced.
pub fn generate<R: Rng, W: Write>(
    generator: &mut StreamGenerator<R>,
    mut outputs: TraceOutputs<W>,
    num_reqs: u64,
) -> Result<Vec<(TraceFormat, W)>, Error> {
    for idx in 0..num_reqs {
        let event = generator
            .next_event()
            .ok_or_else(|| anyhow!("Clock overflow after {idx} of {num_reqs} requests"))?;
        outputs.write_event(&event)?;
    }

    outputs.finish()
}
