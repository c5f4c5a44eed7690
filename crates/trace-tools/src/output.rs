use std::io::Write;

use anyhow::{Context, Error};

use crate::{format::TraceFormat, generic::AccessEvent};

/// A set of trace sinks, one for each selected [`TraceFormat`].
///
/// Every event passed to [`TraceOutputs::write_event`] is encoded once per
/// format and appended as one line to the corresponding sink, so all sinks
/// describe the same event sequence.
pub struct TraceOutputs<W: Write> {
    sinks: Vec<(TraceFormat, W)>,
}

impl<W: Write> TraceOutputs<W> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Adds a sink for `format`. Sinks are written in the order they were added.
    pub fn add_sink(&mut self, format: TraceFormat, sink: W) {
        self.sinks.push((format, sink));
    }

    pub fn formats(&self) -> impl Iterator<Item = TraceFormat> + '_ {
        self.sinks.iter().map(|(format, _)| *format)
    }

    /// Appends `event` to every sink in its sink's format.
    ///
    /// # Errors
    ///
    /// This function fails if any of the underlying sinks can not be written to.
    pub fn write_event(&mut self, event: &AccessEvent) -> Result<(), Error> {
        for (format, sink) in self.sinks.iter_mut() {
            writeln!(sink, "{}", format.encode_event(event))
                .with_context(|| format!("Could not append event to {format} trace"))?;
        }

        Ok(())
    }

    /// Flushes all sinks and hands them back.
    pub fn finish(mut self) -> Result<Vec<(TraceFormat, W)>, Error> {
        for (format, sink) in self.sinks.iter_mut() {
            sink.flush()
                .with_context(|| format!("Could not flush {format} trace"))?;
        }

        Ok(self.sinks)
    }
}

impl<W: Write> Default for TraceOutputs<W> {
    fn default() -> Self {
        Self::new()
    }
}
