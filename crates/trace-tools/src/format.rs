use std::{fmt::Display, str::FromStr};

use crate::{
    error::ConfigError,
    generator::StreamType,
    generic::{AccessEvent, Operation},
};

/// The trace syntaxes of the supported memory simulators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceFormat {
    DramSim2,
    DramSim3,
    Ramulator,
    DrSim,
}

impl TraceFormat {
    /// All known formats, in the order their files are emitted.
    pub const ALL: [TraceFormat; 4] = [
        TraceFormat::DramSim2,
        TraceFormat::DramSim3,
        TraceFormat::Ramulator,
        TraceFormat::DrSim,
    ];

    /// Returns the identifier of the format as accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            TraceFormat::DramSim2 => "dramsim2",
            TraceFormat::DramSim3 => "dramsim3",
            TraceFormat::Ramulator => "ramulator",
            TraceFormat::DrSim => "drsim",
        }
    }

    /// Returns the token the simulator expects for `operation`.
    pub fn token(&self, operation: Operation) -> &'static str {
        match (operation, self) {
            (Operation::Read, TraceFormat::Ramulator) => "R",
            (Operation::Write, TraceFormat::Ramulator) => "W",
            (Operation::Read, _) => "READ",
            (Operation::Write, _) => "WRITE",
        }
    }

    /// Renders `event` as a single trace line without the trailing newline.
    pub fn encode_event(&self, event: &AccessEvent) -> String {
        let (operation, address, timestamp) = event.get_fields();
        let token = self.token(*operation);

        match self {
            TraceFormat::DramSim2 | TraceFormat::DramSim3 => {
                format!("{address:#x} {token} {timestamp}")
            }
            TraceFormat::Ramulator => format!("{address:#x} {token}"),
            TraceFormat::DrSim => format!("{address:#x} {token} {timestamp} 64B"),
        }
    }

    /// Derives the name of the trace file for this format.
    ///
    /// The name encodes the generation parameters:
    /// `<format>_<stream>_i<interarrival>_n<num_reqs>_rw<ratio>.trace`, where `ratio`
    /// is truncated towards zero. DRAMSim2 files are additionally prefixed with `mase_`.
    pub fn file_name(
        &self,
        stream_type: StreamType,
        interarrival: u64,
        num_reqs: u64,
        ratio: f64,
    ) -> String {
        let file_name = format!(
            "{}_{}_i{}_n{}_rw{}.trace",
            self,
            stream_type,
            interarrival,
            num_reqs,
            ratio.trunc() as i64
        );

        match self {
            TraceFormat::DramSim2 => format!("mase_{file_name}"),
            _ => file_name,
        }
    }
}

impl Display for TraceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TraceFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TraceFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| ConfigError::UnsupportedFormat(s.into()))
    }
}

/// Resolves a format argument to the list of formats to emit.
///
/// `all` selects every entry of [`TraceFormat::ALL`], any other value has to name
/// exactly one known format.
pub fn parse_format_selection(value: &str) -> Result<Vec<TraceFormat>, ConfigError> {
    match value {
        "all" => Ok(TraceFormat::ALL.to_vec()),
        other => Ok(vec![other.parse()?]),
    }
}
