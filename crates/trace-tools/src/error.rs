/// Errors caused by an invalid trace generation configuration.
///
/// These are always detected before any trace file is created.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The requested trace format is none of the known simulator formats
    #[error("Unsupported trace format: {0}")]
    UnsupportedFormat(String),

    /// The requested stream type has no address generation policy
    #[error("Unsupported stream type: {0} has no address generation policy")]
    UnsupportedPattern(String),

    /// The inter-arrival time has to be at least one cycle
    #[error("Invalid inter-arrival time: {0} (must be positive)")]
    InvalidInterarrival(u64),

    /// The read/write ratio has to be finite and non-negative
    #[error("Invalid read/write ratio: {0} (must be finite and non-negative)")]
    InvalidRatio(f64),

    /// The timestamp of the last request does not fit into the 64-bit clock
    #[error("Clock overflow: {num_reqs} requests with an inter-arrival time of {interarrival} exceed the 64-bit clock")]
    ClockOverflow { interarrival: u64, num_reqs: u64 },
}
