use std::{
    fs::{File, OpenOptions},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Error};
use rand::{SeedableRng, rngs::StdRng};
use trace_tools::{
    AddressPattern, ConfigError, StreamGenerator, StreamType, TraceFormat, TraceOutputs,
};

/// Logging setup for the `tracegen` binary.
pub mod logging;

/// All parameters of a single trace generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// The requested address stream type
    pub stream_type: StreamType,

    /// Cycles between two consecutive requests
    pub interarrival: u64,

    /// The formats to emit, one trace file each
    pub formats: Vec<TraceFormat>,

    /// Directory the trace files are placed in
    pub output_dir: PathBuf,

    /// Reads per one write
    pub ratio: f64,

    /// Number of requests in every trace
    pub num_reqs: u64,

    /// Seed for the random number generator, drawn from the OS if absent
    pub seed: Option<u64>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            stream_type: StreamType::Random,
            interarrival: 10,
            formats: TraceFormat::ALL.to_vec(),
            output_dir: PathBuf::from("."),
            ratio: 2.0,
            num_reqs: 100,
            seed: None,
        }
    }
}

impl TraceConfig {
    /// Resolves the address pattern to generate.
    ///
    /// Inter-arrival time and ratio are checked when the generator is built.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigError`] if the stream type has no generation policy or
    /// the timestamp of the last request would not fit into the 64-bit clock.
    pub fn validate(&self) -> Result<AddressPattern, ConfigError> {
        if self.interarrival.checked_mul(self.num_reqs).is_none() {
            return Err(ConfigError::ClockOverflow {
                interarrival: self.interarrival,
                num_reqs: self.num_reqs,
            });
        }

        AddressPattern::try_from(self.stream_type)
    }

    /// Returns the path of the trace file for every selected format.
    pub fn trace_paths(&self) -> Vec<(TraceFormat, PathBuf)> {
        self.formats
            .iter()
            .map(|format| {
                let file_name = format.file_name(
                    self.stream_type,
                    self.interarrival,
                    self.num_reqs,
                    self.ratio,
                );
                (*format, self.output_dir.join(file_name))
            })
            .collect()
    }
}

/// Creates `dir` (including missing parents) if it does not exist yet.
///
/// A failure is only reported as a warning: the run continues and fails later
/// if the trace files can not be created either.
pub fn prepare_output_dir(dir: &Path) {
    if dir.exists() {
        return;
    }

    match std::fs::create_dir_all(dir) {
        Ok(()) => log::debug!("Created output directory {}", dir.display()),
        Err(e) => log::warn!("Cannot use output path {}: {e}", dir.display()),
    }
}

/// Opens (and truncates) one trace file per entry of `paths`.
///
/// If any file can not be opened, the files opened so far are closed again
/// and the error is returned.
pub fn open_outputs(
    paths: &[(TraceFormat, PathBuf)],
) -> Result<TraceOutputs<BufWriter<File>>, Error> {
    let mut outputs = TraceOutputs::new();

    for (format, path) in paths {
        let file = OpenOptions::new()
            .truncate(true)
            .write(true)
            .create(true)
            .open(path)
            .with_context(|| format!("Could not create {format} trace {}", path.display()))?;
        outputs.add_sink(*format, BufWriter::new(file));
    }

    Ok(outputs)
}

/// Generates all trace files described by `config` and returns their paths.
///
/// The configuration is validated before the output directory or any file is touched.
pub fn run(config: &TraceConfig) -> Result<Vec<PathBuf>, Error> {
    let pattern = config.validate()?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut generator = StreamGenerator::new(pattern, config.interarrival, config.ratio, rng)?;

    log::debug!(
        "Generating {} requests: pattern {:?}, interarrival {}, read probability {:.3}",
        config.num_reqs,
        generator.pattern(),
        config.interarrival,
        generator.read_probability()
    );

    prepare_output_dir(&config.output_dir);

    let paths = config.trace_paths();
    let outputs = open_outputs(&paths)?;
    log::debug!(
        "Writing formats: {}",
        outputs
            .formats()
            .map(|format| format.name())
            .collect::<Vec<_>>()
            .join(", ")
    );
    trace_tools::generate(&mut generator, outputs, config.num_reqs)?;

    let paths: Vec<PathBuf> = paths.into_iter().map(|(_, path)| path).collect();
    for path in &paths {
        log::info!("Wrote {}", path.display());
    }

    Ok(paths)
}
