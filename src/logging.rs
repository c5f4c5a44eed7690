use anyhow::Error;
use log::LevelFilter;
use log4rs::{
    Config,
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
};

const STDERR_APPENDER: &str = "stderr";

/// Builds the logging configuration: a single console appender writing to stderr.
///
/// Trace files may be written to the current directory, so nothing is logged to stdout.
pub fn config(level: LevelFilter) -> Result<Config, Error> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{l} - {m}{n}")))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build(STDERR_APPENDER, Box::new(stderr)))
        .build(Root::builder().appender(STDERR_APPENDER).build(level))?;

    Ok(config)
}

/// Installs the global logger. Must only be called once per process.
pub fn init(verbose: bool) -> Result<(), Error> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    log4rs::init_config(config(level)?)?;

    Ok(())
}
