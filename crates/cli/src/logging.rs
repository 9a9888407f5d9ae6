use std::fs::OpenOptions;
use std::sync::Mutex;

use supportdesk_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Installs the global subscriber: console output on stderr in the configured format, plus a
/// plain-text copy appended to `logging.file` when one is set.
///
/// stdout is reserved for command payloads.
pub fn init(config: &LoggingConfig) -> Result<(), String> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|error| format!("invalid log filter `{}`: {error}", config.level))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    let console = fmt::layer().with_target(false).with_writer(std::io::stderr);
    layers.push(match config.format {
        LogFormat::Compact => console.compact().boxed(),
        LogFormat::Pretty => console.pretty().boxed(),
        LogFormat::Json => console.json().boxed(),
    });

    if let Some(path) = &config.file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|error| format!("could not open log file `{}`: {error}", path.display()))?;
        layers.push(
            fmt::layer().with_target(false).with_ansi(false).with_writer(Mutex::new(file)).boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|error| format!("logging already initialized: {error}"))
}
