use crate::error;
use crate::util::Result;
use crate::util::config::Logging;
use snafu::ResultExt;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer, layer::Filter, prelude::*, registry::LookupSpan};

/// Creates the filter for log messages from the configured log spec, e.g. `info,rastermosaic_operators=debug`
pub fn log_filter(logging: &Logging) -> Result<EnvFilter> {
    EnvFilter::try_new(&logging.log_spec).context(error::InvalidLogSpec {
        log_spec: logging.log_spec.clone(),
    })
}

/// Installs a global tracing subscriber that writes to stderr.
///
/// Fails if the log spec is invalid or a global subscriber is already installed.
pub fn init_tracing(logging: &Logging) -> Result<()> {
    let filter = log_filter(logging)?;

    tracing_subscriber::Registry::default()
        .with(console_layer_with_filter(filter))
        .try_init()
        .context(error::TracingInit)
}

fn console_layer_with_filter<S, F: Filter<S> + 'static>(filter: F) -> impl Layer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_target(true)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(filter)
}
