use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    fmt::writer::BoxMakeWriter,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Where log lines go.
///
/// The `render` command prints the document on stdout, so its logs move to
/// stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl LogStream {
    fn writer(self) -> BoxMakeWriter {
        match self {
            LogStream::Stdout => BoxMakeWriter::new(std::io::stdout),
            LogStream::Stderr => BoxMakeWriter::new(std::io::stderr),
        }
    }
}

/// Install the global tracing subscriber and describe folio's metrics.
pub fn init(logging: &LoggingSettings, stream: LogStream) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_writer(stream.writer())
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_ansi(stream == LogStream::Stdout)
            .with_writer(stream.writer())
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("tracing subscriber already set: {err}")))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "folio_render_total",
            Unit::Count,
            "Document renders, labelled by target kind."
        );
        describe_counter!(
            "folio_render_empty_total",
            Unit::Count,
            "Renders that produced the empty-state placeholder, labelled by target kind."
        );
        describe_counter!(
            "folio_block_skipped_total",
            Unit::Count,
            "Blocks left out of a render, labelled unsupported or malformed."
        );
        describe_counter!(
            "folio_contact_submissions_total",
            Unit::Count,
            "Contact form submissions, labelled accepted, rejected or failed."
        );
    });
}
