//! Logging setup and error classification shared by every lakeshore crate.
//!
//! Components never hold logging state of their own. They emit `tracing`
//! events and spans, and the binary installs the subscriber once at startup
//! with [`init_observability`]. The level is controlled by `RUST_LOG` and
//! the output format by `RUST_LOG_FORMAT`.

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::{prelude::*, registry::LookupSpan};

pub use crate::error_kind::ErrorKind;

use crate::format::LakeshoreFormat;

mod error_kind;
mod format;

const DEFAULT_LOG_LEVEL: &str = "info";

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Install the global tracing subscriber.
///
/// Panics if a global subscriber was already installed.
pub fn init_observability() {
    tracing_subscriber::registry().with(stdout()).init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

fn stdout<S>() -> BoxedLayer<S>
where
    S: Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let json_fmt = std::env::var("RUST_LOG_FORMAT")
        .map(|val| val == "json")
        .unwrap_or(false);

    if json_fmt {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .json()
            .with_filter(env_filter())
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .event_format(LakeshoreFormat::default())
            .fmt_fields(LakeshoreFormat::default())
            .with_filter(env_filter())
            .boxed()
    }
}
