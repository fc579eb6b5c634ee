//! Tracing bootstrap
//!
//! The subscriber is installed before configuration is resolved so that
//! config-loading warnings are emitted. It starts with a provisional
//! filter; the level from the config file is applied afterwards through
//! the reload handle unless `RUST_LOG` was set.

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{reload, EnvFilter, Registry};

/// Level used until the config file has been read
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Handle for swapping the filter once configuration is known
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Filter directives for the given level
pub fn directives(level: &str) -> String {
    format!("repomig={level},repomig_common={level},tower_http=info")
}

/// Build the subscriber writing to `make_writer`
///
/// `RUST_LOG` wins over every other source when present.
pub fn subscriber<W>(make_writer: W) -> (impl Subscriber + Send + Sync + 'static, LogFilter)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    subscriber_with_filter(EnvFilter::try_from_default_env().ok(), make_writer)
}

/// Build the subscriber with an explicit fixed filter, or the bootstrap
/// filter when `fixed` is `None`
pub fn subscriber_with_filter<W>(
    fixed: Option<EnvFilter>,
    make_writer: W,
) -> (impl Subscriber + Send + Sync + 'static, LogFilter)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, from_env) = match fixed {
        Some(filter) => (filter, true),
        None => (EnvFilter::new(directives(BOOTSTRAP_LEVEL)), false),
    };
    let (filter_layer, handle) = reload::Layer::new(filter);

    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(make_writer));

    (subscriber, LogFilter { handle, from_env })
}

impl LogFilter {
    /// Apply the configured level; a no-op when `RUST_LOG` set the filter
    pub fn apply_level(&self, level: &str) -> Result<(), reload::Error> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::new(directives(level)))
    }
}
