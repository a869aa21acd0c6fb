use time::format_description::well_known::Rfc3339;
use tracing_subscriber::fmt::{time::UtcTime, MakeWriter};
use tracing_subscriber::{fmt, EnvFilter};

/// RFC 3339 UTC timestamps on every log line.
pub fn timer() -> UtcTime<Rfc3339> {
    UtcTime::new(Rfc3339)
}

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init(default_level: &str) {
    install(default_level, std::io::stdout);
}

/// Like [`init`] but logs to stderr, leaving stdout for command output.
pub fn init_stderr(default_level: &str) {
    install(default_level, std::io::stderr);
}

fn install<W>(default_level: &str, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(timer())
        .with_writer(writer)
        .init();
}
