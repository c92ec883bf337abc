//! Logging utilities for the tool.
//!
//! Initializes structured logging using `tracing` and
//! `tracing-subscriber`, reading filter settings from the `RUST_LOG`
//! environment variable. Output goes to stderr so it never mixes with the
//! directives printed on stdout.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the global tracing subscriber.
///
/// Call `init` before any logging statements to avoid missing logs.
///
/// # Examples
///
/// ```rust,no_run
/// use chronyconf::logging::init;
///
/// init();
/// tracing::info!("Logging is initialized!");
/// ```
pub fn init() {
    init_with_writer(fmt::writer::BoxMakeWriter::new(std::io::stderr));
}

/// Initialize logging with a custom writer.
pub fn init_with_writer<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::env_guard::EnvVarGuard;
    use test_support::logging::LogBuffer;
    use tracing::info;

    #[test]
    #[serial_test::serial]
    fn init_logging() {
        let buf = LogBuffer::new();
        let _guard = EnvVarGuard::set("RUST_LOG", "info");
        init_with_writer(buf.clone());
        info!("captured");
        assert!(buf.contents().contains("captured"));
    }
}
