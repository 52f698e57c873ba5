use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::stderr_buffer::BufferedStderr;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "moyenne=debug"
    } else {
        "moyenne=warn"
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or debug
/// output with `--verbose`. Output goes to stderr through [`BufferedStderr`]
/// so the TUI can hold it back while it draws.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(false)
                .with_writer(BufferedStderr)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(true), "moyenne=debug");
        assert_eq!(default_filter(false), "moyenne=warn");
    }
}
