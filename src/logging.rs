use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `TALLY_LOG=tally=debug`
pub const LOG_ENV: &str = "TALLY_LOG";

/// Install the stderr subscriber. `TALLY_LOG` wins over the verbosity flag.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
