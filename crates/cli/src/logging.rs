use tracing_subscriber::EnvFilter;

/// Initializes the process-wide subscriber. Logs go to stderr so stdout
/// stays reserved for the single JSON outcome.
pub fn init_logging(verbose: u8, debug: bool) {
    // Allow RUST_LOG overrides, fall back to flag-controlled level
    let default_level = match (debug, verbose) {
        (_, v) if v >= 2 => "trace",
        (true, _) | (_, 1) => "debug",
        _ => "info",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact()
        .init();
}
