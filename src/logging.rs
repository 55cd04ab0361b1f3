use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Output goes to stderr so command results on
/// stdout stay machine-readable. `RUST_LOG` overrides the default `info` level.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be set (tests, embedding); keep the existing one
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
