use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. `filter` uses `RUST_LOG` syntax; an
/// unparseable filter falls back to `info`. Safe to call more than once.
pub fn init(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
        eprintln!("Invalid log filter {:?} ({}), using \"info\"", filter, e);
        EnvFilter::new("info")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init();
}
