use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays clean for `--format json`.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug for this crate with `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,linear=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
