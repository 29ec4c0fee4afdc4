use env_logger::Env;

/// Installs the process-wide logger. Logs go to stderr so they never mix
/// with the report on stdout; `RUST_LOG` overrides the `warn` default.
pub fn init() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();
}
