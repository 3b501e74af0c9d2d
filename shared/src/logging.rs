use env_logger::Env;

/// Initialize the process-wide logger. The default level is `info`;
/// `RUST_LOG` overrides it. **Must** be called once, at binary startup.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
