//! Logging setup.

/// Initializes `env_logger` so pipeline logs are visible (`RUST_LOG=info`).
///
/// Safe to call more than once; later calls are ignored, as is an existing
/// logger installed by the host.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("stereoscope-rs {} logging initialized", env!("CARGO_PKG_VERSION"));
}
