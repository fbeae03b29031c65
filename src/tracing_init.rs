//! Tracing setup for the driver binaries and tests
//!
//! Filtering is environment-based through `RUST_LOG`:
//! - `RUST_LOG=rustytsa=debug` - per-iteration CLEAN components and peak
//!   refinement
//! - `RUST_LOG=rustytsa::pass=debug` - filter normalization only

#[cfg(test)]
use once_cell::sync::Lazy;

/// Initialize tracing for a binary. Call once, early in `main`.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rustytsa=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing for tests with environment-based filtering.
///
/// Safe to call from every test; the subscriber is installed once.
#[cfg(test)]
pub fn init_test_tracing() {
    static TRACING: Lazy<()> = Lazy::new(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rustytsa=warn"));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_test_writer()
            .init();
    });

    Lazy::force(&TRACING);
}
