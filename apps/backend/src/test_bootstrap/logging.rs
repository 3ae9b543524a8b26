//! One-time test subscriber.
//!
//! Unit tests reach this through the domain test helpers; integration tests
//! call it from their `support` module. Level precedence: `TEST_LOG`, then
//! `RUST_LOG`, then `warn`.
//!
//! ```bash
//! TEST_LOG=debug cargo test -p undercover-backend --test game_flow_test
//! ```

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test-writer subscriber. Idempotent and race-safe.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
