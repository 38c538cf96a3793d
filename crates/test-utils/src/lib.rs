pub mod builders;
pub mod fixture;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use logwait::logging::{build_filter, LOG_ENV_VAR};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Upper bound for any single async test.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Initialise tracing for tests with the same filter rules as the binary.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `-- --nocapture`). To see every scanned line:
/// `LOGWAIT_LOG=logwait=debug,logwait::lines=trace cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV_VAR).ok();
        let filter = build_filter(None, env.as_deref())
            .unwrap_or_else(|_| EnvFilter::new("warn,logwait=debug"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test instead of hanging when a wait never finishes.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test did not finish within {TEST_TIMEOUT:?}"))
}
