// helpers.rs: logging and config shortcuts for integration tests

use libsuica::session::ScanConfig;
use libsuica::utils::ms;

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fast_config() -> ScanConfig {
    ScanConfig::builder()
        .poll_interval(ms(5))
        .command_timeout(ms(500))
        .build()
        .unwrap()
}
