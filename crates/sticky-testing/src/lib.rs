//! Testing utilities and harness for sticky section headers

pub mod test_renderer;
pub mod test_rule;

pub use test_renderer::*;
pub use test_rule::*;

/// Routes `log` output to the test harness. Safe to call from every test.
pub fn init_test_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder().is_test(true).try_init();
    }
}
