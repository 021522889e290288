//! Test harness helpers.

use std::io::Write;

use eventchannel_telemetry::{LogConfig, setup_logging};
use tempfile::NamedTempFile;

/// Set up test logging with the given filter.
///
/// Output goes through the test harness, so it only shows for failing tests
/// or with `--nocapture`. Calling it more than once is harmless.
///
/// # Example
///
/// ```rust,ignore
/// use eventchannel_test::setup_test_logging;
///
/// #[test]
/// fn my_test() {
///     setup_test_logging("eventchannel=trace");
///     // ... test code
/// }
/// ```
pub fn setup_test_logging(filter: &str) {
    let _ = setup_logging(&LogConfig::for_tests(filter));
}

/// Set up test logging with the default filter (debug level).
pub fn setup_test_logging_default() {
    setup_test_logging("debug");
}

/// Create a temporary config file with the given content.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_config_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
