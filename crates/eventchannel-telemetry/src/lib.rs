//! Event Channel Telemetry - logging setup for the event channel.
//!
//! The channel itself only emits `tracing` events. This crate installs a
//! subscriber for applications and test suites that want to see them.
//!
//! # Example
//!
//! ```rust,no_run
//! use eventchannel_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), eventchannel_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("eventchannel=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
