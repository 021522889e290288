//! Event Channel Test - shared test utilities for the event channel.
//!
//! This crate provides recording and failing listeners plus harness helpers
//! for logging and temporary config files. Use it as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! eventchannel-test.workspace = true
//! ```
//!
//! ```rust
//! use eventchannel::EventChannel;
//! use eventchannel_test::{CallLog, recording_listener};
//!
//! let log = CallLog::new();
//! let channel: EventChannel<&str, i32> = EventChannel::new();
//! channel.on("x", recording_listener(&log, "f1")).unwrap();
//! channel.emit("x", &7).unwrap();
//! assert_eq!(log.calls(), vec!["f1:7"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod harness;
pub mod recorder;

pub use harness::*;
pub use recorder::*;
