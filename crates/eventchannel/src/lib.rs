//! Event Channel - synchronous, single-threaded event emitter.
//!
//! This crate provides:
//! - [`EventChannel`], a registry of ordered listener lists keyed by event
//! - [`Listener`] handles compared by identity for removal
//! - Once-listeners that remove themselves after their first invocation
//! - [`ChannelConfig`] for loading the per-event capacity from TOML or the
//!   environment
//!
//! # Dispatch
//!
//! [`EventChannel::emit`] walks the list for an event by position while the
//! list stays live. Listeners receive the channel itself and may call back
//! into it: registrations, removals and nested emits take effect
//! immediately, including for the pass that is already running.
//!
//! # Example
//!
//! ```rust
//! use eventchannel::prelude::*;
//!
//! # fn main() -> ChannelResult<()> {
//! let channel: EventChannel<&str, (i32, i32)> = EventChannel::new();
//! let add = Listener::infallible(|_, &(a, b): &(i32, i32)| println!("{}", a + b));
//!
//! channel.on("sum", add.clone())?.once("sum", add.clone())?;
//! assert_eq!(channel.listener_count("sum"), 2);
//!
//! channel.emit("sum", &(1, 2))?;
//! assert_eq!(channel.listener_count("sum"), 1);
//!
//! channel.off("sum", &add);
//! assert!(channel.emit("sum", &(3, 4))?);
//!
//! channel.all_off("sum");
//! assert!(!channel.emit("sum", &(5, 6))?);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod channel;
mod config;
mod error;
mod listener;

pub use channel::{DEFAULT_MAX_LISTENERS, EventChannel};
pub use config::{ChannelConfig, MAX_LISTENERS_ENV, collect_env_vars};
pub use error::{
    ChannelError, ChannelResult, ConfigError, ConfigResult, ListenerError, ListenerResult,
};
pub use listener::{Listener, ListenerEntry, ListenerFn, ListenerList};
