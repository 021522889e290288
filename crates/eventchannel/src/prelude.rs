//! Prelude module - commonly used types for convenient import.
//!
//! Use `use eventchannel::prelude::*;` to import all essential types.

// Channel
pub use crate::{DEFAULT_MAX_LISTENERS, EventChannel};

// Listeners
pub use crate::{Listener, ListenerEntry, ListenerList};

// Errors
pub use crate::{ChannelError, ChannelResult, ListenerError, ListenerResult};

// Configuration
pub use crate::{ChannelConfig, ConfigError, ConfigResult};
