//! Channel error types.

use thiserror::Error;

/// Error returned by a listener to abort the current dispatch pass.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by listeners.
pub type ListenerResult = Result<(), ListenerError>;

/// Errors that can occur with channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Registering one more listener would exceed the per-event capacity.
    #[error("{count} {event} listeners added; increase max_listeners to register more")]
    CapacityExceeded {
        /// Debug rendering of the event key.
        event: String,
        /// Number of listeners already registered for the event.
        count: usize,
        /// Capacity in force when the registration was rejected.
        max: usize,
    },

    /// A channel property was set to an unusable value.
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfiguration {
        /// Property that was rejected.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    /// Attempted to replace a read-only property wholesale.
    #[error("Cannot set read-only property '{property}'")]
    ReadOnlyViolation {
        /// Property that cannot be replaced.
        property: &'static str,
    },

    /// A listener failed while an event was being dispatched.
    #[error("Listener for {event} failed: {source}")]
    ListenerFailed {
        /// Debug rendering of the event key.
        event: String,
        /// Error returned by the listener.
        #[source]
        source: ListenerError,
    },
}

/// Result type for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// Path to the config file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        /// Path to the config file that failed to parse.
        path: String,
        /// Underlying TOML parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Configuration validation failed.
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// Field that failed validation.
        field: String,
        /// Validation failure description.
        message: String,
    },

    /// Environment variable error.
    #[error("Environment variable '{var_name}': {message}")]
    EnvError {
        /// Name of the environment variable.
        var_name: String,
        /// Error description.
        message: String,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
