/// Runtime settings loading.
pub mod config;
/// Error types: worker lifecycle, settings, logging setup.
pub mod error;
/// Structured logging on top of `tracing-subscriber`.
pub mod logging;
/// Publishers, listener mailboxes and the liveness registry.
pub mod signals;
/// The dynamically typed notification payload.
pub mod value;
/// Background thread driving the dispatch loop.
pub mod worker;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// config
pub use config::Settings;
/// Operation errors and result types.
pub use error::{LoggingError, SettingsError, WorkerError, WorkerResult};
/// Logging setup.
pub use logging::{init_logging, LogFormat, LoggingConfig};
/// Pub/Sub API.
pub use signals::{
    Endpoint, Handler, Listener, ListenerId, ListenerRef, Liveness, Locked, Receiver, Signal,
    Signaler, SyncMode, Transporter, Unsynchronized,
};
/// Payload types.
pub use value::{ArbitraryPointer, Pointer, StringList, TypeTag, Value, ValueList, ValueMap};
/// Dispatch worker.
pub use worker::Worker;
