pub mod logging;
pub mod settings;
pub mod worker;

pub use logging::LoggingError;
pub use settings::{SettingsError, SettingsResult};
pub use worker::{WorkerError, WorkerResult};
