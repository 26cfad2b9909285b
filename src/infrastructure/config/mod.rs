//! Infrastructure configuration modules.

pub mod logging;
pub mod secret;
pub mod settings;

pub use logging::{LogFormat, LoggingConfig};
pub use secret::{DatabaseUrl, Secret};
pub use settings::{load_config, Config};
