//! reel-core: shared error taxonomy, configuration and telemetry for Reel services.

pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::{ReelConfig, ReelConfigSnapshot};
pub use errors::{ErrorKind, ReelError, ReelResult};
