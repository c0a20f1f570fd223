mod config;
mod error;

pub use config::{MeterConfig, MeterConfigExt};
pub use error::ConfigError;
