//! Configuration system for conform.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod conform_config;
pub mod gate_config;
pub mod output_config;
pub mod validation_config;

pub use conform_config::{CliOverrides, ConformConfig};
pub use gate_config::GateDefinition;
pub use output_config::OutputConfig;
pub use validation_config::ValidationConfig;
