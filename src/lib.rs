pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{env::EnvConfig, toml_config::TomlConfig};
pub use crate::core::{checker::DealChecker, verifier::PlatformVerifier};
pub use crate::domain::model::{Place, Platform, PlatformVerdict, VerificationResult, VerificationStatus};
pub use crate::utils::error::{CheckError, Result};
