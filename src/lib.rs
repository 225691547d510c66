pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use config::{toml_config::TomlConfig, StorageConfig};
pub use core::{oss::OssStorage, path::parse_path};
pub use domain::{model::SignOptions, ports::ObjectStorage};
pub use utils::error::{Result, StorageError};
