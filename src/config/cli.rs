use crate::config::toml_config::TomlConfig;
use crate::config::StorageConfig;
use crate::domain::model::SignOptions;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "oss-adapter")]
#[command(about = "Upload objects to an S3-compatible bucket and hand out signed URLs")]
pub struct Cli {
    /// TOML file with a [storage] table. OSS_* environment variables are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Download a URL and store the body under KEY
    UploadUrl {
        #[arg(long)]
        key: String,
        #[arg(long)]
        url: String,
    },
    /// Store the contents of a local file under KEY
    UploadFile {
        #[arg(long)]
        key: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Print the path component of a URL
    ParsePath { url: String },
    /// Print a signed GET URL for KEY
    Sign {
        #[arg(long)]
        key: String,
        #[arg(long, default_value_t = 3600, allow_negative_numbers = true)]
        expires: i64,
        /// Signing option as NAME=VALUE, e.g. response-content-type=image/png
        #[arg(long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
        #[arg(long, help = "Print the result as JSON")]
        json: bool,
    },
}

impl Cli {
    /// Loads the TOML file when one was given.
    pub fn file_config(&self) -> Result<Option<TomlConfig>> {
        self.config.as_ref().map(TomlConfig::from_file).transpose()
    }

    pub fn storage_config(&self, file_config: Option<TomlConfig>) -> Result<StorageConfig> {
        match file_config {
            Some(config) => Ok(config.into_storage()),
            None => StorageConfig::from_env(),
        }
    }
}

pub fn sign_options(pairs: &[(String, String)]) -> SignOptions {
    pairs.iter().cloned().collect()
}

fn parse_option(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}
