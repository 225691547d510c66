#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{Result, StorageError};
use crate::utils::validation::{
    validate_bucket_name, validate_non_empty_string, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

pub const DEFAULT_REGION: &str = "us-east-1";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Connection settings for one bucket.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub access_key_secret: String,
    /// Host name or URL of the storage service, e.g. `oss-cn-hangzhou.aliyuncs.com`.
    /// With `use_custom_domain` this is the domain bound to the bucket.
    pub endpoint: String,
    pub bucket_name: String,
    #[serde(default)]
    pub use_custom_domain: bool,
    #[serde(default = "default_region")]
    pub region: String,
}

impl StorageConfig {
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        endpoint: impl Into<String>,
        bucket_name: impl Into<String>,
        use_custom_domain: bool,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            endpoint: endpoint.into(),
            bucket_name: bucket_name.into(),
            use_custom_domain,
            region: default_region(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn from_env() -> Result<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| StorageError::MissingConfigError {
                field: name.to_string(),
            })
        };

        let use_custom_domain = match env::var("OSS_USE_CNAME") {
            Ok(value) => parse_bool("OSS_USE_CNAME", &value)?,
            Err(_) => false,
        };

        Ok(Self {
            access_key_id: required("OSS_ACCESS_KEY_ID")?,
            access_key_secret: required("OSS_ACCESS_KEY_SECRET")?,
            endpoint: required("OSS_ENDPOINT")?,
            bucket_name: required("OSS_BUCKET")?,
            use_custom_domain,
            region: env::var("OSS_REGION").unwrap_or_else(|_| default_region()),
        })
    }

    /// The endpoint as a URL. A bare host name is treated as plain http.
    /// Trailing slashes are only stripped after the scheme, so `http://` stays hostless.
    pub fn endpoint_url(&self) -> String {
        let endpoint = self.endpoint.trim();
        match endpoint.split_once("://") {
            Some((scheme, rest)) => format!("{}://{}", scheme, rest.trim_end_matches('/')),
            None => format!("http://{}", endpoint.trim_end_matches('/')),
        }
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(StorageError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected a boolean (true/false)".to_string(),
        }),
    }
}

impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("access_key_id", &self.access_key_id)
            .field("access_key_secret", &"***")
            .field("endpoint", &self.endpoint)
            .field("bucket_name", &self.bucket_name)
            .field("use_custom_domain", &self.use_custom_domain)
            .field("region", &self.region)
            .finish()
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<()> {
        // 驗證憑證
        validate_non_empty_string("access_key_id", &self.access_key_id)?;
        validate_non_empty_string("access_key_secret", &self.access_key_secret)?;

        validate_non_empty_string("endpoint", &self.endpoint)?;
        validate_url("endpoint", &self.endpoint_url())?;

        validate_bucket_name("bucket_name", &self.bucket_name)?;
        validate_non_empty_string("region", &self.region)?;

        tracing::debug!("storage configuration validation passed");
        Ok(())
    }
}
