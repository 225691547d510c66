use crate::config::StorageConfig;
use crate::utils::error::{Result, StorageError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(StorageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| StorageError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OSS_ACCESS_KEY_SECRET})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StorageError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.verbose).unwrap_or(false)
    }

    pub fn into_storage(self) -> StorageConfig {
        self.storage
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[storage]
access_key_id = "LTAI-example"
access_key_secret = "example-secret"
endpoint = "oss-cn-beijing.aliyuncs.com"
bucket_name = "reports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.bucket_name, "reports");
        assert!(!config.storage.use_custom_domain);
        assert_eq!(config.storage.region, crate::config::DEFAULT_REGION);
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_OSS_SECRET_FOR_TOML", "from-env");

        let toml_content = r#"
[storage]
access_key_id = "id"
access_key_secret = "${TEST_OSS_SECRET_FOR_TOML}"
endpoint = "https://static.example.com"
bucket_name = "assets"
use_custom_domain = true
region = "oss-cn-hangzhou"

[logging]
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.access_key_secret, "from-env");
        assert!(config.storage.use_custom_domain);
        assert_eq!(config.storage.region, "oss-cn-hangzhou");
        assert!(config.json_logs());

        std::env::remove_var("TEST_OSS_SECRET_FOR_TOML");
    }

    #[test]
    fn test_unknown_variable_left_as_written() {
        let toml_content = r#"
[storage]
access_key_id = "${TEST_OSS_DEFINITELY_UNSET}"
access_key_secret = "s"
endpoint = "oss.example.com"
bucket_name = "assets"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.storage.access_key_id, "${TEST_OSS_DEFINITELY_UNSET}");
    }

    #[test]
    fn test_missing_storage_table() {
        let result = TomlConfig::from_toml_str("[logging]\njson = false\n");
        assert!(matches!(result, Err(StorageError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[storage]
access_key_id = "id"
access_key_secret = "secret"
endpoint = "oss-cn-shenzhen.aliyuncs.com"
bucket_name = "file-test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.into_storage().bucket_name, "file-test");
    }
}
