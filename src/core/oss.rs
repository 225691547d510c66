use crate::config::StorageConfig;
use crate::core::path;
use crate::domain::model::{
    SignOptions, RESPONSE_CACHE_CONTROL, RESPONSE_CONTENT_DISPOSITION, RESPONSE_CONTENT_ENCODING,
    RESPONSE_CONTENT_LANGUAGE, RESPONSE_CONTENT_TYPE, RESPONSE_EXPIRES, VERSION_ID,
};
use crate::domain::ports::ObjectStorage;
use crate::utils::error::{Result, StorageError};
use crate::utils::validation::{validate_range, Validate};
use async_trait::async_trait;
use aws_sdk_s3::config::endpoint::{Endpoint, EndpointFuture, Params, ResolveEndpoint};
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{
    BehaviorVersion, Credentials, Region, RequestChecksumCalculation, ResponseChecksumValidation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::{ByteStream, DateTime};
use aws_sdk_s3::Client as S3Client;
use aws_smithy_types::body::SdkBody;
use std::time::Duration;

/// Longest validity a SigV4 query-string signature accepts.
pub const MAX_SIGNED_URL_EXPIRY_SECS: i64 = 7 * 24 * 60 * 60;

const CREDENTIALS_PROVIDER_NAME: &str = "oss-adapter-static";

/// Sends every request to the configured domain, leaving the bucket out of
/// both host and path. Used when a custom domain is bound to the bucket.
#[derive(Debug)]
struct CustomDomainResolver {
    url: String,
}

impl ResolveEndpoint for CustomDomainResolver {
    fn resolve_endpoint<'a>(&'a self, _params: &'a Params) -> EndpointFuture<'a> {
        EndpointFuture::ready(Ok(Endpoint::builder().url(self.url.clone()).build()))
    }
}

/// Object storage handle for one bucket on an S3-compatible service such as Aliyun OSS.
#[derive(Debug, Clone)]
pub struct OssStorage {
    client: S3Client,
    http: reqwest::Client,
    bucket: String,
}

impl OssStorage {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| StorageError::ConstructionError {
                message: e.to_string(),
            })?;

        let endpoint = config.endpoint_url();
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.access_key_secret.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        // 不重試，單次遠端呼叫失敗即回報；第三方服務不支援新的 checksum 標頭
        let builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
            .response_checksum_validation(ResponseChecksumValidation::WhenRequired);

        let builder = if config.use_custom_domain {
            builder.endpoint_resolver(CustomDomainResolver {
                url: endpoint.clone(),
            })
        } else {
            builder.endpoint_url(endpoint.clone()).force_path_style(false)
        };

        let http = reqwest::Client::builder()
            .user_agent(concat!("oss-adapter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::ConstructionError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        tracing::debug!(
            bucket = %config.bucket_name,
            endpoint = %endpoint,
            custom_domain = config.use_custom_domain,
            "object storage client created"
        );

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            http,
            bucket: config.bucket_name.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        object_key: &str,
        body: ByteStream,
        content_length: Option<i64>,
        content_type: Option<String>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(object_key)
            .set_content_length(content_length)
            .set_content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadError {
                key: object_key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(bucket = %self.bucket, key = object_key, "object written");
        Ok(())
    }
}

/// Content type implied by the key's extension, e.g. `image/png` for `logo.png`.
fn content_type_for_key(object_key: &str) -> Option<String> {
    mime_guess::from_path(object_key)
        .first_raw()
        .map(str::to_string)
}

fn fetch_error(object_key: &str, source_url: &str, source: reqwest::Error) -> StorageError {
    StorageError::FetchError {
        key: object_key.to_string(),
        url: source_url.to_string(),
        source,
    }
}

fn sign_error(object_key: &str, message: impl Into<String>) -> StorageError {
    StorageError::SignError {
        key: object_key.to_string(),
        message: message.into(),
    }
}

/// Accepts RFC 2822 (HTTP date) or RFC 3339 timestamps.
fn parse_response_expires(object_key: &str, value: &str) -> Result<DateTime> {
    let parsed = chrono::DateTime::parse_from_rfc2822(value)
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(value))
        .map_err(|e| {
            sign_error(
                object_key,
                format!("invalid {} value '{}': {}", RESPONSE_EXPIRES, value, e),
            )
        })?;
    Ok(DateTime::from_secs(parsed.timestamp()))
}

#[async_trait]
impl ObjectStorage for OssStorage {
    async fn upload_from_url(&self, object_key: &str, source_url: &str) -> Result<()> {
        let response = self
            .http
            .get(source_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| fetch_error(object_key, source_url, e))?;

        // 來源的 Content-Type 優先，否則依副檔名推斷
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or_else(|| content_type_for_key(object_key));

        // A signed PUT needs the length up front; unknown lengths are buffered.
        let (body, content_length) = match response.content_length() {
            Some(length) => {
                tracing::debug!(key = object_key, url = source_url, length, "streaming source");
                let stream = reqwest::Body::wrap_stream(response.bytes_stream());
                (
                    ByteStream::new(SdkBody::from_body_1_x(stream)),
                    i64::try_from(length).ok(),
                )
            }
            None => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| fetch_error(object_key, source_url, e))?;
                tracing::debug!(
                    key = object_key,
                    url = source_url,
                    bytes = bytes.len(),
                    "buffered source without content length"
                );
                let length = i64::try_from(bytes.len()).ok();
                (ByteStream::from(bytes), length)
            }
        };

        self.put_object(object_key, body, content_length, content_type)
            .await
    }

    async fn upload_from_bytes(&self, object_key: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(StorageError::ValidationError {
                key: object_key.to_string(),
                message: "data cannot be empty".to_string(),
            });
        }

        self.put_object(
            object_key,
            ByteStream::from(data.to_vec()),
            i64::try_from(data.len()).ok(),
            content_type_for_key(object_key),
        )
        .await
    }

    fn parse_path(&self, raw_url: &str) -> Result<String> {
        path::parse_path(raw_url)
    }

    async fn generate_signed_url(
        &self,
        object_key: &str,
        expiry_seconds: i64,
        options: &SignOptions,
    ) -> Result<String> {
        validate_range("expiry_seconds", expiry_seconds, 1, MAX_SIGNED_URL_EXPIRY_SECS)
            .map_err(|e| sign_error(object_key, e.to_string()))?;

        let presigning = PresigningConfig::expires_in(Duration::from_secs(expiry_seconds as u64))
            .map_err(|e| sign_error(object_key, e.to_string()))?;

        let mut request = self.client.get_object().bucket(&self.bucket).key(object_key);
        for (name, value) in options.iter() {
            request = match name {
                RESPONSE_CACHE_CONTROL => request.response_cache_control(value),
                RESPONSE_CONTENT_DISPOSITION => request.response_content_disposition(value),
                RESPONSE_CONTENT_ENCODING => request.response_content_encoding(value),
                RESPONSE_CONTENT_LANGUAGE => request.response_content_language(value),
                RESPONSE_CONTENT_TYPE => request.response_content_type(value),
                RESPONSE_EXPIRES => {
                    request.response_expires(parse_response_expires(object_key, value)?)
                }
                VERSION_ID => request.version_id(value),
                other => {
                    return Err(sign_error(
                        object_key,
                        format!("unsupported signing option '{}'", other),
                    ))
                }
            };
        }

        let presigned = request
            .presigned(presigning)
            .await
            .map_err(|e| sign_error(object_key, DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = object_key,
            expiry_seconds,
            "signed URL generated"
        );

        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(use_custom_domain: bool) -> StorageConfig {
        StorageConfig::new(
            "LTAI-test",
            "test-secret",
            "oss-cn-hangzhou.aliyuncs.com",
            "media-bucket",
            use_custom_domain,
        )
    }

    #[test]
    fn test_construction_rejects_malformed_endpoint() {
        let mut bad = config(false);
        bad.endpoint = "http://exa mple.com".to_string();

        let err = OssStorage::new(&bad).unwrap_err();
        assert!(matches!(err, StorageError::ConstructionError { .. }));
    }

    #[test]
    fn test_construction_rejects_hostless_endpoint() {
        for endpoint in ["http://", "https://", "https:///"] {
            let mut bad = config(false);
            bad.endpoint = endpoint.to_string();

            assert!(
                matches!(
                    OssStorage::new(&bad),
                    Err(StorageError::ConstructionError { .. })
                ),
                "{} should not construct",
                endpoint
            );
        }
    }

    #[test]
    fn test_construction_keeps_bucket() {
        let storage = OssStorage::new(&config(false)).unwrap();
        assert_eq!(storage.bucket(), "media-bucket");
    }

    #[test]
    fn test_content_type_for_key() {
        assert_eq!(content_type_for_key("img/logo.png").as_deref(), Some("image/png"));
        assert_eq!(content_type_for_key("reports/q1.csv").as_deref(), Some("text/csv"));
        assert!(content_type_for_key("no-extension").is_none());
    }

    #[test]
    fn test_construction_rejects_missing_credentials() {
        let mut bad = config(false);
        bad.access_key_id = " ".to_string();

        assert!(matches!(
            OssStorage::new(&bad),
            Err(StorageError::ConstructionError { .. })
        ));
    }

    #[test]
    fn test_parse_response_expires() {
        let parsed = parse_response_expires("k", "Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(parsed.secs(), 1_445_412_480);

        let parsed = parse_response_expires("k", "2015-10-21T07:28:00Z").unwrap();
        assert_eq!(parsed.secs(), 1_445_412_480);

        assert!(matches!(
            parse_response_expires("k", "tomorrow"),
            Err(StorageError::SignError { .. })
        ));
    }

    #[tokio::test]
    async fn test_signed_url_uses_virtual_hosted_style() {
        let storage = OssStorage::new(&config(false)).unwrap();

        let url = storage
            .generate_signed_url("photos/cat.png", 3600, &SignOptions::new())
            .await
            .unwrap();

        assert!(url.starts_with("http://media-bucket.oss-cn-hangzhou.aliyuncs.com/photos/cat.png?"));
        assert!(url.contains("X-Amz-Expires=3600"));
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_signed_url_with_custom_domain() {
        let mut cname = config(true);
        cname.endpoint = "https://static.example.com".to_string();
        let storage = OssStorage::new(&cname).unwrap();

        let url = storage
            .generate_signed_url("docs/report.pdf", 600, &SignOptions::new())
            .await
            .unwrap();

        assert!(url.starts_with("https://static.example.com/docs/report.pdf?"));
        assert!(!url.contains("media-bucket"));
        assert!(url.contains("X-Amz-Expires=600"));
    }

    #[tokio::test]
    async fn test_signed_url_rejects_bad_expiry() {
        let storage = OssStorage::new(&config(false)).unwrap();

        for expiry in [0, -5, MAX_SIGNED_URL_EXPIRY_SECS + 1] {
            let err = storage
                .generate_signed_url("a.txt", expiry, &SignOptions::new())
                .await
                .unwrap_err();
            assert!(matches!(err, StorageError::SignError { ref key, .. } if key == "a.txt"));
            assert!(err.to_string().contains("604800"));
        }
    }

    #[tokio::test]
    async fn test_signed_url_rejects_unknown_option() {
        let storage = OssStorage::new(&config(false)).unwrap();
        let options = SignOptions::new().with("x-oss-process", "image/resize,w_100");

        let err = storage
            .generate_signed_url("a.png", 60, &options)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("x-oss-process"));
    }

    #[tokio::test]
    async fn test_upload_from_bytes_rejects_empty_payload() {
        let storage = OssStorage::new(&config(false)).unwrap();

        let err = storage.upload_from_bytes("empty.bin", &[]).await.unwrap_err();
        assert!(matches!(err, StorageError::ValidationError { ref key, .. } if key == "empty.bin"));
    }
}
