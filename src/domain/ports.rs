use crate::domain::model::SignOptions;
use crate::utils::error::Result;
use async_trait::async_trait;

/// What callers need from an object store. Backends for other providers
/// implement this so call sites can hold an `Arc<dyn ObjectStorage>`.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Downloads `source_url` and stores the body under `object_key`.
    async fn upload_from_url(&self, object_key: &str, source_url: &str) -> Result<()>;

    /// Stores `data` under `object_key`. Empty payloads are rejected locally.
    async fn upload_from_bytes(&self, object_key: &str, data: &[u8]) -> Result<()>;

    /// Path component of `raw_url`. Never touches the network.
    fn parse_path(&self, raw_url: &str) -> Result<String>;

    /// A GET URL for `object_key` that stays valid for `expiry_seconds`.
    async fn generate_signed_url(
        &self,
        object_key: &str,
        expiry_seconds: i64,
        options: &SignOptions,
    ) -> Result<String>;
}
