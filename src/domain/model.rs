use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RESPONSE_CACHE_CONTROL: &str = "response-cache-control";
pub const RESPONSE_CONTENT_DISPOSITION: &str = "response-content-disposition";
pub const RESPONSE_CONTENT_ENCODING: &str = "response-content-encoding";
pub const RESPONSE_CONTENT_LANGUAGE: &str = "response-content-language";
pub const RESPONSE_CONTENT_TYPE: &str = "response-content-type";
pub const RESPONSE_EXPIRES: &str = "response-expires";
pub const VERSION_ID: &str = "versionId";

/// Options applied to a signed GET request, keyed by their query-string names.
///
/// The set is opaque to callers of [`ObjectStorage`](crate::domain::ports::ObjectStorage);
/// each backend decides which keys it honours and rejects the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignOptions {
    entries: BTreeMap<String, String>,
}

impl SignOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn response_content_type(self, value: impl Into<String>) -> Self {
        self.with(RESPONSE_CONTENT_TYPE, value)
    }

    pub fn response_content_disposition(self, value: impl Into<String>) -> Self {
        self.with(RESPONSE_CONTENT_DISPOSITION, value)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = SignOptions::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}
