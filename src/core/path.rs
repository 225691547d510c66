use crate::utils::error::{Result, StorageError};
use url::Url;

/// Returns the path of an absolute URL, dropping scheme, host, query and fragment.
///
/// The path is returned in its percent-encoded form.
pub fn parse_path(raw_url: &str) -> Result<String> {
    let parsed = Url::parse(raw_url).map_err(|source| StorageError::ParseError {
        url: raw_url.to_string(),
        source,
    })?;
    Ok(parsed.path().to_string())
}
