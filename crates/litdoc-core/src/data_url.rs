//! Inline `data:` references for embedding binary blobs in a document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::bundle::EncryptedBundle;
use crate::error::{CoreError, Result};

/// Media type used for encrypted bundles.
pub const BUNDLE_MEDIA_TYPE: &str = "application/octet-stream";

/// Encode bytes as `data:<media_type>;base64,<payload>`.
pub fn encode_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Decode a base64 data URL, returning the media type and the bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::InvalidDataUrl("missing data: scheme".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| CoreError::InvalidDataUrl("missing ',' separator".into()))?;
    let media_type = meta
        .strip_suffix(";base64")
        .ok_or_else(|| CoreError::InvalidDataUrl("only base64 data urls are supported".into()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| CoreError::InvalidDataUrl(e.to_string()))?;
    Ok((media_type.to_string(), bytes))
}

/// The inline reference embedded in a document for an encrypted bundle.
pub fn bundle_data_url(bundle: &EncryptedBundle) -> String {
    encode_data_url(BUNDLE_MEDIA_TYPE, &bundle.to_bytes())
}

/// Resolve an inline bundle reference back to the bundle.
pub fn bundle_from_data_url(url: &str) -> Result<EncryptedBundle> {
    let (_, bytes) = decode_data_url(url)?;
    EncryptedBundle::from_bytes(&bytes)
}
