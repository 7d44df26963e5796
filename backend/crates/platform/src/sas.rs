//! Shared Access Signature tokens
//!
//! Sensor collars authenticate to the IoT hub with a short-lived SAS token
//! signed by the device primary key:
//!
//! ```text
//! SharedAccessSignature sr=<uri>&sig=<signature>&se=<expiry>
//! ```
//!
//! `uri` is the lower-cased resource URI, percent-encoded the way
//! `encodeURIComponent` does it. The signature is base64(HMAC-SHA256(key,
//! "<uri>\n<expiry>")) with the base64-decoded primary key, also
//! percent-encoded.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::crypto::{from_base64, hmac_sha256, to_base64};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SasError {
    #[error("Primary key is not valid base64")]
    InvalidKey,
}

/// Build a SAS token valid until `now_unix_secs + expiry_secs`.
pub fn generate_sas_token(
    resource_uri: &str,
    primary_key_b64: &str,
    expiry_secs: u64,
    now_unix_secs: u64,
) -> Result<String, SasError> {
    let expires_at = now_unix_secs + expiry_secs;
    let encoded_uri = encode_uri_component(&resource_uri.to_lowercase());
    let string_to_sign = format!("{encoded_uri}\n{expires_at}");

    let key = from_base64(primary_key_b64).map_err(|_| SasError::InvalidKey)?;
    let signature = to_base64(&hmac_sha256(&key, string_to_sign.as_bytes()));

    Ok(format!(
        "SharedAccessSignature sr={encoded_uri}&sig={}&se={expires_at}",
        encode_uri_component(&signature)
    ))
}

/// Bytes `encodeURIComponent` escapes: everything outside
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}
