//! Compact identity-token decoding.
//!
//! The provider issues a three-segment `header.payload.signature` token.
//! Only the payload is consumed here; signature verification is not part
//! of this integration, so the decoder is deliberately tolerant: every
//! malformed input maps to [`InvalidIdentityToken`], never a panic.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use thiserror::Error;

use crate::{IdentityClaims, TrustLevel};

/// Failure decoding a compact identity token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identity token: {0}")]
pub struct InvalidIdentityToken(String);

/// Decodes the claims carried by a compact three-segment token.
///
/// Fails when the input is empty, does not split into exactly three
/// dot-separated segments, the middle segment is not base64url (padded or
/// unpadded), or the decoded bytes are not a JSON object. Missing claim
/// fields are not errors; they surface later through the admission policy.
pub fn decode_identity_token(token: &str) -> Result<IdentityClaims, InvalidIdentityToken> {
    if token.trim().is_empty() {
        return Err(InvalidIdentityToken("token is empty".to_owned()));
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(InvalidIdentityToken(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let payload = decode_segment(segments[1])?;

    let claims: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|error| InvalidIdentityToken(format!("payload is not valid JSON: {error}")))?;

    let claims = claims
        .as_object()
        .ok_or_else(|| InvalidIdentityToken("payload is not a JSON object".to_owned()))?;

    let subject = string_claim(claims, "sub").unwrap_or_default();
    let name = string_claim(claims, "name");
    let email = string_claim(claims, "email");

    // The provider nests the reliability seal under `selo.nivel`.
    let trust_level = claims
        .get("selo")
        .and_then(serde_json::Value::as_object)
        .and_then(|seal| seal.get("nivel"))
        .and_then(serde_json::Value::as_str)
        .and_then(TrustLevel::parse);

    Ok(IdentityClaims::new(subject, name, email, trust_level))
}

/// Decodes one base64url segment, accepting padded and unpadded input by
/// re-padding to a multiple of 4 before decoding.
fn decode_segment(segment: &str) -> Result<Vec<u8>, InvalidIdentityToken> {
    let mut normalized = segment.to_owned();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    URL_SAFE
        .decode(normalized.as_bytes())
        .map_err(|error| InvalidIdentityToken(format!("payload is not base64url: {error}")))
}

fn string_claim(
    claims: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    claims
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
