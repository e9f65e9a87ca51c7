//! PEM armor stripping for hand-delimited private key text
//!
//! Both `BEGIN` and `END` delimiters are removed regardless of the line ending
//! that follows them (LF, CRLF or none), then every whitespace character is
//! dropped and the remaining Base64 body is decoded.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use super::errors::CredentialError;

/// Armor label of an X.509 certificate block
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Armor label of an unencrypted PKCS#8 private key block
pub const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";

/// Remove the `label` delimiters and all whitespace from `text`.
#[must_use]
pub fn strip_armor(text: &str, label: &str) -> String {
    let begin = format!("-----BEGIN {label}-----");
    let end = format!("-----END {label}-----");

    text.replace(&begin, "")
        .replace(&end, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Strip the armor for `label` and Base64-decode the body.
///
/// # Errors
///
/// Returns `CredentialError::CredentialParse` if no body remains after
/// stripping or the body is not valid Base64. A block carrying a different
/// label leaves its delimiters behind and fails the Base64 step.
pub fn decode_armored(text: &str, label: &str) -> Result<Vec<u8>, CredentialError> {
    let body = Zeroizing::new(strip_armor(text, label));
    if body.is_empty() {
        return Err(CredentialError::parse(format!("no {label} data found")));
    }

    STANDARD
        .decode(body.as_bytes())
        .map_err(|e| CredentialError::parse(format!("{label} block is not valid Base64: {e}")))
}
