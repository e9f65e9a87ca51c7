//! X.509 certificate decoding and inspection

use rustls::pki_types::CertificateDer;
use x509_parser::prelude::*;

use super::armor::CERTIFICATE_LABEL;
use super::errors::CredentialError;

/// Parsed certificate information extracted from X.509
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateSummary {
    /// Full subject distinguished name
    pub subject: String,
    /// Subject common name, if present
    pub common_name: Option<String>,
    /// Full issuer distinguished name
    pub issuer: String,
    /// BasicConstraints CA flag
    pub is_ca: bool,
    /// Serial number as colon separated hex
    pub serial: String,
    /// Validity start, seconds since the Unix epoch
    pub not_before: i64,
    /// Validity end, seconds since the Unix epoch
    pub not_after: i64,
}

/// Parse a single DER-encoded X.509 certificate.
///
/// # Errors
///
/// Returns `CredentialError::CredentialParse` if the bytes are not a
/// well-formed certificate or carry trailing data after it.
pub fn inspect_der(der: &[u8]) -> Result<CertificateSummary, CredentialError> {
    let (rest, cert) = X509Certificate::from_der(der).map_err(|e| {
        CredentialError::parse(format!("not a well-formed X.509 certificate: {e}"))
    })?;

    if !rest.is_empty() {
        return Err(CredentialError::parse(format!(
            "{} unexpected bytes after the X.509 certificate",
            rest.len()
        )));
    }

    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);

    Ok(CertificateSummary {
        subject: cert.subject().to_string(),
        common_name,
        issuer: cert.issuer().to_string(),
        is_ca: cert.is_ca(),
        serial: cert.raw_serial_as_string(),
        not_before: cert.validity().not_before.timestamp(),
        not_after: cert.validity().not_after.timestamp(),
    })
}

/// Decode one PEM `CERTIFICATE` block.
///
/// Text before the `BEGIN` line is ignored and either line ending is
/// accepted. Used for every certificate both builders read from text.
///
/// # Errors
///
/// Returns `CredentialError::CredentialParse` if the text is not PEM, the
/// block is not tagged `CERTIFICATE`, or the contents are not X.509.
pub fn decode_certificate(
    text: &str,
) -> Result<(CertificateDer<'static>, CertificateSummary), CredentialError> {
    let block = ::pem::parse(text)
        .map_err(|e| CredentialError::parse(format!("certificate is not PEM: {e}")))?;

    if block.tag() != CERTIFICATE_LABEL {
        return Err(CredentialError::parse(format!(
            "expected a {CERTIFICATE_LABEL} block, found {}",
            block.tag()
        )));
    }

    let der = block.into_contents();
    let summary = inspect_der(&der)?;
    Ok((CertificateDer::from(der), summary))
}

/// Order certificates leaf first, each followed by its issuer.
///
/// Returns indices into `certs`. The leaf is the first end-entity certificate
/// that issued none of the others. Certificates not reachable by issuer links
/// keep their relative order at the end.
pub(crate) fn chain_order(certs: &[CertificateSummary]) -> Vec<usize> {
    let issues_another = |i: usize| {
        certs
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && other.issuer == certs[i].subject)
    };

    let Some(leaf) = (0..certs.len())
        .find(|&i| !certs[i].is_ca && !issues_another(i))
        .or_else(|| (0..certs.len()).find(|&i| !issues_another(i)))
        .or_else(|| (0..certs.len()).find(|&i| !certs[i].is_ca))
        .or_else(|| (!certs.is_empty()).then_some(0))
    else {
        return Vec::new();
    };

    let mut order = vec![leaf];
    let mut current = leaf;
    while certs[current].issuer != certs[current].subject {
        let next = (0..certs.len())
            .find(|&j| !order.contains(&j) && certs[j].subject == certs[current].issuer);
        match next {
            Some(j) => {
                order.push(j);
                current = j;
            }
            None => break,
        }
    }

    let rest: Vec<usize> = (0..certs.len()).filter(|i| !order.contains(i)).collect();
    order.extend(rest);
    order
}
