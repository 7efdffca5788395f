//! Target URL validation.
//!
//! The redirector stores URLs exactly as submitted; this module only decides
//! whether a submission is acceptable.

use url::Url;

/// Errors that can occur while validating a target URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain control characters")]
    ControlCharacter,
}

/// Validates a target URL and returns it trimmed of surrounding whitespace.
///
/// Rejects empty input, unparseable input, schemes other than `http`/`https`
/// (so `javascript:`, `data:` and friends never become redirect targets) and
/// URLs without a host. Embedded control characters (tab, CR, LF and the
/// rest of the C0 range, plus DEL) are rejected outright: the URL parser
/// would silently strip or escape them, but the stored string has to be a
/// valid `Location` header value byte for byte.
pub fn validate_target_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed)
}
