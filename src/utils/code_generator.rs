//! Short code generation and validation utilities.

use base64::Engine as _;
use regex::Regex;
use std::sync::LazyLock;

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 6;

/// Random bytes drawn per code. Six bytes encode to eight base64 characters,
/// of which the first [`CODE_LENGTH`] are kept.
const CODE_LENGTH_BYTES: usize = 6;

static CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid code pattern")
});

/// Generates a random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, truncated to [`CODE_LENGTH`] characters.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    let mut code = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer);
    code.truncate(CODE_LENGTH);
    code
}

/// Returns true if `code` looks like something the redirector could have issued.
///
/// Used to reject garbage on the ingestion path. Accepts the URL-safe base64
/// alphabet, 1 to 64 characters.
pub fn is_valid_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}
