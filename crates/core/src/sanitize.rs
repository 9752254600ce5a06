//! Claim and Report Sanitization
//!
//! Claims and verification reports must match an allowed character class
//! (alphanumerics plus `,.;?!*()_-`) before they travel through prompt
//! templates. Text that fails the class gets its trailing run of disallowed
//! characters replaced with a single `_`. Best effort only: disallowed
//! characters in the middle of a string are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

static ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9,.;?!*()_-]+$").expect("valid pattern"));

static TRAILING_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9,.;?!*()_-]+$").expect("valid pattern"));

/// Sanitize a claim or report string.
///
/// Returns the input unchanged when it fully matches the allowed class;
/// otherwise replaces the trailing disallowed run (if any) with `_`.
/// Idempotent: sanitizing twice yields the same result.
pub fn sanitize(text: &str) -> String {
    if ALLOWED.is_match(text) {
        return text.to_string();
    }
    TRAILING_DISALLOWED.replace(text, "_").into_owned()
}
