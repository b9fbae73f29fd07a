//! Phone number validation and masking for Indian mobile numbers.

use once_cell::sync::Lazy;
use regex::Regex;

// Indian mobile numbers: 10 digits starting with 6-9
static INDIAN_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[6-9]\d{9}$").expect("indian mobile regex is valid")
});

/// Normalizes a raw phone string to the local 10-digit form.
///
/// Formatting characters are dropped and a leading `+91` country code is
/// stripped; the result is digits only.
pub fn normalize_phone(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let local = cleaned.strip_prefix("+91").unwrap_or(&cleaned);
    local.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Whether a normalized phone is a valid Indian mobile number.
pub fn is_valid_mobile(phone: &str) -> bool {
    INDIAN_MOBILE_REGEX.is_match(phone)
}

/// Whether a submitted code is exactly `width` ASCII digits.
pub fn is_valid_code_format(code: &str, width: usize) -> bool {
    code.len() == width && code.chars().all(|c| c.is_ascii_digit())
}

/// Masks a phone number for logging, keeping only the last five characters.
///
/// Counts characters, not bytes, since callers may pass raw request input
/// that is not ASCII.
pub fn mask_phone(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 5 {
        return "*****".to_string();
    }
    let visible: String = phone.chars().skip(total - 5).collect();
    format!("{}{}", "*".repeat(total - 5), visible)
}
