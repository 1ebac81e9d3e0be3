//! Shared field validation primitives.
//!
//! Both the submission client and the server-side validator gate on these
//! functions. The server must not skip them even though the client already
//! ran them: the two sides trust each other for nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum accepted email length per RFC 5321's path limit.
pub const EMAIL_MAX_LEN: usize = 254;

/// Email shape: local part, `@`, registrable labels and at least one
/// dot-separated TLD label. `a@b` does not pass.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^[a-zA-Z0-9.!\#$%&'*+/=?^_`{|}~-]+
        @
        [a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?
        (?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email regex must compile")
});

/// Indian mobile: exactly 10 digits, first digit 6-9, after normalization.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9]\d{9}$").expect("phone regex must compile"));

/// Markup fragments that never belong in a form field.
static SUSPICIOUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script|javascript:|onerror=|onclick=").expect("deny-list regex must compile")
});

/// Wider deny-list used on the server, where the cost of a false positive
/// is lower than on the client.
static SUSPICIOUS_STRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script|javascript:|onerror=|onclick=|<iframe|eval\(|expression\(")
        .expect("strict deny-list regex must compile")
});

/// Validate a name-like field (person name, team name).
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let len = name.chars().count();
    if len < 2 || len > 50 {
        return Err("Name must be between 2 and 50 characters.");
    }
    Ok(())
}

/// Validate an email address against the pattern and the length cap.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > EMAIL_MAX_LEN || !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address.");
    }
    Ok(())
}

/// Strip everything that is not an ASCII digit, then drop a leading `91`
/// country code or a leading trunk `0` so that `+91 98765-43210` and
/// `09876543210` both normalize to the bare 10-digit number.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else if digits.len() == 11 && digits.starts_with('0') {
        digits[1..].to_string()
    } else {
        digits
    }
}

/// Validate a phone number: normalization must yield a 10-digit Indian
/// mobile number.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(&normalize_phone(phone)) {
        return Err("Please enter a valid 10-digit Indian mobile number.");
    }
    Ok(())
}

/// Validate a contact message body.
pub fn validate_message(message: &str) -> Result<(), &'static str> {
    let len = message.chars().count();
    if len < 10 || len > 1000 {
        return Err("Message must be between 10 and 1000 characters.");
    }
    Ok(())
}

/// Deny-list heuristic over free text. Heuristic only: real protection is
/// output encoding at render time plus server-side re-validation.
pub fn is_suspicious(text: &str) -> bool {
    SUSPICIOUS_RE.is_match(text)
}

/// Server-side variant of [`is_suspicious`] with a wider deny-list.
pub fn is_suspicious_strict(text: &str) -> bool {
    SUSPICIOUS_STRICT_RE.is_match(text)
}
