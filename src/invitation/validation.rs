//! Client-side field validation for invite, application and registration
//! forms. Failures are reported per field and never reach the network.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Symbols accepted by the password "special character" rule.
pub const PASSWORD_SYMBOLS: &str = "@$!%*?&#";

/// Country prefix stripped from phone numbers before counting digits.
const PHONE_COUNTRY_PREFIX: &str = "+91";
const PHONE_DIGITS: usize = 10;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 8;

static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s'\-]+$").unwrap());

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field failures for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record `result`'s error against `field`, passing the value through.
    pub fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(FieldError { field, message });
                None
            }
        }
    }

    /// Message to show under `field`, if it failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationReport {}

/// Non-empty after trimming.
pub fn required(label: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{label} is required"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Years of experience; must not be negative.
pub fn validate_experience(years: i64) -> Result<u32, String> {
    if years < 0 {
        return Err("Experience cannot be negative".to_string());
    }
    u32::try_from(years).map_err(|_| "Experience is too large".to_string())
}

/// 2–50 characters of letters, spaces, hyphens and apostrophes.
pub fn validate_name(name: &str) -> Result<String, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name is required".to_string());
    }
    let len = name.chars().count();
    if len < NAME_MIN {
        return Err(format!("Name must be at least {NAME_MIN} characters"));
    }
    if len > NAME_MAX {
        return Err(format!("Name must be at most {NAME_MAX} characters"));
    }
    if !NAME_CHARS.is_match(name) {
        return Err("Name can only contain letters, spaces, hyphens and apostrophes".to_string());
    }
    Ok(name.to_string())
}

/// Strip whitespace and an optional `+91` prefix; the rest must be exactly
/// ten digits.
pub fn normalize_phone(phone: &str) -> Result<String, String> {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix(PHONE_COUNTRY_PREFIX).unwrap_or(&compact);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number can only contain digits".to_string());
    }
    if digits.len() != PHONE_DIGITS {
        return Err(format!("Phone number must be exactly {PHONE_DIGITS} digits"));
    }
    Ok(digits.to_string())
}

/// Phone is optional: blank means none.
pub fn validate_optional_phone(phone: Option<&str>) -> Result<Option<String>, String> {
    match phone.map(str::trim) {
        None | Some("") => Ok(None),
        Some(p) => normalize_phone(p).map(Some),
    }
}

/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit and one of `PASSWORD_SYMBOLS`.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(format!("Password must be at least {PASSWORD_MIN} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a number".to_string());
    }
    if !password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
        return Err(format!(
            "Password must contain a special character ({PASSWORD_SYMBOLS})"
        ));
    }
    Ok(())
}

/// Confirmation must match exactly.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> Result<(), String> {
    if confirmation.is_empty() {
        return Err("Please confirm your password".to_string());
    }
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}
