//! Contact field validation rules.

use pf_types::FieldKind;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    /// Empty when `valid`.
    pub message: &'static str,
}

impl Validation {
    pub const OK: Validation = Validation {
        valid: true,
        message: "",
    };

    fn invalid(message: &'static str) -> Self {
        Self {
            valid: false,
            message,
        }
    }
}

/// Validate raw user input for one field. Leading and trailing whitespace is
/// ignored; lengths count characters.
pub fn validate(kind: FieldKind, raw: &str) -> Validation {
    let value = raw.trim();
    let len = value.chars().count();

    match kind {
        FieldKind::Name => {
            if value.is_empty() {
                Validation::invalid("Name is required")
            } else if len < 2 {
                Validation::invalid("Name must be at least 2 characters long")
            } else {
                Validation::OK
            }
        }
        FieldKind::Email => {
            if value.is_empty() {
                Validation::invalid("Email is required")
            } else if !EMAIL_PATTERN.is_match(value) {
                Validation::invalid("Please enter a valid email address")
            } else {
                Validation::OK
            }
        }
        FieldKind::Subject => {
            if value.is_empty() {
                Validation::invalid("Subject is required")
            } else if len < 5 {
                Validation::invalid("Subject must be at least 5 characters long")
            } else {
                Validation::OK
            }
        }
        FieldKind::Message => {
            if value.is_empty() {
                Validation::invalid("Message is required")
            } else if len < 10 {
                Validation::invalid("Message must be at least 10 characters long")
            } else {
                Validation::OK
            }
        }
    }
}
