//! Sign-in and registration form validation.
//!
//! Each validator returns the first failing message for its field, or `None`
//! when the value is acceptable. Form-level helpers collect one message per
//! field.
//!
//! The service itself never sees credentials; sign-in goes to the external
//! identity provider and this API only verifies its tokens. These helpers
//! are for the presentation layer, which checks the forms before handing
//! them to the provider.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("valid regex"));

static COMPANY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s-]{2,50}$").expect("valid regex"));

/// Minimum password length accepted at sign-in.
pub const MIN_LOGIN_PASSWORD_LEN: usize = 6;

/// Minimum password length required at registration.
pub const MIN_REGISTER_PASSWORD_LEN: usize = 8;

pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.trim().is_empty() {
        return Some("Email is required");
    }
    if !EMAIL_RE.is_match(email) {
        return Some("Enter a valid email address");
    }
    None
}

/// Sign-in only checks length; registration also requires mixed case and a digit.
pub fn validate_password(password: &str, is_login: bool) -> Option<&'static str> {
    if password.trim().is_empty() {
        return Some("Password is required");
    }

    let len = password.chars().count();
    if is_login {
        if len < MIN_LOGIN_PASSWORD_LEN {
            return Some("Password must be at least 6 characters long");
        }
        return None;
    }

    if len < MIN_REGISTER_PASSWORD_LEN {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number");
    }
    None
}

pub fn validate_username(username: &str) -> Option<&'static str> {
    if username.trim().is_empty() {
        return Some("Username is required");
    }
    let len = username.chars().count();
    if len < 3 {
        return Some("Username must be at least 3 characters long");
    }
    if len > 20 {
        return Some("Username must be less than 20 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Some("Username can only contain letters, numbers, and underscores");
    }
    None
}

pub fn validate_company_name(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("Company name is required");
    }
    let len = name.chars().count();
    if len < 2 {
        return Some("Company name must be at least 2 characters long");
    }
    if len > 50 {
        return Some("Company name must be less than 50 characters");
    }
    if !COMPANY_NAME_RE.is_match(name) {
        return Some("Company name can only contain letters, numbers, spaces, and hyphens");
    }
    None
}

// ---------------------------------------------------------------------------
// Form-level validation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LoginFormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'static str>,
}

impl LoginFormErrors {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterFormErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'static str>,
}

impl RegisterFormErrors {
    pub fn is_valid(&self) -> bool {
        self.company_name.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

pub fn validate_login_form(email: &str, password: &str) -> LoginFormErrors {
    LoginFormErrors {
        email: validate_email(email),
        password: validate_password(password, true),
    }
}

/// Registration step 1: the organisation.
pub fn validate_register_step1(company_name: &str) -> RegisterFormErrors {
    RegisterFormErrors {
        company_name: validate_company_name(company_name),
        ..RegisterFormErrors::default()
    }
}

/// Registration step 2: the user's own credentials.
pub fn validate_register_step2(username: &str, email: &str, password: &str) -> RegisterFormErrors {
    RegisterFormErrors {
        username: validate_username(username),
        email: validate_email(email),
        password: validate_password(password, false),
        ..RegisterFormErrors::default()
    }
}
