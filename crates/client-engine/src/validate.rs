//! Client-side form validation.
//!
//! Runs before any network call; a failure here never commits a store
//! status, so messages can sit next to the offending field.

use blog_api::PostPayload;
use std::fmt;

/// Minimum password length accepted by the forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field the message belongs to.
    pub field: &'static str,
    /// Message for the user.
    pub message: String,
}

/// Ordered collection of field-level validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    /// Replace an existing message for `field`, or append one.
    fn put(&mut self, field: &'static str, message: &str) {
        if let Some(existing) = self.errors.iter_mut().find(|e| e.field == field) {
            existing.message = message.to_string();
        } else {
            self.push(field, message);
        }
    }

    /// Whether any field failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The message for a specific field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Iterate over field errors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub confirm_password: String,
}

/// Login form input.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Validate a registration form.
///
/// The password-length check intentionally supersedes the password-required
/// message, so a short or empty password always reports the length error.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if form.username.trim().is_empty() {
        errors.push("username", "Username is required");
    }
    if form.email.is_empty() {
        errors.push("email", "Email is required");
    }
    if form.password.is_empty() {
        errors.push("password", "Password is required");
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        errors.put("password", "Password must be at least 6 characters");
    }
    if form.password != form.confirm_password {
        errors.push("confirmPassword", "Passwords do not match");
    }
    errors.into_result()
}

/// Validate a login form.
pub fn validate_login(form: &LoginForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if form.email.is_empty() {
        errors.push("email", "Email is required");
    }
    if form.password.is_empty() {
        errors.push("password", "Password is required");
    } else if form.password.len() < MIN_PASSWORD_LEN {
        errors.push("password", "Password must be at least 6 characters");
    }
    errors.into_result()
}

/// Validate a post payload for create/edit submission.
pub fn validate_post(payload: &PostPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if payload.title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
    if payload.content.trim().is_empty() {
        errors.push("content", "Content is required");
    }
    errors.into_result()
}
