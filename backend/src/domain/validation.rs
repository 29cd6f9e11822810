//! Field validation rules for user records.
//!
//! Pure functions over candidate field sets: create validates every field,
//! update validates only the fields that were supplied. The result maps a
//! field name to the ordered list of violation messages; an empty map means
//! the candidate is valid.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use shared::{CreateUserRequest, FieldErrors, UpdateUserRequest};

/// Maximum name length in characters
pub const NAME_MAX_LEN: usize = 100;

/// Maximum email length in characters
pub const EMAIL_MAX_LEN: usize = 180;

/// Maximum comment length in characters
pub const COMMENT_MAX_LEN: usize = 1000;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("email pattern is valid")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"));

/// Validate a create request; every field is checked
pub fn validate_create(request: &CreateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    check_name(&request.name, &mut errors);
    check_email(&request.email, &mut errors);
    if let Some(phone) = &request.phone {
        check_phone(phone, &mut errors);
    }
    check_comment(&request.comment, &mut errors);
    check_client_id(&request.client_id, &mut errors);

    errors
}

/// Validate an update request; only supplied fields are checked.
///
/// Absent fields mean "no change" and are skipped entirely. The `id` field
/// is not a user field and is checked by the service, not here.
pub fn validate_update(request: &UpdateUserRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(name) = &request.name {
        check_name(name, &mut errors);
    }
    if let Some(email) = &request.email {
        check_email(email, &mut errors);
    }
    if let Some(phone) = &request.phone {
        check_phone(phone, &mut errors);
    }
    if let Some(comment) = &request.comment {
        check_comment(comment, &mut errors);
    }
    if let Some(client_id) = &request.client_id {
        check_client_id(client_id, &mut errors);
    }

    errors
}

fn check_name(name: &str, errors: &mut FieldErrors) {
    if name.trim().is_empty() {
        push(errors, "name", "Please enter your name");
    } else if name.chars().count() > NAME_MAX_LEN {
        push_limit(errors, "name", "Your name", NAME_MAX_LEN);
    }
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.trim().is_empty() {
        push(errors, "email", "Please enter your email");
        return;
    }
    if !EMAIL_RE.is_match(email) {
        push(errors, "email", "Please enter a valid email");
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        push_limit(errors, "email", "Your email", EMAIL_MAX_LEN);
    }
}

// A valid phone is exactly 10 digits, so the 50-character column bound can
// never be reached by an accepted value
fn check_phone(phone: &str, errors: &mut FieldErrors) {
    if !PHONE_RE.is_match(phone) {
        push(errors, "phone", "Phone number should be a 10-digit number");
    }
}

fn check_comment(comment: &str, errors: &mut FieldErrors) {
    if comment.trim().is_empty() {
        push(errors, "comment", "Please enter your comment");
    } else if comment.chars().count() > COMMENT_MAX_LEN {
        push_limit(errors, "comment", "Your comment", COMMENT_MAX_LEN);
    }
}

// UUID syntax caps an accepted client_id well under its 50-character
// column bound
fn check_client_id(client_id: &str, errors: &mut FieldErrors) {
    if client_id.trim().is_empty() {
        push(errors, "client_id", "Please enter your client_id");
    } else if Uuid::parse_str(client_id).is_err() {
        push(errors, "client_id", "Invalid UUID format for client_id");
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn push_limit(errors: &mut FieldErrors, field: &str, subject: &str, limit: usize) {
    let message = format!(
        "{} must contain a maximum of {} characters",
        subject, limit
    );
    errors.entry(field.to_string()).or_default().push(message);
}
