//! Field-level validation rules.
//!
//! Every rule is a pure function returning `Result<(), RuleViolation>`.
//! Rules that need stored state (uniqueness) take the lookup result as an
//! argument so the caller owns the query.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Reserved username: `/users/me` is the self-service endpoint.
pub const RESERVED_USERNAME: &str = "me";

/// Maximum username length.
pub const MAX_USERNAME_LENGTH: u64 = 150;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// Maximum first/last name length.
pub const MAX_PERSON_NAME_LENGTH: u64 = 150;

/// Maximum category / genre / title name length.
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum slug length.
pub const MAX_SLUG_LENGTH: u64 = 50;

/// Inclusive score bounds for a review.
pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.@+-]+$").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));

/// A named validation failure, reported as HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("Username '{0}' is not allowed. Use letters, digits and @/./+/-/_ only, and not \"me\"")]
    InvalidUsername(String),

    #[error("A user with this email already exists")]
    DuplicateEmail,

    #[error("A user with this username already exists")]
    DuplicateUsername,

    #[error("Score must be an integer between 1 and 10, got {0}")]
    OutOfRange(i32),

    #[error("Year {year} is in the future (current year is {current})")]
    FutureYear { year: i32, current: i32 },

    #[error("Only one review per title is allowed")]
    DuplicateReview,

    #[error("Confirmation code is invalid or has expired")]
    InvalidCode,

    #[error("Slug '{0}' may contain only letters, digits, hyphens and underscores")]
    InvalidSlug(String),

    #[error("An entry with slug '{0}' already exists")]
    DuplicateSlug(String),

    #[error("Object with slug '{0}' does not exist")]
    UnknownSlug(String),
}

impl RuleViolation {
    /// Machine-readable code used in the JSON error body.
    pub fn code(&self) -> &'static str {
        match self {
            RuleViolation::InvalidUsername(_) => "INVALID_USERNAME",
            RuleViolation::DuplicateEmail => "DUPLICATE_EMAIL",
            RuleViolation::DuplicateUsername => "DUPLICATE_USERNAME",
            RuleViolation::OutOfRange(_) => "OUT_OF_RANGE",
            RuleViolation::FutureYear { .. } => "FUTURE_YEAR",
            RuleViolation::DuplicateReview => "DUPLICATE_REVIEW",
            RuleViolation::InvalidCode => "INVALID_CODE",
            RuleViolation::InvalidSlug(_) => "INVALID_SLUG",
            RuleViolation::DuplicateSlug(_) => "DUPLICATE_SLUG",
            RuleViolation::UnknownSlug(_) => "UNKNOWN_SLUG",
        }
    }

    /// The request field the violation refers to.
    pub fn field(&self) -> &'static str {
        match self {
            RuleViolation::InvalidUsername(_) | RuleViolation::DuplicateUsername => "username",
            RuleViolation::DuplicateEmail => "email",
            RuleViolation::OutOfRange(_) => "score",
            RuleViolation::FutureYear { .. } => "year",
            RuleViolation::DuplicateReview => "non_field_errors",
            RuleViolation::InvalidCode => "confirmation_code",
            RuleViolation::InvalidSlug(_)
            | RuleViolation::DuplicateSlug(_)
            | RuleViolation::UnknownSlug(_) => "slug",
        }
    }
}

/// Reject the reserved name `"me"` and anything outside `[A-Za-z0-9_.@+-]`.
pub fn validate_username(username: &str) -> Result<(), RuleViolation> {
    if username == RESERVED_USERNAME || !USERNAME_RE.is_match(username) {
        return Err(RuleViolation::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Signup uniqueness against the stored records.
///
/// `username_owner_email` is the email of the account currently holding the
/// requested username, `email_owner_username` the username of the account
/// holding the requested email (matched case-insensitively by the caller).
/// An exact existing `(username, email)` pair passes: signup is get-or-create.
pub fn validate_signup_uniqueness(
    username: &str,
    email: &str,
    username_owner_email: Option<&str>,
    email_owner_username: Option<&str>,
) -> Result<(), RuleViolation> {
    if let Some(owner_email) = username_owner_email {
        if !owner_email.eq_ignore_ascii_case(email) {
            return Err(RuleViolation::DuplicateUsername);
        }
    }
    if let Some(owner_username) = email_owner_username {
        if owner_username != username {
            return Err(RuleViolation::DuplicateEmail);
        }
    }
    Ok(())
}

/// Accept scores in `MIN_SCORE..=MAX_SCORE`.
pub fn validate_score(score: i32) -> Result<(), RuleViolation> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(RuleViolation::OutOfRange(score))
    }
}

/// Reject release years after `current_year`.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), RuleViolation> {
    if year > current_year {
        return Err(RuleViolation::FutureYear {
            year,
            current: current_year,
        });
    }
    Ok(())
}

/// [`validate_year`] against the current UTC calendar year.
pub fn validate_year_now(year: i32) -> Result<(), RuleViolation> {
    validate_year(year, chrono::Utc::now().year())
}

/// One review per `(author, title)`; `already_reviewed` comes from storage.
pub fn validate_single_review(already_reviewed: bool) -> Result<(), RuleViolation> {
    if already_reviewed {
        Err(RuleViolation::DuplicateReview)
    } else {
        Ok(())
    }
}

pub fn validate_slug(slug: &str) -> Result<(), RuleViolation> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(RuleViolation::InvalidSlug(slug.to_string()))
    }
}
