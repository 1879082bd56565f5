//! User account model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};
use yamdb_core::validation::{MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH, MAX_USERNAME_LENGTH};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub bio: String,
    pub first_name: String,
    pub last_name: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Parsed role. The `ck_users_role` constraint keeps the column within
    /// the known set, so an unparseable value falls back to the default.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// Public user representation.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role,
        }
    }
}

/// DTO for creating (or fully replacing) a user.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// Defaults to `user` if omitted.
    pub role: Option<Role>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}
