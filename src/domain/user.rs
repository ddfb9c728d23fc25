//! User domain model

use super::common::{mysql_string_enum, StringUuid};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-z0-9]{4,10}$").unwrap();
}

/// Role carried by every caller. `Anonymous` is never persisted; it is the
/// role of a request without a valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Owner,
    Manager,
    Master,
    Anonymous,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Owner => "OWNER",
            Role::Manager => "MANAGER",
            Role::Master => "MASTER",
            Role::Anonymous => "ANONYMOUS",
        }
    }

    /// MANAGER and MASTER may act on any resource.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Manager | Role::Master)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CUSTOMER" => Ok(Role::Customer),
            "OWNER" => Ok(Role::Owner),
            "MANAGER" => Ok(Role::Manager),
            "MASTER" => Ok(Role::Master),
            "ANONYMOUS" => Ok(Role::Anonymous),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

mysql_string_enum!(Role);

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: StringUuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub address: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            username: String::new(),
            password_hash: String::new(),
            address: String::new(),
            role: Role::Customer,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by: None,
        }
    }
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Letters, digits and at least one special character, 8 to 15 chars.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| c.is_ascii_punctuation() || c == ' ');

    if !(8..=15).contains(&len) || !has_letter || !has_digit || !has_special {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(
            "password must be 8-15 characters with a letter, a digit and a special character"
                .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Signup request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignupInput {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "username must be 4-10 lowercase letters or digits"
    ))]
    pub username: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    /// Request the MANAGER role; requires `manager_token`
    #[serde(default)]
    pub manager: bool,
    #[serde(default)]
    pub manager_token: String,
    /// Register as a restaurant owner
    #[serde(default)]
    pub owner: bool,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: StringUuid,
    pub username: String,
    pub address: String,
    pub role: Role,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            address: user.address,
            role: user.role,
        }
    }
}

/// Identity of the party making a request, resolved from its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: StringUuid,
    pub username: String,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: StringUuid, username: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            user_id: StringUuid::nil(),
            username: String::new(),
            role: Role::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.role == Role::Anonymous
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Row data for a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub address: String,
    pub role: Role,
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
