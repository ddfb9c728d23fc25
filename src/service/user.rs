//! User accounts: signup, login and profile management

use crate::domain::{
    Caller, LoginInput, NewUser, Role, SignupInput, TokenResponse, UpdateUserInput, User,
    UserProfile,
};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::policy;
use crate::repository::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Hash a password using Argon2
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its stored hash
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub struct UserService<U: UserRepository> {
    repo: Arc<U>,
    jwt_manager: JwtManager,
    manager_signup_token: Option<String>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(repo: Arc<U>, jwt_manager: JwtManager, manager_signup_token: Option<String>) -> Self {
        Self {
            repo,
            jwt_manager,
            manager_signup_token,
        }
    }

    /// Role granted by a signup request
    fn signup_role(&self, input: &SignupInput) -> Result<Role> {
        if input.manager {
            return match self.manager_signup_token.as_deref() {
                Some(expected) if expected == input.manager_token => Ok(Role::Manager),
                _ => Err(AppError::Forbidden(
                    "Invalid manager signup token".to_string(),
                )),
            };
        }
        if input.owner {
            return Ok(Role::Owner);
        }
        Ok(Role::Customer)
    }

    pub async fn signup(&self, input: SignupInput) -> Result<UserProfile> {
        input.validate()?;
        let role = self.signup_role(&input)?;

        if self.repo.exists_by_username(&input.username).await? {
            return Err(AppError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let user = self
            .repo
            .create(&NewUser {
                username: input.username,
                password_hash: hash_password(&input.password)?,
                address: input.address,
                role,
            })
            .await?;

        info!(username = %user.username, role = %user.role, "User signed up");
        Ok(user.into())
    }

    pub async fn login(&self, input: LoginInput) -> Result<TokenResponse> {
        input.validate()?;

        let user = match self.repo.find_by_username(&input.username).await? {
            Some(user) => user,
            None => {
                warn!(username = %input.username, "Login for unknown user");
                metrics::counter!("delivery_auth_login_total", "result" => "failure").increment(1);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&input.password, &user.password_hash)? {
            warn!(username = %user.username, "Login with wrong password");
            metrics::counter!("delivery_auth_login_total", "result" => "failure").increment(1);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let access_token = self
            .jwt_manager
            .create_access_token(user.id, &user.username, user.role)?;

        metrics::counter!("delivery_auth_login_total", "result" => "success").increment(1);
        info!(username = %user.username, "User logged in");
        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_manager.access_token_ttl(),
        })
    }

    async fn find_user(&self, username: &str) -> Result<User> {
        self.repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    pub async fn get_profile(&self, username: &str) -> Result<UserProfile> {
        Ok(self.find_user(username).await?.into())
    }

    /// Self or MANAGER/MASTER may change address and password
    pub async fn update_profile(
        &self,
        username: &str,
        input: UpdateUserInput,
        caller: &Caller,
    ) -> Result<UserProfile> {
        input.validate()?;
        let user = self.find_user(username).await?;
        policy::require_owner_or_admin(caller, user.id)?;

        let password_hash = match input.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let updated = self
            .repo
            .update(user.id, input.address, password_hash)
            .await?;

        info!(username = %updated.username, by = %caller.username, "User profile updated");
        Ok(updated.into())
    }

    pub async fn delete_user(&self, username: &str, caller: &Caller) -> Result<()> {
        let user = self.find_user(username).await?;
        policy::require_owner_or_admin(caller, user.id)?;

        self.repo.soft_delete(user.id, &caller.username).await?;
        info!(username = %user.username, by = %caller.username, "User deleted");
        Ok(())
    }

    /// Create the MASTER account if no user holds that name yet.
    ///
    /// MASTER cannot be obtained through signup, so this is the only way one
    /// comes into existence. Returns `true` when an account was created.
    pub async fn ensure_master(&self, username: &str, password: &str) -> Result<bool> {
        if self.repo.exists_by_username(username).await? {
            return Ok(false);
        }

        self.repo
            .create(&NewUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                address: String::new(),
                role: Role::Master,
            })
            .await?;
        info!(username = %username, "MASTER account created");
        Ok(true)
    }
}
