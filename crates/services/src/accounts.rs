//! Account registration, login, and token-based caller resolution.
//!
//! Token mechanics stay thin: hash with the hasher port, sign with the token
//! port. The interesting rules are the uniqueness checks and the blocked
//! account gate, which also applies when an existing token is presented.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use domains::{
    DomainError, PasswordHasher, Result, TokenService, User, UserRepo,
};

static USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

const PASSWORD_MIN: usize = 6;

/// A successful registration or login: the account plus its bearer token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

pub struct AccountService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self { users, hasher, tokens }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession> {
        let username = username.trim();
        if !USERNAME.is_match(username) {
            return Err(DomainError::validation(
                "username must be 3-30 characters of letters, numbers, and underscores",
            ));
        }
        let email = email.trim().to_lowercase();
        if !EMAIL.is_match(&email) {
            return Err(DomainError::validation("please provide a valid email address"));
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(DomainError::validation(format!(
                "password must be at least {PASSWORD_MIN} characters"
            )));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(DomainError::conflict("username already exists"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("email already exists"));
        }

        let user = User::new(username.to_string(), email, self.hasher.hash(password)?);
        self.users.insert(&user).await?;

        tracing::info!(user = %user.id, "account registered");
        let token = self.tokens.issue(user.id)?;
        Ok(AuthSession { user, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("invalid email or password"))?;

        if user.is_blocked() {
            return Err(DomainError::unauthenticated(
                "account has been blocked, please contact support",
            ));
        }
        if !self.hasher.verify(password, &user.password_hash) {
            return Err(DomainError::unauthenticated("invalid email or password"));
        }

        let token = self.tokens.issue(user.id)?;
        Ok(AuthSession { user, token })
    }

    /// Resolves a presented bearer token to a live account. Used by the
    /// request layer's auth extractors.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self.tokens.verify(token)?;
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::unauthenticated("token is invalid, user not found"))?;
        if user.is_blocked() {
            return Err(DomainError::unauthenticated(
                "account has been blocked, please contact support",
            ));
        }
        Ok(user)
    }
}
