//! Auth extractors.
//!
//! Handlers declare the access level they need in their signature:
//! [`AuthUser`] for any active account, [`AdminUser`] for moderation
//! routes, [`MaybeAuthUser`] for public reads that personalize when a valid
//! token happens to be present.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domains::{DomainError, User};

use crate::error::ApiError;
use crate::AppState;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// The authenticated caller. Rejects with 401 when the token is missing,
/// invalid, expired, or belongs to a blocked account.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            ApiError::from(DomainError::unauthenticated("access denied, no token provided"))
        })?;
        let user = state.accounts.authenticate(token).await?;
        Ok(AuthUser(user))
    }
}

/// An optional caller: resolves to `None` instead of failing, so public
/// endpoints stay public for unauthenticated (or stale-token) visitors.
pub struct MaybeAuthUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts) {
            Some(token) => state.accounts.authenticate(token).await.ok(),
            None => None,
        };
        Ok(MaybeAuthUser(user))
    }
}

/// An authenticated caller holding the admin role.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::from(DomainError::forbidden(
                "access denied, insufficient permissions",
            )));
        }
        Ok(AdminUser(user))
    }
}
