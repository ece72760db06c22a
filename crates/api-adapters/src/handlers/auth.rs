//! Registration, login, and the current-user endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::dto::{LoginRequest, RegisterRequest, UserDto};
use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let session = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "account created successfully",
            "token": session.token,
            "user": UserDto::from(&session.user),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let session = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(json!({
        "success": true,
        "message": "logged in successfully",
        "token": session.token,
        "user": UserDto::from(&session.user),
    })))
}

pub async fn me(AuthUser(user): AuthUser) -> ApiResult<impl IntoResponse> {
    Ok(Json(json!({
        "success": true,
        "user": UserDto::from(&user),
    })))
}
