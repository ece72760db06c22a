//! Voting on and accepting answers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use domains::VoteTargetKind;

use crate::dto::VoteRequest;
use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn vote(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let direction = req.vote_type.parse()?;
    let receipt = state
        .votes
        .vote(&user, VoteTargetKind::Answer, id, direction)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "vote recorded successfully",
        "voteCount": receipt.vote_count,
        "userVote": receipt.user_vote.map(|d| d.as_str()),
    })))
}

pub async fn accept(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let receipt = state.acceptance.accept(&user, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": if receipt.accepted {
            "answer accepted successfully"
        } else {
            "answer acceptance removed"
        },
        "isAccepted": receipt.accepted,
    })))
}
