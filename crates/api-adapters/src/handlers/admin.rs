//! Admin moderation surface. Every route here is behind [`AdminUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use domains::{AccountStatus, UserFilter};

use crate::dto::{
    AdminQuestionDto, AdminQuestionsQuery, CreateTagRequest, PaginationDto, SetStatusRequest,
    StatsDto, TagDto, UserDto,
};
use crate::error::ApiResult;
use crate::extract::AdminUser;
use crate::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct UsersQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<UsersQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .moderation
        .list_users(UserFilter {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(20),
            search: query.search,
        })
        .await?;

    let users: Vec<UserDto> = page.items.iter().map(UserDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "users": users,
        "pagination": PaginationDto::from_page(&page),
    })))
}

pub async fn set_user_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let status: AccountStatus = req.status.parse()?;
    let user = state.moderation.set_user_status(&admin, id, status).await?;
    Ok(Json(json!({
        "success": true,
        "message": match status {
            AccountStatus::Blocked => "user blocked successfully",
            AccountStatus::Active => "user unblocked successfully",
        },
        "user": UserDto::from(&user),
    })))
}

pub async fn list_questions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<AdminQuestionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let page = state
        .moderation
        .list_questions(
            query.page.unwrap_or(1),
            query.limit.unwrap_or(20),
            query.include_deleted.unwrap_or(false),
        )
        .await?;

    let questions: Vec<AdminQuestionDto> =
        page.items.iter().map(AdminQuestionDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "pagination": PaginationDto::from_page(&page),
    })))
}

pub async fn delete_question(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.moderation.delete_question(&admin, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "question deleted successfully",
    })))
}

pub async fn delete_answer(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.moderation.delete_answer(&admin, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "answer deleted successfully",
    })))
}

pub async fn stats(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.moderation.platform_stats().await?;
    Ok(Json(json!({
        "success": true,
        "stats": StatsDto::from(&stats),
    })))
}

pub async fn create_tag(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let tag = state
        .moderation
        .create_tag(&admin, &req.name, req.description.as_deref(), req.color.as_deref())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "tag created successfully",
            "tag": TagDto::from(&tag),
        })),
    ))
}
