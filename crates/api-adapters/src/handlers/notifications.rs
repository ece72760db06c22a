//! The caller's notification feed.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;

use crate::dto::{NotificationDto, PageQuery};
use crate::error::ApiResult;
use crate::extract::AuthUser;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let feed = state
        .notifications
        .list(&user, query.page.unwrap_or(1), query.limit.unwrap_or(20))
        .await?;

    let notifications: Vec<NotificationDto> =
        feed.page.items.iter().map(NotificationDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "notifications": notifications,
        "pagination": {
            "page": feed.page.page,
            "totalPages": feed.page.total_pages(),
            "totalItems": feed.page.total,
            "unreadCount": feed.unread,
        },
    })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.notifications.mark_read(&user, id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "notification marked as read",
    })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<impl IntoResponse> {
    state.notifications.mark_all_read(&user).await?;
    Ok(Json(json!({
        "success": true,
        "message": "all notifications marked as read",
    })))
}
