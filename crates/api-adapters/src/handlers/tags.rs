//! Public tag listings.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::dto::{TagDto, TagsQuery};
use crate::error::ApiResult;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TagsQuery>,
) -> ApiResult<impl IntoResponse> {
    let sort = match query.sort.as_deref() {
        Some(s) => s.parse()?,
        None => Default::default(),
    };
    let tags = state.tags.list(sort, query.limit.unwrap_or(50)).await?;

    // Names alone for pickers, full objects alongside.
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    let full: Vec<TagDto> = tags.iter().map(TagDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "tags": names,
        "fullTags": full,
    })))
}

pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<TagsQuery>,
) -> ApiResult<impl IntoResponse> {
    let tags = state.tags.popular(query.limit.unwrap_or(20)).await?;
    let tags: Vec<TagDto> = tags.iter().map(TagDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "tags": tags,
    })))
}
