//! Question listing, detail, creation, answering, and voting.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use domains::{QuestionFilter, VoteTargetKind};
use services::{AuthorBrief, NewQuestion};

use crate::dto::{
    AddAnswerRequest, AnswerDto, AuthorDto, CreateQuestionRequest, ListQuestionsQuery,
    PaginationDto, QuestionDto, QuestionSummaryDto, VoteRequest,
};
use crate::error::ApiResult;
use crate::extract::{AuthUser, MaybeAuthUser};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuestionsQuery>,
) -> ApiResult<impl IntoResponse> {
    let sort = match query.sort.as_deref() {
        Some(s) => s.parse()?,
        None => Default::default(),
    };
    let tags = query
        .tags
        .as_deref()
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let page = state
        .questions
        .list(QuestionFilter {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(10),
            sort,
            tags,
            search: query.search.clone(),
            include_deleted: false,
        })
        .await?;

    let questions: Vec<QuestionSummaryDto> =
        page.items.iter().map(QuestionSummaryDto::from).collect();
    Ok(Json(json!({
        "success": true,
        "questions": questions,
        "pagination": PaginationDto::from_page(&page),
    })))
}

pub async fn detail(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let detail = state.questions.get_detail(id, viewer.as_ref()).await?;

    let mut question_dto = QuestionDto::new(&detail.question, &detail.author);
    if viewer.is_some() {
        question_dto = question_dto.with_user_vote(detail.user_vote);
    }
    let answers: Vec<AnswerDto> = detail
        .answers
        .iter()
        .map(|view| AnswerDto::new(view, &detail.question, viewer.is_some()))
        .collect();

    let mut question = serde_json::to_value(question_dto)?;
    question["answers"] = serde_json::to_value(answers)?;

    Ok(Json(json!({
        "success": true,
        "question": question,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateQuestionRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let question = state
        .questions
        .create(
            &user,
            NewQuestion {
                title: req.title,
                description: req.description,
                tags: req.tags,
            },
        )
        .await?;

    let author = AuthorBrief::from(&user);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "question created successfully",
            "question": QuestionDto::new(&question, &author),
        })),
    ))
}

pub async fn add_answer(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddAnswerRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;
    let answer = state.questions.add_answer(&user, id, &req.content).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "answer added successfully",
            "answer": {
                "id": answer.id,
                "questionId": answer.question_id,
                "content": answer.content,
                "author": AuthorDto::from(&AuthorBrief::from(&user)),
                "voteCount": 0,
                "isAccepted": false,
                "createdAt": answer.created_at,
            },
        })),
    ))
}

pub async fn vote(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<impl IntoResponse> {
    let direction = req.vote_type.parse()?;
    let receipt = state
        .votes
        .vote(&user, VoteTargetKind::Question, id, direction)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "vote recorded successfully",
        "voteCount": receipt.vote_count,
        "userVote": receipt.user_vote.map(|d| d.as_str()),
    })))
}
