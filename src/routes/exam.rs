use crate::{
    dto::exam_dto::{GenerateExamRequest, MarkExamRequest, ModelAnswersRequest},
    error::Result,
    services::prompt_service::PromptService,
    AppState,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

#[axum::debug_handler]
pub async fn generate_exam(
    State(state): State<AppState>,
    Json(payload): Json<GenerateExamRequest>,
) -> Result<impl IntoResponse> {
    let paper = state.exam_service.generate_exam(payload.paper_type).await?;
    Ok((StatusCode::OK, Json(paper)))
}

#[axum::debug_handler]
pub async fn mark_exam(
    State(state): State<AppState>,
    Json(payload): Json<MarkExamRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state
        .marking_service
        .mark_exam(&payload.paper, &payload.answers)
        .await?;
    Ok((StatusCode::OK, Json(result)))
}

/// Freeform markdown model-answers document for a generated paper.
#[axum::debug_handler]
pub async fn model_answers(
    State(state): State<AppState>,
    Json(payload): Json<ModelAnswersRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let prompt = PromptService::build_model_answers_prompt(&payload.paper);
    let markdown = state.ai_service.complete(&prompt, false).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
