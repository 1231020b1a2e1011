//! Transcript question answering endpoints
//!
//! Answers free-text questions about a video from its stored transcript.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use coursehub_common::api::ApiResponse;
use coursehub_common::db::{fetch_all, fetch_one, Video};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::extract::{parse_positive_id, PathId};
use crate::error::{ApiError, ApiResult};
use crate::services::transcript::{
    build_prompt, truncate_transcript, TranscriptStats, MAX_QUESTION_CHARS, MAX_TRANSCRIPT_TOKENS,
};

/// Most questions accepted by one batch request
pub const MAX_BATCH_QUESTIONS: usize = 5;

/// Pause between consecutive model calls of a batch
const BATCH_QUESTION_DELAY: Duration = Duration::from_secs(1);
use crate::services::{AnswerModel, ModelError};
use crate::AppState;

/// Video id as sent by clients, either `12` or `"12"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum VideoIdInput {
    Number(i64),
    Text(String),
}

impl VideoIdInput {
    fn positive(&self) -> Option<i64> {
        match self {
            VideoIdInput::Number(id) if *id > 0 => Some(*id),
            VideoIdInput::Number(_) => None,
            VideoIdInput::Text(raw) => parse_positive_id(raw),
        }
    }
}

/// Body of POST /ai-transcript/ask
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    pub question: Option<String>,
    pub video_id: Option<VideoIdInput>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    pub video_id: i64,
    pub transcript_length: usize,
    pub processed_length: usize,
    pub timestamp: String,
}

/// Body of POST /ai-transcript/chat on success, without the data envelope
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAnswer {
    pub success: bool,
    pub question: String,
    pub answer: String,
    pub video_id: i64,
    pub timestamp: String,
}

/// Body of POST /ai-transcript/chat on failure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatFailure {
    pub success: bool,
    pub error: String,
    pub question: String,
    pub video_id: i64,
}

/// Body of POST /ai-transcript/batch-ask
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAskRequest {
    pub questions: Option<Vec<String>>,
    pub video_id: Option<VideoIdInput>,
}

/// Outcome of one question in a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAnswer {
    pub question_index: usize,
    pub question: String,
    pub success: bool,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<AskResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAskResponse {
    pub video_id: i64,
    pub total_questions: usize,
    pub successful_answers: usize,
    pub failed_answers: usize,
    pub results: Vec<BatchAnswer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptInfo {
    pub video_id: i64,
    pub title: String,
    pub character_count: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub available: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableTranscript {
    pub video_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableTranscripts {
    pub count: usize,
    pub transcripts: Vec<AvailableTranscript>,
}

/// Trimmed question, 1..=2000 characters
fn validate_question(question: Option<&str>) -> ApiResult<String> {
    let question = question
        .ok_or_else(|| ApiError::BadRequest("Question is required".to_string()))?
        .trim();

    if question.is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Question is too long (max {} characters)",
            MAX_QUESTION_CHARS
        )));
    }

    Ok(question.to_string())
}

fn validate_video_id(video_id: Option<&VideoIdInput>) -> ApiResult<i64> {
    video_id
        .ok_or_else(|| ApiError::BadRequest("Video ID is required".to_string()))?
        .positive()
        .ok_or_else(|| ApiError::BadRequest("Video ID must be a positive integer".to_string()))
}

/// Validated ask parameters
fn validate_ask(request: &AskRequest) -> ApiResult<(String, i64)> {
    let question = validate_question(request.question.as_deref())?;
    let video_id = validate_video_id(request.video_id.as_ref())?;
    Ok((question, video_id))
}

/// Validated batch parameters
fn validate_batch(request: &BatchAskRequest) -> ApiResult<(Vec<String>, i64)> {
    let questions = request
        .questions
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("Questions array is required".to_string()))?;

    if questions.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one question is required".to_string(),
        ));
    }
    if questions.len() > MAX_BATCH_QUESTIONS {
        return Err(ApiError::BadRequest(format!(
            "Maximum {} questions allowed per batch",
            MAX_BATCH_QUESTIONS
        )));
    }

    let questions = questions
        .iter()
        .map(|q| validate_question(Some(q)))
        .collect::<ApiResult<Vec<_>>>()?;
    let video_id = validate_video_id(request.video_id.as_ref())?;

    Ok((questions, video_id))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
}

fn require_model(state: &AppState) -> ApiResult<Arc<dyn AnswerModel>> {
    state
        .answer_model
        .clone()
        .ok_or_else(|| ApiError::Unavailable("Gemini API key not configured".to_string()))
}

/// Video transcript, if the video exists and has a non-blank transcript
async fn load_transcript(state: &AppState, video_id: i64) -> ApiResult<(Video, String)> {
    let not_found =
        || ApiError::NotFound(format!("Transcript not found for video ID: {}", video_id));

    let mut video = fetch_one::<Video>(&state.db, video_id)
        .await?
        .ok_or_else(not_found)?;

    match video.transcript.take() {
        Some(transcript) if !transcript.trim().is_empty() => Ok((video, transcript)),
        _ => Err(not_found()),
    }
}

fn map_model_error(err: ModelError) -> ApiError {
    warn!(error = %err, "Answer generation failed");
    match err {
        ModelError::QuotaExceeded => {
            ApiError::TooManyRequests("API quota exceeded. Please try again later.".to_string())
        }
        ModelError::Unauthorized(_) => {
            ApiError::Upstream("Invalid or missing Gemini API key".to_string())
        }
        ModelError::EmptyResponse => {
            ApiError::Upstream("No response generated from model".to_string())
        }
        _ => ApiError::Upstream("An error occurred while processing your question".to_string()),
    }
}

/// Ask the model one question about an already loaded transcript
async fn generate_answer(
    model: &dyn AnswerModel,
    transcript: &str,
    question: &str,
    video_id: i64,
) -> ApiResult<AskResponse> {
    let processed = truncate_transcript(transcript, MAX_TRANSCRIPT_TOKENS);
    let prompt = build_prompt(&processed, question);

    let answer = model.generate(&prompt).await.map_err(map_model_error)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(map_model_error(ModelError::EmptyResponse));
    }

    info!(
        video_id,
        model = model.model_name(),
        transcript_chars = transcript.chars().count(),
        "Answered transcript question"
    );

    Ok(AskResponse {
        question: question.to_string(),
        answer: answer.to_string(),
        video_id,
        transcript_length: transcript.chars().count(),
        processed_length: processed.chars().count(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Full ask flow for validated input
async fn answer_for_video(state: &AppState, question: &str, video_id: i64) -> ApiResult<AskResponse> {
    let model = require_model(state)?;
    let (_video, transcript) = load_transcript(state, video_id).await?;
    generate_answer(model.as_ref(), &transcript, question, video_id).await
}

/// POST /ai-transcript/ask
pub async fn ask_question(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<AskResponse>>> {
    let Json(request) = payload.map_err(invalid_body)?;
    let (question, video_id) = validate_ask(&request)?;

    let response = answer_for_video(&state, &question, video_id).await?;
    Ok(Json(ApiResponse::ok(response)))
}

/// POST /ai-transcript/chat
///
/// Same flow as `/ask` with a flat body for chat clients. Once the input is
/// valid, failures keep the error status but answer with [`ChatFailure`].
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload.map_err(invalid_body)?;
    let (question, video_id) = validate_ask(&request)?;

    let response = match answer_for_video(&state, &question, video_id).await {
        Ok(reply) => Json(ChatAnswer {
            success: true,
            question: reply.question,
            answer: reply.answer,
            video_id: reply.video_id,
            timestamp: reply.timestamp,
        })
        .into_response(),
        Err(err) => {
            let (status, message) = err.into_status_and_message();
            (
                status,
                Json(ChatFailure {
                    success: false,
                    error: message,
                    question,
                    video_id,
                }),
            )
                .into_response()
        }
    };

    Ok(response)
}

/// POST /ai-transcript/batch-ask
///
/// Questions run one after another with a pause in between. A missing
/// model or transcript fails the whole request; model errors only fail
/// their own question.
pub async fn batch_ask(
    State(state): State<AppState>,
    payload: Result<Json<BatchAskRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<BatchAskResponse>>> {
    let Json(request) = payload.map_err(invalid_body)?;
    let (questions, video_id) = validate_batch(&request)?;

    let model = require_model(&state)?;
    let (_video, transcript) = load_transcript(&state, video_id).await?;

    let mut results = Vec::with_capacity(questions.len());
    for (index, question) in questions.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(BATCH_QUESTION_DELAY).await;
        }

        let result = match generate_answer(model.as_ref(), &transcript, question, video_id).await {
            Ok(answer) => BatchAnswer {
                question_index: index,
                question: question.clone(),
                success: true,
                status_code: 200,
                data: Some(answer),
                message: None,
            },
            Err(err) => {
                let (status, message) = err.into_status_and_message();
                BatchAnswer {
                    question_index: index,
                    question: question.clone(),
                    success: false,
                    status_code: status.as_u16(),
                    data: None,
                    message: Some(message),
                }
            }
        };
        results.push(result);
    }

    let successful_answers = results.iter().filter(|r| r.success).count();
    info!(
        video_id,
        total = results.len(),
        successful_answers,
        "Answered batch of transcript questions"
    );

    Ok(Json(ApiResponse::ok(BatchAskResponse {
        video_id,
        total_questions: results.len(),
        successful_answers,
        failed_answers: results.len() - successful_answers,
        results,
    })))
}

/// GET /ai-transcript/info/:videoId
pub async fn transcript_info(
    State(state): State<AppState>,
    PathId(video_id): PathId,
) -> ApiResult<Json<ApiResponse<TranscriptInfo>>> {
    let (video, transcript) = load_transcript(&state, video_id).await?;
    let stats = TranscriptStats::of(&transcript);

    Ok(Json(ApiResponse::ok(TranscriptInfo {
        video_id,
        title: video.name,
        character_count: stats.character_count,
        word_count: stats.word_count,
        line_count: stats.line_count,
        available: true,
    })))
}

/// GET /ai-transcript/available
///
/// Videos with a non-blank transcript, ascending by id.
pub async fn available_transcripts(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<AvailableTranscripts>>> {
    let transcripts: Vec<AvailableTranscript> = fetch_all::<Video>(&state.db)
        .await?
        .into_iter()
        .filter(|v| v.transcript.as_deref().is_some_and(|t| !t.trim().is_empty()))
        .map(|v| AvailableTranscript {
            video_id: v.id,
            name: v.name,
        })
        .collect();

    Ok(Json(ApiResponse::ok(AvailableTranscripts {
        count: transcripts.len(),
        transcripts,
    })))
}

/// Build transcript routes
pub fn transcript_routes() -> Router<AppState> {
    Router::new()
        .route("/ai-transcript/ask", post(ask_question))
        .route("/ai-transcript/chat", post(chat))
        .route("/ai-transcript/batch-ask", post(batch_ask))
        .route("/ai-transcript/info/:video_id", get(transcript_info))
        .route("/ai-transcript/available", get(available_transcripts))
}
