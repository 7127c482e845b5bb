//! # 실수 기록 라우트 핸들러
//!
//! 실수는 항상 세션의 학습 언어로 기록/조회됩니다.
//!
//! - `GET  /api/v1/sessions/{id}/mistakes` → `{ "mistakes": [...] }`
//! - `POST /api/v1/sessions/{id}/mistakes` → 201 + 저장된 행

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    models::*,
    routes::{sessions::session_language, AppState},
};

pub async fn list_session_mistakes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let language = session_language(&state, &id).await?;
    let mistakes = db::list_mistakes(&state.pool, &language).await?;
    Ok(Json(json!({ "mistakes": mistakes })))
}

/// 실수 하나를 기록합니다.
///
/// `POST /api/v1/sessions/{id}/mistakes`
/// + `{ "mistake_type": "grammar", "original_text": "...", "corrected_text": "...", "explanation": "..." }`
///
/// 유형이 비어 있으면 집계가 의미 없으므로 400을 반환합니다.
pub async fn record_session_mistake(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RecordMistakeRequest>,
) -> Result<(StatusCode, Json<Mistake>), AppError> {
    let mistake_type = req.mistake_type.trim();
    if mistake_type.is_empty() {
        return Err(AppError::BadRequest(
            "mistake_type must not be empty".to_string(),
        ));
    }

    let language = session_language(&state, &id).await?;
    let mistake = db::record_mistake(
        &state.pool,
        &language,
        mistake_type,
        &req.original_text,
        &req.corrected_text,
        &req.explanation,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(mistake)))
}
