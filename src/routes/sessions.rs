//! # 튜터 세션 API 라우트 핸들러
//!
//! 셸이 코어를 사용하는 세 가지 진입점(세션 시작, 대화 턴, 분석)과
//! 세션 조회/종료 핸들러입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/sessions | `start_session` | 새 세션 시작 |
//! | GET | /api/v1/sessions/{id} | `get_session` | 세션 정보 + 대화 기록 |
//! | DELETE | /api/v1/sessions/{id} | `end_session` | 세션 종료 |
//! | POST | /api/v1/sessions/{id}/messages | `send_message` | 대화 턴 |
//! | GET | /api/v1/sessions/{id}/analysis | `analyze_session` | 실수 통계 + 팁 |
//!
//! ## 사용 흐름
//! ```text
//! 1. 설정 선택 → POST /sessions (welcome 문구와 장면 수신)
//! 2. 대화 → POST /sessions/{id}/messages (반복)
//! 3. 사이드바 → GET /sessions/{id}/analysis
//! 4. 종료 → DELETE /sessions/{id}
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, ConfigurationError},
    models::*,
    routes::AppState,
    services::{
        analyzer,
        llm::OpenAiChatModel,
        tutor::{Reply, Tutor},
    },
};

/// 새 세션을 시작합니다.
///
/// `POST /api/v1/sessions`
/// + `{ "learning_language": "French", "native_language": "English", "proficiency_level": "Beginner" }`
///
/// API 키는 요청의 `api_key`가 우선이고, 없으면 서버 설정(`OPENAI_API_KEY`)을 씁니다.
/// 둘 다 없으면 400 `configuration_error`를 반환합니다.
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionInfo>), AppError> {
    let config = req.session_config()?;

    let api_key = req
        .api_key
        .filter(|key| !key.trim().is_empty())
        .or_else(|| state.llm.api_key.clone())
        .ok_or(ConfigurationError::MissingApiKey)?;

    let model = OpenAiChatModel::new(&state.llm, api_key)?;
    let tutor = Tutor::new(Arc::new(model), state.context_window);

    let info = state.sessions.create(config, tutor).await;
    Ok((StatusCode::CREATED, Json(info)))
}

/// 세션 정보와 현재까지의 대화 기록을 조회합니다.
///
/// `GET /api/v1/sessions/{id}` → `{ "session": {...}, "transcript": [...] }`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = state.sessions.get(&id).await.ok_or(AppError::NotFound)?;
    let transcript = session.transcript().await;

    Ok(Json(json!({
        "session": session.info,
        "transcript": transcript,
    })))
}

/// 세션을 종료하고 대화 기록을 폐기합니다. 실수 기록은 남습니다.
///
/// `DELETE /api/v1/sessions/{id}` → 204 No Content
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.destroy(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

/// 대화 턴 하나를 처리합니다.
///
/// `POST /api/v1/sessions/{id}/messages` + `{ "text": "Bonjour" }`
///
/// 모델 호출이 실패해도 HTTP 200으로 응답합니다. 셸은 `status` 필드로 구분합니다:
/// - `{ "status": "replied", "reply": "..." }`
/// - `{ "status": "failed", "reply": "🤖 Oops! API Error: ...", "error": "..." }`
///
/// 같은 세션의 턴은 순서대로 처리됩니다. 모델 응답을 기다리는 동안에도
/// 같은 세션의 조회, 분석, 실수 기록 요청은 기다리지 않습니다.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<Reply>, AppError> {
    let session = state.sessions.get(&id).await.ok_or(AppError::NotFound)?;
    let reply = session.take_turn(&req.text).await;
    Ok(Json(reply))
}

/// 세션 학습 언어의 실수 통계를 반환합니다.
///
/// `GET /api/v1/sessions/{id}/analysis`
/// → `{ "mistake_counts": { "grammar": 3 }, "recommendations": { ...6개... } }`
pub async fn analyze_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MistakeAnalysis>, AppError> {
    let language = session_language(&state, &id).await?;
    let analysis = analyzer::analyze(&state.pool, &language).await?;
    Ok(Json(analysis))
}

/// 세션의 학습 언어를 복사해 옵니다. 세션 설정은 바뀌지 않으므로 잠그지 않습니다.
pub(crate) async fn session_language(state: &AppState, id: &str) -> Result<String, AppError> {
    let session = state.sessions.get(id).await.ok_or(AppError::NotFound)?;
    Ok(session.learning_language().to_string())
}
