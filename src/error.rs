//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `ConfigurationError`: 잘못된 설정/선택값 (숙련도, 언어, API 키, 환경변수)
//! - `AppError`: HTTP 경계에서 쓰는 통합 에러 + `IntoResponse` 구현
//!
//! LLM 호출 실패(`LlmError`)는 대화 턴에서는 에러로 전파되지 않고
//! `Reply::Failed`로 바뀌어 셸에 전달됩니다 (`services::tutor` 참고).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::llm::LlmError;

/// 세션 설정이나 서버 설정이 잘못되었을 때의 에러
///
/// 셸은 이 에러를 받으면 사용자에게 다시 입력하도록 안내해야 합니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// 숙련도가 선택되지 않음
    #[error("Please select a proficiency level.")]
    MissingProficiency,

    /// 알 수 없는 숙련도 문자열
    #[error("Unknown proficiency level: {0}")]
    UnknownProficiency(String),

    /// 학습 언어 또는 모국어가 비어 있음. 필드 이름을 담습니다.
    #[error("Please select a value for {0}.")]
    MissingLanguage(&'static str),

    /// 요청에도, 서버 설정에도 API 키가 없음
    #[error("Please enter an API key.")]
    MissingApiKey,

    /// 환경변수 값을 해석할 수 없음
    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },
}

/// HTTP 핸들러가 반환하는 통합 에러
///
/// 핸들러에서 `Result<T, AppError>`를 반환하면
/// Axum이 `IntoResponse`를 호출하여 JSON 에러 응답으로 바꿉니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 세션을 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 본문 (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 설정 오류 (HTTP 400). 셸이 재입력을 요청할 수 있도록 메시지를 그대로 전달합니다.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// 외부 텍스트 생성 서비스 클라이언트를 준비하지 못함 (HTTP 502)
    #[error("External service error: {0}")]
    ExternalService(#[from] LlmError),

    /// 실수 기록 저장소 오류 (HTTP 500)
    /// #[from] 덕분에 sqlx 함수 결과에 `?`를 쓰면 자동으로 변환됩니다.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 저장소/외부 서비스 에러는 실제 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::BadRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Configuration(ref e) => {
                (StatusCode::BAD_REQUEST, "configuration_error", e.to_string())
            }
            AppError::ExternalService(ref e) => {
                tracing::error!("External service error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "external_service_error",
                    "The language model service is unavailable".to_string(),
                )
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_error",
                    "A storage error occurred".to_string(),
                )
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_map_to_bad_request() {
        let resp = AppError::from(ConfigurationError::MissingApiKey).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_errors_map_to_internal_error() {
        let resp = AppError::from(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_language_names_the_field() {
        let err = ConfigurationError::MissingLanguage("learning_language");
        assert_eq!(err.to_string(), "Please select a value for learning_language.");
    }
}
