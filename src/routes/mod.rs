//! # 라우트 핸들러 모듈
//!
//! 셸이 호출하는 HTTP 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인
//! - `options`: 셸 선택 상자용 선택지, 동기부여 문구
//! - `sessions`: 세션 시작/조회/종료, 대화 턴, 실수 분석
//! - `mistakes`: 세션 학습 언어의 실수 기록/조회

pub mod health;
pub mod mistakes;
pub mod options;
pub mod sessions;

pub use health::*;
pub use mistakes::*;
pub use options::*;
pub use sessions::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::services::llm::LlmSettings;
use crate::services::registry::SessionRegistry;
use crate::services::tutor::ContextWindow;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool과 SessionRegistry는 내부적으로 Arc이므로 clone해도 같은 대상을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// 실수 기록 저장소
    pub pool: SqlitePool,
    /// 진행 중인 세션들
    pub sessions: SessionRegistry,
    /// 새 세션의 튜터가 사용할 모델 연결 정보
    pub llm: LlmSettings,
    pub context_window: ContextWindow,
}

/// `/api/v1` 아래에 붙일 라우터를 만듭니다.
///
/// axum 0.8부터 경로 파라미터는 `{id}` 형식입니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/options", get(list_options))
        .route("/quote", get(get_quote))
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", get(get_session).delete(end_session))
        .route("/sessions/{id}/messages", post(send_message))
        .route("/sessions/{id}/analysis", get(analyze_session))
        .route(
            "/sessions/{id}/mistakes",
            get(list_session_mistakes).post(record_session_mistake),
        )
        .with_state(state)
}

/// 핸들러 테스트용 상태: 인메모리 DB, 빈 레지스트리, 연결되지 않는 모델 주소
#[cfg(test)]
pub(crate) async fn test_state(api_key: Option<&str>) -> AppState {
    AppState {
        pool: crate::db::test_pool().await,
        sessions: SessionRegistry::new(),
        llm: LlmSettings {
            base_url: "http://127.0.0.1:9/v1".into(),
            model: "gpt-4o".into(),
            api_key: api_key.map(str::to_string),
            timeout: std::time::Duration::from_secs(1),
        },
        context_window: ContextWindow::Unbounded,
    }
}
