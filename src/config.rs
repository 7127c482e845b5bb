//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: 실수 기록 SQLite 데이터베이스 경로
//! - `OPENAI_API_KEY`: 서버 공용 API 키 (세션마다 직접 넘길 수도 있음)
//! - `LLM_BASE_URL`, `LLM_MODEL`, `LLM_TIMEOUT_SECS`: 텍스트 생성 서비스 설정
//! - `CONTEXT_WINDOW`: 매 턴마다 모델에 다시 보낼 대화 기록 범위
//! - `SESSION_IDLE_SECS`: 이 시간 동안 쓰이지 않은 세션은 자동으로 정리됩니다
//! - `STATIC_DIR`: 셸(프론트엔드) 정적 파일 디렉토리 (선택)
//! - `HOST`, `PORT`: 서버 바인딩 주소

use std::env;
use std::time::Duration;

use crate::error::ConfigurationError;
use crate::services::llm::LlmSettings;
use crate::services::tutor::ContextWindow;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:language_learning.db")
    pub database_url: String,
    /// 텍스트 생성 서비스 연결 정보
    pub llm: LlmSettings,
    /// 대화 기록 전송 범위
    pub context_window: ContextWindow,
    /// 세션 유휴 제한 시간 (기본값: 30분)
    pub session_idle: Duration,
    /// 셸 정적 파일 디렉토리. None이면 API만 서빙합니다.
    pub static_dir: Option<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 환경변수가 없어도 동작합니다.
    /// 단, 값이 주어졌는데 해석할 수 없으면(`CONTEXT_WINDOW`, `LLM_TIMEOUT_SECS`,
    /// `SESSION_IDLE_SECS`, `PORT`) 조용히 기본값으로 돌아가지 않고 에러를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let context_window = match env::var("CONTEXT_WINDOW") {
            Ok(raw) => raw.parse::<ContextWindow>()?,
            Err(_) => ContextWindow::Unbounded,
        };

        let timeout_secs = match env::var("LLM_TIMEOUT_SECS") {
            Ok(raw) => parse_positive_secs("LLM_TIMEOUT_SECS", &raw)?,
            Err(_) => 60,
        };

        let idle_secs = match env::var("SESSION_IDLE_SECS") {
            Ok(raw) => parse_positive_secs("SESSION_IDLE_SECS", &raw)?,
            Err(_) => 30 * 60,
        };

        let port = match env::var("PORT") {
            Ok(raw) => parse_port(&raw)?,
            Err(_) => 3000,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:language_learning.db".to_string()),
            llm: LlmSettings {
                base_url: env::var("LLM_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                // 빈 문자열은 "키 없음"으로 취급합니다
                api_key: env::var("OPENAI_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty()),
                timeout: Duration::from_secs(timeout_secs),
            },
            context_window,
            session_idle: Duration::from_secs(idle_secs),
            static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
        })
    }
}

/// 0보다 큰 초 단위 정수
fn parse_positive_secs(name: &'static str, raw: &str) -> Result<u64, ConfigurationError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigurationError::InvalidSetting {
            name,
            value: raw.to_string(),
        }),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigurationError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigurationError::InvalidSetting {
            name: "PORT",
            value: raw.to_string(),
        })
}
