//! # 대화 세션 모델 정의
//!
//! 튜터 세션에서 사용하는 데이터 구조체들을 정의합니다.
//!
//! ## 구조체 역할
//! - `ProficiencyLevel`: 세 가지 숙련도 단계 (프롬프트 난이도와 장면 선택에 사용)
//! - `SessionConfig`: 세션 시작 시 한 번 정해지고 이후 바뀌지 않는 설정
//! - `Message`: 대화 기록(transcript)의 한 줄. 역할(role)과 본문으로 구성
//! - `StartSessionRequest`, `SendMessageRequest`: 셸이 보내는 JSON 본문
//! - `SessionInfo`: 세션 생성 결과

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// 숙련도 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyLevel {
    /// 셸의 선택 상자에 표시할 순서 그대로
    pub const ALL: [ProficiencyLevel; 3] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner => "Beginner",
            ProficiencyLevel::Intermediate => "Intermediate",
            ProficiencyLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 문자열에서 숙련도를 해석합니다.
///
/// 앞뒤 공백을 무시하고 대소문자를 구분하지 않습니다.
/// 빈 문자열은 "선택하지 않음"으로 보고 `MissingProficiency`를 반환합니다.
impl FromStr for ProficiencyLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::MissingProficiency);
        }

        ProficiencyLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigurationError::UnknownProficiency(trimmed.to_string()))
    }
}

/// 세션 설정
///
/// 필드가 모두 private인 이유: 생성 후에는 읽기만 가능하도록 하기 위해서입니다.
/// 설정을 바꾸려면 새 세션을 시작해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    learning_language: String,
    native_language: String,
    proficiency_level: ProficiencyLevel,
}

impl SessionConfig {
    /// 셸에서 받은 원시 선택값을 검증하여 설정을 만듭니다.
    ///
    /// # 에러
    /// - 언어가 비어 있으면 `MissingLanguage`
    /// - 숙련도가 없거나 알 수 없으면 `MissingProficiency` / `UnknownProficiency`
    pub fn new(
        learning_language: &str,
        native_language: &str,
        proficiency_level: Option<&str>,
    ) -> Result<Self, ConfigurationError> {
        let learning_language = required_language("learning_language", learning_language)?;
        let native_language = required_language("native_language", native_language)?;
        let proficiency_level = proficiency_level
            .ok_or(ConfigurationError::MissingProficiency)?
            .parse()?;

        Ok(Self {
            learning_language,
            native_language,
            proficiency_level,
        })
    }

    pub fn learning_language(&self) -> &str {
        &self.learning_language
    }

    pub fn native_language(&self) -> &str {
        &self.native_language
    }

    pub fn proficiency_level(&self) -> ProficiencyLevel {
        self.proficiency_level
    }
}

fn required_language(field: &'static str, value: &str) -> Result<String, ConfigurationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigurationError::MissingLanguage(field));
    }
    Ok(trimmed.to_string())
}

/// 대화 메시지의 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Chat Completions API의 `role` 필드 값
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// 대화 기록의 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// 세션 시작 요청: `POST /api/v1/sessions`의 요청 본문
///
/// 모든 필드가 Option인 이유: 누락된 선택값을 JSON 파싱 에러(422)가 아니라
/// `ConfigurationError`(400)로 돌려주어 셸이 재입력을 안내할 수 있게 하기 위함입니다.
#[derive(Deserialize)]
pub struct StartSessionRequest {
    pub learning_language: Option<String>,
    pub native_language: Option<String>,
    pub proficiency_level: Option<String>,
    /// 세션 전용 API 키. 없으면 서버 설정의 키를 사용합니다.
    pub api_key: Option<String>,
}

// API 키가 로그에 남지 않도록 Debug를 직접 구현합니다
impl fmt::Debug for StartSessionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartSessionRequest")
            .field("learning_language", &self.learning_language)
            .field("native_language", &self.native_language)
            .field("proficiency_level", &self.proficiency_level)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StartSessionRequest {
    /// 요청 본문을 검증된 `SessionConfig`로 변환합니다.
    pub fn session_config(&self) -> Result<SessionConfig, ConfigurationError> {
        SessionConfig::new(
            self.learning_language.as_deref().unwrap_or_default(),
            self.native_language.as_deref().unwrap_or_default(),
            self.proficiency_level.as_deref(),
        )
    }
}

/// 대화 턴 요청: `POST /api/v1/sessions/:id/messages`
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// 세션 생성 결과
///
/// `welcome`은 셸이 첫 말풍선으로 보여줄 인사말이며, 대화 기록에는 들어가지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    /// 세션 핸들 (UUIDv7)
    pub id: String,
    pub config: SessionConfig,
    pub scene: String,
    pub welcome: String,
    pub started_at: DateTime<Utc>,
}
