//! # 텍스트 생성 서비스 클라이언트
//!
//! 튜터가 의존하는 것은 `ChatModel` 트레이트 하나뿐입니다:
//! 역할이 붙은 메시지 목록을 보내면 텍스트 하나(또는 에러)를 돌려받습니다.
//! 특정 공급자의 wire 포맷은 `OpenAiChatModel` 안에만 있습니다.
//!
//! ## 요청 형식 (OpenAI 호환 Chat Completions)
//! ```text
//! POST {base_url}/chat/completions
//! Authorization: Bearer <api key>
//! { "model": "...", "messages": [{"role": "system", "content": "..."}, ...], "temperature": 0.7 }
//! ```
//! 응답에서는 `choices[0].message.content`만 사용합니다. 재시도는 하지 않습니다.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Message;

/// 텍스트 생성 서비스 호출 에러
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenAI-compatible request failed: status={status} body={body}")]
    Status { status: u16, body: String },

    #[error("decode chat JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no content in chat completion response")]
    MissingContent,
}

/// 대화 기록을 받아 다음 답변을 생성하는 모델
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;
}

/// 텍스트 생성 서비스 연결 정보 (환경변수에서 읽음)
#[derive(Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    /// 서버 공용 키. 세션이 자신의 키를 넘기면 그쪽이 우선합니다.
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// OpenAI 호환 엔드포인트를 호출하는 `ChatModel` 구현
#[derive(Clone)]
pub struct OpenAiChatModel {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl fmt::Debug for OpenAiChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChatModel")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl OpenAiChatModel {
    pub fn new(settings: &LlmSettings, api_key: impl Into<String>) -> Result<Self, LlmError> {
        // 타임아웃이 없으면 응답 없는 엔드포인트가 대화 턴을 영원히 붙잡습니다
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(settings.timeout)
            .build()
            .map_err(LlmError::Client)?;

        Ok(Self {
            client,
            url: join_url(&settings.base_url, "chat/completions"),
            model: settings.model.clone(),
            api_key: api_key.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let payload = ChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.text,
                })
                .collect(),
            temperature: 0.7,
        };

        tracing::debug!(model = %self.model, messages = messages.len(), "sending chat completion");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await?;

        if !(200..=299).contains(&status) {
            return Err(LlmError::Status {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_chat_completion(&body)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat Completions 응답 본문에서 첫 번째 선택지의 텍스트를 꺼냅니다.
pub fn parse_chat_completion(body: &[u8]) -> Result<String, LlmError> {
    let resp: ChatResponse = serde_json::from_slice(body)?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::MissingContent)
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}
