//! # 응답 생성기 (튜터)
//!
//! 한 번의 대화 턴을 처리합니다.
//!
//! ## 처리 흐름
//! ```text
//! [시스템 지시문] + [이전 대화 기록 (ContextWindow 적용)] + [새 사용자 메시지]
//!        → ChatModel::complete() 한 번 호출
//!        → 성공: 사용자/튜터 메시지를 기록에 추가, Reply::Replied
//!        → 실패: 기록은 그대로, Reply::Failed (사과 문구 + 실패 내용)
//! ```
//!
//! 실패는 호출자에게 에러로 전파하지 않습니다. 셸은 항상 보여줄 문자열을 받고,
//! `Reply`의 종류로 "모델이 답했다"와 "호출이 실패했다"를 구분합니다.

use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::models::{Message, SessionConfig};
use crate::services::conversation::Conversation;
use crate::services::llm::{ChatModel, LlmError};

/// 실패 시 셸에 보여줄 문구의 접두어
pub const APOLOGY_PREFIX: &str = "🤖 Oops! API Error: ";

/// 매 턴마다 모델에 다시 보낼 대화 기록의 범위
///
/// 저장된 대화 기록 자체는 잘리지 않습니다. 전송 범위만 제한합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextWindow {
    /// 전체 기록을 보냅니다 (요청 크기가 대화 길이에 비례해 커짐)
    #[default]
    Unbounded,
    /// 가장 최근 n개의 메시지만 보냅니다
    Recent(usize),
}

impl ContextWindow {
    pub fn select<'a>(&self, transcript: &'a [Message]) -> &'a [Message] {
        match *self {
            ContextWindow::Unbounded => transcript,
            ContextWindow::Recent(n) => &transcript[transcript.len().saturating_sub(n)..],
        }
    }
}

/// `"unbounded"` 또는 양의 정수
impl FromStr for ContextWindow {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unbounded") {
            return Ok(ContextWindow::Unbounded);
        }

        match trimmed.parse::<usize>() {
            Ok(n) if n > 0 => Ok(ContextWindow::Recent(n)),
            _ => Err(ConfigurationError::InvalidSetting {
                name: "CONTEXT_WINDOW",
                value: s.to_string(),
            }),
        }
    }
}

/// 한 턴의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// 모델이 답했고, 두 메시지가 기록에 추가됨
    Replied { reply: String },
    /// 모델 호출이 실패함. `reply`는 셸에 표시할 사과 문구, `error`는 실패 내용
    Failed { reply: String, error: String },
}

impl Reply {
    fn failed(err: &LlmError) -> Self {
        let detail = err.to_string();
        Reply::Failed {
            reply: format!("{APOLOGY_PREFIX}{detail}"),
            error: detail,
        }
    }

    /// 셸에 표시할 텍스트
    pub fn text(&self) -> &str {
        match self {
            Reply::Replied { reply } | Reply::Failed { reply, .. } => reply,
        }
    }

    pub fn is_replied(&self) -> bool {
        matches!(self, Reply::Replied { .. })
    }
}

/// 학습 언어와 숙련도를 담은 시스템 지시문
pub fn system_prompt(config: &SessionConfig) -> String {
    let language = config.learning_language();
    format!(
        "You are a friendly language tutor helping someone learn {language}.\n\
         - Speak in {language}.\n\
         - Adjust complexity to {level} level.\n\
         - If they make mistakes, gently correct them.\n\
         - Encourage them to continue learning!\n\
         - Keep it engaging and natural.",
        level = config.proficiency_level(),
    )
}

/// 모델에 보낼 메시지 목록을 만듭니다.
pub fn build_context(
    config: &SessionConfig,
    transcript: &[Message],
    window: ContextWindow,
    user_message: &str,
) -> Vec<Message> {
    let history = window.select(transcript);

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt(config)));
    messages.extend_from_slice(history);
    messages.push(Message::user(user_message));
    messages
}

/// 세션 하나에 묶인 응답 생성기
#[derive(Clone)]
pub struct Tutor {
    model: Arc<dyn ChatModel>,
    window: ContextWindow,
}

impl Tutor {
    /// 모델과 전송 범위를 묶어 튜터를 만듭니다. 세션마다 하나씩 생성됩니다.
    pub fn new(model: Arc<dyn ChatModel>, window: ContextWindow) -> Self {
        Self { model, window }
    }

    /// 대화 턴 하나를 처리합니다.
    ///
    /// 성공하면 사용자 메시지와 튜터 답변을 순서대로 기록에 추가하고,
    /// 실패하면 기록을 건드리지 않고 `Reply::Failed`를 돌려줍니다.
    pub async fn respond(&self, conversation: &mut Conversation, user_message: &str) -> Reply {
        let context = self.context_for(conversation, user_message);
        let outcome = self.ask(&context).await;
        self.settle(conversation, user_message, outcome)
    }

    /// 이번 턴에 모델로 보낼 메시지 목록 (전송 범위 적용)
    pub fn context_for(&self, conversation: &Conversation, user_message: &str) -> Vec<Message> {
        build_context(
            conversation.config(),
            conversation.transcript(),
            self.window,
            user_message,
        )
    }

    /// 모델을 한 번 호출합니다. 기록은 건드리지 않습니다.
    pub async fn ask(&self, context: &[Message]) -> Result<String, LlmError> {
        self.model.complete(context).await
    }

    /// 모델 호출 결과를 기록에 반영하고 셸에 돌려줄 `Reply`로 바꿉니다.
    ///
    /// 세션 잠금 없이 `ask`를 호출한 경우, 호출자는 `context_for`와 `settle` 사이에
    /// 다른 턴이 끼어들지 않도록 보장해야 합니다.
    pub fn settle(
        &self,
        conversation: &mut Conversation,
        user_message: &str,
        outcome: Result<String, LlmError>,
    ) -> Reply {
        match outcome {
            Ok(reply) => {
                conversation.append_user_turn(user_message);
                conversation.append_assistant_turn(reply.clone());
                Reply::Replied { reply }
            }
            Err(e) => {
                tracing::warn!(error = %e, "language model call failed; turn not recorded");
                Reply::failed(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 받은 메시지를 기록하고, 미리 정한 결과를 순서대로 돌려주는 가짜 모델
    struct ScriptedModel {
        replies: Mutex<Vec<Result<String, u16>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<String, u16>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            match self.replies.lock().unwrap().pop() {
                Some(Ok(text)) => Ok(text),
                Some(Err(status)) => Err(LlmError::Status {
                    status,
                    body: "rate limited".into(),
                }),
                None => Err(LlmError::MissingContent),
            }
        }
    }

    fn conversation() -> Conversation {
        Conversation::new(SessionConfig::new("French", "English", Some("Beginner")).unwrap())
    }

    #[test]
    fn system_prompt_embeds_language_and_level() {
        let cfg = SessionConfig::new("Japanese", "English", Some("Advanced")).unwrap();
        let prompt = system_prompt(&cfg);
        assert!(prompt.contains("learn Japanese"));
        assert!(prompt.contains("Speak in Japanese"));
        assert!(prompt.contains("Advanced level"));
    }

    #[test]
    fn context_window_parsing() {
        assert_eq!("unbounded".parse(), Ok(ContextWindow::Unbounded));
        assert_eq!("".parse(), Ok(ContextWindow::Unbounded));
        assert_eq!(" 12 ".parse(), Ok(ContextWindow::Recent(12)));
        assert!("0".parse::<ContextWindow>().is_err());
        assert!("lots".parse::<ContextWindow>().is_err());
    }

    #[tokio::test]
    async fn successful_turns_append_two_messages_each() {
        let model = ScriptedModel::new(vec![
            Ok("Bonjour !".into()),
            Ok("Très bien.".into()),
            Ok("Au revoir.".into()),
        ]);
        let tutor = Tutor::new(model.clone(), ContextWindow::Unbounded);
        let mut conv = conversation();

        for (i, text) in ["Salut", "Ça va", "Bye"].into_iter().enumerate() {
            let reply = tutor.respond(&mut conv, text).await;
            assert!(reply.is_replied());
            assert_eq!(conv.transcript().len(), 2 * (i + 1));
        }

        let texts: Vec<&str> = conv.transcript().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Salut", "Bonjour !", "Ça va", "Très bien.", "Bye", "Au revoir."]
        );

        // 세 번째 호출: 시스템 + 이전 4개 + 새 메시지
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[2].len(), 6);
        assert_eq!(seen[2][0].role, Role::System);
        assert_eq!(seen[2][5], Message::user("Bye"));
    }

    #[tokio::test]
    async fn failed_turn_leaves_transcript_untouched() {
        let model = ScriptedModel::new(vec![Ok("Bonjour !".into()), Err(429)]);
        let tutor = Tutor::new(model, ContextWindow::Unbounded);
        let mut conv = conversation();

        tutor.respond(&mut conv, "Salut").await;
        let reply = tutor.respond(&mut conv, "Encore").await;

        assert_eq!(conv.transcript().len(), 2);
        match &reply {
            Reply::Failed { reply, error } => {
                assert!(reply.starts_with(APOLOGY_PREFIX));
                assert!(reply.contains(error.as_str()));
                assert!(error.contains("status=429"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(reply.text().contains("rate limited"));
    }

    #[tokio::test]
    async fn recent_window_limits_history_sent() {
        let model = ScriptedModel::new(vec![Ok("1".into()), Ok("2".into()), Ok("3".into())]);
        let tutor = Tutor::new(model.clone(), ContextWindow::Recent(2));
        let mut conv = conversation();

        tutor.respond(&mut conv, "a").await;
        tutor.respond(&mut conv, "b").await;
        tutor.respond(&mut conv, "c").await;

        // 저장된 기록은 그대로 6개
        assert_eq!(conv.transcript().len(), 6);

        let seen = model.seen.lock().unwrap();
        let last = &seen[2];
        assert_eq!(
            last,
            &vec![
                Message::system(system_prompt(conv.config())),
                Message::user("b"),
                Message::assistant("2"),
                Message::user("c"),
            ]
        );
    }

    #[test]
    fn replies_serialize_with_status_tag() {
        let ok = serde_json::to_value(Reply::Replied { reply: "hi".into() }).unwrap();
        assert_eq!(ok, serde_json::json!({"status": "replied", "reply": "hi"}));

        let failed = Reply::failed(&LlmError::MissingContent);
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "no content in chat completion response");
    }
}
