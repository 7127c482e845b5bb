//! # 대화 세션
//!
//! 세션 설정과 대화 기록(transcript)을 함께 보관합니다.
//! 기록은 추가만 가능하며, 추가된 순서가 곧 대화 맥락의 순서입니다.

use crate::models::{Message, SessionConfig};
use crate::services::scene;

#[derive(Debug, Clone)]
pub struct Conversation {
    config: SessionConfig,
    transcript: Vec<Message>,
}

impl Conversation {
    /// 빈 대화 기록으로 세션을 시작합니다. 설정은 이미 검증된 값입니다.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            transcript: Vec::new(),
        }
    }

    /// 세션 설정 (학습 언어, 모국어, 숙련도). 세션 동안 바뀌지 않습니다.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// 지금까지의 대화 기록 (시간순)
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// 사용자 메시지를 기록 끝에 추가합니다. 검증이나 중복 제거는 하지 않습니다.
    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.transcript.push(Message::user(text));
    }

    /// 튜터 답변을 기록 끝에 추가합니다.
    pub fn append_assistant_turn(&mut self, text: impl Into<String>) {
        self.transcript.push(Message::assistant(text));
    }

    /// 숙련도에 맞는 대화 장면 (예: Beginner → "A coffee shop")
    pub fn scene(&self) -> &'static str {
        scene::scene_for(self.config.proficiency_level())
    }

    /// 셸의 첫 말풍선. 대화 기록에는 추가하지 않습니다.
    pub fn welcome(&self) -> String {
        format!(
            "Welcome! Let's practice {} at a {} level. Scene: {}.",
            self.config.learning_language(),
            self.config.proficiency_level(),
            self.scene()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn french_beginner() -> Conversation {
        Conversation::new(SessionConfig::new("French", "English", Some("Beginner")).unwrap())
    }

    #[test]
    fn turns_keep_call_order() {
        let mut conv = french_beginner();
        conv.append_user_turn("Bonjour");
        conv.append_assistant_turn("Bonjour ! Ça va ?");
        conv.append_user_turn("Bonjour");

        let roles: Vec<Role> = conv.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        // 중복 제거 없음
        assert_eq!(conv.transcript()[0], conv.transcript()[2]);
    }

    #[test]
    fn welcome_mentions_language_level_and_scene() {
        let conv = french_beginner();
        assert_eq!(conv.scene(), "A coffee shop");
        assert_eq!(
            conv.welcome(),
            "Welcome! Let's practice French at a Beginner level. Scene: A coffee shop."
        );
        assert!(conv.transcript().is_empty());
    }
}
