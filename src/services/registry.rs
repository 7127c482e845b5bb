//! # 세션 레지스트리
//!
//! 셸과 코어 사이에서 세션을 명시적인 핸들(ID)로 주고받기 위한 저장소입니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! [시작] create() → 대화 진행(get() → take_turn()) → destroy() → [종료, 기록 폐기]
//!                                  └─ 유휴 시간 초과 → evict_idle() ─┘
//! ```
//!
//! ## 잠금 구조
//! - `info`(설정, 장면, 환영 문구)는 생성 후 바뀌지 않으므로 잠그지 않습니다.
//! - `turn`: 같은 세션의 턴을 도착 순서대로 하나씩 처리합니다. 모델 호출 내내 잡혀 있습니다.
//! - `conversation`: 대화 기록. 맥락을 만들 때와 결과를 반영할 때만 잠깐 잡습니다.
//!
//! 그래서 모델 응답을 기다리는 동안에도 분석, 실수 기록, 기록 조회는 바로 처리됩니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::models::{Message, SessionConfig, SessionInfo};
use crate::services::conversation::Conversation;
use crate::services::tutor::{Reply, Tutor};

/// 진행 중인 세션: 변하지 않는 세션 정보, 대화 기록, 그 세션 전용 튜터
pub struct ActiveSession {
    pub info: SessionInfo,
    tutor: Tutor,
    turn: Mutex<()>,
    conversation: RwLock<Conversation>,
    /// 마지막 사용 시각 (Unix epoch 밀리초)
    last_active: AtomicI64,
}

impl ActiveSession {
    fn new(info: SessionInfo, conversation: Conversation, tutor: Tutor) -> Self {
        let now = info.started_at.timestamp_millis();
        Self {
            info,
            tutor,
            turn: Mutex::new(()),
            conversation: RwLock::new(conversation),
            last_active: AtomicI64::new(now),
        }
    }

    /// 세션 학습 언어. 잠금 없이 읽습니다.
    pub fn learning_language(&self) -> &str {
        self.info.config.learning_language()
    }

    /// 현재까지의 대화 기록 사본
    pub async fn transcript(&self) -> Vec<Message> {
        self.conversation.read().await.transcript().to_vec()
    }

    /// 대화 턴 하나를 처리합니다.
    ///
    /// 모델 호출 중에는 대화 기록 잠금을 잡지 않습니다. 턴 잠금이 다음 턴을 막고 있으므로
    /// 맥락을 만든 뒤 결과를 반영할 때까지 기록이 바뀌지 않습니다.
    pub async fn take_turn(&self, user_message: &str) -> Reply {
        let _turn = self.turn.lock().await;
        self.touch();

        let context = {
            let conversation = self.conversation.read().await;
            self.tutor.context_for(&conversation, user_message)
        };

        let outcome = self.tutor.ask(&context).await;

        let reply = {
            let mut conversation = self.conversation.write().await;
            self.tutor.settle(&mut conversation, user_message, outcome)
        };
        self.touch();
        reply
    }

    fn touch(&self) {
        self.last_active
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        let idle_ms = now.timestamp_millis() - self.last_active.load(Ordering::Relaxed);
        Duration::from_millis(u64::try_from(idle_ms).unwrap_or(0))
    }

    /// 턴이 진행 중이면 유휴 상태가 아닙니다
    fn is_busy(&self) -> bool {
        self.turn.try_lock().is_err()
    }
}

pub type SessionHandle = Arc<ActiveSession>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 세션을 등록하고 셸에 돌려줄 정보를 반환합니다.
    pub async fn create(&self, config: SessionConfig, tutor: Tutor) -> SessionInfo {
        let conversation = Conversation::new(config);
        let info = SessionInfo {
            id: uuid::Uuid::now_v7().to_string(),
            config: conversation.config().clone(),
            scene: conversation.scene().to_string(),
            welcome: conversation.welcome(),
            started_at: Utc::now(),
        };

        let session = ActiveSession::new(info.clone(), conversation, tutor);

        self.sessions
            .write()
            .await
            .insert(info.id.clone(), Arc::new(session));

        tracing::info!(
            session_id = %info.id,
            language = info.config.learning_language(),
            level = %info.config.proficiency_level(),
            "session started"
        );

        info
    }

    /// 세션 핸들을 찾습니다. 찾으면 마지막 사용 시각을 갱신합니다.
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let handle = self.sessions.read().await.get(id).cloned()?;
        handle.touch();
        Some(handle)
    }

    /// 세션을 제거합니다. 존재했으면 true.
    pub async fn destroy(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session_id = %id, "session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// `max_idle` 이상 사용되지 않은 세션을 제거하고 제거한 개수를 반환합니다.
    ///
    /// 셸이 `DELETE` 없이 닫혀도 기록과 HTTP 클라이언트가 남지 않게 합니다.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        self.evict_idle_at(Utc::now(), max_idle).await
    }

    pub(crate) async fn evict_idle_at(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|id, session| {
            let keep = session.is_busy() || session.idle_for(now) < max_idle;
            if !keep {
                tracing::info!(session_id = %id, "idle session evicted");
            }
            keep
        });

        before - sessions.len()
    }

    /// 유휴 세션 정리 작업을 백그라운드에서 주기적으로 실행합니다.
    pub fn spawn_idle_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = (max_idle / 2).max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = registry.len().await;
                    tracing::debug!(evicted, remaining, "idle sweep");
                }
            }
        })
    }
}
