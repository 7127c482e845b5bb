//! # 서비스(비즈니스 로직) 모듈
//!
//! - `llm`: 텍스트 생성 서비스 클라이언트 (`ChatModel` 트레이트와 OpenAI 호환 구현)
//! - `tutor`: 응답 생성기. 시스템 지시문 + 대화 기록 + 새 메시지를 모델에 전달
//! - `conversation`: 세션 설정과 대화 기록
//! - `registry`: 세션 생성/조회/종료
//! - `scene`: 숙련도별 대화 장면
//! - `analyzer`: 실수 유형별 집계와 개선 팁
//! - `encouragement`: 동기부여 문구

pub mod analyzer;
pub mod conversation;
pub mod encouragement;
pub mod llm;
pub mod registry;
pub mod scene;
pub mod tutor;
