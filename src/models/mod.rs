//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `mistake`: 실수 기록과 분석 결과
//! - `session`: 세션 설정, 숙련도, 대화 메시지
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Mistake`처럼 짧게 접근합니다.

pub mod mistake;
pub mod session;

pub use mistake::*;
pub use session::*;
