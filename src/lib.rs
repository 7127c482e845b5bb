//! # Parla
//!
//! AI 대화 상대와 외국어를 연습하고, 문법/어휘 실수를 SQLite에 기록해
//! 간단한 통계를 보여주는 튜터 백엔드의 코어 라이브러리입니다.
//!
//! 셸(프레젠테이션 계층)에 노출하는 진입점은 세 가지입니다:
//! - 세션 시작: `services::registry::SessionRegistry::create`
//! - 대화 턴: `services::tutor::Tutor::respond`
//! - 실수 분석: `services::analyzer::analyze`
//!
//! `routes`는 이 진입점들을 JSON HTTP API로 감싼 어댑터입니다.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
