//! # 셸 보조 엔드포인트
//!
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/options | `list_options` | 언어/숙련도 선택지 |
//! | GET | /api/v1/quote | `get_quote` | 무작위 동기부여 문구 |
//!
//! 선택지는 셸이 기본으로 보여줄 목록일 뿐입니다. 세션 시작 시 다른 언어도 받습니다.

use axum::Json;
use serde_json::{json, Value};

use crate::models::ProficiencyLevel;
use crate::services::encouragement;

pub const LEARNING_LANGUAGES: [&str; 4] = ["Spanish", "French", "German", "Japanese"];
pub const NATIVE_LANGUAGES: [&str; 4] = ["English", "Spanish", "French", "German"];

/// `GET /options`
pub async fn list_options() -> Json<Value> {
    Json(json!({
        "learning_languages": LEARNING_LANGUAGES,
        "native_languages": NATIVE_LANGUAGES,
        "proficiency_levels": ProficiencyLevel::ALL,
    }))
}

/// `GET /quote`
pub async fn get_quote() -> Json<Value> {
    Json(json!({ "quote": encouragement::random_quote() }))
}
