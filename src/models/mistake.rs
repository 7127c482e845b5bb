//! # 실수 기록 모델 정의
//!
//! - `Mistake`: DB의 `mistakes` 테이블 한 행
//! - `RecordMistakeRequest`: 실수 기록 요청 본문
//! - `MistakeAnalysis`: 유형별 실수 횟수와 개선 팁

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 실수 엔티티. 한 번 저장되면 수정/삭제되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mistake {
    /// 자동 증가 정수 ID
    pub id: i64,
    /// 학습 언어 (예: "French"). 조회는 정확히 일치하는 값으로만 합니다.
    pub language: String,
    /// 실수 유형 (예: "grammar", "vocabulary")
    pub mistake_type: String,
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
}

/// 실수 기록 요청: `POST /api/v1/sessions/:id/mistakes`
///
/// 언어는 세션의 학습 언어를 사용하므로 본문에는 없습니다.
#[derive(Debug, Deserialize)]
pub struct RecordMistakeRequest {
    pub mistake_type: String,
    pub original_text: String,
    pub corrected_text: String,
    pub explanation: String,
}

/// 실수 분석 결과
///
/// `recommendations`는 실제로 발생한 유형과 상관없이 항상 여섯 항목 전체입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MistakeAnalysis {
    pub mistake_counts: BTreeMap<String, i64>,
    pub recommendations: BTreeMap<&'static str, &'static str>,
}
