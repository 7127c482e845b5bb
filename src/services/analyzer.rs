//! # 실수 분석
//!
//! 학습 언어의 실수를 유형별로 집계하고, 고정된 개선 팁 표를 함께 돌려줍니다.
//! 팁 표는 발생한 유형으로 걸러내지 않고 항상 여섯 항목 전체를 반환합니다.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::MistakeAnalysis;

/// 실수 유형별 개선 팁
pub const RECOMMENDATIONS: [(&str, &str); 6] = [
    (
        "grammar",
        "Practice verb conjugations and sentence structure exercises.",
    ),
    ("vocabulary", "Use flashcards to expand your vocabulary."),
    (
        "pronunciation",
        "Listen to native speakers and repeat phrases.",
    ),
    ("spelling", "Try dictation exercises."),
    ("idiomatic", "Learn common idioms in this language."),
    (
        "cultural",
        "Read about the culture to understand language nuances.",
    ),
];

pub fn recommendations() -> BTreeMap<&'static str, &'static str> {
    RECOMMENDATIONS.into_iter().collect()
}

/// `language`의 실수 통계와 팁 표를 만듭니다.
pub async fn analyze(pool: &SqlitePool, language: &str) -> Result<MistakeAnalysis, AppError> {
    let mistake_counts = db::mistake_counts_by_type(pool, language).await?;

    Ok(MistakeAnalysis {
        mistake_counts,
        recommendations: recommendations(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn empty_language_still_gets_every_tip() {
        let pool = test_pool().await;
        let analysis = analyze(&pool, "Japanese").await.unwrap();

        assert!(analysis.mistake_counts.is_empty());
        assert_eq!(analysis.recommendations.len(), 6);
        assert_eq!(
            analysis.recommendations["spelling"],
            "Try dictation exercises."
        );
    }

    #[tokio::test]
    async fn recording_increments_only_that_category() {
        let pool = test_pool().await;
        db::record_mistake(&pool, "French", "grammar", "a", "b", "c")
            .await
            .unwrap();
        db::record_mistake(&pool, "French", "vocabulary", "a", "b", "c")
            .await
            .unwrap();

        let before = analyze(&pool, "French").await.unwrap();
        db::record_mistake(&pool, "French", "grammar", "d", "e", "f")
            .await
            .unwrap();
        let after = analyze(&pool, "French").await.unwrap();

        assert_eq!(after.mistake_counts["grammar"], before.mistake_counts["grammar"] + 1);
        assert_eq!(after.mistake_counts["vocabulary"], before.mistake_counts["vocabulary"]);
        assert_eq!(after.mistake_counts.len(), before.mistake_counts.len());
    }

    #[tokio::test]
    async fn three_grammar_mistakes_in_french() {
        let pool = test_pool().await;
        for _ in 0..3 {
            db::record_mistake(&pool, "French", "grammar", "a", "b", "c")
                .await
                .unwrap();
        }

        let analysis = analyze(&pool, "French").await.unwrap();
        let expected: BTreeMap<String, i64> = [("grammar".to_string(), 3)].into_iter().collect();
        assert_eq!(analysis.mistake_counts, expected);
        assert_eq!(analysis.recommendations, recommendations());
    }
}
