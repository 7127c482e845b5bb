//! # 실수 기록 데이터베이스 쿼리 모듈
//!
//! `mistakes` 테이블에 대한 SQL 쿼리 함수들입니다.
//!
//! ## 테이블 사용 규칙
//! ```text
//! record_mistake()          → INSERT (한 문장, 한 행)
//! mistake_counts_by_type()  → SELECT ... GROUP BY mistake_type
//! list_mistakes()           → SELECT ... ORDER BY id
//! ```
//! UPDATE/DELETE는 없습니다. 기록은 불변입니다.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::models::Mistake;
use sqlx::SqlitePool;

/// 실수 하나를 기록하고 저장된 행을 반환합니다.
///
/// 모든 값은 `?` 플레이스홀더로 바인딩하므로 사용자 입력이 SQL에 섞이지 않습니다.
pub async fn record_mistake(
    pool: &SqlitePool,
    language: &str,
    mistake_type: &str,
    original_text: &str,
    corrected_text: &str,
    explanation: &str,
) -> Result<Mistake, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO mistakes (language, mistake_type, original_text, corrected_text, explanation)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(language)
    .bind(mistake_type)
    .bind(original_text)
    .bind(corrected_text)
    .bind(explanation)
    .execute(pool)
    .await?;

    // INTEGER PRIMARY KEY는 rowid이므로 last_insert_rowid()가 곧 id입니다
    let id = result.last_insert_rowid();

    tracing::debug!(id, language, mistake_type, "recorded mistake");

    let mistake = sqlx::query_as::<_, Mistake>(
        r#"
        SELECT id, language, mistake_type, original_text, corrected_text, explanation
        FROM mistakes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(mistake)
}

/// 언어별 실수 유형 횟수를 집계합니다.
///
/// 언어는 정확히 일치해야 합니다 ("french"와 "French"는 다른 언어).
/// 일치하는 행이 없으면 빈 맵을 반환합니다.
pub async fn mistake_counts_by_type(
    pool: &SqlitePool,
    language: &str,
) -> Result<BTreeMap<String, i64>, AppError> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT mistake_type, COUNT(*)
        FROM mistakes
        WHERE language = ?
        GROUP BY mistake_type
        "#,
    )
    .bind(language)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// 언어별 실수 기록을 기록된 순서대로 조회합니다.
pub async fn list_mistakes(pool: &SqlitePool, language: &str) -> Result<Vec<Mistake>, AppError> {
    let mistakes = sqlx::query_as::<_, Mistake>(
        r#"
        SELECT id, language, mistake_type, original_text, corrected_text, explanation
        FROM mistakes
        WHERE language = ?
        ORDER BY id
        "#,
    )
    .bind(language)
    .fetch_all(pool)
    .await?;

    Ok(mistakes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn counts_are_empty_without_rows() {
        let pool = test_pool().await;
        let counts = mistake_counts_by_type(&pool, "French").await.unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn records_and_groups_by_type() {
        let pool = test_pool().await;

        for _ in 0..3 {
            record_mistake(&pool, "French", "grammar", "je suis allé", "je suis allée", "agreement")
                .await
                .unwrap();
        }
        record_mistake(&pool, "French", "spelling", "bonjuor", "bonjour", "typo")
            .await
            .unwrap();
        record_mistake(&pool, "Spanish", "grammar", "yo es", "yo soy", "ser")
            .await
            .unwrap();

        let counts = mistake_counts_by_type(&pool, "French").await.unwrap();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["grammar"], 3);
        assert_eq!(counts["spelling"], 1);
    }

    #[tokio::test]
    async fn language_match_is_exact() {
        let pool = test_pool().await;
        record_mistake(&pool, "French", "grammar", "a", "b", "c")
            .await
            .unwrap();

        assert!(mistake_counts_by_type(&pool, "french").await.unwrap().is_empty());
        assert!(list_mistakes(&pool, "French ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_in_insertion_order() {
        let pool = test_pool().await;
        let first = record_mistake(&pool, "German", "vocabulary", "Handy", "Mobiltelefon", "formal")
            .await
            .unwrap();
        let second = record_mistake(&pool, "German", "grammar", "der Mädchen", "das Mädchen", "neuter")
            .await
            .unwrap();

        assert!(second.id > first.id);
        assert_eq!(second.corrected_text, "das Mädchen");

        let listed = list_mistakes(&pool, "German").await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }
}
