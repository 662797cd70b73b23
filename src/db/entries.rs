//! # 세션 엔트리 데이터베이스 쿼리 모듈
//!
//! `session_entries` 테이블에 대한 SQL 함수들입니다.
//! 타임스탬프와 ID는 호출하는 쪽(`store`)이 정해서 넘깁니다.
//! 이 모듈은 순수하게 SQL만 다룹니다.

use crate::error::AppError;
use crate::models::SessionEntry;
use sqlx::SqlitePool;

/// 새 엔트리를 저장하고 저장된 행을 반환합니다.
pub async fn insert_entry(
    pool: &SqlitePool,
    id: &str,
    text: &str,
    created_at: &str,
) -> Result<SessionEntry, AppError> {
    sqlx::query(
        r#"
        INSERT INTO session_entries (id, text, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(text)
    .bind(created_at)
    .execute(pool)
    .await?;

    get_entry(pool, id)
        .await?
        .ok_or(AppError::Internal(
            "Failed to retrieve created session entry".to_string(),
        ))
}

/// ID로 엔트리 하나를 조회합니다.
pub async fn get_entry(pool: &SqlitePool, id: &str) -> Result<Option<SessionEntry>, AppError> {
    let entry = sqlx::query_as::<_, SessionEntry>(
        "SELECT id, text, created_at FROM session_entries WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(entry)
}

/// 모든 엔트리를 최신순으로 조회합니다.
///
/// 같은 시각이면 id(UUIDv7) 역순으로 정렬해 순서가 흔들리지 않게 합니다.
pub async fn list_entries(pool: &SqlitePool) -> Result<Vec<SessionEntry>, AppError> {
    let entries = sqlx::query_as::<_, SessionEntry>(
        r#"
        SELECT id, text, created_at
        FROM session_entries
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// 엔트리 하나를 삭제합니다.
///
/// ## 반환값
/// - `Ok(true)`: 삭제됨
/// - `Ok(false)`: 이미 없던 엔트리
pub async fn delete_entry(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM session_entries WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
