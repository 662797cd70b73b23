//! # 템플릿 데이터베이스 쿼리 모듈
//!
//! `templates` 테이블에 대한 SQL 함수들입니다.
//! DB에서 읽은 `TemplateRow`는 여기서 `Template`으로 변환해 돌려줍니다.

use crate::error::AppError;
use crate::models::{Template, TemplateRow};
use sqlx::SqlitePool;

/// 새 템플릿을 저장하고 저장된 템플릿을 반환합니다.
///
/// `created_at`과 `updated_at`에는 같은 서버 시각을 넣습니다.
pub async fn insert_template(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    entries: &[String],
    timestamp: &str,
) -> Result<Template, AppError> {
    let entries_json = serde_json::to_string(entries)?;

    sqlx::query(
        r#"
        INSERT INTO templates (id, name, entries, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(&entries_json)
    .bind(timestamp)
    .bind(timestamp)
    .execute(pool)
    .await?;

    get_template(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created template".to_string()))
}

/// ID로 템플릿 하나를 조회합니다.
pub async fn get_template(pool: &SqlitePool, id: &str) -> Result<Option<Template>, AppError> {
    let row = sqlx::query_as::<_, TemplateRow>(
        r#"
        SELECT id, name, entries, created_at, updated_at
        FROM templates
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    // Option<Row> → Option<Result<Template>> → Result<Option<Template>>
    Ok(row.map(Template::try_from).transpose()?)
}

/// 모든 템플릿을 최근 수정순으로 조회합니다.
pub async fn list_templates(pool: &SqlitePool) -> Result<Vec<Template>, AppError> {
    let rows = sqlx::query_as::<_, TemplateRow>(
        r#"
        SELECT id, name, entries, created_at, updated_at
        FROM templates
        ORDER BY updated_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let templates = rows
        .into_iter()
        .map(Template::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(templates)
}

/// 현재 컬렉션에 있는 모든 템플릿 ID를 가져옵니다.
///
/// 일괄 삭제는 이 목록을 받은 시점의 스냅샷만 지웁니다.
pub async fn list_template_ids(pool: &SqlitePool) -> Result<Vec<String>, AppError> {
    let ids = sqlx::query_scalar::<_, String>("SELECT id FROM templates")
        .fetch_all(pool)
        .await?;

    Ok(ids)
}

/// 템플릿 하나를 삭제합니다. 없던 템플릿이면 `Ok(false)`.
pub async fn delete_template(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
