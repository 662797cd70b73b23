//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 SQL 함수들을 모아둔 모듈입니다.
//! 실시간 구독과 서버 타임스탬프는 한 단계 위의 `store` 모듈이 담당합니다.
//!
//! 각 하위 모듈:
//! - `entries`: 세션 엔트리 쿼리
//! - `templates`: 템플릿 쿼리

pub mod entries;
pub mod templates;

pub use entries::*;
pub use templates::*;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// `sqlx::migrate!`는 컴파일 타임에 ./migrations 폴더의 SQL 파일들을 포함시킵니다.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// 테스트용 인메모리 데이터베이스
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 1개로 고정합니다.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open")
}
