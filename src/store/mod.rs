//! # 문서 저장소 (Document Store)
//!
//! 두 개의 컬렉션(세션 엔트리, 템플릿)을 관리하는 저장소 경계입니다.
//! 서비스 계층은 SQL을 직접 다루지 않고 이 타입의 메서드만 호출합니다.
//!
//! 제공하는 연산:
//! - 서버 타임스탬프를 붙여 문서 생성
//! - ID로 문서 삭제 / 조회
//! - 컬렉션 전체 ID 조회
//! - 정렬된 쿼리 구독 (쓰기가 끝날 때마다 전체 목록을 다시 게시)
//!
//! ## 게시 순서
//! 각 컬렉션은 "다시 조회 → 게시"를 뮤텍스 안에서 수행합니다.
//! 모든 쓰기는 커밋 후에 갱신을 하므로, 마지막으로 게시된 스냅샷은
//! 항상 마지막으로 커밋된 쓰기 이후의 상태입니다.
//!
//! 갱신(다시 조회)이 실패해도 이미 커밋된 쓰기는 성공으로 반환합니다.
//! 실패는 로그로 남기고, 피드는 다음 쓰기의 갱신 때 따라잡습니다.

pub mod clock;
pub mod feed;

pub use clock::ServerClock;
pub use feed::{Feed, Snapshot, Subscription};

use crate::db;
use crate::error::AppError;
use crate::models::{SessionEntry, Template};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 컬렉션 하나의 실시간 피드와 갱신 잠금
#[derive(Debug)]
struct Collection<T> {
    feed: Feed<T>,
    refresh_lock: Mutex<()>,
}

impl<T> Collection<T> {
    fn new(initial: Vec<T>) -> Self {
        Self {
            feed: Feed::new(initial),
            refresh_lock: Mutex::new(()),
        }
    }
}

#[derive(Debug)]
struct Inner {
    pool: SqlitePool,
    clock: ServerClock,
    entries: Collection<SessionEntry>,
    templates: Collection<Template>,
}

/// 공유 가능한 저장소 핸들
///
/// 내부가 `Arc`이므로 clone해도 같은 풀과 같은 피드를 가리킵니다.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    inner: Arc<Inner>,
}

impl DocumentStore {
    /// 저장소를 열고 두 컬렉션의 초기 스냅샷을 읽어 둡니다.
    pub async fn open(pool: SqlitePool) -> Result<Self, AppError> {
        let entries = db::list_entries(&pool).await?;
        let templates = db::list_templates(&pool).await?;
        tracing::debug!(
            entries = entries.len(),
            templates = templates.len(),
            "Document store opened"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                pool,
                clock: ServerClock::new(),
                entries: Collection::new(entries),
                templates: Collection::new(templates),
            }),
        })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    // ── 세션 엔트리 컬렉션 ──

    /// 엔트리를 생성합니다. ID와 `created_at`은 저장소가 정합니다.
    pub async fn create_entry(&self, text: &str) -> Result<SessionEntry, AppError> {
        let id = uuid::Uuid::now_v7().to_string();
        let created_at = self.inner.clock.stamp();
        let entry = db::insert_entry(&self.inner.pool, &id, text, &created_at).await?;
        self.publish_entries().await;
        Ok(entry)
    }

    pub async fn delete_entry(&self, id: &str) -> Result<bool, AppError> {
        let deleted = db::delete_entry(&self.inner.pool, id).await?;
        if deleted {
            self.publish_entries().await;
        }
        Ok(deleted)
    }

    /// `created_at DESC` 순 엔트리 목록 구독
    pub fn subscribe_entries(&self) -> Subscription<SessionEntry> {
        self.inner.entries.feed.subscribe()
    }

    /// 커밋된 쓰기 뒤에 호출합니다. 갱신 실패는 쓰기 결과를 바꾸지 않습니다.
    async fn publish_entries(&self) {
        if let Err(e) = self.refresh_entries().await {
            tracing::error!(error = %e, "Failed to publish session snapshot");
        }
    }

    async fn refresh_entries(&self) -> Result<(), AppError> {
        let _guard = self.inner.entries.refresh_lock.lock().await;
        let entries = db::list_entries(&self.inner.pool).await?;
        tracing::trace!(
            entries = entries.len(),
            subscribers = self.inner.entries.feed.subscriber_count(),
            "Publishing session snapshot"
        );
        self.inner.entries.feed.publish(entries);
        Ok(())
    }

    // ── 템플릿 컬렉션 ──

    /// 템플릿을 생성합니다. `created_at`과 `updated_at`은 같은 서버 시각입니다.
    pub async fn create_template(
        &self,
        name: &str,
        entries: &[String],
    ) -> Result<Template, AppError> {
        let id = uuid::Uuid::now_v7().to_string();
        let timestamp = self.inner.clock.stamp();
        let template =
            db::insert_template(&self.inner.pool, &id, name, entries, &timestamp).await?;
        self.publish_templates().await;
        Ok(template)
    }

    pub async fn get_template(&self, id: &str) -> Result<Option<Template>, AppError> {
        db::get_template(&self.inner.pool, id).await
    }

    /// 컬렉션의 모든 템플릿 ID (호출 시점 스냅샷)
    pub async fn list_template_ids(&self) -> Result<Vec<String>, AppError> {
        db::list_template_ids(&self.inner.pool).await
    }

    pub async fn list_templates(&self) -> Result<Vec<Template>, AppError> {
        db::list_templates(&self.inner.pool).await
    }

    pub async fn delete_template(&self, id: &str) -> Result<bool, AppError> {
        let deleted = db::delete_template(&self.inner.pool, id).await?;
        if deleted {
            self.publish_templates().await;
        }
        Ok(deleted)
    }

    /// `updated_at DESC` 순 템플릿 목록 구독
    pub fn subscribe_templates(&self) -> Subscription<Template> {
        self.inner.templates.feed.subscribe()
    }

    async fn publish_templates(&self) {
        if let Err(e) = self.refresh_templates().await {
            tracing::error!(error = %e, "Failed to publish template snapshot");
        }
    }

    async fn refresh_templates(&self) -> Result<(), AppError> {
        let _guard = self.inner.templates.refresh_lock.lock().await;
        let templates = db::list_templates(&self.inner.pool).await?;
        tracing::trace!(
            templates = templates.len(),
            subscribers = self.inner.templates.feed.subscriber_count(),
            "Publishing template snapshot"
        );
        self.inner.templates.feed.publish(templates);
        Ok(())
    }
}

/// 테스트용: 마이그레이션된 인메모리 DB 위의 저장소
#[cfg(test)]
pub async fn test_store() -> DocumentStore {
    DocumentStore::open(db::test_pool().await)
        .await
        .expect("store should open on a fresh database")
}
