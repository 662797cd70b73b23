//! # 세션 서비스
//!
//! 현재 운동 세션의 엔트리를 다룹니다.
//!
//! 서비스는 생성 시점부터 엔트리 피드를 구독하고 있으며,
//! 그 구독의 최신 스냅샷이 "로컬 상태"입니다. `clear()`는 저장소를 다시 조회하지 않고
//! 이 로컬 상태에 있는 엔트리들을 지웁니다.

use crate::error::AppError;
use crate::models::{non_blank, AddOutcome, SessionEntry};
use crate::services::delete_concurrently;
use crate::store::{DocumentStore, Snapshot, Subscription};

#[derive(Debug, Clone)]
pub struct SessionService {
    store: DocumentStore,
    local: Subscription<SessionEntry>,
}

impl SessionService {
    pub fn new(store: DocumentStore) -> Self {
        let local = store.subscribe_entries();
        Self { store, local }
    }

    /// 로컬 상태 (최신순 전체 목록)
    pub fn entries(&self) -> Snapshot<SessionEntry> {
        self.local.current()
    }

    /// 화면에 보이는 순서 그대로의 엔트리 텍스트
    pub fn entry_texts(&self) -> Vec<String> {
        self.entries().iter().map(|e| e.text.clone()).collect()
    }

    /// "Save template" 버튼 활성화 여부
    pub fn can_save_template(&self) -> bool {
        !self.entries().is_empty()
    }

    /// 클라이언트용 새 구독
    pub fn subscribe(&self) -> Subscription<SessionEntry> {
        self.store.subscribe_entries()
    }

    /// 초안을 엔트리로 추가합니다.
    ///
    /// 공백뿐인 초안이면 아무것도 쓰지 않고 `Skipped`를 돌려줍니다.
    pub async fn add(&self, draft: &str) -> Result<AddOutcome, AppError> {
        let Some(text) = non_blank(draft) else {
            tracing::debug!("Ignoring blank session entry draft");
            return Ok(AddOutcome::Skipped);
        };

        let entry = self
            .store
            .create_entry(text)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to add entry"))?;

        tracing::info!(entry_id = %entry.id, "Session entry added");
        Ok(AddOutcome::Added(entry))
    }

    pub async fn delete(&self, entry_id: &str) -> Result<bool, AppError> {
        self.store
            .delete_entry(entry_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, entry_id, "Failed to delete entry"))
    }

    /// 로컬 상태에 있는 모든 엔트리를 동시에 지웁니다.
    ///
    /// 하나의 원자적 배치가 아닙니다. 중간에 실패하면 일부만 지워진 채로 남습니다.
    pub async fn clear(&self) -> Result<usize, AppError> {
        let ids: Vec<String> = self.entries().iter().map(|e| e.id.clone()).collect();
        let total = ids.len();
        let store = self.store.clone();

        let deleted = delete_concurrently(ids, move |id| {
            let store = store.clone();
            async move { store.delete_entry(&id).await }
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to clear session"))?;

        tracing::info!(deleted, total, "Session cleared");
        Ok(deleted)
    }
}
