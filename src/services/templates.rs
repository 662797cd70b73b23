//! # 템플릿 서비스
//!
//! 템플릿 저장, 불러오기, 삭제를 담당합니다.
//!
//! ## 불러오기(load) 흐름
//! ```text
//! Idle → Clearing (세션 전체 삭제) → Repopulating (항목을 하나씩 순서대로 생성) → Idle
//! ```
//! 원자적이지도, 멱등적이지도 않습니다. 중간에 실패하면 세션은 일부만 채워진 채 남고,
//! 단계는 별도의 에러 상태 없이 Idle로 돌아갑니다(실패는 로그로만 남김).
//! 세션 비우기가 일부 실패해도 불러오기는 멈추지 않고 재구성 단계로 넘어갑니다.
//!
//! 불러오기는 한 번에 하나씩만 실행됩니다(`load_lock`). 단계 채널은 항상
//! 진행 중인 불러오기 하나의 단계를 나타냅니다.
//!
//! 재구성은 한 번에 하나씩 기다리며 쓰기 때문에, 템플릿의 항목 순서가 곧 생성 순서가 됩니다.

use crate::error::AppError;
use crate::models::{non_blank, LoadOutcome, LoadPhase, Notice, SaveOutcome, Template};
use crate::services::{delete_concurrently, SessionService};
use crate::store::{DocumentStore, Subscription};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

#[derive(Debug, Clone)]
pub struct TemplateService {
    store: DocumentStore,
    session: SessionService,
    phase: Arc<watch::Sender<LoadPhase>>,
    load_lock: Arc<Mutex<()>>,
}

/// 불러오기 단계를 설정하고, 스코프를 벗어나면(성공/실패 모두) Idle로 되돌립니다.
struct PhaseGuard<'a> {
    phase: &'a watch::Sender<LoadPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a watch::Sender<LoadPhase>, initial: LoadPhase) -> Self {
        phase.send_replace(initial);
        Self { phase }
    }

    fn advance(&self, next: LoadPhase) {
        self.phase.send_replace(next);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(LoadPhase::Idle);
    }
}

impl TemplateService {
    pub fn new(store: DocumentStore, session: SessionService) -> Self {
        let (phase, _rx) = watch::channel(LoadPhase::Idle);
        Self {
            store,
            session,
            phase: Arc::new(phase),
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn load_phase(&self) -> LoadPhase {
        *self.phase.borrow()
    }

    #[cfg(test)]
    pub fn subscribe_load_phase(&self) -> watch::Receiver<LoadPhase> {
        self.phase.subscribe()
    }

    /// 클라이언트용 새 구독 (최근 수정순)
    pub fn subscribe(&self) -> Subscription<Template> {
        self.store.subscribe_templates()
    }

    pub async fn list(&self) -> Result<Vec<Template>, AppError> {
        self.store
            .list_templates()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to list templates"))
    }

    pub async fn get(&self, template_id: &str) -> Result<Option<Template>, AppError> {
        self.store
            .get_template(template_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, template_id, "Failed to fetch template"))
    }

    /// `source`의 텍스트로 새 템플릿을 만듭니다.
    ///
    /// - 이름이 비어 있으면 `Skipped`
    /// - 공백 항목을 걸러낸 뒤 남는 것이 없으면 `Notice(NothingToSave)`
    /// - 그 외에는 순서를 유지한 목록으로 템플릿 하나를 생성
    pub async fn save(&self, name: &str, source: &[String]) -> Result<SaveOutcome, AppError> {
        let Some(name) = non_blank(name) else {
            tracing::debug!("Ignoring template save with blank name");
            return Ok(SaveOutcome::Skipped);
        };

        let entries: Vec<String> = source
            .iter()
            .filter_map(|text| non_blank(text))
            .map(str::to_string)
            .collect();

        if entries.is_empty() {
            tracing::info!(name, "Refusing to save empty template");
            return Ok(SaveOutcome::Notice(Notice::NothingToSave));
        }

        let template = self
            .store
            .create_template(name, &entries)
            .await
            .inspect_err(|e| tracing::error!(error = %e, name, "Failed to save template"))?;

        tracing::info!(
            template_id = %template.id,
            entries = template.entry_count(),
            "Template saved"
        );
        Ok(SaveOutcome::Saved(template))
    }

    /// 현재 세션(화면 표시 순서)을 스냅샷으로 떠서 저장합니다.
    pub async fn save_from_session(&self, name: &str) -> Result<SaveOutcome, AppError> {
        let source = self.session.entry_texts();
        self.save(name, &source).await
    }

    /// 템플릿으로 세션을 다시 채웁니다.
    ///
    /// 템플릿이 없으면 세션을 건드리지 않고 `Notice(TemplateNotFound)`를 반환합니다.
    pub async fn load(&self, template_id: &str) -> Result<LoadOutcome, AppError> {
        let _running = self.load_lock.lock().await;
        let Some(template) = self
            .store
            .get_template(template_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, template_id, "Failed to load template"))?
        else {
            tracing::info!(template_id, "Template to load no longer exists");
            return Ok(LoadOutcome::Notice(Notice::TemplateNotFound));
        };

        let guard = PhaseGuard::enter(&self.phase, LoadPhase::Clearing);
        // 지우지 못한 엔트리는 남긴 채 재구성으로 넘어갑니다.
        if let Err(e) = self.session.clear().await {
            tracing::error!(error = %e, template_id, "Failed to clear session");
        }

        guard.advance(LoadPhase::Repopulating);
        let mut created = Vec::with_capacity(template.entries.len());
        for text in template.entries.iter().filter_map(|t| non_blank(t)) {
            let entry = self.store.create_entry(text).await.inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    template_id,
                    created = created.len(),
                    "Failed to load template"
                )
            })?;
            created.push(entry);
        }

        tracing::info!(template_id, entries = created.len(), "Template loaded into session");
        Ok(LoadOutcome::Loaded(created))
    }

    /// 템플릿 하나를 삭제합니다. 사용자 확인은 호출하는 쪽(라우트)이 보장합니다.
    pub async fn delete_one(&self, template_id: &str) -> Result<bool, AppError> {
        self.store
            .delete_template(template_id)
            .await
            .inspect_err(|e| tracing::error!(error = %e, template_id, "Failed to delete template"))
    }

    /// 지금 컬렉션에 있는 모든 템플릿을 동시에 삭제합니다.
    ///
    /// 목록 조회가 끝난 시점의 스냅샷만 지웁니다. 그 뒤에 추가된 템플릿은 남습니다.
    pub async fn delete_all(&self) -> Result<usize, AppError> {
        let ids = self
            .store
            .list_template_ids()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to clear templates"))?;
        self.delete_listed(ids).await
    }

    /// 이미 조회해 둔 ID 목록만 동시에 삭제합니다.
    async fn delete_listed(&self, ids: Vec<String>) -> Result<usize, AppError> {
        let store = self.store.clone();

        let deleted = delete_concurrently(ids, move |id| {
            let store = store.clone();
            async move { store.delete_template(&id).await }
        })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to clear templates"))?;

        tracing::info!(deleted, "All templates deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AddOutcome;
    use crate::store::test_store;
    use std::collections::HashSet;

    async fn services() -> (SessionService, TemplateService) {
        let store = test_store().await;
        let session = SessionService::new(store.clone());
        let templates = TemplateService::new(store, session.clone());
        (session, templates)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn save_filters_blanks_and_keeps_order() {
        let (_, templates) = services().await;
        let outcome = templates
            .save("Leg Day", &strings(&["Squat", "  ", "Lunge"]))
            .await
            .unwrap();

        let SaveOutcome::Saved(template) = outcome else {
            panic!("expected template to be saved");
        };
        assert_eq!(template.name, "Leg Day");
        assert_eq!(template.entries, vec!["Squat", "Lunge"]);
        assert_eq!(templates.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_with_only_blank_entries_produces_notice() {
        let (_, templates) = services().await;
        let outcome = templates
            .save("Rest Day", &strings(&["", "   ", "\t"]))
            .await
            .unwrap();

        assert_eq!(outcome, SaveOutcome::Notice(Notice::NothingToSave));
        assert!(templates.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_with_blank_name_is_skipped() {
        let (_, templates) = services().await;
        let outcome = templates.save("   ", &strings(&["Squat"])).await.unwrap();

        assert_eq!(outcome, SaveOutcome::Skipped);
        assert!(templates.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_from_session_uses_display_order() {
        let (session, templates) = services().await;
        session.add("Bench Press").await.unwrap();
        session.add("Incline Press").await.unwrap();

        let SaveOutcome::Saved(template) = templates.save_from_session(" Push ").await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        assert_eq!(template.name, "Push");
        assert_eq!(template.entries, vec!["Incline Press", "Bench Press"]);
    }

    #[tokio::test]
    async fn load_missing_template_leaves_session_untouched() {
        let (session, templates) = services().await;
        session.add("X").await.unwrap();
        let before = session.entries();

        let outcome = templates.load("does-not-exist").await.unwrap();

        assert_eq!(outcome, LoadOutcome::Notice(Notice::TemplateNotFound));
        assert_eq!(session.entries(), before);
        assert_eq!(templates.load_phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn load_replaces_session_with_template_entries() {
        let (session, templates) = services().await;
        let SaveOutcome::Saved(template) = templates
            .save("ABC", &strings(&["A", "B", "C"]))
            .await
            .unwrap()
        else {
            panic!("expected template to be saved");
        };
        session.add("X").await.unwrap();

        let LoadOutcome::Loaded(created) = templates.load(&template.id).await.unwrap() else {
            panic!("expected template to load");
        };

        let texts: HashSet<_> = session.entry_texts().into_iter().collect();
        assert_eq!(texts, HashSet::from(["A".to_string(), "B".to_string(), "C".to_string()]));

        // 생성 순서 = 템플릿 순서, 타임스탬프는 모두 다름
        let created_texts: Vec<_> = created.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(created_texts, vec!["A", "B", "C"]);
        let stamps: HashSet<_> = created.iter().map(|e| e.created_at.clone()).collect();
        assert_eq!(stamps.len(), 3);
        assert!(created[0].created_at < created[1].created_at);
        assert!(created[1].created_at < created[2].created_at);
        assert_eq!(templates.load_phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn load_skips_blank_stored_entries() {
        let (session, templates) = services().await;
        let template = templates
            .store
            .create_template("Raw", &strings(&["A", "  ", "B"]))
            .await
            .unwrap();

        let LoadOutcome::Loaded(created) = templates.load(&template.id).await.unwrap() else {
            panic!("expected template to load");
        };
        assert_eq!(created.len(), 2);
        assert_eq!(session.entries().len(), 2);
    }

    #[tokio::test]
    async fn failed_repopulation_leaves_partial_session_and_returns_to_idle() {
        let (session, templates) = services().await;
        let SaveOutcome::Saved(template) = templates
            .save("Mixed", &strings(&["A", "Boom", "C"]))
            .await
            .unwrap()
        else {
            panic!("expected template to be saved");
        };
        assert!(matches!(session.add("X").await.unwrap(), AddOutcome::Added(_)));

        sqlx::query(
            r#"
            CREATE TRIGGER refuse_boom BEFORE INSERT ON session_entries
            WHEN NEW.text = 'Boom'
            BEGIN SELECT RAISE(ABORT, 'refused'); END;
            "#,
        )
        .execute(templates.store.pool())
        .await
        .unwrap();

        let mut phases = templates.subscribe_load_phase();
        assert!(templates.load(&template.id).await.is_err());

        assert_eq!(session.entry_texts(), vec!["A"]);
        assert_eq!(templates.load_phase(), LoadPhase::Idle);
        assert!(phases.has_changed().unwrap());
        assert_eq!(*phases.borrow_and_update(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn load_keeps_going_when_an_entry_cannot_be_cleared() {
        let (session, templates) = services().await;
        let SaveOutcome::Saved(template) = templates.save("AB", &strings(&["A", "B"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        session.add("Stuck").await.unwrap();

        sqlx::query(
            r#"
            CREATE TRIGGER refuse_stuck BEFORE DELETE ON session_entries
            WHEN OLD.text = 'Stuck'
            BEGIN SELECT RAISE(ABORT, 'refused'); END;
            "#,
        )
        .execute(templates.store.pool())
        .await
        .unwrap();

        let LoadOutcome::Loaded(created) = templates.load(&template.id).await.unwrap() else {
            panic!("expected template to load");
        };

        assert_eq!(created.len(), 2);
        assert_eq!(session.entry_texts(), vec!["B", "A", "Stuck"]);
        assert_eq!(templates.load_phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn concurrent_loads_run_one_after_another() {
        let (session, templates) = services().await;
        let SaveOutcome::Saved(ab) = templates.save("AB", &strings(&["A", "B"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        let SaveOutcome::Saved(cd) = templates.save("CD", &strings(&["C", "D"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        session.add("X").await.unwrap();

        let (first, second) = tokio::join!(templates.load(&ab.id), templates.load(&cd.id));
        assert!(matches!(first.unwrap(), LoadOutcome::Loaded(_)));
        assert!(matches!(second.unwrap(), LoadOutcome::Loaded(_)));

        // 겹쳐 실행됐다면 두 템플릿의 항목이 섞여 남습니다.
        let texts: HashSet<_> = session.entry_texts().into_iter().collect();
        let only_ab: HashSet<_> = strings(&["A", "B"]).into_iter().collect();
        let only_cd: HashSet<_> = strings(&["C", "D"]).into_iter().collect();
        assert!(texts == only_ab || texts == only_cd, "mixed session: {texts:?}");
        assert_eq!(templates.load_phase(), LoadPhase::Idle);
    }

    #[tokio::test]
    async fn delete_one_removes_only_that_template() {
        let (_, templates) = services().await;
        let SaveOutcome::Saved(keep) = templates.save("Keep", &strings(&["A"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        let SaveOutcome::Saved(doomed) = templates.save("Drop", &strings(&["B"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };

        assert!(templates.delete_one(&doomed.id).await.unwrap());
        assert!(!templates.delete_one(&doomed.id).await.unwrap());
        assert_eq!(templates.list().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn delete_all_removes_the_listed_snapshot() {
        let (_, templates) = services().await;
        for name in ["One", "Two", "Three"] {
            templates.save(name, &strings(&["A"])).await.unwrap();
        }

        assert_eq!(templates.delete_all().await.unwrap(), 3);
        assert!(templates.list().await.unwrap().is_empty());
        assert!(templates.subscribe().current().is_empty());

        templates.save("Later", &strings(&["B"])).await.unwrap();
        assert_eq!(templates.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn templates_added_after_listing_survive_delete_all() {
        let (_, templates) = services().await;
        for name in ["One", "Two"] {
            templates.save(name, &strings(&["A"])).await.unwrap();
        }
        let listed = templates.store.list_template_ids().await.unwrap();

        // 목록 조회와 삭제 사이에 다른 클라이언트가 저장한 템플릿
        let SaveOutcome::Saved(late) = templates.save("Late", &strings(&["B"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };

        assert_eq!(templates.delete_listed(listed).await.unwrap(), 2);
        assert_eq!(templates.list().await.unwrap(), vec![late.clone()]);
        assert_eq!(*templates.subscribe().current(), vec![late]);
    }

    #[tokio::test]
    async fn loaded_template_is_not_referenced_afterwards() {
        let (session, templates) = services().await;
        let SaveOutcome::Saved(template) = templates.save("Once", &strings(&["A"])).await.unwrap()
        else {
            panic!("expected template to be saved");
        };
        templates.load(&template.id).await.unwrap();

        templates.delete_one(&template.id).await.unwrap();
        assert_eq!(session.entry_texts(), vec!["A"]);
    }
}
