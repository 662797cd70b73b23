//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 라우터 구성을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인
//! - `session`: 세션 엔트리 핸들러
//! - `templates`: 템플릿 핸들러
//! - `stream`: 실시간 구독을 SSE로 바꾸는 도우미

pub mod health;
pub mod session;
pub mod stream;
pub mod templates;

pub use health::*;
pub use session::*;
pub use templates::*;

use crate::services::{SessionService, TemplateService};
use crate::store::DocumentStore;
use axum::{
    routing::{delete, get, post},
    Router,
};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 두 서비스 모두 내부가 Arc라서 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionService,
    pub templates: TemplateService,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        let session = SessionService::new(store.clone());
        let templates = TemplateService::new(store, session.clone());
        Self { session, templates }
    }
}

/// `/api/v1` 아래에 붙일 API 라우터를 만듭니다.
///
/// 경로 파라미터는 axum 0.8 문법(`{id}`)을 씁니다.
/// `/templates/stream` 같은 고정 경로가 `/templates/{id}`보다 우선합니다.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/session", get(get_session))
        .route("/session/entries", post(add_entry).delete(clear_session))
        .route("/session/entries/{id}", delete(delete_entry))
        .route("/session/stream", get(session_stream))
        .route("/templates", get(list_templates).post(save_template).delete(delete_all_templates))
        .route("/templates/stream", get(templates_stream))
        .route("/templates/load-status", get(load_status))
        .route("/templates/{id}", get(get_template).delete(delete_template))
        .route("/templates/{id}/load", post(load_template))
        .route("/health", get(health_check))
        .with_state(state)
}
