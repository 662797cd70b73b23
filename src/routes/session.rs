//! # 세션 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/session | `get_session` | 현재 엔트리 목록 |
//! | POST | /api/v1/session/entries | `add_entry` | 초안을 엔트리로 추가 |
//! | DELETE | /api/v1/session/entries | `clear_session` | 세션 전체 비우기 |
//! | DELETE | /api/v1/session/entries/{id} | `delete_entry` | 엔트리 하나 완료(삭제) |
//! | GET | /api/v1/session/stream | `session_stream` | 실시간 구독 (SSE) |

use crate::{
    error::AppError,
    models::{AddEntryRequest, AddOutcome},
    routes::{stream::snapshot_events, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// `GET /session` → `{ "entries": [...], "can_save_template": bool }`
///
/// 최신 엔트리가 먼저 옵니다.
pub async fn get_session(State(state): State<AppState>) -> Json<Value> {
    let entries = state.session.entries();
    Json(json!({
        "entries": &*entries,
        "can_save_template": state.session.can_save_template(),
    }))
}

/// `POST /session/entries` + `{ "text": "..." }`
///
/// - 저장됨 → `201 { "status": "added", "entry": {...} }` (클라이언트는 입력창을 비움)
/// - 공백 초안 → `200 { "status": "skipped" }` (입력창 유지)
pub async fn add_entry(
    State(state): State<AppState>,
    Json(req): Json<AddEntryRequest>,
) -> Result<Response, AppError> {
    let response = match state.session.add(&req.text).await? {
        AddOutcome::Added(entry) => (
            StatusCode::CREATED,
            Json(json!({ "status": "added", "entry": entry })),
        )
            .into_response(),
        AddOutcome::Skipped => Json(json!({ "status": "skipped" })).into_response(),
    };
    Ok(response)
}

/// `DELETE /session/entries/{id}` → `204 No Content`
///
/// 이미 사라진 엔트리여도 204입니다. 목록은 구독으로 다시 전달됩니다.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.session.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /session/entries` → `{ "deleted": n }`
pub async fn clear_session(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let deleted = state.session.clear().await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// `GET /session/stream`: 엔트리 목록 SSE
pub async fn session_stream(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_events(state.session.subscribe())
}
