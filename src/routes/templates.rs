//! # 템플릿 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/templates | `list_templates` | 템플릿 목록 (최근 수정순) |
//! | POST | /api/v1/templates | `save_template` | 현재 세션을 템플릿으로 저장 |
//! | DELETE | /api/v1/templates?confirm=true | `delete_all_templates` | 전체 삭제 |
//! | GET | /api/v1/templates/{id} | `get_template` | 템플릿 상세 |
//! | DELETE | /api/v1/templates/{id}?confirm=true | `delete_template` | 템플릿 삭제 |
//! | POST | /api/v1/templates/{id}/load | `load_template` | 세션을 템플릿으로 다시 채우기 |
//! | GET | /api/v1/templates/stream | `templates_stream` | 실시간 구독 (SSE) |
//! | GET | /api/v1/templates/load-status | `load_status` | 불러오기 진행 단계 |
//!
//! ## 확인(confirm) 플래그
//! 삭제는 되돌릴 수 없으므로, 클라이언트는 사용자 확인을 받은 뒤에만
//! `confirm=true`를 붙여 요청합니다. 플래그가 없으면 `428`을 반환합니다.

use crate::{
    error::AppError,
    models::{ConfirmParams, LoadOutcome, SaveOutcome, SaveTemplateRequest, Template},
    routes::{stream::snapshot_events, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// `GET /templates` → `{ "templates": [...] }`
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let templates = state.templates.list().await?;
    Ok(Json(json!({ "templates": templates })))
}

/// `POST /templates` + `{ "name": "Leg Day" }`
///
/// - 저장됨 → `201 { "status": "saved", "template": {...} }`
/// - 이름이 비어 있음 → `200 { "status": "skipped" }`
/// - 세션이 비어 있음 → `422` + "Nothing to save" 안내
pub async fn save_template(
    State(state): State<AppState>,
    Json(req): Json<SaveTemplateRequest>,
) -> Result<Response, AppError> {
    let response = match state.templates.save_from_session(&req.name).await? {
        SaveOutcome::Saved(template) => (
            StatusCode::CREATED,
            Json(json!({ "status": "saved", "template": template })),
        )
            .into_response(),
        SaveOutcome::Skipped => Json(json!({ "status": "skipped" })).into_response(),
        SaveOutcome::Notice(notice) => notice.into_response(),
    };
    Ok(response)
}

/// `GET /templates/{id}`: 템플릿 상세
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Template>, AppError> {
    let template = state.templates.get(&id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(template))
}

/// `POST /templates/{id}/load`
///
/// - 성공 → `200 { "status": "loaded", "entries": [...] }` (생성 순서)
/// - 템플릿 없음 → `404` + "Template not found" 안내
pub async fn load_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let response = match state.templates.load(&id).await? {
        LoadOutcome::Loaded(entries) => {
            Json(json!({ "status": "loaded", "entries": entries })).into_response()
        }
        LoadOutcome::Notice(notice) => notice.into_response(),
    };
    Ok(response)
}

/// `DELETE /templates/{id}?confirm=true` → `204 No Content`
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ConfirmParams>,
) -> Result<StatusCode, AppError> {
    if !params.confirm {
        return Err(AppError::ConfirmationRequired(
            "Delete template? This cannot be undone.".to_string(),
        ));
    }
    state.templates.delete_one(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /templates?confirm=true` → `{ "deleted": n }`
pub async fn delete_all_templates(
    State(state): State<AppState>,
    Query(params): Query<ConfirmParams>,
) -> Result<Json<Value>, AppError> {
    if !params.confirm {
        return Err(AppError::ConfirmationRequired(
            "Delete ALL templates? This cannot be undone.".to_string(),
        ));
    }
    let deleted = state.templates.delete_all().await?;
    Ok(Json(json!({ "deleted": deleted })))
}

/// `GET /templates/stream`: 템플릿 목록 SSE
pub async fn templates_stream(State(state): State<AppState>) -> impl IntoResponse {
    snapshot_events(state.templates.subscribe())
}

/// `GET /templates/load-status` → `{ "phase": "idle" | "clearing" | "repopulating" }`
pub async fn load_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "phase": state.templates.load_phase() }))
}
