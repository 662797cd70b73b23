//! # 사용자 안내(Notice)
//!
//! 백엔드 실패는 로그로만 남기지만, 아래 두 경우는 의도적으로 사용자에게 알립니다.
//! - 저장할 항목이 없는 템플릿 저장 시도
//! - 이미 삭제된 템플릿 불러오기 시도

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NothingToSave,
    TemplateNotFound,
}

impl Notice {
    /// 클라이언트가 분기할 때 쓰는 고정 코드
    pub fn code(self) -> &'static str {
        match self {
            Notice::NothingToSave => "nothing_to_save",
            Notice::TemplateNotFound => "template_not_found",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Notice::NothingToSave => "Nothing to save",
            Notice::TemplateNotFound => "Template not found",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::NothingToSave => "Add at least one entry before saving a template.",
            Notice::TemplateNotFound => "It may have been deleted.",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            Notice::NothingToSave => StatusCode::UNPROCESSABLE_ENTITY,
            Notice::TemplateNotFound => StatusCode::NOT_FOUND,
        }
    }
}

// 결과: { "notice": { "code": "...", "title": "...", "message": "..." } }
impl IntoResponse for Notice {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "notice": {
                "code": self.code(),
                "title": self.title(),
                "message": self.message(),
            }
        }));
        (self.status(), body).into_response()
    }
}
