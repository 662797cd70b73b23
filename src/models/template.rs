//! # 템플릿 모델 정의
//!
//! 템플릿은 이름이 붙은 운동 항목 목록입니다.
//! 저장 시점의 세션 텍스트를 한 번 복사해 두었다가,
//! 나중에 세션을 통째로 다시 채우는 데 사용합니다.
//!
//! ## 구조체 역할
//! - `Template`: API 응답용 (entries는 `Vec<String>`)
//! - `TemplateRow`: DB 행 그대로 (entries는 JSON 문자열)
//! - `SaveTemplateRequest`, `ConfirmParams`: 요청 본문/쿼리
//! - `SaveOutcome`, `LoadOutcome`, `LoadPhase`: 저장/불러오기 흐름의 결과와 상태

use crate::models::{Notice, SessionEntry};
use serde::{Deserialize, Serialize};

/// 템플릿 엔티티
///
/// 이 시스템은 템플릿을 제자리에서 수정하지 않으므로
/// `created_at`과 `updated_at`은 생성 시 같은 서버 시각으로 채워집니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// 저장 시점의 세션 순서를 유지한 운동 이름 목록 (빈 항목 없음)
    pub entries: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// `templates` 테이블 한 행
///
/// SQLite에는 배열 타입이 없으므로 entries를 JSON 텍스트로 저장합니다.
#[derive(Debug, sqlx::FromRow)]
pub struct TemplateRow {
    pub id: String,
    pub name: String,
    pub entries: String,
    pub created_at: String,
    pub updated_at: String,
}

// TryFrom: 실패할 수 있는 변환. JSON이 깨져 있으면 serde_json 에러를 돌려줍니다.
impl TryFrom<TemplateRow> for Template {
    type Error = serde_json::Error;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entries: serde_json::from_str(&row.entries)?,
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl Template {
    /// 목록 화면의 "N entries" 표시용
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// 템플릿 저장 요청: `POST /api/v1/templates`의 요청 본문
///
/// 항목은 보내지 않습니다. 서버가 현재 세션을 스냅샷으로 떠서 저장합니다.
#[derive(Debug, Deserialize)]
pub struct SaveTemplateRequest {
    pub name: String,
}

/// 파괴적 삭제에 붙는 확인 플래그 (`?confirm=true`)
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

/// `save()`의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(Template),
    /// 이름이 비어 있어 아무 일도 하지 않음
    Skipped,
    /// 저장할 항목이 없음 (사용자 안내)
    Notice(Notice),
}

/// `load()`의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 세션을 비운 뒤 새로 만든 엔트리들 (생성 순서)
    Loaded(Vec<SessionEntry>),
    /// 템플릿이 없음 (사용자 안내). 세션은 건드리지 않습니다.
    Notice(Notice),
}

/// 템플릿 불러오기 진행 단계
///
/// ```text
/// Idle → Clearing → Repopulating → Idle
/// ```
/// 중간에 쓰기가 실패해도 별도의 에러 상태는 없고 Idle로 돌아갑니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    Clearing,
    Repopulating,
}
