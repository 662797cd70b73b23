//! # 세션 엔트리 모델 정의
//!
//! 현재 진행 중인 운동 세션에 기록된 항목(예: "Bench Press") 하나를 표현합니다.
//!
//! ## 엔트리 라이프사이클
//! ```text
//! [추가] add() → 저장소가 id/created_at 부여 → delete() 또는 clear() → [삭제]
//! ```

use serde::{Deserialize, Serialize};

/// 세션 엔트리 엔티티: DB의 `session_entries` 테이블 한 행에 대응합니다.
///
/// `id`와 `created_at`은 클라이언트가 아니라 저장소가 채웁니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionEntry {
    /// 엔트리 고유 식별자 (UUIDv7)
    pub id: String,
    /// 공백이 제거된, 비어 있지 않은 운동 이름
    pub text: String,
    /// 서버 타임스탬프 (RFC 3339, 마이크로초, UTC)
    pub created_at: String,
}

/// 엔트리 추가 요청: `POST /api/v1/session/entries`의 요청 본문
#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    /// 입력창의 초안(draft) 텍스트. 앞뒤 공백은 서버에서 제거합니다.
    pub text: String,
}

/// `add()`의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// 새 엔트리가 저장됨 → 클라이언트는 입력창을 비웁니다
    Added(SessionEntry),
    /// 초안이 비어 있어 아무것도 쓰지 않음 → 입력창은 그대로 둡니다
    Skipped,
}

/// 앞뒤 공백을 제거하고, 남는 글자가 없으면 `None`을 반환합니다.
///
/// 세션 엔트리와 템플릿 이름/항목 모두 같은 규칙으로 검사합니다.
pub fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
