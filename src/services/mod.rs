//! # 서비스(비즈니스 로직) 모듈
//!
//! 라우트 핸들러와 저장소 사이에서 세션/템플릿 작업 흐름을 구현합니다.
//! - `session`: 엔트리 추가/삭제/전체 비우기
//! - `templates`: 템플릿 저장/불러오기/삭제/전체 삭제

pub mod session;
pub mod templates;

pub use session::SessionService;
pub use templates::TemplateService;

use crate::error::AppError;
use futures::future::try_join_all;
use std::future::Future;

/// ID마다 독립적인 삭제 작업을 동시에 띄우고 모두 끝나기를 기다립니다.
///
/// 하나라도 실패하면 그 에러로 즉시 반환합니다. 이미 성공한 삭제는 되돌리지 않고,
/// 아직 진행 중인 작업도 취소하지 않습니다(각각 별도 태스크로 끝까지 실행).
///
/// 반환값은 실제로 지워진 문서 수입니다.
pub(crate) async fn delete_concurrently<F, Fut>(
    ids: Vec<String>,
    delete: F,
) -> Result<usize, AppError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>> + Send + 'static,
{
    let tasks = ids.into_iter().map(|id| {
        let handle = tokio::spawn(delete(id));
        async move {
            handle
                .await
                .map_err(|e| AppError::Internal(format!("delete task failed: {e}")))?
        }
    });

    let results = try_join_all(tasks).await?;
    Ok(results.into_iter().filter(|deleted| *deleted).count())
}
