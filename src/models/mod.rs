//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `entry`: 세션 엔트리와 추가 요청/결과
//! - `template`: 템플릿, 저장/불러오기 결과, 불러오기 단계
//! - `notice`: 사용자에게 보여주는 안내 메시지
//!
//! `pub use X::*;`로 재공개하므로 `crate::models::Template`처럼 짧게 쓸 수 있습니다.

pub mod entry;
pub mod notice;
pub mod template;

pub use entry::*;
pub use notice::*;
pub use template::*;
