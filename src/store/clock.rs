//! # 서버 타임스탬프
//!
//! 문서의 `created_at`/`updated_at`은 클라이언트 시계가 아니라 저장소가 쓰는 시점에 정합니다.
//! 마이크로초 단위로 엄격하게 증가하므로, 연달아 쓴 두 문서가 같은 시각을 받는 일이 없습니다.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// 단조 증가하는 서버 시계
#[derive(Debug, Default)]
pub struct ServerClock {
    /// 마지막으로 발급한 시각 (Unix epoch 기준 마이크로초)
    last_micros: AtomicI64,
}

impl ServerClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 다음 타임스탬프를 발급합니다.
    ///
    /// 벽시계가 직전 값보다 크지 않으면(같은 마이크로초, 시계 역행) 직전 값 + 1µs를 씁니다.
    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        // fetch_update: 다른 스레드와 경쟁해도 CAS 루프로 유일한 값을 얻습니다
        let previous = self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let issued = wall.max(previous + 1);

        DateTime::<Utc>::from_timestamp_micros(issued).unwrap_or_else(Utc::now)
    }

    /// 저장용 문자열 형식. 고정 폭이므로 문자열 정렬이 곧 시간 정렬입니다.
    ///
    /// 예: `2026-10-16T08:46:00.123456Z`
    pub fn stamp(&self) -> String {
        format_timestamp(self.now())
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
