//! # 실시간 구독 SSE 변환
//!
//! 저장소 피드의 `Subscription`을 Server-Sent Events 응답으로 바꿉니다.
//!
//! ```text
//! event: snapshot
//! data: [ ...정렬된 전체 목록... ]
//! ```
//!
//! 연결 직후 현재 목록을 한 번 보내고, 이후 컬렉션이 바뀔 때마다 전체 목록을 다시 보냅니다.
//! 클라이언트가 연결을 끊으면 스트림이 drop되면서 구독도 해제됩니다.

use crate::store::Subscription;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;

pub fn snapshot_events<T>(
    subscription: Subscription<T>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
    T: Serialize + Send + Sync + 'static,
{
    let events = subscription.into_stream().map(|snapshot| {
        let event = Event::default()
            .event("snapshot")
            .json_data(&*snapshot)
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to encode snapshot event");
                Event::default()
                    .event("error")
                    .data(r#"{"error": "snapshot encoding failed"}"#)
            });
        Ok(event)
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
