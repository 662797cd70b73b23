//! # 실시간 피드 (Realtime Feed)
//!
//! 컬렉션이 바뀔 때마다 **정렬된 전체 목록**을 구독자에게 다시 보내는 구조입니다.
//! 부분 패치(patch)는 없습니다. 구독자는 매번 받은 목록으로 로컬 상태를 통째로 교체합니다.
//!
//! ```text
//! Feed::publish(전체 목록) ──watch──▶ Subscription::changed() / into_stream()
//! ```
//!
//! `tokio::sync::watch`는 "항상 최신 값 하나"만 보관하므로,
//! 느린 구독자는 중간 스냅샷을 건너뛰고 최신 스냅샷만 받습니다.

use futures::stream::{self, Stream};
use std::sync::Arc;
use tokio::sync::watch;

/// 스냅샷 하나. 여러 구독자가 복사 없이 공유합니다.
pub type Snapshot<T> = Arc<Vec<T>>;

/// 생산자(producer) 쪽 핸들
#[derive(Debug)]
pub struct Feed<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> Feed<T> {
    pub fn new(initial: Vec<T>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    /// 새 전체 목록을 게시합니다. 구독자가 없어도 값은 보관됩니다.
    pub fn publish(&self, items: Vec<T>) {
        self.tx.send_replace(Arc::new(items));
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// 소비자(consumer) 쪽 핸들
///
/// 구독 해제는 drop입니다. 마지막 핸들이 사라지면 피드의 구독자 수에서 빠집니다.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<Snapshot<T>>,
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> Subscription<T> {
    /// 가장 최근에 전달된 스냅샷
    pub fn current(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }

    /// 다음 스냅샷이 올 때까지 기다립니다.
    ///
    /// 생산자가 사라지면 `None`을 반환합니다.
    pub async fn changed(&mut self) -> Option<Snapshot<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

impl<T: Send + Sync + 'static> Subscription<T> {
    /// 현재 스냅샷을 먼저 내보내고, 이후 바뀔 때마다 새 스냅샷을 내보내는 스트림
    ///
    /// SSE 핸들러가 이 스트림을 그대로 이벤트로 바꿉니다.
    pub fn into_stream(mut self) -> impl Stream<Item = Snapshot<T>> + Send {
        let first = self.rx.borrow_and_update().clone();
        stream::unfold((self, Some(first)), |(mut sub, pending)| async move {
            if let Some(snapshot) = pending {
                return Some((snapshot, (sub, None)));
            }
            let next = sub.changed().await?;
            Some((next, (sub, None)))
        })
    }
}
