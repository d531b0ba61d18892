//! 桌台列表广播
//!
//! 进程内 `tokio::sync::broadcast` 扇出：任何桌台变更后重新拉取全量
//! 列表并向所有 SSE 订阅者推送一帧。没有重放缓冲；掉线客户端重连后
//! 由 SSE 接口在订阅时补发一份快照。单进程设计，多实例部署需要换成
//! 真正的 pub/sub 通道。

use serde::Serialize;
use tokio::sync::broadcast;

/// 广播通道容量；慢消费者落后超过这个帧数会收到 Lagged 并丢帧
const CHANNEL_CAPACITY: usize = 32;

/// Table list broadcaster shared through [`crate::core::ServerState`]
#[derive(Clone, Debug)]
pub struct TableStream {
    tx: broadcast::Sender<String>,
}

impl TableStream {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to table list frames (serialized JSON)
    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Publish the full table list to every subscriber.
    ///
    /// With no subscribers the frame is dropped silently — broadcasting is
    /// best-effort and never fails the request that triggered it.
    pub fn publish<T: Serialize>(&self, tables: &T) {
        match serde_json::to_string(tables) {
            Ok(json) => {
                let delivered = self.tx.send(json).unwrap_or(0);
                tracing::trace!(subscribers = delivered, "Table list frame published");
            }
            Err(e) => tracing::warn!("Failed to serialize table list: {}", e),
        }
    }

    /// Number of currently connected subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for TableStream {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let stream = TableStream::new();
        let mut rx = stream.subscribe();

        stream.publish(&vec![1, 2, 3]);

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, "[1,2,3]");
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let stream = TableStream::new();
        assert_eq!(stream.subscriber_count(), 0);
        // Must not panic or error
        stream.publish(&vec![1]);
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_only_new_frames() {
        let stream = TableStream::new();
        stream.publish(&"old");

        let mut rx = stream.subscribe();
        stream.publish(&"new");

        let frame = rx.recv().await.unwrap();
        assert_eq!(frame, "\"new\"");
    }
}
