use crate::row::SheetRow;
use crate::sink::SheetSink;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

pub const DEFAULT_CAPACITY: usize = 256;

/// Outbound queue between the write path and the spreadsheet.
///
/// `enqueue` never blocks and never fails the caller; a single background
/// task drains the channel into the sink and only logs sink errors.
#[derive(Clone)]
pub struct MirrorQueue {
    sender: Option<mpsc::Sender<SheetRow>>,
}

impl MirrorQueue {
    /// Must be called from inside a tokio runtime.
    pub fn spawn(sink: Arc<dyn SheetSink>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        tokio::spawn(consume_loop(sink, receiver));
        Self {
            sender: Some(sender),
        }
    }

    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    pub fn enqueue(&self, row: SheetRow) -> bool {
        let Some(sender) = &self.sender else {
            tracing::debug!(record_id = row.key().unwrap_or("-"), "mirror disabled, row skipped");
            return false;
        };
        match sender.try_send(row) {
            Ok(()) => true,
            Err(TrySendError::Full(row)) => {
                tracing::warn!(
                    record_id = row.key().unwrap_or("-"),
                    "mirror queue full, row dropped"
                );
                false
            }
            Err(TrySendError::Closed(row)) => {
                tracing::warn!(
                    record_id = row.key().unwrap_or("-"),
                    "mirror worker stopped, row dropped"
                );
                false
            }
        }
    }
}

async fn consume_loop(sink: Arc<dyn SheetSink>, mut receiver: mpsc::Receiver<SheetRow>) {
    while let Some(row) = receiver.recv().await {
        let record_id = row.key().unwrap_or("-").to_string();
        match sink.append(&row).await {
            Ok(()) => tracing::info!(%record_id, "row mirrored to spreadsheet"),
            Err(err) => tracing::warn!(%record_id, error = %err, "spreadsheet mirror failed"),
        }
    }
    tracing::debug!("mirror consume loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MirrorError;
    use crate::row::Cell;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct FlakySink {
        fail_first: usize,
        attempts: AtomicUsize,
        rows: Mutex<Vec<SheetRow>>,
        notify: Notify,
    }

    impl SheetSink for FlakySink {
        fn append<'a>(&'a self, row: &'a SheetRow) -> BoxFuture<'a, Result<(), MirrorError>> {
            Box::pin(async move {
                let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
                let result = if attempt < self.fail_first {
                    Err(MirrorError::Transport {
                        message: "connection refused".to_string(),
                    })
                } else {
                    self.rows.lock().unwrap().push(row.clone());
                    Ok(())
                };
                self.notify.notify_one();
                result
            })
        }

        fn write_headers(&self) -> BoxFuture<'_, Result<(), MirrorError>> {
            Box::pin(async { Ok(()) })
        }
    }

    fn row(id: &str) -> SheetRow {
        SheetRow::new(vec![Cell::from(id), Cell::Number(1)])
    }

    async fn wait_for_attempts(sink: &FlakySink, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while sink.attempts.load(Ordering::SeqCst) < count {
                sink.notify.notified().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn delivers_rows_in_order() {
        let sink = Arc::new(FlakySink::default());
        let queue = MirrorQueue::spawn(sink.clone(), 8);
        assert!(queue.enqueue(row("rec_a")));
        assert!(queue.enqueue(row("rec_b")));
        wait_for_attempts(&sink, 2).await;
        let rows = sink.rows.lock().unwrap();
        let keys: Vec<_> = rows.iter().filter_map(SheetRow::key).collect();
        assert_eq!(keys, vec!["rec_a", "rec_b"]);
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_worker() {
        let sink = Arc::new(FlakySink {
            fail_first: 1,
            ..FlakySink::default()
        });
        let queue = MirrorQueue::spawn(sink.clone(), 8);
        assert!(queue.enqueue(row("rec_lost")));
        assert!(queue.enqueue(row("rec_kept")));
        wait_for_attempts(&sink, 2).await;
        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key(), Some("rec_kept"));
    }

    #[test]
    fn disabled_queue_drops_rows() {
        let queue = MirrorQueue::disabled();
        assert!(!queue.is_enabled());
        assert!(!queue.enqueue(row("rec_x")));
    }
}
