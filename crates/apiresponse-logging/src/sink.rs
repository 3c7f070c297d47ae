//! Diagnostic sink management

use apiresponse_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Records buffered for the sink before new ones are dropped
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Failure reported by a [`DiagnosticSink`]
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink rejected record: {0}")]
    Rejected(String),
}

/// Destination for diagnostic records
///
/// Implementations must not panic. Records are delivered on a background
/// thread; errors are counted and dropped by [`SinkManager`] and never reach
/// the request that produced the record.
pub trait DiagnosticSink: Send + Sync {
    /// Record an error with structured context
    fn error(&self, message: &str, context: &Value) -> Result<(), SinkError>;

    /// Record at any level; only errors are kept unless overridden
    fn log(&self, level: LogLevel, message: &str, context: &Value) -> Result<(), SinkError> {
        if level == LogLevel::Error {
            self.error(message, context)
        } else {
            Ok(())
        }
    }
}

/// Global sink manager
static SINK_MANAGER: OnceCell<SinkManager> = OnceCell::new();

enum Message {
    Record {
        level: LogLevel,
        message: String,
        context: Value,
    },
    Flush(SyncSender<()>),
}

/// State the delivery thread shares with the manager
struct Shared {
    sink: RwLock<Option<Arc<dyn DiagnosticSink>>>,
    failures: AtomicU64,
}

/// Holds the installed sink and the minimum level forwarded to it
///
/// [`SinkManager::record`] never waits on the sink. Records go through a
/// bounded queue to a delivery thread started on first use; when the queue
/// is full the record is dropped and counted.
pub struct SinkManager {
    shared: Arc<Shared>,
    level: AtomicU8,
    dropped: AtomicU64,
    capacity: usize,
    queue: OnceCell<SyncSender<Message>>,
}

impl SinkManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Manager whose queue holds at most `capacity` pending records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                sink: RwLock::new(None),
                failures: AtomicU64::new(0),
            }),
            level: AtomicU8::new(LogLevel::Error as u8),
            dropped: AtomicU64::new(0),
            capacity: capacity.max(1),
            queue: OnceCell::new(),
        }
    }

    /// Get the global sink manager instance
    pub fn global() -> &'static SinkManager {
        SINK_MANAGER.get_or_init(SinkManager::new)
    }

    /// Replace the installed sink; `None` disables forwarding
    pub fn set_sink(&self, sink: Option<Arc<dyn DiagnosticSink>>) {
        *self.shared.sink.write() = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.shared.sink.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Number of records the sink failed to accept
    pub fn failures(&self) -> u64 {
        self.shared.failures.load(Ordering::Relaxed)
    }

    /// Number of records dropped because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Queue a record for the sink if one is installed and `level` is enabled
    ///
    /// Returns immediately; delivery happens on the sink thread.
    pub fn record(&self, level: LogLevel, message: &str, context: &Value) {
        if !self.is_enabled(level) || !self.has_sink() {
            return;
        }

        let Some(queue) = self.queue() else {
            self.shared.failures.fetch_add(1, Ordering::Relaxed);
            return;
        };

        let record = Message::Record {
            level,
            message: message.to_string(),
            context: context.clone(),
        };
        match queue.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Disconnected(_)) => {
                self.shared.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Wait until every record queued so far has reached the sink
    ///
    /// Returns `false` if `timeout` passed first or the sink thread is gone.
    pub fn flush(&self, timeout: Duration) -> bool {
        let Some(queue) = self.queue.get() else {
            return true;
        };

        let deadline = Instant::now() + timeout;
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let mut pending = Message::Flush(done_tx);
        loop {
            match queue.try_send(pending) {
                Ok(()) => break,
                Err(TrySendError::Full(message)) => {
                    if Instant::now() >= deadline {
                        return false;
                    }
                    pending = message;
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }

        done_rx
            .recv_timeout(deadline.saturating_duration_since(Instant::now()))
            .is_ok()
    }

    fn queue(&self) -> Option<&SyncSender<Message>> {
        self.queue
            .get_or_try_init(|| {
                let (tx, rx) = mpsc::sync_channel(self.capacity);
                let shared = Arc::clone(&self.shared);
                std::thread::Builder::new()
                    .name("apiresponse-sink".into())
                    .spawn(move || deliver(&shared, rx))
                    .map(|_| tx)
            })
            .ok()
    }
}

impl Default for SinkManager {
    fn default() -> Self {
        Self::new()
    }
}

// Runs until the manager, and with it the sender, is dropped.
fn deliver(shared: &Shared, queue: Receiver<Message>) {
    for message in queue {
        match message {
            Message::Record {
                level,
                message,
                context,
            } => {
                // The sink runs outside the lock.
                let sink = shared.sink.read().clone();
                if let Some(sink) = sink
                    && sink.log(level, &message, &context).is_err()
                {
                    shared.failures.fetch_add(1, Ordering::Relaxed);
                }
            }
            Message::Flush(done) => {
                // The flushing thread may have stopped waiting.
                done.send(()).ok();
            }
        }
    }
}
