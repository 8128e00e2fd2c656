//! Delivery queue and background worker
//!
//! A bounded FIFO channel feeds exactly one worker thread, which hands each
//! message to the [`TelegramSender`] in the order the pushes succeeded.
//!
//! Lifecycle: `Running` → `Closing` → `Closed`. Closing drops the only
//! channel sender; the worker drains whatever is already buffered, sees the
//! disconnect and exits, and the closer joins it. The lifecycle lock is held
//! for the whole drain, so a second closer waits for the first one and then
//! returns without draining again.

use super::config::FatalHandler;
use super::diagnostics::{panic_message, DiagnosticSink};
use super::error::{LoggerError, Result};
use super::log_entry::PendingMessage;
use super::metrics::LoggerMetrics;
use crate::transport::TelegramSender;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

/// Name of the background delivery thread
pub const WORKER_THREAD_NAME: &str = "telegram-log-worker";

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Whether the current thread is inside a delivery attempt
///
/// Records emitted by the HTTP stack while delivering must not be fed back
/// into the logger.
#[cfg_attr(not(feature = "log-bridge"), allow(dead_code))]
pub(crate) fn is_delivering() -> bool {
    DELIVERING.with(Cell::get)
}

/// Marks the current thread as delivering until dropped
struct DeliveringGuard;

impl DeliveringGuard {
    fn enter() -> Self {
        DELIVERING.with(|flag| flag.set(true));
        DeliveringGuard
    }
}

impl Drop for DeliveringGuard {
    fn drop(&mut self) {
        DELIVERING.with(|flag| flag.set(false));
    }
}

/// Lifecycle of a [`DeliveryQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    Running,
    Closing,
    Closed,
}

/// Performs one delivery attempt and its follow-up
///
/// Shared by the worker thread (async mode) and the calling thread (sync
/// mode), so both report failures and handle Fatal identically.
pub(crate) struct Dispatcher {
    sender: TelegramSender,
    chat_id: String,
    diagnostics: Arc<dyn DiagnosticSink>,
    metrics: Arc<LoggerMetrics>,
    fatal_handler: FatalHandler,
}

impl Dispatcher {
    pub(crate) fn new(
        sender: TelegramSender,
        chat_id: String,
        diagnostics: Arc<dyn DiagnosticSink>,
        metrics: Arc<LoggerMetrics>,
        fatal_handler: FatalHandler,
    ) -> Self {
        Self {
            sender,
            chat_id,
            diagnostics,
            metrics,
            fatal_handler,
        }
    }

    /// Deliver `message`; run the fatal handler afterwards if it is Fatal
    ///
    /// The thread counts as delivering for the whole call, including the
    /// diagnostic sink and the fatal handler.
    pub(crate) fn dispatch(&self, message: &PendingMessage) {
        let _guard = DeliveringGuard::enter();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.sender.deliver(&self.chat_id, &message.text)
        }));

        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_delivered();
            }
            Ok(Err(e)) => {
                self.metrics.record_failed();
                self.diagnostics.delivery_failed(message.level, &e);
            }
            Err(payload) => {
                self.metrics.record_failed();
                self.diagnostics
                    .delivery_panicked(message.level, &panic_message(payload.as_ref()));
            }
        }

        if message.is_fatal() {
            (self.fatal_handler)();
        }
    }
}

struct Lifecycle {
    state: QueueState,
    worker: Option<JoinHandle<()>>,
}

/// Bounded queue of pending messages with its single worker
pub(crate) struct DeliveryQueue {
    sender: RwLock<Option<Sender<PendingMessage>>>,
    accepting: AtomicBool,
    lifecycle: Mutex<Lifecycle>,
    worker_id: ThreadId,
    in_flight: Arc<AtomicUsize>,
    metrics: Arc<LoggerMetrics>,
}

impl DeliveryQueue {
    /// Create the channel and spawn the worker
    pub(crate) fn start(
        capacity: usize,
        dispatcher: Arc<Dispatcher>,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        let (sender, receiver) = bounded(capacity);
        let in_flight = Arc::new(AtomicUsize::new(0));

        let worker_in_flight = Arc::clone(&in_flight);
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run_worker(receiver, dispatcher, worker_in_flight))
            .map_err(LoggerError::WorkerSpawn)?;

        Ok(Self {
            sender: RwLock::new(Some(sender)),
            accepting: AtomicBool::new(true),
            worker_id: worker.thread().id(),
            lifecycle: Mutex::new(Lifecycle {
                state: QueueState::Running,
                worker: Some(worker),
            }),
            in_flight,
            metrics,
        })
    }

    /// Push a message, blocking while the queue is full
    ///
    /// Returns `false` when close has begun; the message is then dropped and
    /// counted, and the caller never blocks.
    pub(crate) fn enqueue(&self, message: PendingMessage) -> bool {
        let guard = self.sender.read();
        let sender = match guard.as_ref() {
            Some(sender) if self.accepting.load(Ordering::Acquire) => sender,
            _ => {
                self.metrics.record_dropped_after_close();
                return false;
            }
        };

        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let sent = match sender.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(message)) => {
                self.metrics.record_queue_full();
                self.metrics.record_block();
                sender.send(message).is_ok()
            }
            Err(TrySendError::Disconnected(_)) => false,
        };

        if !sent {
            self.in_flight.fetch_sub(1, Ordering::AcqRel);
            self.metrics.record_dropped_after_close();
        }
        sent
    }

    /// Stop accepting messages, drain the queue and join the worker
    pub(crate) fn close(&self) {
        if thread::current().id() == self.worker_id {
            self.close_from_worker();
            return;
        }

        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != QueueState::Running {
            return;
        }
        lifecycle.state = QueueState::Closing;
        self.accepting.store(false, Ordering::Release);

        // Waits for producers still inside `enqueue`
        drop(self.sender.write().take());

        if let Some(worker) = lifecycle.worker.take() {
            if worker.join().is_err() {
                eprintln!("[TELEGRAM LOGGER ERROR] Delivery worker panicked during shutdown");
            }
        }

        lifecycle.state = QueueState::Closed;
    }

    /// Close requested from inside a delivery (e.g. a fatal handler)
    ///
    /// Neither joins nor waits on the lifecycle lock: another closer may be
    /// holding it while joining this very thread. The worker keeps draining
    /// and exits once the sender is dropped, by that closer or by the queue
    /// itself.
    fn close_from_worker(&self) {
        self.accepting.store(false, Ordering::Release);
        if let Some(mut lifecycle) = self.lifecycle.try_lock() {
            if lifecycle.state == QueueState::Running {
                lifecycle.state = QueueState::Closed;
            }
        }
    }

    pub(crate) fn state(&self) -> QueueState {
        self.lifecycle
            .try_lock()
            .map(|lifecycle| lifecycle.state)
            .unwrap_or(QueueState::Closing)
    }

    /// Messages accepted but not yet attempted
    pub(crate) fn pending(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

fn run_worker(
    receiver: Receiver<PendingMessage>,
    dispatcher: Arc<Dispatcher>,
    in_flight: Arc<AtomicUsize>,
) {
    // `recv` keeps returning buffered messages after the sender is dropped
    while let Ok(message) = receiver.recv() {
        dispatcher.dispatch(&message);
        in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
