//! Stress tests for the delivery queue
//!
//! These tests verify:
//! - Nothing is lost under heavy concurrent load with a tiny queue
//! - Close racing with active producers neither loses accepted messages nor
//!   delivers rejected ones
//! - A slow endpoint only slows producers down

use parking_lot::Mutex;
use rust_telegram_logger::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Default)]
struct CountingTransport {
    requests: AtomicUsize,
    delay: Option<Duration>,
}

impl HttpTransport for CountingTransport {
    fn post_json(&self, _url: &str, _body: &str) -> std::result::Result<u16, TransportError> {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(200)
    }
}

fn logger_with(transport: Arc<CountingTransport>, capacity: usize) -> Logger {
    Logger::builder()
        .bot_token("t")
        .chat_id("c")
        .min_level(LogLevel::Debug)
        .queue_capacity(capacity)
        .transport(transport)
        .fatal_handler(|| {})
        .build()
        .expect("logger")
}

/// Every accepted message is delivered even when producers constantly block
#[test]
fn test_no_loss_with_tiny_queue() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 500;

    let transport = Arc::new(CountingTransport::default());
    let logger = Arc::new(logger_with(transport.clone(), 2));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.log(LogLevel::ALL[i % 5], "worker %d message %d", &[
                        Arg::from(t),
                        Arg::from(i),
                    ]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("producer thread");
    }
    logger.close();

    let expected = THREADS * PER_THREAD;
    assert_eq!(transport.requests.load(Ordering::SeqCst), expected);
    assert_eq!(logger.metrics().delivered_count(), expected as u64);
    assert!(logger.metrics().queue_full_events() > 0);
}

/// Close while producers are still logging: every message is either
/// delivered or counted as dropped, never both and never neither
#[test]
fn test_close_races_with_producers() {
    const THREADS: usize = 8;

    let transport = Arc::new(CountingTransport::default());
    let logger = Arc::new(logger_with(transport.clone(), 8));
    let stop = Arc::new(AtomicBool::new(false));
    let attempted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = Arc::clone(&logger);
            let stop = Arc::clone(&stop);
            let attempted = Arc::clone(&attempted);
            thread::spawn(move || {
                while !stop.load(Ordering::SeqCst) {
                    logger.info("tick", &[]);
                    attempted.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    logger.close();
    stop.store(true, Ordering::SeqCst);
    for handle in handles {
        handle.join().expect("producer thread");
    }

    let delivered = transport.requests.load(Ordering::SeqCst) as u64;
    let dropped = logger.metrics().dropped_after_close_count();
    assert_eq!(delivered, logger.metrics().delivered_count());
    assert_eq!(
        delivered + dropped,
        attempted.load(Ordering::SeqCst) as u64
    );
    assert_eq!(logger.pending(), 0);
}

/// A slow endpoint throttles producers through backpressure
#[test]
fn test_slow_endpoint_applies_backpressure() {
    let transport = Arc::new(CountingTransport {
        requests: AtomicUsize::new(0),
        delay: Some(Duration::from_millis(5)),
    });
    let logger = logger_with(transport.clone(), 4);

    let started = Instant::now();
    for i in 0..40 {
        logger.info("slow %d", &[Arg::from(i)]);
    }
    let enqueue_time = started.elapsed();
    logger.close();

    // 40 messages through a 4-slot queue cannot be enqueued faster than the
    // worker drains at least 35 of them
    assert!(enqueue_time >= Duration::from_millis(5 * 30));
    assert_eq!(transport.requests.load(Ordering::SeqCst), 40);
    assert!(logger.metrics().block_events() > 0);
}

/// In async mode every failure is reported from the worker thread
#[test]
fn test_failures_reported_from_single_worker() {
    struct Failing;

    impl HttpTransport for Failing {
        fn post_json(&self, _url: &str, _body: &str) -> std::result::Result<u16, TransportError> {
            Err(TransportError::RemoteRejected { status: 502 })
        }
    }

    #[derive(Default)]
    struct ThreadSink {
        threads: Mutex<Vec<Option<String>>>,
    }

    impl DiagnosticSink for ThreadSink {
        fn delivery_failed(&self, _level: LogLevel, _error: &TransportError) {
            self.threads
                .lock()
                .push(thread::current().name().map(str::to_string));
        }
    }

    let sink = Arc::new(ThreadSink::default());
    let logger = Arc::new(
        Logger::builder()
            .bot_token("t")
            .chat_id("c")
            .transport(Arc::new(Failing))
            .diagnostics(sink.clone())
            .build()
            .expect("logger"),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for _ in 0..25 {
                    logger.error("bad gateway", &[]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("producer thread");
    }
    logger.close();

    let threads = sink.threads.lock();
    assert_eq!(threads.len(), 100);
    assert!(threads
        .iter()
        .all(|name| name.as_deref() == Some("telegram-log-worker")));
    assert_eq!(logger.metrics().failed_count(), 100);
}
