//! Rate-limited background queue for load and save calls.
//!
//! A [`TaskGate`] owns one worker task on the tokio runtime it was created in.
//! Queued units run one at a time on the blocking pool, in submission order,
//! and each unit's result is handed to its completion callback on the same
//! blocking thread. A unit that panics reports [`ConfigError::TaskPanicked`]
//! to its callback instead. Submitting never waits.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::ConfigError;
use crate::types::GateSettings;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a rate-limited work queue. Cloning shares the queue.
#[derive(Debug, Clone)]
pub struct TaskGate {
    tx: mpsc::UnboundedSender<Job>,
    settings: GateSettings,
}

impl TaskGate {
    /// Start a gate on the current tokio runtime.
    pub fn new(settings: GateSettings) -> Result<Self, ConfigError> {
        let handle = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run(rx, Throttle::new(settings)));
        Ok(Self { tx, settings })
    }

    pub fn settings(&self) -> GateSettings {
        self.settings
    }

    /// Queue `work`; `on_finish` receives its result once it has run, or
    /// [`ConfigError::TaskPanicked`] if it panicked.
    pub fn queue<R, W, F>(&self, work: W, on_finish: F) -> Result<(), ConfigError>
    where
        R: Send + 'static,
        W: FnOnce() -> R + Send + 'static,
        F: FnOnce(Result<R, ConfigError>) + Send + 'static,
    {
        let job: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                error!(panic = %message, "queued config task panicked");
                ConfigError::TaskPanicked(message)
            });
            on_finish(result);
        });
        self.tx.send(job).map_err(|_| ConfigError::GateClosed)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

async fn run(mut rx: mpsc::UnboundedReceiver<Job>, mut throttle: Throttle) {
    while let Some(job) = rx.recv().await {
        throttle.acquire().await;
        if let Err(e) = tokio::task::spawn_blocking(job).await {
            error!(error = %e, "config task callback failed");
        }
    }
    debug!("task gate stopped");
}

/// Sliding-window limit on how many units may start.
struct Throttle {
    limit: usize,
    window: Option<Duration>,
    started: VecDeque<Instant>,
}

impl Throttle {
    fn new(settings: GateSettings) -> Self {
        let window = (settings.window_millis > 0).then(|| {
            Duration::from_millis(settings.window_millis + settings.safety_buffer_millis)
        });
        Self {
            limit: settings.requests_per_window.max(1) as usize,
            window,
            started: VecDeque::new(),
        }
    }

    async fn acquire(&mut self) {
        let Some(window) = self.window else {
            return;
        };
        loop {
            let now = Instant::now();
            while self
                .started
                .front()
                .is_some_and(|start| now.duration_since(*start) >= window)
            {
                self.started.pop_front();
            }
            if self.started.len() < self.limit {
                self.started.push_back(now);
                return;
            }
            if let Some(oldest) = self.started.front() {
                let wake = *oldest + window;
                debug!(wait_ms = (wake - now).as_millis() as u64, "task gate throttled");
                tokio::time::sleep_until(wake).await;
            }
        }
    }
}
