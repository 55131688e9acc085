//! Background execution of blocking slot operations.
//!
//! A [`TaskRunner`] belongs to the interactive (UI) thread. Each call to
//! [`TaskRunner::spawn`] starts one short-lived worker thread that runs the
//! unit of work and posts exactly one [`TaskCompletion`] onto the runner's
//! single-consumer queue. The UI loop drains that queue with
//! [`TaskRunner::poll`] every frame, so UI state is only ever touched on
//! the thread that owns the runner (the runner is `Send` but not `Sync`).
//!
//! There is no retry and no cancellation. A panic in the work is caught and
//! delivered as [`TaskFailure::Panicked`].
//!
//! # Example
//!
//! ```ignore
//! let runner = TaskRunner::new().with_notifier(move || ctx.request_repaint());
//! let repo = Arc::clone(&repo);
//! runner.spawn("save", move || repo.create_backup(None));
//!
//! // In the frame loop:
//! for done in runner.poll() {
//!     match done.outcome {
//!         Ok(name) => status = format!("Slot saved: {name}"),
//!         Err(e) => status = e.to_string(),
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use uuid::Uuid;

use crate::error::SlotError;

/// Unique identifier for a scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of one invocation. `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

/// Why a task did not produce a value.
#[derive(Debug)]
pub enum TaskFailure<E> {
    /// The work returned an error.
    Error(E),
    /// The work panicked.
    Panicked(String),
    /// No worker thread could be started.
    SpawnFailed(String),
}

impl<E: fmt::Display> fmt::Display for TaskFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskFailure::Error(e) => write!(f, "{e}"),
            TaskFailure::Panicked(msg) => write!(f, "Operation crashed: {msg}"),
            TaskFailure::SpawnFailed(msg) => write!(f, "Could not start worker: {msg}"),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for TaskFailure<E> {}

/// The single outcome message for a task.
#[derive(Debug)]
pub struct TaskCompletion<T, E> {
    pub id: TaskId,
    pub label: String,
    pub outcome: Result<T, TaskFailure<E>>,
}

/// Handle returned by [`TaskRunner::spawn`] for observing progress.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub id: TaskId,
    pub label: String,
    state: Arc<Mutex<TaskState>>,
}

impl TaskHandle {
    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap()
    }
}

fn set_state(state: &Mutex<TaskState>, next: TaskState) {
    let mut guard = state.lock().unwrap();
    if !guard.is_terminal() {
        *guard = next;
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Runs work off the interactive thread and queues completions for it.
pub struct TaskRunner<T, E = SlotError> {
    sender: Sender<TaskCompletion<T, E>>,
    receiver: Receiver<TaskCompletion<T, E>>,
    in_flight: Arc<AtomicUsize>,
    notifier: Option<Notifier>,
}

impl<T, E> TaskRunner<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            in_flight: Arc::new(AtomicUsize::new(0)),
            notifier: None,
        }
    }

    /// Call `notify` on the worker right after a completion is posted, e.g.
    /// to wake an event loop that only redraws on input.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Arc::new(notify));
        self
    }

    /// Run `work` on a new worker thread.
    pub fn spawn<F>(&self, label: impl Into<String>, work: F) -> TaskHandle
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
    {
        let handle = TaskHandle {
            id: TaskId::new(),
            label: label.into(),
            state: Arc::new(Mutex::new(TaskState::Idle)),
        };
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        let id = handle.id.clone();
        let label = handle.label.clone();
        let state = Arc::clone(&handle.state);
        let sender = self.sender.clone();
        let notifier = self.notifier.clone();

        let spawned = thread::Builder::new()
            .name(format!("slot-task-{}", handle.label))
            .spawn(move || {
                set_state(&state, TaskState::Running);
                log::debug!("Task {} ({}) started", label, id);

                let outcome = match panic::catch_unwind(AssertUnwindSafe(work)) {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(TaskFailure::Error(e)),
                    Err(payload) => Err(TaskFailure::Panicked(panic_message(payload))),
                };
                let next = if outcome.is_ok() {
                    TaskState::Succeeded
                } else {
                    TaskState::Failed
                };
                set_state(&state, next);
                log::debug!("Task {} ({}) finished: {:?}", label, id, next);

                if sender.send(TaskCompletion { id, label, outcome }).is_err() {
                    log::warn!("Task finished after its runner was dropped");
                    return;
                }
                if let Some(notify) = notifier {
                    notify();
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn worker for {}: {}", handle.label, e);
            set_state(&handle.state, TaskState::Failed);
            // The runner owns a receiver, so this send cannot fail.
            let _ = self.sender.send(TaskCompletion {
                id: handle.id.clone(),
                label: handle.label.clone(),
                outcome: Err(TaskFailure::SpawnFailed(e.to_string())),
            });
        }

        handle
    }

    /// Drain every completion that is ready, in arrival order. Never blocks.
    pub fn poll(&self) -> Vec<TaskCompletion<T, E>> {
        let done: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight.fetch_sub(done.len(), Ordering::SeqCst);
        done
    }

    /// Wait up to `timeout` for the next completion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TaskCompletion<T, E>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(done) => {
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Some(done)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Tasks started whose completion has not been taken off the queue yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight() == 0
    }
}

impl<T, E> Default for TaskRunner<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
