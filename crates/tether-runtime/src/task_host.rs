#![forbid(unsafe_code)]

//! Host-driven runner for cooperative long-lived tasks.
//!
//! [`TaskHost`] runs [`Task`]s on behalf of callers that cannot schedule work
//! themselves. It owns no thread and no clock: the embedding environment
//! calls [`TaskHost::tick`] from its own frame loop with a monotonic
//! timestamp, and every due task is polled once.
//!
//! ```text
//! host frame
//!   → initialize(HostContext)   // once, before anything else
//!   → start(task) / stop(handle)
//!   → tick(now)                 // poll due tasks in start order
//!   → shutdown()                // context gone; every later call fails
//! ```
//!
//! # Invariants
//!
//! 1. No task is polled before `initialize` or after `shutdown`.
//! 2. Tasks are polled in start order within a tick, at most once per tick.
//! 3. A task that returned [`TaskStep::Done`] or was stopped is never polled
//!    again, and its handle is never reused.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Use before init | `start`/`stop`/`tick` before `initialize` | `TaskHostError::UninitializedHost` |
//! | Use after shutdown | any call after `shutdown` | `TaskHostError::HostDestroyed` |
//! | Over capacity | `start` with `max_tasks` running | `TaskHostError::CapacityExceeded` |
//! | Clock regression | `tick(now)` with `now` earlier than before | `now` is clamped to the last tick |

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, trace};

/// Default cap on concurrently running tasks.
pub const DEFAULT_MAX_TASKS: usize = 256;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// What a task wants after being polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStep {
    /// Poll again on the next tick.
    Yield,
    /// Poll again once the host clock has advanced by at least this much.
    Sleep(Duration),
    /// Finished; remove the task.
    Done,
}

/// Handle identifying a started task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

impl TaskHandle {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Per-poll information handed to a task.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext {
    handle: TaskHandle,
    now: Duration,
    polls: u64,
}

impl TaskContext {
    #[must_use]
    pub const fn handle(&self) -> TaskHandle {
        self.handle
    }

    /// Host clock at this tick.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// How many times this task has been polled, including this poll.
    #[must_use]
    pub const fn polls(&self) -> u64 {
        self.polls
    }
}

/// A cooperative routine advanced one step per poll.
pub trait Task {
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStep;
}

impl<F> Task for F
where
    F: FnMut(&mut TaskContext) -> TaskStep,
{
    fn poll(&mut self, cx: &mut TaskContext) -> TaskStep {
        self(cx)
    }
}

/// Context supplied by the embedding environment at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub label: String,
    pub max_tasks: usize,
}

impl HostContext {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }

    #[must_use]
    pub fn with_max_tasks(mut self, max_tasks: usize) -> Self {
        self.max_tasks = max_tasks;
        self
    }
}

/// Errors from [`TaskHost`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskHostError {
    /// `initialize` has not been called yet.
    UninitializedHost,
    /// `initialize` was already called.
    AlreadyInitialized,
    /// The host context was destroyed by `shutdown`.
    HostDestroyed,
    /// `max_tasks` tasks are already running.
    CapacityExceeded { limit: usize },
}

impl fmt::Display for TaskHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UninitializedHost => write!(f, "task host used before initialize"),
            Self::AlreadyInitialized => write!(f, "task host already initialized"),
            Self::HostDestroyed => write!(f, "task host context was destroyed"),
            Self::CapacityExceeded { limit } => {
                write!(f, "task host is at capacity ({limit} tasks)")
            }
        }
    }
}

impl std::error::Error for TaskHostError {}

/// Outcome of a single [`TaskHost::tick`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks polled in this tick.
    pub polled: usize,
    /// Tasks that returned `Done` in this tick.
    pub completed: usize,
    /// Tasks still running after this tick.
    pub running: usize,
}

// ---------------------------------------------------------------------------
// TaskHost
// ---------------------------------------------------------------------------

enum HostState {
    Uninitialized,
    Running(HostContext),
    Destroyed,
}

struct TaskSlot {
    handle: TaskHandle,
    task: Box<dyn Task>,
    wake_at: Duration,
    polls: u64,
}

/// Runs cooperative tasks for callers that cannot schedule them.
pub struct TaskHost {
    state: HostState,
    tasks: Vec<TaskSlot>,
    next_id: u64,
    now: Duration,
}

impl fmt::Debug for TaskHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            HostState::Uninitialized => "uninitialized",
            HostState::Running(_) => "running",
            HostState::Destroyed => "destroyed",
        };
        f.debug_struct("TaskHost")
            .field("state", &state)
            .field("tasks", &self.tasks.len())
            .field("now", &self.now)
            .finish()
    }
}

impl Default for TaskHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskHost {
    /// Create an uninitialized host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: HostState::Uninitialized,
            tasks: Vec::new(),
            next_id: 0,
            now: Duration::ZERO,
        }
    }

    /// Bind the host to its environment. Must be called exactly once.
    pub fn initialize(&mut self, context: HostContext) -> Result<(), TaskHostError> {
        match self.state {
            HostState::Uninitialized => {
                info!(
                    host = %context.label,
                    max_tasks = context.max_tasks,
                    "task host initialized"
                );
                self.state = HostState::Running(context);
                Ok(())
            }
            HostState::Running(_) => Err(TaskHostError::AlreadyInitialized),
            HostState::Destroyed => Err(TaskHostError::HostDestroyed),
        }
    }

    /// Start `task`; it is first polled on the next tick.
    pub fn start(&mut self, task: impl Task + 'static) -> Result<TaskHandle, TaskHostError> {
        let limit = self.context()?.max_tasks;
        if self.tasks.len() >= limit {
            return Err(TaskHostError::CapacityExceeded { limit });
        }
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.tasks.push(TaskSlot {
            handle,
            task: Box::new(task),
            wake_at: self.now,
            polls: 0,
        });
        debug!(task = handle.get(), running = self.tasks.len(), "task started");
        Ok(handle)
    }

    /// Cancel a task. Returns `false` if it had already finished or been
    /// stopped.
    pub fn stop(&mut self, handle: TaskHandle) -> Result<bool, TaskHostError> {
        self.context()?;
        let Some(index) = self.tasks.iter().position(|slot| slot.handle == handle) else {
            return Ok(false);
        };
        self.tasks.remove(index);
        debug!(task = handle.get(), "task stopped");
        Ok(true)
    }

    /// Advance the host clock to `now` and poll every due task once.
    pub fn tick(&mut self, now: Duration) -> Result<TickReport, TaskHostError> {
        self.context()?;
        let now = now.max(self.now);
        self.now = now;

        let mut report = TickReport::default();
        let mut index = 0;
        while index < self.tasks.len() {
            let slot = &mut self.tasks[index];
            if slot.wake_at > now {
                index += 1;
                continue;
            }
            slot.polls += 1;
            let mut cx = TaskContext {
                handle: slot.handle,
                now,
                polls: slot.polls,
            };
            report.polled += 1;
            match slot.task.poll(&mut cx) {
                TaskStep::Yield => {
                    slot.wake_at = now;
                    index += 1;
                }
                TaskStep::Sleep(delay) => {
                    slot.wake_at = now.saturating_add(delay);
                    index += 1;
                }
                TaskStep::Done => {
                    let finished = self.tasks.remove(index);
                    trace!(task = finished.handle.get(), polls = finished.polls, "task finished");
                    report.completed += 1;
                }
            }
        }
        report.running = self.tasks.len();
        Ok(report)
    }

    /// Destroy the host context, cancelling every task. Returns how many were
    /// cancelled. Later calls to any other operation fail with
    /// [`TaskHostError::HostDestroyed`].
    pub fn shutdown(&mut self) -> usize {
        let cancelled = self.tasks.len();
        self.tasks.clear();
        if let HostState::Running(context) = &self.state {
            info!(host = %context.label, cancelled, "task host shut down");
        }
        self.state = HostState::Destroyed;
        cancelled
    }

    /// Number of running tasks.
    #[must_use]
    pub fn running(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_running(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|slot| slot.handle == handle)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        matches!(self.state, HostState::Running(_))
    }

    /// The active host context.
    pub fn context(&self) -> Result<&HostContext, TaskHostError> {
        match &self.state {
            HostState::Running(context) => Ok(context),
            HostState::Uninitialized => Err(TaskHostError::UninitializedHost),
            HostState::Destroyed => Err(TaskHostError::HostDestroyed),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
