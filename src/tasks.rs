//! Repeating per-tick tasks
//!
//! Abilities hand their visual follow-ups (and the fireball flight) to the
//! host as tasks. A task owns its own small state, is told how many ticks have
//! elapsed, and never sees the cooldown table.

use crate::host::AbilityHost;
use std::fmt;

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(id: u64) -> Self {
        TaskId(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskControl {
    Continue,
    Finished,
}

pub trait RepeatingTask: Send {
    /// Short label for logs
    fn name(&self) -> &'static str;

    /// Run one tick. `elapsed` is 0 on the first call.
    fn run(&mut self, host: &mut dyn AbilityHost, elapsed: u32) -> TaskControl;
}

struct ScheduledTask {
    id: TaskId,
    elapsed: u32,
    task: Box<dyn RepeatingTask>,
}

/// Owns scheduled tasks on behalf of a host
///
/// Hosts call [`TaskScheduler::take_due`] at the start of a tick, run the
/// returned batch against themselves, then hand survivors back through
/// [`TaskScheduler::restore`]. Tasks scheduled while the batch runs start on
/// the following tick. A task cancelled by an earlier task of the same batch
/// does not run again.
#[derive(Default)]
pub struct TaskScheduler {
    next_id: u64,
    tasks: Vec<ScheduledTask>,
    in_flight: Vec<TaskId>,
    cancelled: Vec<TaskId>,
}

/// Tasks taken out of the scheduler for one tick
pub struct TaskBatch {
    tasks: Vec<ScheduledTask>,
}

impl TaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: Box<dyn RepeatingTask>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            id,
            elapsed: 0,
            task,
        });
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|scheduled| scheduled.id != id);
        if before != self.tasks.len() {
            return true;
        }
        if self.in_flight.contains(&id) && !self.cancelled.contains(&id) {
            self.cancelled.push(id);
            return true;
        }
        false
    }

    /// Scheduled tasks, not counting a batch that is currently out
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Whether an in-flight task was cancelled during the current batch
    pub fn is_cancelled(&self, id: TaskId) -> bool {
        self.cancelled.contains(&id)
    }

    pub fn take_due(&mut self) -> TaskBatch {
        let tasks = std::mem::take(&mut self.tasks);
        self.in_flight = tasks.iter().map(|scheduled| scheduled.id).collect();
        TaskBatch { tasks }
    }

    /// Put back the tasks that are still running, ahead of any scheduled
    /// during the batch
    pub fn restore(&mut self, batch: TaskBatch) {
        let scheduled_meanwhile = std::mem::take(&mut self.tasks);
        let cancelled = std::mem::take(&mut self.cancelled);
        self.in_flight.clear();

        self.tasks = batch.tasks;
        self.tasks.retain(|scheduled| !cancelled.contains(&scheduled.id));
        self.tasks.extend(scheduled_meanwhile);
    }
}

impl TaskBatch {
    /// Run every task once, dropping those that finish or were cancelled by
    /// a task earlier in the batch. `scheduler` reaches the host's own
    /// scheduler.
    pub fn run<H: AbilityHost>(&mut self, host: &mut H, scheduler: impl Fn(&mut H) -> &mut TaskScheduler) {
        self.tasks.retain_mut(|scheduled| {
            if scheduler(host).is_cancelled(scheduled.id) {
                return false;
            }
            let control = scheduled.task.run(host, scheduled.elapsed);
            scheduled.elapsed += 1;
            if control == TaskControl::Finished {
                tracing::trace!(task = %scheduled.id, name = scheduled.task.name(), "task finished");
            }
            control == TaskControl::Continue
        });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
