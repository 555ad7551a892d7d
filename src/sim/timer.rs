//! Deferred session tasks
//!
//! Delayed work (link checks, drop cooldowns, orientation settling) is
//! queued here with a due time and fired from the frame loop. Times are
//! milliseconds on the host clock.

/// Work that runs after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Look for neighbours of a dropped jelly block
    LinkBlock(super::BlockId),
    /// Drop cooldown elapsed
    ReopenGate,
    /// Window size has settled after an orientation change
    SettleResize,
}

/// Identifies a scheduled task for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    due_ms: f64,
    task: Deferred,
}

/// Pending tasks ordered by due time, then scheduling order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Scheduled>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, task: Deferred) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            due_ms: now_ms + delay_ms,
            task,
        });
        id
    }

    /// Cancel a pending task; false if it already ran or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending tasks", self.pending.len());
        }
        self.pending.clear();
    }

    /// Remove and return every task due at `now_ms`
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Deferred> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now_ms {
                due.push(s.clone());
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|s| s.task).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether `task` is waiting to run
    pub fn is_pending(&self, task: Deferred) -> bool {
        self.pending.iter().any(|s| s.task == task)
    }
}
