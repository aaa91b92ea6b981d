//! Ambient time system
//!
//! Periodic tasks that tick while exploring: passive tile effects in the
//! overworld and townsfolk wandering in town. Every task is bound to an
//! owner context and is cancelled explicitly when that context ends.

use std::time::Duration;

use crate::world::Region;

/// Accumulates frame time and reports when an interval has elapsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Interval between ticks
    period: Duration,
    /// Time since last tick
    since_last_tick: Duration,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            since_last_tick: Duration::ZERO,
        }
    }

    /// Advance and return true if a tick should occur
    pub fn update(&mut self, delta: Duration) -> bool {
        self.since_last_tick += delta;

        if self.since_last_tick >= self.period {
            self.since_last_tick -= self.period;
            true
        } else {
            false
        }
    }

    /// Start a fresh period, discarding any partial one
    pub fn reset(&mut self) {
        self.since_last_tick = Duration::ZERO;
    }
}

/// What a task does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    PassiveTile,
    TownsfolkWander,
}

/// The context a task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOwner {
    Overworld(Region),
    Town,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    kind: TaskKind,
    owner: TaskOwner,
    interval: Interval,
}

/// Owner-bound periodic tasks
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `kind` to `owner`, replacing any earlier binding of the same kind
    pub fn bind(&mut self, kind: TaskKind, owner: TaskOwner, period: Duration) {
        self.tasks.retain(|t| t.kind != kind);
        self.tasks.push(ScheduledTask { kind, owner, interval: Interval::new(period) });
        log::debug!("Bound {:?} to {:?} every {:?}", kind, owner, period);
    }

    /// Drop every task owned by `owner`
    pub fn cancel_owner(&mut self, owner: TaskOwner) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.owner != owner);
        if self.tasks.len() != before {
            log::debug!("Cancelled {} task(s) for {:?}", before - self.tasks.len(), owner);
        }
    }

    /// Discard the partial period of `kind` without changing its owner
    pub fn restart(&mut self, kind: TaskKind) {
        for task in self.tasks.iter_mut().filter(|t| t.kind == kind) {
            task.interval.reset();
        }
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_bound(&self, kind: TaskKind) -> bool {
        self.tasks.iter().any(|t| t.kind == kind)
    }

    pub fn owner_of(&self, kind: TaskKind) -> Option<TaskOwner> {
        self.tasks.iter().find(|t| t.kind == kind).map(|t| t.owner)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance every task; returns the kinds that fired, in binding order
    pub fn tick(&mut self, delta: Duration) -> Vec<TaskKind> {
        self.tasks
            .iter_mut()
            .filter_map(|t| t.interval.update(delta).then_some(t.kind))
            .collect()
    }
}
