//! Deterministic task scheduler
//!
//! Replaces free-running timers with an explicit task list on a virtual
//! millisecond clock. Firing order is fully determined by:
//! - due time
//! - deferred events before slot tasks at the same instant (in scheduling order)
//! - slot tasks in `Task` order (Light, Spawn, Move, Collision)

use crate::predictor::{PredictionRequest, PredictorError};

/// Recurring or self-rearming work, one slot each
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Task {
    /// Traffic light phase change (one-shot, re-armed by each phase)
    Light,
    Spawn,
    Move,
    Collision,
}

impl Task {
    pub const ALL: [Task; 4] = [Task::Light, Task::Spawn, Task::Move, Task::Collision];

    fn index(self) -> usize {
        self as usize
    }
}

/// One-shot work scheduled for later
#[derive(Debug, Clone, PartialEq)]
pub enum Deferred {
    /// Put the player on the start line at `x`, then clear `returning`
    /// after `hold_ms` (immediately when zero)
    Relocate { x: f32, hold_ms: u64 },
    /// Clear the player's `returning` flag
    EndReturn,
    ClearWarning,
    EvaluateDifficulty,
    /// Predictor answer arriving; inputs were captured at call time
    PredictionReady {
        epoch: u64,
        score: u64,
        request: PredictionRequest,
        result: Result<f64, PredictorError>,
    },
}

/// What `pop_due` hands back
#[derive(Debug, Clone, PartialEq)]
pub enum Fired {
    Task(Task),
    Event(Deferred),
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    due_ms: u64,
    /// None = one-shot
    interval_ms: Option<u64>,
}

#[derive(Debug, Clone)]
struct Pending {
    due_ms: u64,
    seq: u64,
    event: Deferred,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    slots: [Option<Slot>; 4],
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Arm `task` to fire every `interval_ms`, first at `now + interval_ms`.
    /// Already armed with the same interval: left untouched.
    pub fn arm_periodic(&mut self, task: Task, interval_ms: u64) {
        let interval_ms = interval_ms.max(1);
        if let Some(slot) = self.slots[task.index()] {
            if slot.interval_ms == Some(interval_ms) {
                return;
            }
        }
        self.slots[task.index()] = Some(Slot {
            due_ms: self.now_ms + interval_ms,
            interval_ms: Some(interval_ms),
        });
    }

    /// Arm `task` to fire once after `delay_ms`, replacing any earlier arming
    pub fn arm_once(&mut self, task: Task, delay_ms: u64) {
        self.slots[task.index()] = Some(Slot {
            due_ms: self.now_ms + delay_ms,
            interval_ms: None,
        });
    }

    pub fn disarm(&mut self, task: Task) {
        self.slots[task.index()] = None;
    }

    pub fn disarm_all(&mut self) {
        self.slots = [None; 4];
    }

    pub fn is_armed(&self, task: Task) -> bool {
        self.slots[task.index()].is_some()
    }

    pub fn due_ms(&self, task: Task) -> Option<u64> {
        self.slots[task.index()].map(|s| s.due_ms)
    }

    pub fn interval_ms(&self, task: Task) -> Option<u64> {
        self.slots[task.index()].and_then(|s| s.interval_ms)
    }

    /// Schedule `event` after `delay_ms`
    pub fn defer(&mut self, delay_ms: u64, event: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due_ms: self.now_ms + delay_ms,
            seq,
            event,
        });
    }

    /// Drop every pending event matching `pred`
    pub fn cancel(&mut self, pred: impl Fn(&Deferred) -> bool) {
        self.pending.retain(|p| !pred(&p.event));
    }

    /// Is any pending event matching `pred`
    pub fn has_pending(&self, pred: impl Fn(&Deferred) -> bool) -> bool {
        self.pending.iter().any(|p| pred(&p.event))
    }

    /// Due time of the earliest pending event matching `pred`
    pub fn pending_due(&self, pred: impl Fn(&Deferred) -> bool) -> Option<u64> {
        self.pending
            .iter()
            .filter(|p| pred(&p.event))
            .map(|p| p.due_ms)
            .min()
    }

    /// Pop the next piece of work due at or before `until_ms`, moving the
    /// clock to its due time
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let event = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| (p.due_ms, p.seq))
            .map(|(i, p)| (i, p.due_ms));

        let task = Task::ALL
            .iter()
            .filter_map(|&t| self.slots[t.index()].map(|s| (t, s.due_ms)))
            .min_by_key(|&(t, due)| (due, t));

        let take_event = match (event, task) {
            (Some((_, e_due)), Some((_, t_due))) => e_due <= t_due,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        if take_event {
            let (i, due) = event?;
            if due > until_ms {
                return None;
            }
            self.now_ms = self.now_ms.max(due);
            let pending = self.pending.swap_remove(i);
            Some(Fired::Event(pending.event))
        } else {
            let (t, due) = task?;
            if due > until_ms {
                return None;
            }
            self.now_ms = self.now_ms.max(due);
            let slot = &mut self.slots[t.index()];
            *slot = slot.and_then(|s| {
                s.interval_ms.map(|interval| Slot {
                    due_ms: s.due_ms + interval,
                    interval_ms: Some(interval),
                })
            });
            Some(Fired::Task(t))
        }
    }

    /// Move the clock to `until_ms` once nothing else is due
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, until: u64) -> Vec<(u64, Fired)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(until) {
            out.push((s.now_ms(), f));
        }
        s.settle(until);
        out
    }

    #[test]
    fn test_periodic_cadence() {
        let mut s = Scheduler::new();
        s.arm_periodic(Task::Move, 16);
        let fired = drain(&mut s, 100);
        let times: Vec<u64> = fired.iter().map(|(t, _)| *t).collect();
        assert_eq!(times, [16, 32, 48, 64, 80, 96]);
        assert_eq!(s.now_ms(), 100);
        assert_eq!(s.due_ms(Task::Move), Some(112));
    }

    #[test]
    fn test_rearm_same_interval_is_noop() {
        let mut s = Scheduler::new();
        s.arm_periodic(Task::Spawn, 2000);
        drain(&mut s, 1500);
        s.arm_periodic(Task::Spawn, 2000);
        assert_eq!(s.due_ms(Task::Spawn), Some(2000));

        // A new interval restarts from now
        s.arm_periodic(Task::Spawn, 1900);
        assert_eq!(s.due_ms(Task::Spawn), Some(3400));
    }

    #[test]
    fn test_one_shot_clears_after_firing() {
        let mut s = Scheduler::new();
        s.arm_once(Task::Light, 6000);
        assert_eq!(drain(&mut s, 6000), [(6000, Fired::Task(Task::Light))]);
        assert!(!s.is_armed(Task::Light));
    }

    #[test]
    fn test_tie_break_order() {
        let mut s = Scheduler::new();
        s.arm_periodic(Task::Collision, 100);
        s.arm_periodic(Task::Move, 100);
        s.arm_once(Task::Light, 100);
        s.defer(100, Deferred::ClearWarning);
        s.defer(100, Deferred::EndReturn);
        let fired: Vec<Fired> = drain(&mut s, 100).into_iter().map(|(_, f)| f).collect();
        assert_eq!(
            fired,
            [
                Fired::Event(Deferred::ClearWarning),
                Fired::Event(Deferred::EndReturn),
                Fired::Task(Task::Light),
                Fired::Task(Task::Move),
                Fired::Task(Task::Collision),
            ]
        );
    }

    #[test]
    fn test_cancel_and_pending_queries() {
        let mut s = Scheduler::new();
        s.defer(1000, Deferred::EvaluateDifficulty);
        s.defer(2000, Deferred::ClearWarning);
        assert_eq!(
            s.pending_due(|e| matches!(e, Deferred::EvaluateDifficulty)),
            Some(1000)
        );
        s.cancel(|e| matches!(e, Deferred::EvaluateDifficulty));
        assert!(!s.has_pending(|e| matches!(e, Deferred::EvaluateDifficulty)));
        assert!(s.has_pending(|e| matches!(e, Deferred::ClearWarning)));
    }

    #[test]
    fn test_disarm_stops_firing() {
        let mut s = Scheduler::new();
        s.arm_periodic(Task::Collision, 100);
        drain(&mut s, 250);
        s.disarm_all();
        assert!(drain(&mut s, 10_000).is_empty());
    }
}
