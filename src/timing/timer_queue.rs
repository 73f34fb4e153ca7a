//! Stand-alone timer wheel driven by explicit clock advances

use ahash::AHashMap;

use super::scheduler::{Scheduler, TimerKey};
use crate::core::types::{InteractableId, Seconds};

#[derive(Debug, Clone)]
struct Timer {
    duration: Seconds,
    elapsed: Seconds,
    paused: bool,
    /// Scheduling order, used to break ties between timers due at the same instant
    seq: u64,
}

/// Scheduler backed by a plain map of running timers
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    timers: AHashMap<TimerKey, Timer>,
    now: Seconds,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            timers: AHashMap::new(),
            now: 0.0,
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Seconds left before `key` fires, if it exists
    pub fn remaining(&self, key: TimerKey) -> Option<Seconds> {
        self.timers
            .get(&key)
            .map(|t| (t.duration - t.elapsed).max(0.0))
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&mut self, key: TimerKey, duration: Seconds) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(
            key,
            Timer {
                duration: duration.max(0.0),
                elapsed: 0.0,
                paused: false,
                seq,
            },
        );
    }

    fn cancel(&mut self, key: TimerKey) {
        self.timers.remove(&key);
    }

    fn cancel_owner(&mut self, owner: InteractableId) {
        self.timers.retain(|key, _| key.owner != owner);
    }

    fn pause(&mut self, key: TimerKey) {
        if let Some(timer) = self.timers.get_mut(&key) {
            timer.paused = true;
        }
    }

    fn resume(&mut self, key: TimerKey) {
        if let Some(timer) = self.timers.get_mut(&key) {
            timer.paused = false;
        }
    }

    fn is_active(&self, key: TimerKey) -> bool {
        self.timers.get(&key).is_some_and(|t| !t.paused)
    }

    fn exists(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    fn elapsed(&self, key: TimerKey) -> Seconds {
        self.timers.get(&key).map_or(0.0, |t| t.elapsed)
    }

    fn now(&self) -> Seconds {
        self.now
    }

    fn advance(&mut self, dt: Seconds) -> Vec<TimerKey> {
        let dt = dt.max(0.0);
        self.now += dt;

        // (overshoot, seq, key): larger overshoot means it was due earlier
        let mut due: Vec<(Seconds, u64, TimerKey)> = Vec::new();
        for (key, timer) in self.timers.iter_mut() {
            if timer.paused {
                continue;
            }
            timer.elapsed += dt;
            if timer.elapsed >= timer.duration {
                due.push((timer.elapsed - timer.duration, timer.seq, *key));
            }
        }

        due.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        due.into_iter()
            .map(|(_, _, key)| {
                self.timers.remove(&key);
                key
            })
            .collect()
    }
}
