// extensions/scheduler.rs
//
// Cancellable delayed calls on the game clock. A fired or cancelled timer is
// gone; cancelling a stale handle is a no-op.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u32);

#[derive(Debug)]
pub struct Scheduler<C> {
    timers: BTreeMap<TimerId, (f32, C)>,
    next_id: u32,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self { timers: BTreeMap::new(), next_id: 0 }
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `cue` after `delay` seconds.
    pub fn after(&mut self, delay: f32, cue: C) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, (delay.max(0.0), cue));
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Seconds left on a pending timer.
    pub fn remaining(&self, id: TimerId) -> Option<f32> {
        self.timers.get(&id).map(|(left, _)| *left)
    }

    /// Advance the clock; returns due cues, earliest deadline first.
    pub fn tick(&mut self, dt: f32) -> Vec<C> {
        let mut due: Vec<(f32, TimerId)> = Vec::new();
        for (&id, (left, _)) in self.timers.iter_mut() {
            *left -= dt;
            if *left <= 0.0 {
                due.push((*left, id));
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter()
            .filter_map(|(_, id)| self.timers.remove(&id).map(|(_, cue)| cue))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}
