// extensions/tween.rs
//
// Property tweens keyed by EntityId. Nodes registered in the TransformGraph are
// animated through their local transform; free entities are animated directly.
// Completion is reported as a caller-chosen cue value returned from `tick`.
//
// Usage:
//   let mut tweens: TweenState<Cue> = TweenState::new();
//   tweens.add(flyer, Tween::position(cell_center, 0.5, Easing::Power2Out)
//       .with_delay(0.1)
//       .on_complete(Cue::CellLanded { .. }));
//   for cue in tweens.tick(dt, &mut graph, &mut scene) { /* react */ }

use std::collections::BTreeMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::easing::{Easing, lerp_vec2};
use super::transform::TransformGraph;

/// Which property a tween drives. Scalar properties use the `x` lane of the
/// tween's start/end values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenProp {
    Position,
    PositionX,
    PositionY,
    Scale,
    Rotation,
    Alpha,
}

/// How many extra cycles run after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Never,
    Times(u32),
    Forever,
}

impl Repeat {
    fn total_cycles(self) -> Option<u32> {
        match self {
            Repeat::Never => Some(1),
            Repeat::Times(n) => Some(n.saturating_add(1)),
            Repeat::Forever => None,
        }
    }
}

/// A single property animation.
#[derive(Debug, Clone)]
pub struct Tween<C> {
    pub prop: TweenProp,
    /// Start value; `None` means "whatever the property holds when the delay ends".
    from: Option<Vec2>,
    to: Vec2,
    pub duration: f32,
    pub delay: f32,
    pub easing: Easing,
    pub repeat: Repeat,
    /// Alternate cycles run backwards.
    pub yoyo: bool,
    pub on_complete: Option<C>,
    waited: f32,
    elapsed: f32,
    cycle: u32,
}

impl<C> Tween<C> {
    fn new(prop: TweenProp, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            prop,
            from: None,
            to,
            duration,
            delay: 0.0,
            easing,
            repeat: Repeat::Never,
            yoyo: false,
            on_complete: None,
            waited: 0.0,
            elapsed: 0.0,
            cycle: 0,
        }
    }

    pub fn position(to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::Position, to, duration, easing)
    }

    pub fn x(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::PositionX, Vec2::new(to, 0.0), duration, easing)
    }

    pub fn y(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::PositionY, Vec2::new(to, 0.0), duration, easing)
    }

    pub fn scale(to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::Scale, to, duration, easing)
    }

    pub fn scale_uniform(to: f32, duration: f32, easing: Easing) -> Self {
        Self::scale(Vec2::splat(to), duration, easing)
    }

    pub fn rotation(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::Rotation, Vec2::new(to, 0.0), duration, easing)
    }

    pub fn alpha(to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenProp::Alpha, Vec2::new(to, 0.0), duration, easing)
    }

    // -- Builder methods --

    /// Explicit start value for scalar properties.
    pub fn from_value(mut self, from: f32) -> Self {
        self.from = Some(match self.prop {
            TweenProp::Scale => Vec2::splat(from),
            _ => Vec2::new(from, 0.0),
        });
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self
    }

    pub fn on_complete(mut self, cue: C) -> Self {
        self.on_complete = Some(cue);
        self
    }

    /// Seconds until this tween finishes, delay included. `None` when it
    /// repeats forever.
    pub(crate) fn time_left(&self) -> Option<f32> {
        let total = self.repeat.total_cycles()?;
        let cycles_left = total.saturating_sub(self.cycle) as f32;
        let delay_left = (self.delay - self.waited).max(0.0);
        Some(delay_left + (self.duration.max(0.0) * cycles_left - self.elapsed).max(0.0))
    }

    /// Jump straight to the end state and return the final value.
    pub(crate) fn finish(&mut self, current: impl FnOnce() -> Vec2) -> Vec2 {
        let from = *self.from.get_or_insert_with(current);
        self.waited = self.delay;
        self.cycle = self.repeat.total_cycles().map_or(0, |t| t.saturating_sub(1));
        self.elapsed = self.duration.max(0.0);
        if self.yoyo && self.cycle % 2 == 1 {
            lerp_vec2(from, self.to, self.easing.apply(0.0))
        } else {
            self.to
        }
    }

    /// Advance by `dt`. Returns the value to apply (if started) and whether
    /// the tween has finished.
    pub(crate) fn advance(&mut self, dt: f32, current: impl FnOnce() -> Vec2) -> (Option<Vec2>, bool) {
        let mut dt = dt;
        if self.waited < self.delay {
            let left = self.delay - self.waited;
            if dt < left {
                self.waited += dt;
                return (None, false);
            }
            self.waited = self.delay;
            dt -= left;
        }
        let from = *self.from.get_or_insert_with(current);

        self.elapsed += dt;
        let total = self.repeat.total_cycles();
        let mut finished = false;
        if self.duration <= 0.0 {
            finished = total.is_some();
            self.cycle = total.map_or(0, |t| t.saturating_sub(1));
            self.elapsed = 0.0;
        } else {
            while self.elapsed >= self.duration {
                if total.is_some_and(|t| self.cycle + 1 >= t) {
                    finished = true;
                    self.elapsed = self.duration;
                    break;
                }
                self.elapsed -= self.duration;
                self.cycle += 1;
            }
        }

        let t = if finished || self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        let reversed = self.yoyo && self.cycle % 2 == 1;
        let p = self.easing.apply(if reversed { 1.0 - t } else { t });
        (Some(lerp_vec2(from, self.to, p)), finished)
    }
}

/// Handle to a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(pub u32);

/// All running tweens. `C` is the completion cue type.
#[derive(Debug)]
pub struct TweenState<C> {
    tweens: BTreeMap<TweenId, (EntityId, Tween<C>)>,
    next_id: u32,
}

impl<C> Default for TweenState<C> {
    fn default() -> Self {
        Self { tweens: BTreeMap::new(), next_id: 0 }
    }
}

impl<C> TweenState<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween on `entity`. Tweens on the same property of the same
    /// entity stack; the one added last wins each frame.
    pub fn add(&mut self, entity: EntityId, tween: Tween<C>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Stop every tween targeting `entity` without reporting completion.
    pub fn kill_tweens_of(&mut self, entity: EntityId) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|_, (e, _)| *e != entity);
        before - self.tweens.len()
    }

    /// Advance all tweens, write their values and return the cues of the
    /// tweens that completed this tick, in start order.
    pub fn tick(&mut self, dt: f32, graph: &mut TransformGraph, scene: &mut Scene) -> Vec<C> {
        let mut finished = Vec::new();

        for (&id, (entity, tween)) in self.tweens.iter_mut() {
            let entity = *entity;
            if !graph.contains(entity) && scene.get(entity).is_none() {
                // Target is gone; drop silently.
                finished.push((id, false));
                continue;
            }
            let prop = tween.prop;
            let (value, done) = tween.advance(dt, || read_prop(prop, entity, graph, scene));
            if let Some(value) = value {
                write_prop(prop, value, entity, graph, scene);
            }
            if done {
                finished.push((id, true));
            }
        }

        let mut cues = Vec::new();
        for (id, report) in finished {
            if let Some((_, tween)) = self.tweens.remove(&id) {
                if report {
                    cues.extend(tween.on_complete);
                }
            }
        }
        cues
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

pub(crate) fn read_prop(prop: TweenProp, id: EntityId, graph: &TransformGraph, scene: &Scene) -> Vec2 {
    if let Some(local) = graph.local(id) {
        return match prop {
            TweenProp::Position => local.offset,
            TweenProp::PositionX => Vec2::new(local.offset.x, 0.0),
            TweenProp::PositionY => Vec2::new(local.offset.y, 0.0),
            TweenProp::Scale => local.scale,
            TweenProp::Rotation => Vec2::new(local.rotation, 0.0),
            TweenProp::Alpha => Vec2::new(local.alpha, 0.0),
        };
    }
    let Some(entity) = scene.get(id) else { return Vec2::ZERO };
    match prop {
        TweenProp::Position => entity.pos,
        TweenProp::PositionX => Vec2::new(entity.pos.x, 0.0),
        TweenProp::PositionY => Vec2::new(entity.pos.y, 0.0),
        TweenProp::Scale => entity.scale,
        TweenProp::Rotation => Vec2::new(entity.rotation, 0.0),
        TweenProp::Alpha => Vec2::new(entity.opacity, 0.0),
    }
}

pub(crate) fn write_prop(prop: TweenProp, value: Vec2, id: EntityId, graph: &mut TransformGraph, scene: &mut Scene) {
    if let Some(local) = graph.local_mut(id) {
        match prop {
            TweenProp::Position => local.offset = value,
            TweenProp::PositionX => local.offset.x = value.x,
            TweenProp::PositionY => local.offset.y = value.x,
            TweenProp::Scale => local.scale = value,
            TweenProp::Rotation => local.rotation = value.x,
            TweenProp::Alpha => local.alpha = value.x,
        }
        return;
    }
    if let Some(entity) = scene.get_mut(id) {
        match prop {
            TweenProp::Position => entity.pos = value,
            TweenProp::PositionX => entity.pos.x = value.x,
            TweenProp::PositionY => entity.pos.y = value.x,
            TweenProp::Scale => entity.scale = value,
            TweenProp::Rotation => entity.rotation = value.x,
            TweenProp::Alpha => entity.opacity = value.x,
        }
    }
}
