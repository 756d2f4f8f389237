// extensions/timeline.rs
//
// Sequential animation script. Steps run one after another on the frame clock;
// `Call` steps and the cues of finished `To` steps come back from `tick` in
// order. Killing a timeline drops every pending step silently.
//
// Usage:
//   let mut tl = Timeline::new();
//   tl.set(hand, TweenProp::Position, start)
//     .to(hand, Tween::position(next, 0.8, Easing::SineInOut))
//     .call(Cue::Release)
//     .wait(2.0);
//   for cue in tl.tick(dt, &mut graph, &mut scene) { /* react */ }

use std::collections::VecDeque;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::core::scene::Scene;
use super::transform::TransformGraph;
use super::tween::{read_prop, write_prop, Repeat, Tween, TweenProp};

#[derive(Debug, Clone)]
enum Step<C> {
    Set { entity: EntityId, prop: TweenProp, value: Vec2 },
    To { entity: EntityId, tween: Tween<C> },
    Call(C),
    Wait(f32),
}

#[derive(Debug, Clone)]
pub struct Timeline<C> {
    steps: VecDeque<Step<C>>,
    killed: bool,
}

impl<C> Default for Timeline<C> {
    fn default() -> Self {
        Self { steps: VecDeque::new(), killed: false }
    }
}

impl<C> Timeline<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantly set a property. Scalar properties read `value.x`.
    pub fn set(&mut self, entity: EntityId, prop: TweenProp, value: Vec2) -> &mut Self {
        self.steps.push_back(Step::Set { entity, prop, value });
        self
    }

    /// Run a tween to completion before moving on. Repeating-forever tweens
    /// are not allowed here and are played once.
    pub fn to(&mut self, entity: EntityId, mut tween: Tween<C>) -> &mut Self {
        if tween.repeat == Repeat::Forever {
            tween.repeat = Repeat::Never;
        }
        self.steps.push_back(Step::To { entity, tween });
        self
    }

    pub fn call(&mut self, cue: C) -> &mut Self {
        self.steps.push_back(Step::Call(cue));
        self
    }

    pub fn wait(&mut self, seconds: f32) -> &mut Self {
        self.steps.push_back(Step::Wait(seconds.max(0.0)));
        self
    }

    pub fn kill(&mut self) {
        self.steps.clear();
        self.killed = true;
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Nothing left to run.
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Advance by `dt`, carrying leftover time into following steps.
    pub fn tick(&mut self, dt: f32, graph: &mut TransformGraph, scene: &mut Scene) -> Vec<C> {
        let mut fired = Vec::new();
        let mut budget = dt.max(0.0);

        while let Some(step) = self.steps.front_mut() {
            match step {
                Step::Set { entity, prop, value } => {
                    write_prop(*prop, *value, *entity, graph, scene);
                }
                Step::Wait(left) => {
                    if budget < *left {
                        *left -= budget;
                        return fired;
                    }
                    budget -= *left;
                }
                Step::To { entity, tween } => {
                    let (entity, prop) = (*entity, tween.prop);
                    let left = tween.time_left().unwrap_or(0.0);
                    if budget < left {
                        let (value, _) = tween.advance(budget, || read_prop(prop, entity, graph, scene));
                        if let Some(value) = value {
                            write_prop(prop, value, entity, graph, scene);
                        }
                        return fired;
                    }
                    budget -= left;
                    let value = tween.finish(|| read_prop(prop, entity, graph, scene));
                    write_prop(prop, value, entity, graph, scene);
                }
                Step::Call(_) => {}
            }

            match self.steps.pop_front() {
                Some(Step::Call(cue)) => fired.push(cue),
                Some(Step::To { tween, .. }) => fired.extend(tween.on_complete),
                _ => {}
            }
        }
        fired
    }
}
