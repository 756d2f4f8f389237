// extensions/mod.rs
//
// Animation and scheduling helpers layered over the scene. Games own these
// directly; the engine core never ticks them on its own.

pub mod easing;
pub mod scheduler;
pub mod timeline;
pub mod transform;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use scheduler::{Scheduler, TimerId};
pub use timeline::Timeline;
pub use transform::{LocalTransform, TransformGraph, WorldTransform};
pub use tween::{Repeat, Tween, TweenId, TweenProp, TweenState};
