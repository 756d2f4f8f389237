// extensions/easing.rs
//
// Easing curves used by tweens and timelines. Pure math, no scene access.

use std::f32::consts::PI;

/// Easing curve applied to normalized tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Quadratic deceleration. The usual choice for fades.
    Power1Out,
    /// Cubic deceleration (fast start, soft landing).
    Power2Out,
    /// Half-cosine: slow start, slow end.
    SineInOut,
    /// Overshoots the target then settles. The value is the overshoot
    /// strength; 1.70158 is the conventional default.
    BackOut(f32),
}

impl Easing {
    /// Conventional back-out overshoot.
    pub const BACK_OUT: Easing = Easing::BackOut(1.70158);

    /// Map `t` in [0, 1] to eased progress. Back curves may leave [0, 1]
    /// mid-flight but always end exactly at 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Power2Out => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u * u * u + overshoot * u * u
            }
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[inline]
pub fn ease_vec2(a: glam::Vec2, b: glam::Vec2, t: f32, easing: Easing) -> glam::Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}
