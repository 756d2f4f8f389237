use wheel_engine::{EngineContext, EntityId, Scheduler, TweenState};
use crate::board::CellId;
use crate::wheel::TokenId;

/// Completion values reported by tweens, the tutorial timeline and timers.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// A revealed letter finished its flight.
    CellLanded { cell: CellId, flyer: EntityId },
    Wheel(WheelCue),
    /// The player has been inactive long enough for a tutorial.
    IdleTimeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelCue {
    /// Wrong-answer shake ended; recentre the preview.
    ShakeSettled,
    /// Wrong-answer cooldown ended.
    Unlock,
    /// Tutorial starts its synthetic drag on this token.
    BeginTrace(TokenId),
    /// Tutorial hand reached this token.
    Select(TokenId),
    /// Tutorial lets go of its word.
    Release,
    /// Tutorial guide finished fading out.
    TutorialDone,
}

impl From<WheelCue> for Cue {
    fn from(cue: WheelCue) -> Self {
        Cue::Wheel(cue)
    }
}

/// Free-running tweens and deferred calls shared by the views and the controller.
#[derive(Debug, Default)]
pub struct Animations {
    pub tweens: TweenState<Cue>,
    pub timers: Scheduler<Cue>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance tweens, then timers. Cues come back in that order.
    pub fn tick(&mut self, dt: f32, ctx: &mut EngineContext) -> Vec<Cue> {
        let mut cues = self.tweens.tick(dt, &mut ctx.graph, &mut ctx.scene);
        cues.extend(self.timers.tick(dt));
        cues
    }
}
