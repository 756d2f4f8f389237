//! Scene presentation of the letter wheel: tokens, shuffle button, word
//! preview, tutorial hint and hand, plus the vector disc and drag trail.
//!
//! The view translates routed pointer events into `Wheel` transitions and
//! reports what happened through `WheelEvent`s, which the controller drains
//! once per step.

use glam::Vec2;
use wheel_engine::*;
use crate::board_view::ORANGE;
use crate::cue::{Animations, Cue, WheelCue};
use crate::wheel::{slot_position, Driver, TokenId, Wheel, WheelState};

pub const WHEEL_RADIUS: f32 = 85.0;
const DISC_RADIUS: f32 = WHEEL_RADIUS + 45.0;
const DISC_COLOR: Color = Color::WHITE.with_alpha(0.7);

const TOKEN_HIT_RADIUS: f32 = 40.0;
const BUBBLE_SIZE: f32 = 80.0;
const TOKEN_TEXT_SIZE: f32 = 50.0;
const SHUFFLE_BUTTON_SIZE: f32 = 60.0;

const PREVIEW_Y: f32 = -180.0;
const PREVIEW_TEXT_SIZE: f32 = 45.0;
const PILL_PADDING: f32 = 40.0;
const PILL_HEIGHT: f32 = 50.0;
const PILL_RADIUS: f32 = 20.0;
const PREVIEW_POP_SCALE: f32 = 1.1;
const PREVIEW_POP_TIME: f32 = 0.1;

const HINT_Y: f32 = -330.0;
const HINT_RISE_FROM: f32 = -200.0;
const HINT_RISE_TO: f32 = -250.0;
const HINT_SIZE: Vec2 = Vec2::new(340.0, 35.0);
const HINT_TEXT_SIZE: f32 = 28.0;
const HINT_FADE_IN: f32 = 0.5;
const HINT_FADE_OUT: f32 = 0.3;

const HAND_ART_SIZE: Vec2 = Vec2::new(225.0, 250.0);
const HAND_SCALE: f32 = 0.4;
const HAND_ANCHOR: f32 = 0.1;
/// Fingertip offset from the token it points at.
const HAND_OFFSET: Vec2 = Vec2::new(30.0, 30.0);
const HAND_FADE_IN: f32 = 1.0;
const HAND_FADE_OUT: f32 = 0.8;

const GLIDE_TIME: f32 = 0.8;
const BLINK_ALPHA: f32 = 0.2;
const BLINK_TIME: f32 = 0.2;
const PREVIEW_LOOPS: usize = 2;
const HOLD_TIME: f32 = 2.0;

const TRAIL_WIDTH: f32 = 10.0;

const SHUFFLE_TIME: f32 = 0.8;
const SHUFFLE_EASE: Easing = Easing::BackOut(1.2);
const SPIN_TIME: f32 = 0.5;
const SPIN_EASE: Easing = Easing::BackOut(1.7);
const DIP_SCALE: f32 = 0.8;
const DIP_TIME: f32 = 0.1;

const SHAKE_DISTANCE: f32 = 10.0;
const SHAKE_LEG: f32 = 0.08;
const SHAKE_REPEATS: u32 = 5;
const COOLDOWN: f32 = 0.6;

/// Notifications for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WheelEvent {
    /// A real press the wheel accepted (or that hit the wheel disc).
    UserInteraction,
    /// A gesture finished with this word. Fires for tutorial gestures too.
    WordCreated(String),
}

#[derive(Debug, Clone, Copy)]
struct TokenNode {
    node: EntityId,
    bubble: EntityId,
    label: EntityId,
}

#[derive(Debug)]
pub struct WheelView {
    root: EntityId,
    shuffle_button: EntityId,
    /// Indexed by `TokenId`.
    tokens: Vec<TokenNode>,
    preview: EntityId,
    hint: EntityId,
    hand: EntityId,
    font: FontConfig,
    timeline: Option<Timeline<Cue>>,
    pointer: Vec2,
    shown_word: String,
    events: Vec<WheelEvent>,
}

impl WheelView {
    pub fn new(
        wheel: &Wheel,
        at: Vec2,
        ctx: &mut EngineContext,
        sprites: &SpriteRegistry,
    ) -> Self {
        let root = ctx.spawn_node(
            None,
            |e| {
                e.with_tag("wheel")
                    .with_layer(RenderLayer::Wheel)
                    .with_hit(HitArea::Circle { radius: DISC_RADIUS })
            },
            LocalTransform::at(at),
        );

        let shuffle_button = ctx.spawn_node(
            Some(root),
            |e| {
                e.with_tag("shuffle")
                    .with_layer(RenderLayer::Wheel)
                    .with_size(Vec2::splat(SHUFFLE_BUTTON_SIZE))
                    .with_sprite(sprites.sprite("shuffle"))
                    .with_hit(HitArea::Circle { radius: SHUFFLE_BUTTON_SIZE / 2.0 })
            },
            LocalTransform::default(),
        );

        let count = wheel.len();
        let bubble_sprite = sprites.sprite("circle").with_tint(ORANGE);
        let tokens = wheel
            .tokens()
            .map(|(_, token)| {
                let node = ctx.spawn_node(
                    Some(root),
                    |e| {
                        e.with_tag("token")
                            .with_layer(RenderLayer::Wheel)
                            .with_hit(HitArea::Circle { radius: TOKEN_HIT_RADIUS })
                    },
                    LocalTransform::at(slot_position(token.slot, count, WHEEL_RADIUS)),
                );
                let bubble = ctx.spawn_node(
                    Some(node),
                    |e| {
                        e.with_layer(RenderLayer::Wheel)
                            .with_size(Vec2::splat(BUBBLE_SIZE))
                            .with_sprite(bubble_sprite.clone())
                    },
                    LocalTransform::default().hidden(),
                );
                let label = ctx.spawn_node(
                    Some(node),
                    |e| {
                        e.with_layer(RenderLayer::Wheel).with_text(TextComponent::new(
                            token.letter.to_string(),
                            TOKEN_TEXT_SIZE,
                            ORANGE,
                        ))
                    },
                    LocalTransform::default(),
                );
                TokenNode { node, bubble, label }
            })
            .collect();

        let preview = ctx.spawn_node(
            Some(root),
            |e| {
                e.with_tag("preview")
                    .with_layer(RenderLayer::Overlay)
                    .with_text(TextComponent::new("", PREVIEW_TEXT_SIZE, Color::WHITE))
            },
            LocalTransform::at(Vec2::new(0.0, PREVIEW_Y)).hidden(),
        );

        let hint = ctx.spawn_node(
            Some(root),
            |e| {
                e.with_tag("hint")
                    .with_layer(RenderLayer::Overlay)
                    .with_size(HINT_SIZE)
                    .with_sprite(sprites.sprite("green_pane"))
                    .with_text(TextComponent::new("", HINT_TEXT_SIZE, Color::WHITE))
            },
            LocalTransform::at(Vec2::new(0.0, HINT_Y)).with_alpha(0.0).hidden(),
        );

        // The hand node sits on the fingertip; its sprite hangs off it.
        let hand = ctx.spawn_node(
            Some(root),
            |e| e.with_tag("hand").with_layer(RenderLayer::UI),
            LocalTransform::default().with_alpha(0.0).hidden(),
        );
        let hand_size = sprites.size("hand").unwrap_or(HAND_ART_SIZE) * HAND_SCALE;
        ctx.spawn_node(
            Some(hand),
            |e| {
                e.with_layer(RenderLayer::UI)
                    .with_size(hand_size)
                    .with_sprite(sprites.sprite("hand"))
            },
            LocalTransform::at(hand_size * (0.5 - HAND_ANCHOR)),
        );

        Self {
            root,
            shuffle_button,
            tokens,
            preview,
            hint,
            hand,
            font: sprites.font().clone(),
            timeline: None,
            pointer: at,
            shown_word: String::new(),
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn shuffle_button(&self) -> EntityId {
        self.shuffle_button
    }

    pub fn token_node(&self, id: TokenId) -> Option<EntityId> {
        self.tokens.get(id.0).map(|t| t.node)
    }

    pub fn preview(&self) -> EntityId {
        self.preview
    }

    pub fn hint(&self) -> EntityId {
        self.hint
    }

    pub fn hand(&self) -> EntityId {
        self.hand
    }

    /// The tutorial script is still running.
    pub fn is_tutorial_running(&self) -> bool {
        self.timeline.is_some()
    }

    /// World position of the word preview, where revealed letters fly from.
    pub fn preview_origin(&self, ctx: &EngineContext) -> Vec2 {
        ctx.graph.world(self.preview).map_or(self.pointer, |w| w.pos)
    }

    pub fn drain_events(&mut self) -> Vec<WheelEvent> {
        std::mem::take(&mut self.events)
    }

    fn token_of(&self, entity: EntityId) -> Option<TokenId> {
        self.tokens.iter().position(|t| t.node == entity).map(TokenId)
    }

    pub fn on_pointer(
        &mut self,
        event: &PointerEvent,
        wheel: &mut Wheel,
        ctx: &mut EngineContext,
        anim: &mut Animations,
    ) {
        match *event {
            PointerEvent::Down { pos, target } => {
                self.pointer = pos;
                let Some(target) = target else { return };
                if target == self.shuffle_button {
                    if wheel.is_locked() {
                        return;
                    }
                    self.interrupt(wheel, ctx, anim);
                    self.spin_button(ctx, anim);
                    self.shuffle(wheel, ctx, anim);
                } else if let Some(id) = self.token_of(target) {
                    if wheel.is_locked() {
                        return;
                    }
                    self.interrupt(wheel, ctx, anim);
                    if wheel.press(id) {
                        ctx.graph.set_offset(self.preview, Vec2::new(0.0, PREVIEW_Y));
                    }
                } else if target == self.root {
                    self.interrupt(wheel, ctx, anim);
                }
            }
            PointerEvent::Enter { pos, target } => {
                self.pointer = pos;
                if wheel.state() == WheelState::Dragging(Driver::Pointer) {
                    if let Some(id) = self.token_of(target) {
                        wheel.enter(id);
                    }
                }
            }
            PointerEvent::Move { pos } => self.pointer = pos,
            PointerEvent::Up { pos, .. } => {
                self.pointer = pos;
                if wheel.state() != WheelState::Dragging(Driver::Pointer) {
                    return;
                }
                if let Some(word) = wheel.release() {
                    log::debug!("gesture formed '{word}'");
                    self.events.push(WheelEvent::WordCreated(word));
                }
            }
        }
    }

    /// A real press: stop any tutorial and tell the controller.
    fn interrupt(&mut self, wheel: &mut Wheel, ctx: &mut EngineContext, anim: &mut Animations) {
        if wheel.in_tutorial() || self.guide_visible(ctx) {
            log::debug!("tutorial interrupted");
            self.stop_tutorial(wheel, ctx, anim);
        }
        self.events.push(WheelEvent::UserInteraction);
    }

    fn guide_visible(&self, ctx: &EngineContext) -> bool {
        self.timeline.is_some() || ctx.graph.local(self.hand).is_some_and(|l| l.visible)
    }

    /// Kill the tutorial script and guide animations, hide the guide and
    /// return the wheel to idle.
    pub fn stop_tutorial(&mut self, wheel: &mut Wheel, ctx: &mut EngineContext, anim: &mut Animations) {
        if let Some(mut timeline) = self.timeline.take() {
            timeline.kill();
        }
        anim.tweens.kill_tweens_of(self.hand);
        anim.tweens.kill_tweens_of(self.hint);
        ctx.graph.set_visible(self.hand, false);
        ctx.graph.set_visible(self.hint, false);
        if !wheel.finish_tutorial() {
            wheel.cancel_tutorial();
        }
    }

    /// Shuffle the letters and slide every token to its new slot.
    pub fn shuffle(&mut self, wheel: &mut Wheel, ctx: &mut EngineContext, anim: &mut Animations) -> bool {
        if !wheel.shuffle(&mut ctx.rng) {
            return false;
        }
        let count = wheel.len();
        for (id, token) in wheel.tokens() {
            let Some(node) = self.tokens.get(id.0).map(|t| t.node) else { continue };
            anim.tweens.kill_tweens_of(node);
            anim.tweens.add(
                node,
                Tween::position(slot_position(token.slot, count, WHEEL_RADIUS), SHUFFLE_TIME, SHUFFLE_EASE),
            );
        }
        let letters: String = wheel.order().iter().filter_map(|&id| wheel.token(id)).map(|t| t.letter).collect();
        log::debug!("shuffled to '{letters}'");
        true
    }

    fn spin_button(&self, ctx: &mut EngineContext, anim: &mut Animations) {
        let button = self.shuffle_button;
        anim.tweens.kill_tweens_of(button);
        if let Some(local) = ctx.graph.local_mut(button) {
            local.rotation = 0.0;
            local.scale = Vec2::ONE;
        }
        anim.tweens.add(button, Tween::rotation(std::f32::consts::TAU, SPIN_TIME, SPIN_EASE));
        anim.tweens.add(
            button,
            Tween::scale_uniform(DIP_SCALE, DIP_TIME, Easing::Power1Out)
                .yoyo()
                .with_repeat(Repeat::Times(1)),
        );
    }

    fn hand_spot(wheel: &Wheel, id: TokenId) -> Vec2 {
        let slot = wheel.token(id).map_or(0, |t| t.slot);
        slot_position(slot, wheel.len(), WHEEL_RADIUS) + HAND_OFFSET
    }

    /// Demonstrate `word`: show the hint and hand, trace the path twice, then
    /// drag it for real and release it. Refused unless the wheel is idle.
    pub fn play_tutorial(
        &mut self,
        word: &str,
        wheel: &mut Wheel,
        ctx: &mut EngineContext,
        anim: &mut Animations,
    ) -> bool {
        if !wheel.begin_tutorial() {
            log::debug!("tutorial for '{word}' refused while {:?}", wheel.state());
            return false;
        }

        if let Some(text) = ctx.scene.get_mut(self.hint).and_then(|e| e.text.as_mut()) {
            text.content = format!("Connect the letters {word}");
        }
        anim.tweens.kill_tweens_of(self.hint);
        if let Some(local) = ctx.graph.local_mut(self.hint) {
            local.visible = true;
            local.offset.y = HINT_RISE_FROM;
            local.alpha = 0.0;
        }
        anim.tweens.add(self.hint, Tween::alpha(1.0, HINT_FADE_IN, Easing::Power1Out));
        anim.tweens.add(self.hint, Tween::y(HINT_RISE_TO, HINT_FADE_IN, Easing::Power1Out));

        anim.tweens.kill_tweens_of(self.hand);
        if let Some(local) = ctx.graph.local_mut(self.hand) {
            local.visible = true;
            local.alpha = 0.0;
        }
        anim.tweens.add(self.hand, Tween::alpha(1.0, HAND_FADE_IN, Easing::Power1Out));

        let path = wheel.tutorial_path(word);
        let Some(&first) = path.first() else {
            log::warn!("no letters on the wheel for '{word}'");
            self.stop_tutorial(wheel, ctx, anim);
            return false;
        };
        let spots: Vec<Vec2> = path.iter().map(|&id| Self::hand_spot(wheel, id)).collect();

        let hand = self.hand;
        let mut timeline: Timeline<Cue> = Timeline::new();
        for _ in 0..PREVIEW_LOOPS {
            timeline.set(hand, TweenProp::Position, spots[0]);
            for &spot in &spots[1..] {
                timeline.to(hand, Tween::position(spot, GLIDE_TIME, Easing::SineInOut));
            }
            timeline
                .to(hand, Tween::alpha(BLINK_ALPHA, BLINK_TIME, Easing::Power1Out))
                .to(hand, Tween::alpha(1.0, BLINK_TIME, Easing::Power1Out));
        }
        timeline
            .set(hand, TweenProp::Position, spots[0])
            .call(WheelCue::BeginTrace(first).into());
        for (&id, &spot) in path.iter().zip(&spots).skip(1) {
            timeline.to(
                hand,
                Tween::position(spot, GLIDE_TIME, Easing::SineInOut).on_complete(WheelCue::Select(id).into()),
            );
        }
        timeline.wait(HOLD_TIME).call(WheelCue::Release.into());
        self.timeline = Some(timeline);

        log::info!("tutorial: showing '{word}'");
        true
    }

    /// Advance the tutorial script.
    pub fn tick_timeline(&mut self, dt: f32, ctx: &mut EngineContext) -> Vec<Cue> {
        let Some(timeline) = self.timeline.as_mut() else { return Vec::new() };
        let cues = timeline.tick(dt, &mut ctx.graph, &mut ctx.scene);
        if timeline.is_finished() {
            self.timeline = None;
        }
        cues
    }

    pub fn on_cue(&mut self, cue: WheelCue, wheel: &mut Wheel, ctx: &mut EngineContext, anim: &mut Animations) {
        match cue {
            WheelCue::ShakeSettled => {
                if let Some(local) = ctx.graph.local_mut(self.preview) {
                    local.offset.x = 0.0;
                }
            }
            WheelCue::Unlock => {
                if wheel.unlock() {
                    log::debug!("wheel unlocked");
                }
            }
            WheelCue::BeginTrace(first) => {
                wheel.begin_trace(first);
            }
            WheelCue::Select(id) => {
                if wheel.state() == WheelState::Dragging(Driver::Tutorial) {
                    wheel.enter(id);
                }
            }
            WheelCue::Release => {
                anim.tweens.add(self.hint, Tween::alpha(0.0, HINT_FADE_OUT, Easing::Power1Out));
                if wheel.state() == WheelState::Dragging(Driver::Tutorial) {
                    if let Some(word) = wheel.release() {
                        self.events.push(WheelEvent::WordCreated(word));
                    }
                }
                anim.tweens.add(
                    self.hand,
                    Tween::alpha(0.0, HAND_FADE_OUT, Easing::Power1Out)
                        .on_complete(WheelCue::TutorialDone.into()),
                );
            }
            WheelCue::TutorialDone => self.stop_tutorial(wheel, ctx, anim),
        }
    }

    /// The guess was new and correct.
    pub fn handle_correct(&mut self, wheel: &mut Wheel) {
        wheel.clear_selection();
    }

    /// The guess was wrong or a repeat: lock, shake the preview and unlock
    /// after the cooldown. Ignored while a cooldown is already running.
    pub fn handle_wrong(&mut self, wheel: &mut Wheel, anim: &mut Animations) -> bool {
        if !wheel.lock() {
            return false;
        }
        anim.tweens.add(
            self.preview,
            Tween::x(SHAKE_DISTANCE, SHAKE_LEG, Easing::SineInOut)
                .from_value(-SHAKE_DISTANCE)
                .with_repeat(Repeat::Times(SHAKE_REPEATS))
                .yoyo()
                .on_complete(WheelCue::ShakeSettled.into()),
        );
        anim.timers.after(COOLDOWN, WheelCue::Unlock.into());
        true
    }

    /// Mirror the selection onto the tokens and the preview.
    pub fn sync(&mut self, wheel: &Wheel, ctx: &mut EngineContext, anim: &mut Animations) {
        for (i, token) in self.tokens.iter().enumerate() {
            let selected = wheel.is_selected(TokenId(i));
            if ctx.graph.local(token.bubble).is_some_and(|l| l.visible != selected) {
                ctx.graph.set_visible(token.bubble, selected);
            }
            if let Some(text) = ctx.scene.get_mut(token.label).and_then(|e| e.text.as_mut()) {
                text.color = if selected { Color::WHITE } else { ORANGE };
            }
        }

        let word = wheel.word();
        if word == self.shown_word {
            return;
        }
        if let Some(text) = ctx.scene.get_mut(self.preview).and_then(|e| e.text.as_mut()) {
            text.content = word.clone();
        }
        if word.is_empty() {
            anim.tweens.kill_tweens_of(self.preview);
            if let Some(local) = ctx.graph.local_mut(self.preview) {
                local.visible = false;
                local.offset.x = 0.0;
                local.scale = Vec2::ONE;
            }
        } else {
            if let Some(local) = ctx.graph.local_mut(self.preview) {
                local.visible = true;
                local.scale = Vec2::splat(PREVIEW_POP_SCALE);
            }
            anim.tweens.add(self.preview, Tween::scale_uniform(1.0, PREVIEW_POP_TIME, Easing::Power1Out));
        }
        self.shown_word = word;
    }

    /// Disc, drag trail and preview pill for this step.
    #[cfg(feature = "vectors")]
    pub fn draw(&self, wheel: &Wheel, ctx: &mut EngineContext) {
        let center = ctx.graph.to_world(self.root, Vec2::ZERO);
        ctx.vectors.fill_circle(RenderLayer::Wheel, center, DISC_RADIUS, DISC_COLOR);

        if let WheelState::Dragging(driver) = wheel.state() {
            let mut points: Vec<Vec2> = wheel
                .selection()
                .iter()
                .filter_map(|id| self.tokens.get(id.0))
                .filter_map(|t| ctx.graph.world(t.node))
                .map(|w| w.pos)
                .collect();
            if !points.is_empty() {
                let end = match driver {
                    Driver::Pointer => self.pointer,
                    Driver::Tutorial => {
                        let tip = ctx.graph.local(self.hand).map_or(Vec2::ZERO, |l| l.offset);
                        ctx.graph.to_world(self.root, tip - HAND_OFFSET)
                    }
                };
                points.push(end);
                ctx.vectors.stroke_polyline(RenderLayer::Wheel, &points, TRAIL_WIDTH, ORANGE);
            }
        }

        if let Some(preview) = ctx.graph.world(self.preview) {
            if preview.visible && !self.shown_word.is_empty() {
                let width = text_width(&self.shown_word, PREVIEW_TEXT_SIZE, &self.font) + PILL_PADDING;
                ctx.vectors.fill_rounded_rect(
                    RenderLayer::Overlay,
                    preview.pos,
                    Vec2::new(width, PILL_HEIGHT) * preview.scale,
                    PILL_RADIUS * preview.scale.x,
                    ORANGE.with_alpha(preview.alpha),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        wheel: Wheel,
        view: WheelView,
        ctx: EngineContext,
        anim: Animations,
        router: PointerRouter,
        events: Vec<WheelEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let wheel = Wheel::new(&['G', 'O', 'D', 'L']);
            let mut ctx = EngineContext::default();
            let view = WheelView::new(&wheel, Vec2::new(360.0, 896.0), &mut ctx, &SpriteRegistry::new());
            ctx.graph.propagate(&mut ctx.scene);
            Self {
                wheel,
                view,
                ctx,
                anim: Animations::new(),
                router: PointerRouter::new(),
                events: Vec::new(),
            }
        }

        fn token_pos(&self, i: usize) -> Vec2 {
            let node = self.view.token_node(TokenId(i)).unwrap();
            self.ctx.scene.get(node).unwrap().pos
        }

        fn send(&mut self, input: InputEvent) {
            for event in self.router.route(&input, &self.ctx.scene) {
                self.view.on_pointer(&event, &mut self.wheel, &mut self.ctx, &mut self.anim);
            }
            self.settle();
        }

        fn drag(&mut self, path: &[usize]) {
            let pos = self.token_pos(path[0]);
            self.send(InputEvent::PointerDown { pos });
            for &i in &path[1..] {
                let pos = self.token_pos(i);
                self.send(InputEvent::PointerMove { pos });
            }
            let pos = self.token_pos(*path.last().unwrap());
            self.send(InputEvent::PointerUp { pos });
        }

        fn settle(&mut self) {
            self.view.sync(&self.wheel, &mut self.ctx, &mut self.anim);
            self.ctx.graph.propagate(&mut self.ctx.scene);
            self.events.extend(self.view.drain_events());
        }

        fn step(&mut self) {
            let mut cues = self.anim.tick(DT, &mut self.ctx);
            cues.extend(self.view.tick_timeline(DT, &mut self.ctx));
            for cue in cues {
                if let Cue::Wheel(cue) = cue {
                    self.view.on_cue(cue, &mut self.wheel, &mut self.ctx, &mut self.anim);
                }
            }
            self.settle();
        }

        fn run(&mut self, seconds: f32) {
            for _ in 0..(seconds / DT).ceil() as usize {
                self.step();
            }
        }

        fn words(&self) -> Vec<String> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    WheelEvent::WordCreated(w) => Some(w.clone()),
                    WheelEvent::UserInteraction => None,
                })
                .collect()
        }

        fn visible(&self, id: EntityId) -> bool {
            self.ctx.graph.local(id).unwrap().visible
        }
    }

    #[test]
    fn tokens_sit_on_the_circle() {
        let rig = Rig::new();
        let top = rig.token_pos(0);
        assert!((top - Vec2::new(360.0, 896.0 - WHEEL_RADIUS)).length() < 1e-3);
        let right = rig.token_pos(1);
        assert!((right - Vec2::new(360.0 + WHEEL_RADIUS, 896.0)).length() < 1e-3);
    }

    #[test]
    fn drag_creates_word_and_shows_preview() {
        let mut rig = Rig::new();
        let pos = rig.token_pos(0);
        rig.send(InputEvent::PointerDown { pos });
        let pos = rig.token_pos(1);
        rig.send(InputEvent::PointerMove { pos });
        assert!(rig.visible(rig.view.preview()));
        let text = rig.ctx.scene.get(rig.view.preview()).unwrap().text.as_ref().unwrap();
        assert_eq!(text.content, "GO");

        let pos = rig.token_pos(2);
        rig.send(InputEvent::PointerMove { pos });
        rig.send(InputEvent::PointerUp { pos });
        assert_eq!(rig.words(), vec!["GOD"]);
        assert_eq!(rig.events[0], WheelEvent::UserInteraction);
        assert_eq!(rig.wheel.state(), WheelState::Idle);
    }

    #[test]
    fn correct_answer_clears_selection() {
        let mut rig = Rig::new();
        rig.drag(&[2, 1, 0]);
        assert_eq!(rig.words(), vec!["DOG"]);
        rig.view.handle_correct(&mut rig.wheel);
        rig.settle();
        assert!(rig.wheel.selection().is_empty());
        assert!(!rig.visible(rig.view.preview()));
    }

    #[test]
    fn wrong_answer_locks_then_recovers() {
        let mut rig = Rig::new();
        rig.drag(&[3, 1, 0]);
        assert!(rig.view.handle_wrong(&mut rig.wheel, &mut rig.anim));
        assert!(!rig.view.handle_wrong(&mut rig.wheel, &mut rig.anim));
        rig.events.clear();

        // Presses are swallowed while locked.
        let pos = rig.token_pos(0);
        rig.send(InputEvent::PointerDown { pos });
        rig.send(InputEvent::PointerUp { pos });
        assert!(rig.events.is_empty());
        assert!(rig.wheel.is_locked());

        rig.run(0.7);
        assert_eq!(rig.wheel.state(), WheelState::Idle);
        assert!(rig.wheel.selection().is_empty());
        assert_eq!(rig.ctx.graph.local(rig.view.preview()).unwrap().offset.x, 0.0);
        assert!(!rig.visible(rig.view.preview()));
    }

    #[test]
    fn tutorial_plays_through() {
        let mut rig = Rig::new();
        assert!(rig.view.play_tutorial("GOD", &mut rig.wheel, &mut rig.ctx, &mut rig.anim));
        assert!(!rig.view.play_tutorial("LOG", &mut rig.wheel, &mut rig.ctx, &mut rig.anim));
        rig.settle();
        assert!(rig.visible(rig.view.hand()));
        assert!(rig.visible(rig.view.hint()));
        let hint = rig.ctx.scene.get(rig.view.hint()).unwrap().text.as_ref().unwrap();
        assert_eq!(hint.content, "Connect the letters GOD");

        rig.run(9.0);
        assert_eq!(rig.words(), vec!["GOD"]);
        assert!(!rig.events.contains(&WheelEvent::UserInteraction));
        assert_eq!(rig.wheel.state(), WheelState::Idle);
        assert!(!rig.view.is_tutorial_running());
        assert!(!rig.visible(rig.view.hand()));
        assert!(!rig.visible(rig.view.hint()));
    }

    #[test]
    fn tutorial_traces_the_path() {
        let mut rig = Rig::new();
        rig.view.play_tutorial("GOD", &mut rig.wheel, &mut rig.ctx, &mut rig.anim);
        // Two preview loops of two glides plus a blink each.
        rig.run(4.1);
        assert_eq!(rig.wheel.state(), WheelState::Dragging(Driver::Tutorial));
        assert_eq!(rig.wheel.selection(), &[TokenId(0)]);
        rig.run(1.7);
        assert_eq!(rig.wheel.word(), "GOD");
    }

    #[test]
    fn press_mid_tutorial_cancels_it() {
        let mut rig = Rig::new();
        rig.view.play_tutorial("GOD", &mut rig.wheel, &mut rig.ctx, &mut rig.anim);
        rig.run(5.0);
        assert!(!rig.wheel.selection().is_empty());

        let pos = rig.token_pos(3);
        rig.send(InputEvent::PointerDown { pos });
        assert_eq!(rig.events, vec![WheelEvent::UserInteraction]);
        assert_eq!(rig.wheel.selection(), &[TokenId(3)]);
        assert!(!rig.view.is_tutorial_running());
        assert!(!rig.visible(rig.view.hand()));

        rig.send(InputEvent::PointerUp { pos });
        rig.run(6.0);
        assert_eq!(rig.words(), vec!["L"]);
    }

    #[test]
    fn pressing_the_disc_stops_a_tutorial() {
        let mut rig = Rig::new();
        rig.view.play_tutorial("LOG", &mut rig.wheel, &mut rig.ctx, &mut rig.anim);
        rig.run(1.0);
        // Between two tokens, inside the disc.
        let pos = Vec2::new(360.0 + 110.0, 896.0 + 50.0);
        rig.send(InputEvent::PointerDown { pos });
        assert_eq!(rig.wheel.state(), WheelState::Idle);
        assert!(rig.wheel.selection().is_empty());
        assert_eq!(rig.events, vec![WheelEvent::UserInteraction]);
    }

    #[test]
    fn shuffle_button_moves_tokens() {
        let mut rig = Rig::new();
        let button = rig.ctx.scene.get(rig.view.shuffle_button()).unwrap().pos;
        let before: Vec<usize> = rig.wheel.tokens().map(|(_, t)| t.slot).collect();
        let mut after = before.clone();
        for _ in 0..8 {
            rig.send(InputEvent::PointerDown { pos: button });
            rig.send(InputEvent::PointerUp { pos: button });
            rig.run(1.0);
            after = rig.wheel.tokens().map(|(_, t)| t.slot).collect();
            if after != before {
                break;
            }
        }
        assert_ne!(after, before);
        for (id, token) in rig.wheel.tokens() {
            let expected = Vec2::new(360.0, 896.0) + slot_position(token.slot, 4, WHEEL_RADIUS);
            assert!((rig.token_pos(id.0) - expected).length() < 1e-2);
        }
        assert!(rig.words().is_empty());
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn trail_follows_the_drag() {
        let mut rig = Rig::new();
        rig.view.draw(&rig.wheel, &mut rig.ctx);
        let disc_only = rig.ctx.vectors.layer_vertex_count(RenderLayer::Wheel);
        assert!(disc_only > 0);
        assert_eq!(rig.ctx.vectors.layer_vertex_count(RenderLayer::Overlay), 0);

        rig.ctx.vectors.clear();
        let pos = rig.token_pos(0);
        rig.send(InputEvent::PointerDown { pos });
        rig.send(InputEvent::PointerMove { pos: pos + Vec2::new(40.0, 60.0) });
        rig.view.draw(&rig.wheel, &mut rig.ctx);
        assert!(rig.ctx.vectors.layer_vertex_count(RenderLayer::Wheel) > disc_only);
        assert!(rig.ctx.vectors.layer_vertex_count(RenderLayer::Overlay) > 0);
    }
}
