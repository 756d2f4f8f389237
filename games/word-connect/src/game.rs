use glam::Vec2;
use wheel_engine::*;

use crate::board::Board;
use crate::board_view::BoardView;
use crate::cue::{Animations, Cue};
use crate::level::{Level, LevelError};
use crate::wheel::Wheel;
use crate::wheel_view::{WheelEvent, WheelView};

const WORLD_WIDTH: f32 = 720.0;
const WORLD_HEIGHT: f32 = 1280.0;
const STEP_DT: f32 = 1.0 / 60.0;

const BOARD_Y: f32 = WORLD_HEIGHT * 0.18;
const WHEEL_Y: f32 = WORLD_HEIGHT * 0.7;

/// Seconds without input before the tutorial plays.
const IDLE_TIMEOUT: f32 = 4.0;

const PLAY_BUTTON_SIZE: Vec2 = Vec2::new(250.0, 70.0);
const PLAY_BUTTON_TINT: Color = Color::hex(0x333333);
const PLAY_TEXT_SIZE: f32 = 36.0;
const PLAY_PULSE_SCALE: f32 = 1.1;
const PLAY_PULSE_TIME: f32 = 0.8;

const MANIFEST: &str = include_str!("../assets/manifest.json");

// Game event kinds (Rust → host)
pub const EVENT_WORD_SOLVED: f32 = 1.0;
pub const EVENT_WRONG_GUESS: f32 = 2.0;
pub const EVENT_LEVEL_COMPLETE: f32 = 3.0;
pub const EVENT_PLAY_NOW: f32 = 4.0;

/// Scene-side half of the game, built in `init`.
struct Stage {
    board: BoardView,
    wheel: WheelView,
    play_button: EntityId,
}

pub struct WordConnect {
    board: Board,
    wheel: Wheel,
    sprites: SpriteRegistry,
    anim: Animations,
    router: PointerRouter,
    /// Distinct placement words; the level is won when all are solved.
    targets: Vec<String>,
    solved: Vec<String>,
    idle_timer: Option<TimerId>,
    stage: Option<Stage>,
}

impl WordConnect {
    /// The compiled-in level. A broken level is a content bug and aborts.
    pub fn new() -> Self {
        match Level::builtin().and_then(Self::with_level) {
            Ok(game) => game,
            Err(err) => panic!("built-in level is invalid: {err}"),
        }
    }

    pub fn with_level(level: Level) -> Result<Self, LevelError> {
        let targets = level.target_words();
        let board = Board::new(level.placements)?;
        let wheel = Wheel::new(&level.letters);

        let sprites = match AssetManifest::from_json(MANIFEST) {
            Ok(manifest) => SpriteRegistry::from_manifest(&manifest),
            Err(err) => {
                log::warn!("sprite manifest unreadable ({err}), using default cells");
                SpriteRegistry::new()
            }
        };

        Ok(Self {
            board,
            wheel,
            sprites,
            anim: Animations::new(),
            router: PointerRouter::new(),
            targets,
            solved: Vec::new(),
            idle_timer: None,
            stage: None,
        })
    }

    /// Bitmap font used for every text in the game.
    pub fn font(&self) -> FontConfig {
        self.sprites.font().clone()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn wheel(&self) -> &Wheel {
        &self.wheel
    }

    pub fn solved_words(&self) -> &[String] {
        &self.solved
    }

    pub fn is_won(&self) -> bool {
        self.solved.len() == self.targets.len()
    }

    /// Seconds until the tutorial, if the idle timer is armed.
    pub fn idle_time_left(&self) -> Option<f32> {
        self.idle_timer.and_then(|t| self.anim.timers.remaining(t))
    }

    fn reset_idle_timer(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            self.anim.timers.cancel(timer);
        }
        if !self.is_won() {
            self.idle_timer = Some(self.anim.timers.after(IDLE_TIMEOUT, Cue::IdleTimeout));
        }
    }

    fn stop_idle_timer(&mut self) {
        if let Some(timer) = self.idle_timer.take() {
            self.anim.timers.cancel(timer);
        }
    }

    /// Idle timer fired: demonstrate one of the unsolved words.
    fn play_hint(&mut self, stage: &mut Stage, ctx: &mut EngineContext) {
        self.idle_timer = None;
        let remaining: Vec<&String> = self.targets.iter().filter(|w| !self.solved.contains(w)).collect();
        let Some(word) = ctx.rng.choose(&remaining).map(|w| w.to_string()) else { return };
        stage.wheel.play_tutorial(&word, &mut self.wheel, ctx, &mut self.anim);
    }

    fn on_word(&mut self, stage: &mut Stage, word: String, ctx: &mut EngineContext) {
        let origin = stage.wheel.preview_origin(ctx);
        let matched = stage
            .board
            .check_and_reveal(&mut self.board, &word, Some(origin), ctx, &mut self.anim);

        if matched && !self.solved.contains(&word) {
            stage.wheel.handle_correct(&mut self.wheel);
            self.solved.push(word);
            let (count, total) = (self.solved.len(), self.targets.len());
            log::info!("solved '{}' ({count}/{total})", self.solved[count - 1]);
            ctx.emit_event(GameEvent::new(EVENT_WORD_SOLVED).with_payload(count as f32, total as f32, 0.0));
            if self.is_won() {
                log::info!("level complete");
                ctx.emit_event(GameEvent::new(EVENT_LEVEL_COMPLETE));
                self.stop_idle_timer();
            }
        } else {
            if matched {
                log::debug!("'{word}' already solved");
            } else {
                log::debug!("'{word}' is not on the board");
            }
            stage.wheel.handle_wrong(&mut self.wheel, &mut self.anim);
            ctx.emit_event(GameEvent::new(EVENT_WRONG_GUESS));
        }

        self.reset_idle_timer();
    }

    fn drain_wheel(&mut self, stage: &mut Stage, ctx: &mut EngineContext) {
        for event in stage.wheel.drain_events() {
            match event {
                WheelEvent::UserInteraction => self.reset_idle_timer(),
                WheelEvent::WordCreated(word) => self.on_word(stage, word, ctx),
            }
        }
    }

    fn dispatch(&mut self, stage: &mut Stage, cue: Cue, ctx: &mut EngineContext) {
        match cue {
            Cue::CellLanded { cell, flyer } => stage.board.on_landed(cell, flyer, ctx, &mut self.anim),
            Cue::Wheel(cue) => stage.wheel.on_cue(cue, &mut self.wheel, ctx, &mut self.anim),
            Cue::IdleTimeout => self.play_hint(stage, ctx),
        }
    }

    fn spawn_play_button(&mut self, ctx: &mut EngineContext) -> EntityId {
        let button = ctx.spawn_node(
            None,
            |e| {
                e.with_tag("play_now")
                    .with_layer(RenderLayer::UI)
                    .with_size(PLAY_BUTTON_SIZE)
                    .with_sprite(self.sprites.sprite("button_bg").with_tint(PLAY_BUTTON_TINT))
                    .with_text(TextComponent::new("PLAY NOW!", PLAY_TEXT_SIZE, Color::WHITE))
                    .with_hit(HitArea::Rect { half_extents: PLAY_BUTTON_SIZE / 2.0 })
            },
            LocalTransform::at(Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT - 60.0)),
        );
        self.anim.tweens.add(
            button,
            Tween::scale_uniform(PLAY_PULSE_SCALE, PLAY_PULSE_TIME, Easing::SineInOut)
                .yoyo()
                .with_repeat(Repeat::Forever),
        );
        button
    }
}

impl Default for WordConnect {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for WordConnect {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: STEP_DT,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_instances: 512,
            max_vector_vertices: 16384,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        let background = self.sprites.sprite("background");
        ctx.spawn_node(
            None,
            |e| {
                e.with_tag("background")
                    .with_layer(RenderLayer::Backdrop)
                    .with_size(Vec2::new(WORLD_WIDTH, WORLD_HEIGHT))
                    .with_sprite(background)
            },
            LocalTransform::at(Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0)),
        );

        let board = BoardView::new(&self.board, Vec2::new(WORLD_WIDTH * 0.5, BOARD_Y), ctx, &self.sprites);
        let wheel = WheelView::new(&self.wheel, Vec2::new(WORLD_WIDTH * 0.5, WHEEL_Y), ctx, &self.sprites);
        let play_button = self.spawn_play_button(ctx);
        self.stage = Some(Stage { board, wheel, play_button });

        self.reset_idle_timer();
        log::info!(
            "word-connect: {} cells, {} words, letters '{}'",
            self.board.len(),
            self.targets.len(),
            self.wheel.tokens().map(|(_, t)| t.letter).collect::<String>()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let Some(mut stage) = self.stage.take() else { return };

        for raw in input.iter() {
            for event in self.router.route(raw, &ctx.scene) {
                if let PointerEvent::Down { target, .. } = event {
                    self.reset_idle_timer();
                    if target == Some(stage.play_button) {
                        log::info!("play now pressed");
                        ctx.emit_event(GameEvent::new(EVENT_PLAY_NOW));
                        continue;
                    }
                }
                stage.wheel.on_pointer(&event, &mut self.wheel, ctx, &mut self.anim);
                // Judge a finished gesture before the next event can start another.
                self.drain_wheel(&mut stage, ctx);
            }
        }

        let mut cues = self.anim.tick(STEP_DT, ctx);
        cues.extend(stage.wheel.tick_timeline(STEP_DT, ctx));
        for cue in cues {
            self.dispatch(&mut stage, cue, ctx);
        }
        self.drain_wheel(&mut stage, ctx);

        stage.wheel.sync(&self.wheel, ctx, &mut self.anim);
        #[cfg(feature = "vectors")]
        stage.wheel.draw(&self.wheel, ctx);

        self.stage = Some(stage);
    }
}
