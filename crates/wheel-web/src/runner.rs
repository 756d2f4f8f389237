use wheel_engine::{
    build_render_buffer, write_frame, EngineContext, FontConfig, FrameData, FixedTimestep, Game,
    GameConfig, GameRng, InputEvent, InputQueue, ProtocolLayout, RenderBuffer, RenderLayer,
};

/// Generic game runner that wires up the engine loop.
///
/// Each game crate stores one of these in a `thread_local!` (see
/// `export_game!`) because wasm-bindgen cannot export generic structs.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    font: FontConfig,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    frame: Vec<f32>,
    frame_counter: u32,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        Self::with_seed(game, GameRng::DEFAULT_SEED)
    }

    /// Runner whose RNG starts from `seed`.
    pub fn with_seed(game: G, seed: u64) -> Self {
        let config = game.config();
        let layout = ProtocolLayout::from_config(&config);

        Self {
            game,
            ctx: EngineContext::new(seed),
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(),
            font: FontConfig::default(),
            timestep: FixedTimestep::new(config.fixed_dt),
            frame: vec![0.0; layout.buffer_total_floats],
            layout,
            config,
            frame_counter: 0,
            initialized: false,
        }
    }

    /// Font used to lay out text components.
    pub fn set_font(&mut self, font: FontConfig) {
        self.font = font;
    }

    /// Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.ctx.graph.propagate(&mut self.ctx.scene);
        self.initialized = true;
        log::info!(
            "runner: {}x{} world, {} floats frame buffer, seed {}",
            self.config.world_width,
            self.config.world_height,
            self.layout.buffer_total_floats,
            self.ctx.rng.seed()
        );
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: fixed steps, then pack the frame buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            #[cfg(feature = "vectors")]
            self.ctx.vectors.clear();

            if step == 0 {
                self.game.update(&mut self.ctx, &self.input);
                // Input is delivered exactly once, on the first step.
                self.input.drain();
            } else {
                self.game.update(&mut self.ctx, &InputQueue::new());
            }
            self.ctx.graph.propagate(&mut self.ctx.scene);
        }

        self.pack_frame();
    }

    fn pack_frame(&mut self) {
        build_render_buffer(self.ctx.scene.iter(), &self.font, &mut self.render_buffer);

        #[cfg(feature = "vectors")]
        let vector_layers: Vec<&[f32]> = RenderLayer::ALL
            .iter()
            .map(|&layer| self.ctx.vectors.layer_vertices(layer))
            .collect();
        #[cfg(not(feature = "vectors"))]
        let vector_layers: Vec<&[f32]> = Vec::new();

        let mut counts = [0usize; RenderLayer::COUNT];
        for (slot, layer) in counts.iter_mut().zip(&vector_layers) {
            *slot = layer.len() / wheel_engine::bridge::protocol::VECTOR_VERTEX_FLOATS;
        }
        self.render_buffer.set_vector_counts(counts);

        self.frame_counter = self.frame_counter.wrapping_add(1);
        let written = write_frame(&mut self.frame, &self.layout, &FrameData {
            frame_counter: self.frame_counter,
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            instances: &self.render_buffer.instances,
            batches: &self.render_buffer.batches,
            vector_layers: &vector_layers,
            events: &self.ctx.events,
        });
        if written.instances < self.render_buffer.instances.len() {
            log::warn!(
                "frame: {} instances over capacity dropped",
                self.render_buffer.instances.len() - written.instances
            );
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    // ---- Frame buffer accessors ----

    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.frame.len() as u32
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_vector_vertices(&self) -> u32 {
        self.layout.max_vector_vertices as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }
}
