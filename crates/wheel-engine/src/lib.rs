pub mod api;
pub mod assets;
pub mod bridge;
pub mod components;
pub mod core;
pub mod extensions;
pub mod input;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig};
pub use api::types::{Color, EntityId, GameEvent};
pub use assets::manifest::AssetManifest;
pub use assets::registry::SpriteRegistry;
pub use bridge::protocol::{write_frame, FrameData, ProtocolLayout};
pub use components::entity::{Entity, HitArea};
pub use components::layer::RenderLayer;
pub use components::sprite::{AtlasId, SpriteComponent};
pub use components::text::TextComponent;
pub use core::rng::GameRng;
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use input::{InputEvent, InputQueue, PointerEvent, PointerRouter};
pub use renderer::instance::{LayerBatch, RenderBuffer, RenderInstance};
pub use systems::render::build_render_buffer;
pub use systems::text::{text_width, FontConfig};

#[cfg(feature = "vectors")]
pub use systems::vector::{VectorState, VectorVertex};

pub use extensions::{
    ease, ease_vec2, lerp, lerp_vec2, Easing, LocalTransform, Repeat, Scheduler, TimerId,
    Timeline, TransformGraph, Tween, TweenId, TweenProp, TweenState, WorldTransform,
};
