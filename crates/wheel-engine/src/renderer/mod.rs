pub mod instance;

pub use instance::{LayerBatch, RenderBuffer, RenderInstance};
