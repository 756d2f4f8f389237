pub mod pointer;
pub mod queue;

pub use pointer::{PointerEvent, PointerRouter};
pub use queue::{InputEvent, InputQueue};
