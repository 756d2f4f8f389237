pub mod render;
pub mod text;
#[cfg(feature = "vectors")]
pub mod vector;
