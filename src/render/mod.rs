//! GPU rendering of the marker batch.

pub mod pipeline;

pub use pipeline::{MarkerPipeline, MarkerUniform, SpriteAtlas};
