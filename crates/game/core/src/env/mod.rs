//! Traits describing the world outside a single character.
//!
//! The rules never own the scene; they query it through these oracles so the
//! runtime is free to back them with whatever spatial structure it likes.
mod map;
mod scene;

pub use map::{MapDimensions, MapOracle};
pub use scene::{EntityView, SceneOracle};
