//! Runtime implementations of the core oracle traits.
mod map;

pub use map::ArenaMap;
