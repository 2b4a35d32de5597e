//! Tiled level loading.

pub mod builder;
pub mod tiled;
