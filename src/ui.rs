//! UI rendering for roam.

pub mod render;

pub use render::render;
