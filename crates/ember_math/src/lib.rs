//! Ember math - vectors, rays and bounds shared by the scene and renderer crates.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;
pub mod sampling;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use vector::{lerp, reflect};
