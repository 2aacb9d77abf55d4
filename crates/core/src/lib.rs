//! Core shared types: math re-exports, bounds and errors.

pub use glam::{Vec2, Vec3, vec2, vec3};

pub mod bounds;
pub mod error;

pub use bounds::Aabb;
pub use error::{MeshError, MeshErrorKind, MeshResult};
