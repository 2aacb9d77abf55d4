//! Asset loading: OBJ meshes via `tobj`.
//! Two paths: raw vertex positions, or a full triangulated [`Mesh`].

pub mod mesh;
pub mod obj;

pub use mesh::{Mesh, MeshGroup};
pub use obj::{MeshLoader, load_mesh, load_positions};
