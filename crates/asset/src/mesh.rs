//! CPU-side mesh representation produced by the loaders.

use std::ops::Range;

use corelib::{Aabb, MeshError, MeshResult, Vec2, Vec3};

/// Named run of triangles sharing one material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshGroup {
    pub name: String,
    /// Offset into [`Mesh::indices`]; always a multiple of 3.
    pub first_index: usize,
    pub index_count: usize,
    /// Index into [`Mesh::materials`].
    pub material: Option<usize>,
}

impl MeshGroup {
    #[inline]
    pub fn index_range(&self) -> Range<usize> {
        self.first_index..self.first_index + self.index_count
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }
}

/// Indexed triangle mesh. `normals` and `texcoords` are either empty or
/// parallel to `positions`; `indices` addresses all three.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub texcoords: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub groups: Vec<MeshGroup>,
    /// Material names from the referenced `.mtl` library.
    pub materials: Vec<String>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    #[inline]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// Vertex indices of each triangle, in index-buffer order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Material of triangle `face`, resolved through its group.
    pub fn face_material(&self, face: usize) -> Option<usize> {
        let index = face.checked_mul(3)?;
        self.groups
            .iter()
            .find(|g| g.index_range().contains(&index))
            .and_then(|g| g.material)
    }

    /// Bounds of every position, referenced or not.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// Check the structural invariants: index bounds, attribute lengths and
    /// group coverage.
    pub fn validate(&self) -> MeshResult<()> {
        let vertex_count = self.positions.len();
        if self.has_normals() && self.normals.len() != vertex_count {
            return Err(MeshError::InvalidMesh(format!(
                "{} normals for {} positions",
                self.normals.len(),
                vertex_count
            )));
        }
        if self.has_texcoords() && self.texcoords.len() != vertex_count {
            return Err(MeshError::InvalidMesh(format!(
                "{} texcoords for {} positions",
                self.texcoords.len(),
                vertex_count
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some((i, &idx)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &idx)| idx as usize >= vertex_count)
        {
            return Err(MeshError::InvalidMesh(format!(
                "index {idx} at {i} out of bounds (vertices={vertex_count})"
            )));
        }

        let mut cursor = 0;
        for group in &self.groups {
            if group.first_index != cursor || group.index_count % 3 != 0 {
                return Err(MeshError::InvalidMesh(format!(
                    "group '{}' covers {:?}, expected to start at {}",
                    group.name,
                    group.index_range(),
                    cursor
                )));
            }
            if let Some(material) = group.material {
                if material >= self.materials.len() {
                    return Err(MeshError::InvalidMesh(format!(
                        "group '{}' references material {} of {}",
                        group.name,
                        material,
                        self.materials.len()
                    )));
                }
            }
            cursor += group.index_count;
        }
        if cursor != self.indices.len() {
            return Err(MeshError::InvalidMesh(format!(
                "groups cover {} of {} indices",
                cursor,
                self.indices.len()
            )));
        }

        Ok(())
    }
}
