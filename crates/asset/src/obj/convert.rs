//! Translation of `tobj` output into [`Mesh`].

use corelib::{MeshError, MeshResult, Vec2, Vec3};

use crate::mesh::{Mesh, MeshGroup};

/// Merge single-indexed, triangulated `tobj` models into one mesh.
/// Normals/texcoords survive only if every model carries a full array.
pub(crate) fn merge_models(models: &[tobj::Model], materials: Vec<String>) -> MeshResult<Mesh> {
    let keep_normals = attribute_everywhere(models, "normals", |m| &m.normals, 3);
    let keep_texcoords = attribute_everywhere(models, "texcoords", |m| &m.texcoords, 2);

    let mut mesh = Mesh {
        materials,
        ..Mesh::default()
    };

    for model in models {
        let src = &model.mesh;
        let base = u32::try_from(mesh.positions.len())
            .map_err(|_| MeshError::InvalidMesh(format!("too many vertices (>{})", u32::MAX)))?;
        let vertex_count = src.positions.len() / 3;

        if src.indices.len() % 3 != 0 {
            return Err(MeshError::InvalidMesh(format!(
                "group '{}' has {} indices after triangulation",
                model.name,
                src.indices.len()
            )));
        }
        if let Some(&idx) = src.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::InvalidMesh(format!(
                "group '{}' index {} out of bounds (vertices={})",
                model.name, idx, vertex_count
            )));
        }

        let material = src
            .material_id
            .filter(|&id| id < mesh.materials.len());

        log::debug!(
            "OBJ group '{}': {} vertices, {} triangles, material={:?}",
            model.name,
            vertex_count,
            src.indices.len() / 3,
            material
        );

        mesh.groups.push(MeshGroup {
            name: model.name.clone(),
            first_index: mesh.indices.len(),
            index_count: src.indices.len(),
            material,
        });
        mesh.positions
            .extend(src.positions.chunks_exact(3).map(Vec3::from_slice));
        if keep_normals {
            mesh.normals
                .extend(src.normals.chunks_exact(3).map(Vec3::from_slice));
        }
        if keep_texcoords {
            mesh.texcoords
                .extend(src.texcoords.chunks_exact(2).map(Vec2::from_slice));
        }
        mesh.indices.extend(src.indices.iter().map(|&i| i + base));
    }

    Ok(mesh)
}

/// `true` if every model has a full per-vertex array for the attribute.
/// Logs when any model has a partial array or lacks one while others have
/// it, since the attribute is then dropped.
fn attribute_everywhere(
    models: &[tobj::Model],
    name: &str,
    attr: impl Fn(&tobj::Mesh) -> &Vec<f32>,
    width: usize,
) -> bool {
    let mut complete = 0;
    let mut partial = 0;
    for m in models {
        let values = attr(&m.mesh);
        if values.is_empty() {
            continue;
        }
        if values.len() / width == m.mesh.positions.len() / 3 && values.len() % width == 0 {
            complete += 1;
        } else {
            partial += 1;
        }
    }

    let keep = !models.is_empty() && complete == models.len();
    if !keep && complete + partial != 0 {
        log::warn!(
            "OBJ {name}: {complete} of {} groups complete, {partial} partial; dropping {name} for the mesh",
            models.len()
        );
    }
    keep
}
