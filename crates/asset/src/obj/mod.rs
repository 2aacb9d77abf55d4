//! OBJ loading on top of `tobj`: a positions-only fast path and a full
//! triangulated mesh path.

use std::{
    fs,
    io::{self, BufReader},
    path::Path,
};

use corelib::{MeshError, MeshResult, Vec3};

use crate::mesh::Mesh;

mod convert;
mod scan;

/// Loads vertex positions in file order. See [`MeshLoader::load_positions`].
pub fn load_positions(path: impl AsRef<Path>) -> MeshResult<Vec<Vec3>> {
    MeshLoader::default().load_positions(path)
}

/// Loads a triangulated mesh with materials. See [`MeshLoader::load_mesh`].
pub fn load_mesh(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    MeshLoader::default().load_mesh(path)
}

/// OBJ loader configuration. Holds no state between calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MeshLoader {
    materials: bool,
}

impl Default for MeshLoader {
    fn default() -> Self {
        Self { materials: true }
    }
}

impl MeshLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `mtllib` references are followed. Only material names are kept.
    pub fn with_materials(mut self, enabled: bool) -> Self {
        self.materials = enabled;
        self
    }

    /// Every `v` record of the file, in order. Faces, normals, texcoords and
    /// materials are checked but not built, so a file `load_mesh` would
    /// reject for bad records or face indices is rejected here too.
    pub fn load_positions(&self, path: impl AsRef<Path>) -> MeshResult<Vec<Vec3>> {
        let path = path.as_ref();
        log::info!("Loading OBJ positions from {:?}", path);
        let source = read_source(path)?;
        let positions = self.positions_from_str(&source)?;
        log::info!("Loaded {} positions from {:?}", positions.len(), path);
        Ok(positions)
    }

    /// Full mesh: faces are fan-triangulated by `tobj`, `mtllib` paths
    /// resolve next to the OBJ file.
    pub fn load_mesh(&self, path: impl AsRef<Path>) -> MeshResult<Mesh> {
        let path = path.as_ref();
        log::info!("Loading OBJ mesh from {:?}", path);
        let source = read_source(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mesh = self.mesh_from_str(&source, base_dir)?;
        log::info!(
            "Loaded {:?}: {} vertices, {} triangles, {} groups, {} materials",
            path,
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.groups.len(),
            mesh.materials.len()
        );
        Ok(mesh)
    }

    pub fn positions_from_str(&self, source: &str) -> MeshResult<Vec<Vec3>> {
        Ok(scan::scan(source, true)?.positions)
    }

    /// Parses OBJ text; `base_dir` is where `mtllib` files are looked up.
    pub fn mesh_from_str(&self, source: &str, base_dir: &Path) -> MeshResult<Mesh> {
        let scan = scan::scan(source, false)?;
        if let Some((line, directive)) = scan.unsupported {
            return Err(MeshError::UnsupportedFeature { line, directive });
        }

        let options = tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let joined = scan::joined_source(source);
        let mut reader = BufReader::new(joined.as_bytes());
        let loaded = if self.materials {
            tobj::load_obj_buf(&mut reader, &options, |mtl| {
                tobj::load_mtl(base_dir.join(mtl))
            })
        } else {
            tobj::load_obj_buf(&mut reader, &options, |_| {
                Err(tobj::LoadError::GenericFailure)
            })
        };
        let (models, materials) = loaded.map_err(parse_error)?;

        let materials = match materials {
            Ok(materials) => materials.into_iter().map(|m| m.name).collect(),
            Err(_) if !self.materials => Vec::new(),
            Err(err) => {
                log::warn!("Material load failed for OBJ in {:?}: {err}", base_dir);
                Vec::new()
            }
        };

        if models.is_empty() {
            log::warn!("OBJ contained no faces");
        }

        convert::merge_models(&models, materials)
    }
}

fn read_source(path: &Path) -> MeshResult<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::InvalidData => MeshError::Parse {
            line: None,
            message: format!("{} is not valid UTF-8 text", path.display()),
        },
        _ => MeshError::FileNotFound {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn parse_error(err: tobj::LoadError) -> MeshError {
    MeshError::Parse {
        line: None,
        message: err.to_string(),
    }
}
