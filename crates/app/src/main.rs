//! objinfo: load an OBJ file and log what it contains.
//! Usage: objinfo <path> [--mode=mesh|positions] [--no-materials]

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use asset::MeshLoader;
use corelib::Aabb;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Mesh,
    Positions,
}

fn parse_mode_arg(args: &[String]) -> Mode {
    // Accept: --mode=mesh|positions, default mesh
    let mut mode = Mode::Mesh;
    for arg in args {
        if let Some(val) = arg.strip_prefix("--mode=") {
            mode = match val.to_ascii_lowercase().as_str() {
                "mesh" | "full" => Mode::Mesh,
                "positions" | "points" => Mode::Positions,
                other => {
                    log::warn!("Unknown mode '{}', falling back to mesh.", other);
                    Mode::Mesh
                }
            };
        }
    }
    mode
}

fn parse_materials_arg(args: &[String]) -> bool {
    !args.iter().any(|a| a == "--no-materials")
}

fn parse_path_arg(args: &[String]) -> Option<PathBuf> {
    args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from)
}

fn log_bounds(bounds: Option<Aabb>) {
    match bounds {
        Some(b) => log::info!(
            "Bounds: min={:?} max={:?} center={:?} extent={:?}",
            b.min,
            b.max,
            b.center(),
            b.extent()
        ),
        None => log::info!("Bounds: empty"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(path) = parse_path_arg(&args) else {
        bail!("usage: objinfo <path> [--mode=mesh|positions] [--no-materials]");
    };
    let mode = parse_mode_arg(&args);
    let loader = MeshLoader::new().with_materials(parse_materials_arg(&args));
    log::info!("objinfo: path={:?}, mode={:?}, loader={:?}", path, mode, loader);

    match mode {
        Mode::Positions => {
            let positions = loader
                .load_positions(&path)
                .with_context(|| format!("Failed to load positions from {}", path.display()))?;
            log::info!("Positions: {}", positions.len());
            log_bounds(Aabb::from_points(positions.iter().copied()));
        }
        Mode::Mesh => {
            let mesh = loader
                .load_mesh(&path)
                .with_context(|| format!("Failed to load mesh from {}", path.display()))?;
            log::info!(
                "Mesh: {} vertices, {} triangles, normals={}, texcoords={}",
                mesh.vertex_count(),
                mesh.triangle_count(),
                mesh.has_normals(),
                mesh.has_texcoords()
            );
            for group in &mesh.groups {
                let material = group
                    .material
                    .and_then(|m| mesh.materials.get(m))
                    .map_or("-", String::as_str);
                log::info!(
                    "  group '{}': {} triangles, material {}",
                    group.name,
                    group.triangle_count(),
                    material
                );
            }
            log_bounds(mesh.bounds());
        }
    }

    Ok(())
}
