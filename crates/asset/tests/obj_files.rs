use std::{fs, path::PathBuf};

use asset::{MeshLoader, load_mesh, load_positions};
use corelib::{MeshErrorKind, vec3};
use tempfile::TempDir;

const TETRAHEDRON: &str = "\
# tetrahedron
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
vn 0 0 -1
vn 0 -1 0
vn -1 0 0
vn 0.577 0.577 0.577
f 1//1 3//1 2//1
f 1//2 2//2 4//2
f 1//3 4//3 3//3
f 2//4 3//4 4//4
";

const CUBE_QUADS: &str = "\
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
f 1 4 3 2
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn positions_match_vertex_lines() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "tet.obj", TETRAHEDRON);

    let positions = load_positions(&path).expect("positions");
    assert_eq!(
        positions,
        vec![
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            vec3(0.0, 0.0, 1.0),
        ]
    );
}

#[test]
fn triangles_keep_three_indices_each() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "tet.obj", TETRAHEDRON);

    let mesh = load_mesh(&path).expect("mesh");
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(mesh.indices.len(), 3 * 4);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    assert!(mesh.has_normals());
    assert!(!mesh.has_texcoords());
    mesh.validate().expect("valid");
}

#[test]
fn quads_become_two_triangles() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "cube.obj", CUBE_QUADS);

    let mesh = load_mesh(&path).expect("mesh");
    assert_eq!(mesh.indices.len(), 6 * 6);
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count()));
    mesh.validate().expect("valid");

    let bounds = mesh.bounds().expect("bounds");
    assert_eq!(bounds.min, vec3(-1.0, -1.0, -1.0));
    assert_eq!(bounds.max, vec3(1.0, 1.0, 1.0));
}

#[test]
fn missing_file_is_file_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nope.obj");

    let err = load_mesh(&path).unwrap_err();
    assert_eq!(err.kind(), MeshErrorKind::FileNotFound);
    let err = load_positions(&path).unwrap_err();
    assert_eq!(err.kind(), MeshErrorKind::FileNotFound);
}

#[test]
fn truncated_face_is_a_parse_error() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "bad.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2\n");

    let err = load_mesh(&path).unwrap_err();
    assert_eq!(err.kind(), MeshErrorKind::Parse);

    let path = write(&dir, "bad2.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/ 2/x 3\n");
    let err = load_mesh(&path).unwrap_err();
    assert_eq!(err.kind(), MeshErrorKind::Parse);
}

#[test]
fn repeated_loads_are_identical() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "cube.obj", CUBE_QUADS);

    let first = load_mesh(&path).expect("first");
    let second = load_mesh(&path).expect("second");
    assert_eq!(first, second);
}

#[test]
fn materials_are_assigned_per_group() {
    let dir = TempDir::new().expect("tempdir");
    write(&dir, "colors.mtl", "newmtl red\nKd 1 0 0\n\nnewmtl blue\nKd 0 0 1\n");
    let path = write(
        &dir,
        "two.obj",
        "\
mtllib colors.mtl
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
o left
usemtl red
f 1 2 3
o right
usemtl blue
f 2 4 3
",
    );

    let mesh = load_mesh(&path).expect("mesh");
    assert_eq!(mesh.materials, ["red", "blue"]);
    assert_eq!(mesh.groups.len(), 2);
    assert_eq!(mesh.face_material(0).map(|m| mesh.materials[m].as_str()), Some("red"));
    assert_eq!(mesh.face_material(1).map(|m| mesh.materials[m].as_str()), Some("blue"));
    mesh.validate().expect("valid");

    let bare = MeshLoader::new()
        .with_materials(false)
        .load_mesh(&path)
        .expect("mesh without materials");
    assert!(bare.materials.is_empty());
    assert!(bare.groups.iter().all(|g| g.material.is_none()));
    assert_eq!(bare.indices.len(), mesh.indices.len());
}

#[test]
fn missing_material_library_is_not_fatal() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "lonely.obj",
        "mtllib gone.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n",
    );

    let mesh = load_mesh(&path).expect("mesh");
    assert!(mesh.materials.is_empty());
    assert_eq!(mesh.triangle_count(), 1);
}

#[test]
fn free_form_surface_only_blocks_full_mesh() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "patch.obj",
        "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\ncstype bezier\ndeg 1 1\nsurf 0 1 0 1 1 2 3 4\nend\n",
    );

    let err = load_mesh(&path).unwrap_err();
    assert_eq!(err.kind(), MeshErrorKind::UnsupportedFeature);
    assert_eq!(load_positions(&path).expect("positions").len(), 4);
}

#[test]
fn positions_reject_what_the_mesh_path_rejects() {
    let dir = TempDir::new().expect("tempdir");
    let tri = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    for (name, tail) in [
        ("bad_vn.obj", "vn a b c\nf 1 2 3\n"),
        ("bad_vt.obj", "vt 0 x\nf 1 2 3\n"),
        ("oob_vn.obj", "vn 0 0 1\nf 1//1 2//1 3//2\n"),
    ] {
        let path = write(&dir, name, &format!("{tri}{tail}"));
        let err = load_positions(&path).unwrap_err();
        assert_eq!(err.kind(), MeshErrorKind::Parse, "{name}");
        let err = load_mesh(&path).unwrap_err();
        assert_eq!(err.kind(), MeshErrorKind::Parse, "{name}");
    }
}

#[test]
fn continued_face_loads_through_both_paths() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "contin.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n 2 3\n");

    assert_eq!(load_positions(&path).expect("positions").len(), 3);
    let mesh = load_mesh(&path).expect("mesh");
    assert_eq!(mesh.indices.len(), 3);
    mesh.validate().expect("valid");
}
