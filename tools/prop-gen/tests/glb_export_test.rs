//! End-to-end tests: build props, write GLB files, read them back with `gltf`.

use glam::{Mat4, Vec3};
use tempfile::tempdir;

use prop_gen::{build_d20, build_tray, D20Params, TrayParams};

fn small_tray() -> TrayParams {
    TrayParams {
        texture_size: 32,
        metal_texture_size: 16,
        seed: 4,
        ..Default::default()
    }
}

fn small_die() -> D20Params {
    D20Params {
        atlas_size: 120,
        ..Default::default()
    }
}

#[test]
fn test_tray_glb_roundtrip() {
    let params = small_tray();
    let tray = build_tray(&params).expect("tray should build");

    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("casino_dice_tray.glb");
    tray.scene.write_glb(&path).expect("Failed to write GLB");

    let (document, buffers, images) = gltf::import(&path).expect("Failed to import GLB");

    let names: Vec<_> = document.nodes().filter_map(|n| n.name()).collect();
    assert_eq!(names, ["Tray_Wood", "Tray_Felt", "Tray_Studs"]);

    let materials: Vec<_> = document.materials().filter_map(|m| m.name()).collect();
    assert_eq!(materials, ["Wood_Frame", "Felt_Insert", "Metal_Studs"]);
    assert_eq!(images.len(), 12);
    assert_eq!(images[0].width, 32);
    assert_eq!(images[8].width, 16);

    let n = params.loop_len();
    let expected_triangles = [8 * n, 4 * n, 16 * 4 * 12];
    for (mesh, expected) in document.meshes().zip(expected_triangles) {
        let primitive = mesh.primitives().next().unwrap();
        assert!(primitive.get(&gltf::Semantic::Normals).is_some(), "Missing NORMAL");
        assert!(
            primitive.get(&gltf::Semantic::TexCoords(0)).is_some(),
            "Missing TEXCOORD_0"
        );
        let reader = primitive.reader(|b| Some(&buffers[b.index()]));
        let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
        assert_eq!(indices.len(), expected * 3);

        let positions = reader.read_positions().unwrap().count();
        let uvs = reader.read_tex_coords(0).unwrap().into_f32().count();
        assert_eq!(positions, uvs);
        assert!(indices.iter().all(|&i| (i as usize) < positions));
    }

    let wood = document.materials().next().unwrap();
    let pbr = wood.pbr_metallic_roughness();
    assert_eq!(pbr.metallic_factor(), 0.0);
    assert_eq!(pbr.roughness_factor(), 1.0);
    assert!(pbr.metallic_roughness_texture().is_some());
    assert!(wood.occlusion_texture().is_some());
}

#[test]
fn test_die_marker_nodes() {
    let die = build_d20(&small_die()).expect("die should build");
    let glb = die.scene.to_glb().expect("Failed to serialize");
    let gltf = gltf::Gltf::from_slice(&glb).expect("Failed to parse GLB");

    let nodes: Vec<_> = gltf.nodes().collect();
    assert_eq!(nodes.len(), 21);
    assert_eq!(nodes[0].name(), Some("D20"));

    for (k, node) in nodes[1..].iter().enumerate() {
        let number = k as u8 + 1;
        assert_eq!(node.name(), Some(format!("Face_{number}").as_str()));

        let gltf::scene::Transform::Matrix { matrix } = node.transform() else {
            panic!("marker {number} should carry a matrix");
        };
        let matrix = Mat4::from_cols_array_2d(&matrix);
        let face = die.face(number).unwrap();

        let z = matrix.transform_vector3(Vec3::Z);
        assert!(z.abs_diff_eq(face.normal, 1e-5));
        let origin = matrix.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(face.centroid + face.normal * 0.003, 1e-5));
    }

    let marker = gltf
        .materials()
        .find(|m| m.name() == Some("FaceMarker"))
        .unwrap();
    assert_eq!(
        marker.pbr_metallic_roughness().base_color_factor(),
        [1.0, 0.0, 1.0, 1.0]
    );
    assert!(marker.pbr_metallic_roughness().base_color_texture().is_none());
}

#[test]
fn test_texture_export() {
    let dir = tempdir().expect("Failed to create temp dir");

    let tray = build_tray(&small_tray()).unwrap();
    let written = tray.export_textures(dir.path()).unwrap();
    assert_eq!(written.len(), 12);
    for prefix in ["wood", "felt", "metal"] {
        for suffix in ["BaseColor", "Normal", "MetalRough", "AO"] {
            assert!(dir.path().join(format!("{prefix}_{suffix}.png")).is_file());
        }
    }

    let nested = dir.path().join("d20").join("maps");
    let die = build_d20(&small_die()).unwrap();
    let written = die.export_textures(&nested).unwrap();
    assert_eq!(written.len(), 4);
    assert!(nested.join("D20_BaseColor.png").is_file());
    assert!(nested.join("D20_AO.png").is_file());
}

#[test]
fn test_builds_are_deterministic() {
    let a = build_tray(&small_tray()).unwrap().scene.to_glb().unwrap();
    let b = build_tray(&small_tray()).unwrap().scene.to_glb().unwrap();
    assert_eq!(a, b);

    let other_seed = TrayParams {
        seed: 5,
        ..small_tray()
    };
    let c = build_tray(&other_seed).unwrap().scene.to_glb().unwrap();
    assert_ne!(a, c);
}
