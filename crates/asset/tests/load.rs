use std::{fs, path::Path};

use asset::{ImportConfig, ModelMesh, TextureFormat, load_obj};
use corelib::{SceneTree, Vec3};

const BOX_OBJ: &str = "# Exported by 3ds Max 2021\n\
mtllib box.mtl\n\
o Box\n\
v 0 0 0\n\
v 100 0 0\n\
v 100 100 0\n\
v 0 100 0\n\
vt 0 0\n\
vt 1 0\n\
vt 1 1\n\
vt 0 1\n\
vn 0 0 1\n\
usemtl Wood\n\
f 1/1/1 2/2/1 3/3/1 4/4/1\n\
usemtl Ghost\n\
f 1/1/1 3/3/1 4/4/1\n\
o Shadow_Plane01\n\
v 0 0 0\n\
v 1 0 0\n\
v 1 0 1\n\
f 5 6 7\n";

const BOX_MTL: &str = "newmtl Wood\n\
Kd 0.8 0.6 0.4\n\
Ns 50\n\
map_Kd wood.png\n\
\n\
newmtl Glass\n\
d 0.4\n";

fn write_box(dir: &Path) -> std::path::PathBuf {
    let obj = dir.join("box.obj");
    fs::write(&obj, BOX_OBJ).unwrap();
    fs::write(dir.join("box.mtl"), BOX_MTL).unwrap();
    fs::create_dir_all(dir.join("box_Textures")).unwrap();
    image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]))
        .save(dir.join("box_Textures/wood.png"))
        .unwrap();
    obj
}

#[tokio::test]
async fn loads_model_with_materials_and_textures() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_box(dir.path());

    let model = load_obj(&obj, Vec3::ZERO, &ImportConfig::default())
        .await
        .unwrap();

    assert_eq!(model.name, "box");
    assert_eq!(model.meshes.len(), 1, "shadow plane group must be dropped");
    let mesh = &model.meshes[0];
    assert_eq!(mesh.name, "Box");
    assert_eq!(mesh.mesh.vertex_count(), 4);
    assert!(mesh.mesh.is_valid());
    assert_eq!(mesh.mesh.submeshes.len(), 2);
    assert_eq!(mesh.mesh.submeshes[0].triangle_count(), 2);
    assert_eq!(mesh.mesh.submeshes[1].triangle_count(), 1);

    // 3ds Max header scales by 0.01, X is mirrored.
    assert!(
        mesh.mesh
            .positions
            .iter()
            .any(|p| (*p - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5)
    );
    assert!(mesh.mesh.positions.iter().all(|p| p.x <= 0.0));
    assert!(mesh.mesh.normals.iter().all(|n| *n == Vec3::Z));

    let wood = &mesh.materials[0];
    assert_eq!(wood.name, "Wood");
    assert_eq!(wood.base_color, Vec3::ONE);
    assert!((wood.glossiness - 0.5).abs() < 1e-6);
    let texture = wood.diffuse_texture.as_ref().unwrap();
    assert_eq!(texture.path, dir.path().join("box_Textures/").join("wood.png"));
    let data = texture.data.as_ref().unwrap();
    assert_eq!(data.format, TextureFormat::Rgba8);
    assert_eq!((data.width, data.height), (2, 2));

    let ghost = &mesh.materials[1];
    assert_eq!(ghost.name, "Ghost");
    assert!(ghost.diffuse_texture.is_none());
}

#[tokio::test]
async fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_obj(dir.path().join("nope.obj"), Vec3::ZERO, &ImportConfig::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn missing_library_falls_back_per_material() {
    let dir = tempfile::tempdir().unwrap();
    let obj = dir.path().join("tri.obj");
    fs::write(
        &obj,
        "mtllib absent.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Paint\nf 1 2 3\n",
    )
    .unwrap();

    let config = ImportConfig::default().with_flip_x(false);
    let model = load_obj(&obj, Vec3::ZERO, &config).await.unwrap();
    assert_eq!(model.meshes.len(), 1);
    let mesh = &model.meshes[0];
    assert_eq!(mesh.name, "default");
    assert_eq!(mesh.materials[0].name, "Paint");
    // No normals in the file: generated from the face, counter-clockwise.
    assert!(mesh.mesh.normals.iter().all(|n| (*n - Vec3::Z).length() < 1e-5));
}

#[tokio::test]
async fn out_of_range_position_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let obj = dir.path().join("bad.obj");
    fs::write(&obj, "v 0 0 0\nv 1 0 0\nf 1 2 9\n").unwrap();

    let err = load_obj(&obj, Vec3::ZERO, &ImportConfig::default())
        .await
        .unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("out of range"), "{}", chain);
}

#[tokio::test(flavor = "current_thread")]
async fn independent_loads_run_concurrently() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_box(dir.path());
    let tri = dir.path().join("tri.obj");
    fs::write(&tri, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

    let config = ImportConfig::default().with_decode_textures(false);
    let (a, b) = tokio::join!(
        load_obj(&obj, Vec3::ZERO, &config),
        load_obj(&tri, Vec3::ONE, &config)
    );
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.triangle_count(), 3);
    assert_eq!(b.triangle_count(), 1);
    assert_eq!(b.placement, Vec3::ONE);
    assert!(a.meshes[0].materials[0].diffuse_texture.as_ref().unwrap().data.is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn header_and_library_work_leaves_the_runtime_free() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_box(dir.path());
    let config = ImportConfig::default().with_auto_assign_textures(true);

    // Another task on the same single-threaded runtime finishes alongside the load.
    let ticker = tokio::spawn(async { tokio::task::yield_now().await });
    let (model, ticked) = tokio::join!(load_obj(&obj, Vec3::ZERO, &config), ticker);

    assert!(ticked.is_ok());
    assert_eq!(model.unwrap().meshes.len(), 1);
}

#[tokio::test]
async fn materializes_under_a_named_root() {
    let dir = tempfile::tempdir().unwrap();
    let obj = write_box(dir.path());
    let offset = Vec3::new(5.0, 0.0, -2.0);

    let model = load_obj(&obj, offset, &ImportConfig::default())
        .await
        .unwrap();
    let mut scene: SceneTree<ModelMesh> = SceneTree::new();
    let root = model.materialize(&mut scene).unwrap();

    assert_eq!(scene.name(root), Some("box"));
    assert_eq!(scene.transform(root).unwrap().translation, offset);
    let children: Vec<_> = scene.children(root).collect();
    assert_eq!(children.len(), 1);
    assert_eq!(scene.name(children[0]), Some("Box"));
    assert_eq!(scene.payload(children[0]).unwrap().materials.len(), 2);
    let world = scene.world_matrix(children[0]).unwrap();
    assert_eq!(world.w_axis.truncate(), offset);
}
