//! Asynchronous OBJ model loading.
//!
//! Work runs on the blocking pool in two ordered steps: header scan plus
//! material library, then parsing, triangulation and compaction. The result
//! is a plain [`ObjModel`] that the caller materializes into its own scene
//! graph.

use std::{
    collections::HashMap,
    fs,
    path::Path,
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use corelib::{Transform, Vec3};

use crate::config::ImportConfig;
use crate::mesh::CompactMesh;
use crate::mtl::{MaterialDescriptor, load_mtl};
use crate::obj::{ImportTransform, compact_all, parse_obj_bytes, run_prepass};
use crate::scene::{MaterializeCommand, SceneGraph};
use crate::search;

/// A compacted mesh with one material per submesh, in submesh order.
#[derive(Clone, Debug)]
pub struct ModelMesh {
    pub name: String,
    pub mesh: CompactMesh,
    pub materials: Vec<Arc<MaterialDescriptor>>,
}

/// Everything a load produced, not yet attached to any scene.
#[derive(Clone, Debug)]
pub struct ObjModel {
    /// OBJ base name, used for the root node.
    pub name: String,
    pub placement: Vec3,
    pub meshes: Vec<ModelMesh>,
}

impl ObjModel {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.vertex_count()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }

    /// Scene-graph commands: the root first, then one mesh node per group.
    pub fn commands(self) -> impl Iterator<Item = MaterializeCommand> {
        let root = MaterializeCommand::CreateRoot {
            name: self.name,
            placement: Transform::at(self.placement),
        };
        std::iter::once(root).chain(self.meshes.into_iter().map(MaterializeCommand::CreateMesh))
    }

    /// Consume [`Self::commands`] against `scene` and return the root node.
    /// Must run on the context that owns `scene`.
    pub fn materialize<S: SceneGraph>(self, scene: &mut S) -> Option<S::Node> {
        let mut root = None;
        for command in self.commands() {
            match command {
                MaterializeCommand::CreateRoot { name, placement } => {
                    root = Some(scene.create_root(&name, placement));
                }
                MaterializeCommand::CreateMesh(mesh) => match root {
                    Some(parent) => {
                        scene.create_mesh_node(parent, mesh);
                    }
                    None => log::error!("Mesh '{}' has no root to attach to", mesh.name),
                },
            }
        }
        root
    }
}

/// Load the OBJ at `path`, to be placed at `placement`.
pub async fn load_obj(
    path: impl AsRef<Path>,
    placement: Vec3,
    config: &ImportConfig,
) -> Result<ObjModel> {
    let path = path.as_ref().to_path_buf();
    if !path.is_file() {
        bail!("OBJ file not found: {}", path.display());
    }
    log::info!("Loading OBJ model from {}", path.display());

    let header_path = path.clone();
    let header_config = config.clone();
    let (prepass, library) = tokio::task::spawn_blocking(move || {
        let prepass = run_prepass(&header_path, &header_config)?;
        let library = match &prepass.material_library {
            Some(mtl) => load_library(mtl, &header_config),
            None => HashMap::new(),
        };
        anyhow::Ok((prepass, library))
    })
    .await
    .context("OBJ header task panicked")??;

    let transform = ImportTransform {
        x_sign: config.x_sign(),
        scale: prepass.scale,
    };
    let flip = config.flip_x;
    let task_path = path.clone();
    let meshes = tokio::task::spawn_blocking(move || parse_and_compact(&task_path, flip, transform))
        .await
        .context("OBJ parse task panicked")??;

    let mut materials = MaterialBinder::new(library);
    let meshes: Vec<ModelMesh> = meshes
        .into_iter()
        .map(|mesh| ModelMesh {
            name: mesh.name.clone(),
            materials: mesh
                .submeshes
                .iter()
                .map(|sub| materials.bind(&sub.material))
                .collect(),
            mesh,
        })
        .collect();

    let model = ObjModel {
        name: search::base_name(&path),
        placement,
        meshes,
    };
    log::info!(
        "Loaded OBJ '{}': {} meshes, {} vertices, {} triangles",
        model.name,
        model.meshes.len(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(model)
}

fn parse_and_compact(
    path: &Path,
    flip: bool,
    transform: ImportTransform,
) -> Result<Vec<CompactMesh>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read OBJ file: {}", path.display()))?;
    let geometry = parse_obj_bytes(&bytes, flip)
        .with_context(|| format!("Failed to parse OBJ: {}", path.display()))?;
    compact_all(&geometry, transform)
        .with_context(|| format!("Failed to build meshes for {}", path.display()))
}

/// A library that cannot be read leaves every material on its fallback.
fn load_library(path: &Path, config: &ImportConfig) -> HashMap<String, Arc<MaterialDescriptor>> {
    match load_mtl(path, config) {
        Ok(materials) => materials
            .into_iter()
            .map(|m| (m.name.clone(), Arc::new(m)))
            .collect(),
        Err(err) => {
            log::warn!("Material library skipped: {:#}", err);
            HashMap::new()
        }
    }
}

/// Hands out shared descriptors by material key, creating fallbacks once per key.
struct MaterialBinder {
    known: HashMap<String, Arc<MaterialDescriptor>>,
}

impl MaterialBinder {
    fn new(known: HashMap<String, Arc<MaterialDescriptor>>) -> Self {
        Self { known }
    }

    fn bind(&mut self, key: &str) -> Arc<MaterialDescriptor> {
        if let Some(found) = self.known.get(key) {
            return Arc::clone(found);
        }
        if !key.is_empty() {
            log::warn!("Material '{}' not defined, using fallback", key);
        }
        let fallback = Arc::new(MaterialDescriptor::fallback(key));
        self.known.insert(key.to_string(), Arc::clone(&fallback));
        fallback
    }
}
