//! Handing a finished model over to a scene graph.

use corelib::{NodeId, SceneTree, Transform};

use crate::loader::ModelMesh;

/// Scene-graph operations a loaded model needs. Implementations are driven
/// from the caller's context only, never from the background parse task.
pub trait SceneGraph {
    type Node: Copy;

    /// Create the model root at `placement`.
    fn create_root(&mut self, name: &str, placement: Transform) -> Self::Node;

    /// Attach a mesh node with its bound materials under `parent`.
    fn create_mesh_node(&mut self, parent: Self::Node, mesh: ModelMesh) -> Self::Node;
}

/// One step of materializing an [`crate::ObjModel`], in execution order.
#[derive(Debug)]
pub enum MaterializeCommand {
    CreateRoot { name: String, placement: Transform },
    CreateMesh(ModelMesh),
}

impl SceneGraph for SceneTree<ModelMesh> {
    type Node = NodeId;

    fn create_root(&mut self, name: &str, placement: Transform) -> NodeId {
        self.spawn_root(name, placement)
    }

    fn create_mesh_node(&mut self, parent: NodeId, mesh: ModelMesh) -> NodeId {
        let name = mesh.name.clone();
        match self.spawn_child(parent, name, Transform::identity(), Some(mesh)) {
            Ok(id) => id,
            Err(err) => {
                // Parents always come from `create_root` on the same tree.
                log::error!("Mesh node dropped: {}", err);
                parent
            }
        }
    }
}
