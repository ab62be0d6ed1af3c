//! Tiny scene host: named nodes with a Transform, a parent link and an optional payload.

use crate::transform::Transform;
use crate::{CoreError, CoreResult, Mat4};

/// Node id (dense, index into node arrays).
pub type NodeId = u32;

/// Very small scene tree with dense parallel arrays.
/// Not thread-safe by contract: owned and mutated by a single context.
pub struct SceneTree<P> {
    names: Vec<String>,
    transforms: Vec<Transform>,
    parents: Vec<Option<NodeId>>,
    payloads: Vec<Option<P>>,
}

impl<P> Default for SceneTree<P> {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            transforms: Vec::new(),
            parents: Vec::new(),
            payloads: Vec::new(),
        }
    }
}

impl<P> SceneTree<P> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        (id as usize) < self.names.len()
    }

    /// Spawn a top-level node.
    pub fn spawn_root(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        self.push(name.into(), transform, None, None)
    }

    /// Spawn a node under `parent`, optionally carrying a payload.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        payload: Option<P>,
    ) -> CoreResult<NodeId> {
        if !self.contains(parent) {
            return Err(CoreError::UnknownNode(parent));
        }
        Ok(self.push(name.into(), transform, Some(parent), payload))
    }

    fn push(
        &mut self,
        name: String,
        transform: Transform,
        parent: Option<NodeId>,
        payload: Option<P>,
    ) -> NodeId {
        let id = self.names.len() as NodeId;
        self.names.push(name);
        self.transforms.push(transform);
        self.parents.push(parent);
        self.payloads.push(payload);
        id
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id as usize).copied().flatten()
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.transforms.get(id as usize)
    }

    pub fn payload(&self, id: NodeId) -> Option<&P> {
        self.payloads.get(id as usize).and_then(Option::as_ref)
    }

    /// Direct children of `id`, in spawn order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.parents
            .iter()
            .enumerate()
            .filter_map(move |(i, p)| (*p == Some(id)).then_some(i as NodeId))
    }

    /// Composed matrix from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut m = self.transforms.get(id as usize)?.matrix();
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            m = self.transforms[p as usize].matrix() * m;
            cur = self.parent(p);
        }
        Some(m)
    }
}
