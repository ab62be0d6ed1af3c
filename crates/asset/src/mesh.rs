//! CPU-side compacted mesh produced by the OBJ importer.

use corelib::{Vec2, Vec3};

/// Triangle list of one material inside a [`CompactMesh`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMesh {
    /// Material key as written after `usemtl` (empty when none was active).
    pub material: String,
    pub indices: Vec<u32>,
}

impl SubMesh {
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Deduplicated vertex buffers shared by every submesh of one mesh group.
/// `positions`, `normals` and `uvs` are aligned by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompactMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub submeshes: Vec<SubMesh>,
}

impl CompactMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len()).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_count() / 3
    }

    /// Returns `true` if buffers are aligned, non-empty and every index is in range.
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        n > 0
            && self.normals.len() == n
            && self.uvs.len() == n
            && self.index_count() > 0
            && self
                .submeshes
                .iter()
                .flat_map(|s| s.indices.iter())
                .all(|&i| (i as usize) < n)
    }
}
