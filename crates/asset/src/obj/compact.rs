//! Per-group vertex deduplication and index remapping.

use std::collections::HashMap;

use corelib::{Vec2, Vec3};

use super::accumulator::{FaceCorner, MeshGroup, ObjGeometry};
use crate::error::AssetError;
use crate::mesh::{CompactMesh, SubMesh};

/// Coordinate conversion applied while copying raw attributes out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImportTransform {
    /// `-1.0` mirrors X, `1.0` keeps it.
    pub x_sign: f32,
    pub scale: f32,
}

impl Default for ImportTransform {
    fn default() -> Self {
        Self {
            x_sign: 1.0,
            scale: 1.0,
        }
    }
}

impl ImportTransform {
    #[inline]
    fn position(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x * self.x_sign, p.y, p.z) * self.scale
    }

    #[inline]
    fn normal(&self, n: Vec3) -> Vec3 {
        Vec3::new(n.x * self.x_sign, n.y, n.z)
    }
}

/// Compact every importable group, in file order.
pub fn compact_all(
    geometry: &ObjGeometry,
    transform: ImportTransform,
) -> Result<Vec<CompactMesh>, AssetError> {
    let mut meshes = Vec::with_capacity(geometry.groups.len());
    for group in &geometry.groups {
        if let Some(mesh) = compact_group(group, geometry, transform)? {
            meshes.push(mesh);
        }
    }
    Ok(meshes)
}

/// Build the compact buffers of one group.
///
/// Returns `Ok(None)` for groups that are skipped: shadow-plane helpers and
/// groups without any triangle.
pub fn compact_group(
    group: &MeshGroup,
    geometry: &ObjGeometry,
    transform: ImportTransform,
) -> Result<Option<CompactMesh>, AssetError> {
    let corner_count = group.corner_count();
    if group.is_shadow_plane() || corner_count == 0 {
        log::debug!(
            "Skipping mesh '{}' ({} corners, shadow_plane={})",
            group.name,
            corner_count,
            group.is_shadow_plane()
        );
        return Ok(None);
    }

    let mut remap: HashMap<FaceCorner, u32> = HashMap::with_capacity(corner_count);
    let mut positions: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut missing_normal: Vec<bool> = Vec::new();
    let mut submeshes = Vec::with_capacity(group.materials.len());

    for (material, corners) in &group.materials {
        let mut indices = Vec::with_capacity(corners.len());
        for corner in corners {
            let index = match remap.get(corner) {
                Some(&idx) => idx,
                None => {
                    let raw = geometry
                        .positions
                        .get(corner.position as usize)
                        .copied()
                        .ok_or_else(|| AssetError::FaceIndexOutOfRange {
                            mesh: group.name.clone(),
                            index: corner.position,
                            count: geometry.positions.len(),
                        })?;
                    let uv = corner
                        .uv
                        .and_then(|i| geometry.uvs.get(i as usize))
                        .copied()
                        .unwrap_or(Vec2::ZERO);
                    let normal = corner
                        .normal
                        .and_then(|i| geometry.normals.get(i as usize))
                        .copied();

                    let idx = u32::try_from(positions.len()).map_err(|_| {
                        AssetError::TooManyVertices {
                            mesh: group.name.clone(),
                        }
                    })?;
                    positions.push(transform.position(raw));
                    uvs.push(uv);
                    normals.push(normal.map(|n| transform.normal(n)).unwrap_or(Vec3::ZERO));
                    missing_normal.push(normal.is_none());
                    remap.insert(*corner, idx);
                    idx
                }
            };
            indices.push(index);
        }
        submeshes.push(SubMesh {
            material: material.clone(),
            indices,
        });
    }

    if missing_normal.iter().any(|&m| m) {
        fill_missing_normals(&positions, &submeshes, &mut normals, &missing_normal);
    }

    log::debug!(
        "Compacted mesh '{}': {} corners -> {} vertices, {} submeshes",
        group.name,
        corner_count,
        positions.len(),
        submeshes.len()
    );

    Ok(Some(CompactMesh {
        name: group.name.clone(),
        positions,
        normals,
        uvs,
        submeshes,
    }))
}

/// Area-weighted smooth normals for every slot flagged in `missing`.
fn fill_missing_normals(
    positions: &[Vec3],
    submeshes: &[SubMesh],
    normals: &mut [Vec3],
    missing: &[bool],
) {
    let mut sums = vec![Vec3::ZERO; positions.len()];
    for tri in submeshes.iter().flat_map(|s| s.indices.chunks_exact(3)) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        // Unnormalized cross product: magnitude is twice the triangle area.
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        for &i in &[a, b, c] {
            if missing[i] {
                sums[i] += face;
            }
        }
    }
    for (i, sum) in sums.into_iter().enumerate() {
        if missing[i] {
            normals[i] = sum.try_normalize().unwrap_or(Vec3::Y);
        }
    }
}
