//! Mutable parse state for one OBJ load.

use std::collections::HashMap;

use corelib::{Vec2, Vec3};

use super::triangulate::{AttributeCounts, fan_triangulate, parse_face};
use crate::error::NumericError;

/// Mesh name used for faces that appear before any `o`/`g` record.
pub const DEFAULT_MESH_NAME: &str = "default";

/// One resolved face corner. `None` marks an absent UV or normal.
/// Doubles as the vertex dedup key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FaceCorner {
    pub position: u32,
    pub uv: Option<u32>,
    pub normal: Option<u32>,
}

/// Triangle corners of one mesh, grouped per material in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct MeshGroup {
    pub name: String,
    pub materials: Vec<(String, Vec<FaceCorner>)>,
}

impl MeshGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
        }
    }

    pub fn corner_count(&self) -> usize {
        self.materials.iter().map(|(_, corners)| corners.len()).sum()
    }

    /// Groups named like exporter shadow helpers are never imported.
    pub fn is_shadow_plane(&self) -> bool {
        self.name.to_ascii_lowercase().contains("shadow_plane")
    }

    fn corners_mut(&mut self, material: &str) -> &mut Vec<FaceCorner> {
        let idx = match self.materials.iter().position(|(m, _)| m == material) {
            Some(idx) => idx,
            None => {
                self.materials.push((material.to_string(), Vec::new()));
                self.materials.len() - 1
            }
        };
        &mut self.materials[idx].1
    }
}

/// Raw attribute arrays and triangle tables collected from one file.
#[derive(Debug, Default)]
pub struct ObjGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub groups: Vec<MeshGroup>,
    /// Every `usemtl` name in first-seen order.
    pub material_names: Vec<String>,
}

/// Accumulates records in file order. Owned by exactly one parse.
pub struct Accumulator {
    geometry: ObjGeometry,
    group_index: HashMap<String, usize>,
    current_group: Option<usize>,
    current_material: String,
    flip: bool,
    scratch: Vec<FaceCorner>,
}

impl Accumulator {
    pub fn new(flip: bool) -> Self {
        Self {
            geometry: ObjGeometry::default(),
            group_index: HashMap::new(),
            current_group: None,
            current_material: String::new(),
            flip,
            scratch: Vec::with_capacity(8),
        }
    }

    pub fn push_position(&mut self, p: Vec3) {
        self.geometry.positions.push(p);
    }

    pub fn push_normal(&mut self, n: Vec3) {
        self.geometry.normals.push(n);
    }

    pub fn push_uv(&mut self, uv: Vec2) {
        self.geometry.uvs.push(uv);
    }

    pub fn counts(&self) -> AttributeCounts {
        AttributeCounts {
            positions: self.geometry.positions.len(),
            uvs: self.geometry.uvs.len(),
            normals: self.geometry.normals.len(),
        }
    }

    /// Switch the active mesh, creating it on first mention.
    pub fn set_mesh(&mut self, name: &str) {
        let idx = self.group_slot(name);
        self.current_group = Some(idx);
    }

    /// Switch the active material for the faces that follow.
    pub fn set_material(&mut self, name: &str) {
        if self.current_material == name {
            return;
        }
        self.current_material.clear();
        self.current_material.push_str(name);
        if !self.geometry.material_names.iter().any(|m| m == name) {
            self.geometry.material_names.push(name.to_string());
        }
    }

    pub fn current_material(&self) -> &str {
        &self.current_material
    }

    fn group_slot(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.group_index.get(name) {
            return idx;
        }
        let idx = self.geometry.groups.len();
        self.geometry.groups.push(MeshGroup::new(name));
        self.group_index.insert(name.to_string(), idx);
        idx
    }

    /// Decode a face record and append its triangles to the active
    /// (mesh, material) list. Returns the number of triangles added.
    pub fn push_face(&mut self, fields: &[u8]) -> Result<usize, NumericError> {
        let counts = self.counts();
        parse_face(fields, counts, &mut self.scratch)?;
        if self.scratch.len() < 3 {
            return Ok(0);
        }

        let group = match self.current_group {
            Some(idx) => idx,
            None => {
                let idx = self.group_slot(DEFAULT_MESH_NAME);
                self.current_group = Some(idx);
                idx
            }
        };
        let corners = self.geometry.groups[group].corners_mut(&self.current_material);
        Ok(fan_triangulate(&self.scratch, self.flip, corners))
    }

    pub fn finish(self) -> ObjGeometry {
        self.geometry
    }
}
