//! Single-pass OBJ geometry parser.
//!
//! The whole file is scanned as one byte buffer: records are classified by
//! their tag, numbers are read in place and faces are triangulated straight
//! into the per-(mesh, material) tables of the [`Accumulator`].

pub mod accumulator;
pub mod compact;
pub mod lexer;
pub mod numeric;
pub mod prepass;
pub mod triangulate;

use std::borrow::Cow;

use corelib::{Vec2, Vec3};

pub use accumulator::{Accumulator, DEFAULT_MESH_NAME, FaceCorner, MeshGroup, ObjGeometry};
pub use compact::{ImportTransform, compact_all, compact_group};
pub use lexer::{Lines, Record, classify};
pub use prepass::{Prepass, run_prepass};

use crate::error::{AssetError, NumericError};
use numeric::parse_float;

#[inline]
fn name_of(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

fn vec3_fields(fields: &[u8]) -> Result<Vec3, NumericError> {
    let (x, c) = parse_float(fields, 0)?;
    let (y, c) = parse_float(fields, c)?;
    let (z, _) = parse_float(fields, c)?;
    Ok(Vec3::new(x, y, z))
}

fn vec2_fields(fields: &[u8]) -> Result<Vec2, NumericError> {
    let (u, c) = parse_float(fields, 0)?;
    let (v, _) = parse_float(fields, c)?;
    Ok(Vec2::new(u, v))
}

/// Parse raw OBJ bytes into attribute arrays and triangle tables.
/// `flip` selects the mirrored winding order for emitted triangles.
pub fn parse_obj_bytes(buf: &[u8], flip: bool) -> Result<ObjGeometry, AssetError> {
    let mut acc = Accumulator::new(flip);
    let mut faces = 0usize;

    for (line, record) in Lines::new(buf) {
        let numeric = |source| AssetError::Numeric { line, source };
        match classify(record) {
            Record::Position(fields) => acc.push_position(vec3_fields(fields).map_err(numeric)?),
            Record::TexCoord(fields) => acc.push_uv(vec2_fields(fields).map_err(numeric)?),
            Record::Normal(fields) => acc.push_normal(vec3_fields(fields).map_err(numeric)?),
            Record::Face(fields) => {
                if acc.push_face(fields).map_err(numeric)? == 0 {
                    log::debug!("line {}: face with fewer than 3 corners skipped", line);
                } else {
                    faces += 1;
                }
            }
            Record::Object(name) => acc.set_mesh(&name_of(name)),
            Record::UseMaterial(name) => acc.set_material(&name_of(name)),
            Record::MaterialLibrary(_)
            | Record::Comment
            | Record::Empty
            | Record::Other => {}
        }
    }

    let geometry = acc.finish();
    log::debug!(
        "Parsed OBJ: {} positions, {} normals, {} uvs, {} faces, {} mesh groups",
        geometry.positions.len(),
        geometry.normals.len(),
        geometry.uvs.len(),
        faces,
        geometry.groups.len()
    );
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_SIDE: &str = "# test\r\n\
        mtllib side.mtl\r\n\
        o side\r\n\
        v 0.0 0.0 0.0\r\n\
        v  1.0 0.0 0.0\r\n\
        v 1.0 1.0 0.0\r\n\
        v 0.0 1.0 0.0\r\n\
        vt 0.0 0.0\r\n\
        vt 1.0 1.0\r\n\
        vn 0.0 0.0 1.0\r\n\
        usemtl Paint\r\n\
        f 1/1/1 2/1/1 3/2/1 4/2/1\r\n\
        s off\r\n";

    #[test]
    fn parses_records_with_crlf_endings() {
        let geometry = parse_obj_bytes(CUBE_SIDE.as_bytes(), false).unwrap();
        assert_eq!(geometry.positions.len(), 4);
        assert_eq!(geometry.positions[1], Vec3::X);
        assert_eq!(geometry.uvs.len(), 2);
        assert_eq!(geometry.normals, vec![Vec3::Z]);
        assert_eq!(geometry.groups.len(), 1);
        assert_eq!(geometry.groups[0].name, "side");
        assert_eq!(geometry.groups[0].materials[0].0, "Paint");
        assert_eq!(geometry.groups[0].corner_count(), 6);
        assert_eq!(geometry.material_names, vec!["Paint"]);
    }

    #[test]
    fn last_line_without_newline_is_parsed() {
        let geometry = parse_obj_bytes(b"v 1 2 3\nv 4 5 6\nv 7 8 9\nf 1 2 3", false).unwrap();
        assert_eq!(geometry.groups[0].corner_count(), 3);
    }

    #[test]
    fn malformed_vertex_reports_line() {
        let err = parse_obj_bytes(b"v 0 0 0\nv 1 x 0\n", false).unwrap_err();
        assert!(matches!(err, AssetError::Numeric { line: 2, .. }));
    }

    #[test]
    fn negative_face_equals_positive_face_after_compaction() {
        let transform = ImportTransform::default();
        let a = parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n", true).unwrap();
        let b = parse_obj_bytes(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", true).unwrap();
        assert_eq!(
            compact_all(&a, transform).unwrap(),
            compact_all(&b, transform).unwrap()
        );
    }
}
