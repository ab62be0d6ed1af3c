//! Face record decoding, index resolution and fan triangulation.

use super::accumulator::FaceCorner;
use super::numeric::{parse_int, skip_blanks};
use crate::error::NumericError;

/// Attribute array lengths at the moment a face record is read.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttributeCounts {
    pub positions: usize,
    pub uvs: usize,
    pub normals: usize,
}

/// Resolve a 1-based or negative (relative) OBJ index to 0-based.
///
/// Relative references are resolved against `count`, the length of the
/// attribute array when the face is read. Results below zero saturate to
/// `u32::MAX` so the compactor's bounds check rejects them.
#[inline]
pub fn resolve_index(raw: i32, count: usize) -> u32 {
    let mut index = raw as i64 - 1;
    if index < 0 {
        index = (count as i64 - index.abs()) + 1;
    }
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[inline]
fn starts_number(buf: &[u8], pos: usize) -> bool {
    matches!(buf.get(pos), Some(b) if b.is_ascii_digit() || *b == b'-' || *b == b'+')
}

/// Decode the corner list of a face record (`v`, `v/t`, `v//n`, `v/t/n`)
/// into `out`, replacing its contents. Decoding stops at the first token
/// that does not start with a number.
pub fn parse_face(
    fields: &[u8],
    counts: AttributeCounts,
    out: &mut Vec<FaceCorner>,
) -> Result<(), NumericError> {
    out.clear();
    let mut pos = skip_blanks(fields, 0);

    while starts_number(fields, pos) {
        let (v, next) = parse_int(fields, pos)?;
        pos = next;
        let mut corner = FaceCorner {
            position: resolve_index(v, counts.positions),
            uv: None,
            normal: None,
        };

        if fields.get(pos) == Some(&b'/') {
            pos += 1;
            if fields.get(pos) == Some(&b'/') {
                pos += 1;
            } else if starts_number(fields, pos) {
                let (t, next) = parse_int(fields, pos)?;
                corner.uv = Some(resolve_index(t, counts.uvs));
                pos = next;
                if fields.get(pos) == Some(&b'/') {
                    pos += 1;
                }
            }
            if starts_number(fields, pos) {
                let (n, next) = parse_int(fields, pos)?;
                corner.normal = Some(resolve_index(n, counts.normals));
                pos = next;
            }
        }

        out.push(corner);
        pos = skip_blanks(fields, pos);
    }

    Ok(())
}

/// Append the fan triangulation of `corners` to `out` and return the number
/// of triangles written. Triangles are `(0, k, k+1)`, or `(k+1, k, 0)` when
/// `flip` is set so winding survives the X mirror.
pub fn fan_triangulate(corners: &[FaceCorner], flip: bool, out: &mut Vec<FaceCorner>) -> usize {
    if corners.len() < 3 {
        return 0;
    }
    let anchor = corners[0];
    out.reserve((corners.len() - 2) * 3);
    for k in 1..corners.len() - 1 {
        if flip {
            out.extend_from_slice(&[corners[k + 1], corners[k], anchor]);
        } else {
            out.extend_from_slice(&[anchor, corners[k], corners[k + 1]]);
        }
    }
    corners.len() - 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(n: usize) -> AttributeCounts {
        AttributeCounts {
            positions: n,
            uvs: n,
            normals: n,
        }
    }

    fn corner(position: u32, uv: Option<u32>, normal: Option<u32>) -> FaceCorner {
        FaceCorner {
            position,
            uv,
            normal,
        }
    }

    fn parse(fields: &str, n: usize) -> Vec<FaceCorner> {
        let mut out = Vec::new();
        parse_face(fields.as_bytes(), counts(n), &mut out).expect("valid face");
        out
    }

    #[test]
    fn positive_indices_are_one_based() {
        assert_eq!(resolve_index(1, 10), 0);
        assert_eq!(resolve_index(10, 10), 9);
    }

    #[test]
    fn negative_indices_count_back_from_current_length() {
        assert_eq!(resolve_index(-1, 3), 2);
        assert_eq!(resolve_index(-3, 3), 0);
        assert_eq!(resolve_index(-4, 3), u32::MAX);
    }

    #[test]
    fn decodes_all_corner_forms() {
        assert_eq!(
            parse("1 2 3", 3),
            vec![corner(0, None, None), corner(1, None, None), corner(2, None, None)]
        );
        assert_eq!(
            parse("1/1 2/2 3/3", 3),
            vec![
                corner(0, Some(0), None),
                corner(1, Some(1), None),
                corner(2, Some(2), None)
            ]
        );
        assert_eq!(
            parse("1//3 2//2 3//1", 3),
            vec![
                corner(0, None, Some(2)),
                corner(1, None, Some(1)),
                corner(2, None, Some(0))
            ]
        );
        assert_eq!(
            parse("1/2/3 2/3/1 3/1/2", 3),
            vec![
                corner(0, Some(1), Some(2)),
                corner(1, Some(2), Some(0)),
                corner(2, Some(0), Some(1))
            ]
        );
    }

    #[test]
    fn negative_face_matches_positive_face() {
        assert_eq!(parse("-3 -2 -1", 3), parse("1 2 3", 3));
        assert_eq!(parse("-1 -2 -3", 3), parse("3 2 1", 3));
        assert_eq!(parse("-1/-1/-1 -2/-2/-2 -3/-3/-3", 3), parse("3/3/3 2/2/2 1/1/1", 3));
    }

    #[test]
    fn trailing_garbage_ends_the_face() {
        assert_eq!(parse("1 2 3 # quad?", 3).len(), 3);
    }

    #[test]
    fn fan_of_ngon_has_n_minus_two_triangles_sharing_anchor() {
        let face: Vec<FaceCorner> = (0..6).map(|i| corner(i, None, None)).collect();
        let mut out = Vec::new();
        assert_eq!(fan_triangulate(&face, false, &mut out), 4);
        assert_eq!(out.len(), 12);
        for tri in out.chunks(3) {
            assert_eq!(tri[0], face[0]);
        }
        assert_eq!(&out[3..6], &[face[0], face[2], face[3]]);
    }

    #[test]
    fn flip_reverses_winding() {
        let face: Vec<FaceCorner> = (0..4).map(|i| corner(i, None, None)).collect();
        let mut out = Vec::new();
        assert_eq!(fan_triangulate(&face, true, &mut out), 2);
        assert_eq!(
            out.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![2, 1, 0, 3, 2, 0]
        );
    }

    #[test]
    fn degenerate_faces_emit_nothing() {
        let mut out = Vec::new();
        assert_eq!(fan_triangulate(&[corner(0, None, None); 2], false, &mut out), 0);
        assert!(out.is_empty());
    }
}
