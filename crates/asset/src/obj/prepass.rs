//! Header scan run before the main parse: scale heuristics and `mtllib` discovery.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::lexer::{Record, classify};
use crate::config::ImportConfig;
use crate::search;

/// What the header scan found.
#[derive(Clone, Debug, PartialEq)]
pub struct Prepass {
    pub scale: f32,
    /// Path as written after `mtllib`.
    pub declared_library: Option<String>,
    /// Existing file the declared library resolved to.
    pub material_library: Option<PathBuf>,
}

/// Scan `obj_path` line by line until the first `mtllib` directive.
///
/// The first line containing a configured exporter signature sets the scale
/// (unless `scale_override` is set). Only one material library is supported.
pub fn run_prepass(obj_path: &Path, config: &ImportConfig) -> Result<Prepass> {
    let file = File::open(obj_path)
        .with_context(|| format!("Failed to open OBJ file: {}", obj_path.display()))?;
    scan(BufReader::new(file), obj_path, config)
}

fn scan<R: BufRead>(reader: R, obj_path: &Path, config: &ImportConfig) -> Result<Prepass> {
    let mut detected_scale: Option<f32> = None;
    let mut declared_library = None;

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_no + 1))?;
        if detected_scale.is_none() {
            let text = String::from_utf8_lossy(&line);
            if let Some(scale) = config.exporter_scale(&text) {
                log::info!("Exporter signature found on line {}, scale={}", line_no + 1, scale);
                detected_scale = Some(scale);
            }
        }
        if let Record::MaterialLibrary(declared) = classify(&line) {
            declared_library = Some(String::from_utf8_lossy(declared).into_owned());
            break;
        }
    }

    let scale = config.scale_override.or(detected_scale).unwrap_or(1.0);
    let material_library = declared_library.as_deref().and_then(|declared| {
        let obj_dir = obj_path.parent().unwrap_or_else(|| Path::new(""));
        let base_name = search::base_name(obj_path);
        let found = search::resolve_library(declared, obj_dir, &base_name, config);
        if found.is_none() {
            log::warn!(
                "Material library '{}' referenced by {} was not found",
                declared,
                obj_path.display()
            );
        }
        found
    });

    Ok(Prepass {
        scale,
        declared_library,
        material_library,
    })
}
