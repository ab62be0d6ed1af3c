//! Locating material libraries and textures on disk.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::ImportConfig;

/// Extensions (lowercase) collected by the candidate scan.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga", "dds"];

/// File name without directory and extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Texture references use forward slashes regardless of the authoring platform.
pub fn normalize_separators(declared: &str) -> String {
    declared.trim().replace('\\', "/")
}

/// Search templates, then the declared path itself.
fn resolve_direct(
    declared: &str,
    base_dir: &Path,
    base_name: &str,
    config: &ImportConfig,
) -> Option<PathBuf> {
    for prefix in config.expanded_search_paths(base_name) {
        let candidate = base_dir.join(prefix).join(declared);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    let as_is = PathBuf::from(declared);
    as_is.is_file().then_some(as_is)
}

/// Locate a material library declared by `mtllib`.
pub fn resolve_library(
    declared: &str,
    obj_dir: &Path,
    obj_base_name: &str,
    config: &ImportConfig,
) -> Option<PathBuf> {
    let declared = normalize_separators(declared);
    resolve_direct(&declared, obj_dir, obj_base_name, config)
}

/// Locate a texture: search templates, the declared path, then the first
/// candidate whose file stem equals the declared stem (case-sensitive).
pub fn resolve_texture(
    declared: &str,
    base_dir: &Path,
    base_name: &str,
    config: &ImportConfig,
    candidates: &[PathBuf],
) -> Option<PathBuf> {
    let declared = normalize_separators(declared);
    if let Some(found) = resolve_direct(&declared, base_dir, base_name, config) {
        return Some(found);
    }

    let wanted = Path::new(&declared).file_stem()?;
    let found = candidates
        .iter()
        .find(|c| c.file_stem() == Some(wanted))
        .cloned();
    if found.is_none() {
        log::warn!(
            "Texture '{}' not found (searched templates and {} candidates under {})",
            declared,
            candidates.len(),
            base_dir.display()
        );
    }
    found
}

/// Recursively collect image files under `dir`, sorted for deterministic matching.
pub fn scan_images(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let entries = match fs::read_dir(&current) {
            Ok(entries) => entries,
            Err(err) => {
                log::debug!("Skipping unreadable directory {}: {}", current.display(), err);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if is_image(&path) {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Texture lookup context for one material library.
#[derive(Clone, Debug)]
pub struct TextureSearch {
    base_dir: PathBuf,
    base_name: String,
    candidates: Vec<PathBuf>,
}

impl TextureSearch {
    /// Build the lookup context for the MTL at `mtl_path`, scanning its directory.
    pub fn for_library(mtl_path: &Path) -> Self {
        let base_dir = mtl_path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        let candidates = scan_images(&base_dir);
        log::debug!(
            "Found {} candidate textures under {}",
            candidates.len(),
            base_dir.display()
        );
        Self {
            base_name: base_name(mtl_path),
            base_dir,
            candidates,
        }
    }

    pub fn new(base_dir: PathBuf, base_name: String, candidates: Vec<PathBuf>) -> Self {
        Self {
            base_dir,
            base_name,
            candidates,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    pub fn resolve(&self, declared: &str, config: &ImportConfig) -> Option<PathBuf> {
        resolve_texture(
            declared,
            &self.base_dir,
            &self.base_name,
            config,
            &self.candidates,
        )
    }
}
