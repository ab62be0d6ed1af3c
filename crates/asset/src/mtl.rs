//! MTL material-library parser producing renderer-neutral material descriptors.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use corelib::Vec3;

use crate::config::ImportConfig;
use crate::obj::numeric::parse_float;
use crate::search::TextureSearch;
use crate::texture::{TextureData, classify};

/// Emission is taken from `Ka` scaled down by this factor.
pub const AMBIENT_EMISSION_SCALE: f32 = 0.05;
/// Bump strength set when a bump map is attached.
pub const BUMP_MAP_SCALE: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Diffuse,
    Bump,
    Specular,
    Emission,
    Opacity,
}

/// A located texture and, when decoding is enabled, its pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRef {
    pub path: PathBuf,
    pub data: Option<TextureData>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDescriptor {
    pub name: String,
    pub base_color: Vec3,
    pub specular_color: Vec3,
    pub emission_color: Vec3,
    /// `Ns / 100`, not clamped.
    pub glossiness: f32,
    pub opacity: f32,
    pub alpha_blend: bool,
    pub emission_enabled: bool,
    pub normal_map_enabled: bool,
    pub bump_scale: f32,
    pub diffuse_texture: Option<TextureRef>,
    pub bump_texture: Option<TextureRef>,
    pub specular_texture: Option<TextureRef>,
    pub emission_texture: Option<TextureRef>,
    pub opacity_texture: Option<TextureRef>,
}

impl MaterialDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: Vec3::ONE,
            specular_color: Vec3::splat(0.2),
            emission_color: Vec3::ZERO,
            glossiness: 0.5,
            opacity: 1.0,
            alpha_blend: false,
            emission_enabled: false,
            normal_map_enabled: false,
            bump_scale: 1.0,
            diffuse_texture: None,
            bump_texture: None,
            specular_texture: None,
            emission_texture: None,
            opacity_texture: None,
        }
    }

    /// Plain diffuse material used when a referenced material is unknown.
    pub fn fallback(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&TextureRef> {
        match slot {
            TextureSlot::Diffuse => self.diffuse_texture.as_ref(),
            TextureSlot::Bump => self.bump_texture.as_ref(),
            TextureSlot::Specular => self.specular_texture.as_ref(),
            TextureSlot::Emission => self.emission_texture.as_ref(),
            TextureSlot::Opacity => self.opacity_texture.as_ref(),
        }
    }

    fn texture_mut(&mut self, slot: TextureSlot) -> &mut Option<TextureRef> {
        match slot {
            TextureSlot::Diffuse => &mut self.diffuse_texture,
            TextureSlot::Bump => &mut self.bump_texture,
            TextureSlot::Specular => &mut self.specular_texture,
            TextureSlot::Emission => &mut self.emission_texture,
            TextureSlot::Opacity => &mut self.opacity_texture,
        }
    }

    fn enable_blending(&mut self, cap: f32) {
        self.alpha_blend = true;
        self.opacity = self.opacity.clamp(0.0, cap);
    }
}

/// Read and parse the material library at `path`.
pub fn load_mtl(path: &Path, config: &ImportConfig) -> Result<Vec<MaterialDescriptor>> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to open MTL file: {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    let search = TextureSearch::for_library(path);
    let materials = parse_mtl(&text, &search, config);
    log::info!("Loaded {} materials from {}", materials.len(), path.display());
    Ok(materials)
}

/// Parse MTL text. Malformed directives are skipped with a warning.
pub fn parse_mtl(
    text: &str,
    search: &TextureSearch,
    config: &ImportConfig,
) -> Vec<MaterialDescriptor> {
    let mut materials = Vec::new();
    let mut current: Option<MaterialDescriptor> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, data) = line
            .split_once(char::is_whitespace)
            .map(|(k, d)| (k, d.trim()))
            .unwrap_or((line, ""));

        if key.eq_ignore_ascii_case("newmtl") {
            materials.extend(current.take());
            current = Some(MaterialDescriptor::new(data));
            continue;
        }

        let Some(mat) = current.as_mut() else {
            log::debug!("MTL line {}: '{}' before any newmtl, ignored", line_no + 1, key);
            continue;
        };

        if let Err(what) = apply_directive(mat, key, data, search, config) {
            log::warn!(
                "MTL line {}: malformed '{}' for material '{}': {}",
                line_no + 1,
                key,
                mat.name,
                what
            );
        }
    }
    materials.extend(current);

    if config.auto_assign_textures {
        assign_by_suffix(&mut materials, search, config);
    }
    materials
}

fn apply_directive(
    mat: &mut MaterialDescriptor,
    key: &str,
    data: &str,
    search: &TextureSearch,
    config: &ImportConfig,
) -> Result<(), crate::error::NumericError> {
    let directive = key.to_ascii_lowercase();
    match directive.as_str() {
        "kd" => {
            mat.base_color = parse_color(data)?.clamp(Vec3::ZERO, Vec3::ONE);
        }
        "ks" => {
            mat.specular_color = parse_color(data)?;
        }
        "ka" => {
            mat.emission_color =
                (parse_color(data)? * AMBIENT_EMISSION_SCALE).clamp(Vec3::ZERO, Vec3::ONE);
            mat.emission_enabled = true;
        }
        "ns" => {
            mat.glossiness = parse_scalar(data)? / 100.0;
        }
        "d" => {
            mat.opacity = parse_scalar(data)?.clamp(0.0, 1.0);
            if mat.opacity < 1.0 {
                mat.enable_blending(config.blend_opacity_cap);
            }
        }
        "map_kd" => {
            assign_texture(mat, TextureSlot::Diffuse, texture_arg(data), search, config);
        }
        "map_bump" | "bump" => {
            assign_texture(mat, TextureSlot::Bump, texture_arg(data), search, config);
        }
        "map_d" => {
            // Blending is forced even when the map itself cannot be found.
            mat.enable_blending(config.blend_opacity_cap);
            assign_texture(mat, TextureSlot::Opacity, texture_arg(data), search, config);
        }
        "map_ks" => {
            assign_texture(mat, TextureSlot::Specular, texture_arg(data), search, config);
        }
        "map_ke" => {
            assign_texture(mat, TextureSlot::Emission, texture_arg(data), search, config);
        }
        _ => {}
    }
    Ok(())
}

fn parse_scalar(data: &str) -> Result<f32, crate::error::NumericError> {
    parse_float(data.as_bytes(), 0).map(|(v, _)| v)
}

/// `r g b`, or a single value used for all channels.
fn parse_color(data: &str) -> Result<Vec3, crate::error::NumericError> {
    let bytes = data.as_bytes();
    let (r, c) = parse_float(bytes, 0)?;
    if c >= bytes.len() || bytes[c..].trim_ascii().is_empty() {
        return Ok(Vec3::splat(r));
    }
    let (g, c) = parse_float(bytes, c)?;
    let (b, _) = parse_float(bytes, c)?;
    Ok(Vec3::new(r, g, b))
}

/// Texture file of a `map_*` directive; leading `-option value` pairs are skipped
/// by taking the last field.
fn texture_arg(data: &str) -> &str {
    if data.starts_with('-') {
        data.split_whitespace().last().unwrap_or(data)
    } else {
        data
    }
}

/// Resolve, optionally decode and store a texture. Returns `false` when the
/// slot stays empty.
fn attach(
    mat: &mut MaterialDescriptor,
    slot: TextureSlot,
    declared: &str,
    search: &TextureSearch,
    config: &ImportConfig,
) -> bool {
    if declared.is_empty() {
        return false;
    }
    let Some(path) = search.resolve(declared, config) else {
        log::warn!(
            "Material '{}': {:?} texture '{}' not found",
            mat.name,
            slot,
            declared
        );
        return false;
    };

    let data = if config.decode_textures {
        match TextureData::load(&path) {
            Ok(mut tex) => {
                if slot == TextureSlot::Bump {
                    tex.swizzle_normal_map();
                }
                Some(tex)
            }
            Err(err) => {
                log::warn!(
                    "Material '{}': {:?} texture {} skipped: {}",
                    mat.name,
                    slot,
                    path.display(),
                    err
                );
                return false;
            }
        }
    } else {
        None
    };

    *mat.texture_mut(slot) = Some(TextureRef { path, data });
    true
}

/// Attach a texture and switch on the material state its slot implies.
fn assign_texture(
    mat: &mut MaterialDescriptor,
    slot: TextureSlot,
    declared: &str,
    search: &TextureSearch,
    config: &ImportConfig,
) {
    if !attach(mat, slot, declared, search, config) {
        return;
    }
    match slot {
        TextureSlot::Diffuse => mat.base_color = Vec3::ONE,
        TextureSlot::Bump => {
            mat.normal_map_enabled = true;
            mat.bump_scale = BUMP_MAP_SCALE;
        }
        TextureSlot::Opacity => mat.enable_blending(config.blend_opacity_cap),
        TextureSlot::Emission => mat.emission_enabled = true,
        TextureSlot::Specular => {}
    }
}

/// Fill empty slots from `<material>_<semantic>` files found next to the library.
fn assign_by_suffix(
    materials: &mut [MaterialDescriptor],
    search: &TextureSearch,
    config: &ImportConfig,
) {
    for candidate in search.candidates() {
        let Some(semantic) = classify::classify(candidate) else {
            continue;
        };
        let Some(key) = classify::material_key(candidate) else {
            continue;
        };
        let Some(slot) = semantic.slot() else {
            log::warn!(
                "No material slot for {:?} texture {}",
                semantic,
                candidate.display()
            );
            continue;
        };

        let mut matched = false;
        for mat in materials
            .iter_mut()
            .filter(|m| m.name.to_ascii_lowercase() == key)
        {
            matched = true;
            if mat.texture(slot).is_none() {
                log::debug!("Assigning {} to '{}' as {:?}", candidate.display(), mat.name, slot);
                let declared = candidate.to_string_lossy();
                assign_texture(mat, slot, &declared, search, config);
            }
        }
        if !matched {
            log::warn!(
                "No material matches {:?} texture {}",
                semantic,
                candidate.display()
            );
        }
    }
}
