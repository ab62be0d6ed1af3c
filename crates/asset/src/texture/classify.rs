//! Filename-suffix texture classifier (`<material>_<semantic>.<ext>`).

use std::path::Path;

use crate::mtl::TextureSlot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSemantic {
    Diffuse,
    Normal,
    Bump,
    Specular,
    Metallic,
    Roughness,
    Gloss,
    Occlusion,
    Emission,
    Reflection,
    Opacity,
}

/// Checked in order; the first list with a matching fragment wins.
const SUFFIXES: &[(TextureSemantic, &[&str])] = &[
    (TextureSemantic::Metallic, &["_metalness", "_metallic", "_metal"]),
    (
        TextureSemantic::Occlusion,
        &["_ambient occlusion", "_ao", "_occlusion", "_lightmap", "_diffuseintensity"],
    ),
    (TextureSemantic::Diffuse, &["_diffuse", "_albedo", "_basecolor"]),
    (TextureSemantic::Gloss, &["_glossiness", "_glossness", "_gloss", "_glossy"]),
    (TextureSemantic::Specular, &["_specular", "_spec"]),
    (TextureSemantic::Roughness, &["_roughness", "_rough"]),
    (TextureSemantic::Normal, &["_normal", "_nrm", "_normalmap"]),
    (TextureSemantic::Bump, &["_bump", "_bumpmap", "_heightmap"]),
    (TextureSemantic::Emission, &["_emission", "_emit", "_emissive"]),
    (TextureSemantic::Reflection, &["_ref", "_reflect", "_reflection"]),
    (
        TextureSemantic::Opacity,
        &["_transparency", "_transparent", "_opacity", "_mask", "_alpha"],
    ),
];

impl TextureSemantic {
    /// Material slot able to hold this semantic, if any.
    pub fn slot(self) -> Option<TextureSlot> {
        match self {
            TextureSemantic::Diffuse => Some(TextureSlot::Diffuse),
            TextureSemantic::Normal | TextureSemantic::Bump => Some(TextureSlot::Bump),
            TextureSemantic::Specular | TextureSemantic::Metallic | TextureSemantic::Gloss => {
                Some(TextureSlot::Specular)
            }
            TextureSemantic::Emission => Some(TextureSlot::Emission),
            TextureSemantic::Opacity => Some(TextureSlot::Opacity),
            TextureSemantic::Roughness
            | TextureSemantic::Occlusion
            | TextureSemantic::Reflection => None,
        }
    }
}

/// Classify a texture file by the suffix of its (lowercased) stem.
pub fn classify(path: &Path) -> Option<TextureSemantic> {
    let stem = path.file_stem()?.to_string_lossy().to_ascii_lowercase();
    SUFFIXES
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|f| stem.contains(f)))
        .map(|(semantic, _)| *semantic)
}

/// Material a suffix-named texture belongs to: the lowercased stem up to the first `_`.
pub fn material_key(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy().to_ascii_lowercase();
    let key = stem.split('_').next().unwrap_or_default();
    (!key.is_empty()).then(|| key.to_string())
}
