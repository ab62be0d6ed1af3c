//! Import configuration passed explicitly into every load.

/// Placeholder substituted by the base file name in search templates.
pub const FILE_NAME_PLACEHOLDER: &str = "%FileName%";

/// Immutable per-load import settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ImportConfig {
    /// Mirror X to convert right-handed sources to a left-handed convention.
    pub flip_x: bool,
    /// Forces the scale factor, bypassing exporter detection.
    pub scale_override: Option<f32>,
    /// `(substring, scale)` pairs; the first header line containing the substring sets the scale.
    pub exporter_scales: Vec<(String, f32)>,
    /// Directories tried, relative to the OBJ/MTL directory, when locating files.
    pub search_paths: Vec<String>,
    /// Upper bound for opacity once a material is flagged for alpha blending.
    pub blend_opacity_cap: f32,
    /// Decode located textures into pixel data.
    pub decode_textures: bool,
    /// Fill empty material slots from suffix-named textures next to the MTL.
    pub auto_assign_textures: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            flip_x: true,
            scale_override: None,
            exporter_scales: vec![("3ds Max".to_string(), 0.01)],
            search_paths: vec![String::new(), format!("{FILE_NAME_PLACEHOLDER}_Textures/")],
            blend_opacity_cap: 0.9,
            decode_textures: true,
            auto_assign_textures: false,
        }
    }
}

impl ImportConfig {
    pub fn with_flip_x(mut self, flip_x: bool) -> Self {
        self.flip_x = flip_x;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale_override = Some(scale);
        self
    }

    pub fn with_search_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_blend_opacity_cap(mut self, cap: f32) -> Self {
        self.blend_opacity_cap = cap.clamp(0.0, 1.0);
        self
    }

    pub fn with_decode_textures(mut self, decode: bool) -> Self {
        self.decode_textures = decode;
        self
    }

    pub fn with_auto_assign_textures(mut self, enabled: bool) -> Self {
        self.auto_assign_textures = enabled;
        self
    }

    /// Multiplier applied to X of positions and normals.
    #[inline]
    pub fn x_sign(&self) -> f32 {
        if self.flip_x { -1.0 } else { 1.0 }
    }

    /// Scale implied by a header line, if any exporter signature matches.
    pub fn exporter_scale(&self, line: &str) -> Option<f32> {
        self.exporter_scales
            .iter()
            .find(|(signature, _)| line.contains(signature.as_str()))
            .map(|(_, scale)| *scale)
    }

    /// Search templates with the placeholder replaced by `base_name`.
    pub fn expanded_search_paths<'a>(
        &'a self,
        base_name: &'a str,
    ) -> impl Iterator<Item = String> + 'a {
        self.search_paths
            .iter()
            .map(move |template| template.replace(FILE_NAME_PLACEHOLDER, base_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_templates_expand_file_name() {
        let config = ImportConfig::default();
        let paths: Vec<String> = config.expanded_search_paths("chair").collect();
        assert_eq!(paths, vec!["".to_string(), "chair_Textures/".to_string()]);
    }

    #[test]
    fn exporter_signature_sets_scale() {
        let config = ImportConfig::default();
        assert_eq!(config.exporter_scale("# 3ds Max Wavefront OBJ Exporter v0.97b"), Some(0.01));
        assert_eq!(config.exporter_scale("# Blender v2.79 OBJ File"), None);
    }

    #[test]
    fn opacity_cap_is_clamped() {
        let config = ImportConfig::default().with_blend_opacity_cap(3.0);
        assert_eq!(config.blend_opacity_cap, 1.0);
    }
}
