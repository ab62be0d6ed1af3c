//! Entry point for objload.
//! Loads one OBJ model and prints what ended up in the scene tree.

use anyhow::{Context, Result, bail};
use asset::{ImportConfig, ModelMesh, TextureSlot, load_obj};
use corelib::{SceneTree, Vec3};

fn parse_on_off(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_model_arg() -> Option<String> {
    std::env::args().skip(1).find(|arg| !arg.starts_with("--"))
}

fn parse_offset_arg() -> Vec3 {
    // --offset=x,y,z
    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--offset=") {
            let parts: Vec<_> = v.split(',').map(|p| p.trim().parse::<f32>()).collect();
            if let [Ok(x), Ok(y), Ok(z)] = parts.as_slice() {
                return Vec3::new(*x, *y, *z);
            }
            log::warn!("Invalid --offset '{}', using origin.", v);
        }
    }
    Vec3::ZERO
}

fn parse_config_args() -> ImportConfig {
    let mut config = ImportConfig::default();
    let mut search_paths: Vec<String> = Vec::new();

    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--flip-x=") {
            match parse_on_off(v) {
                Some(flip) => config = config.with_flip_x(flip),
                None => log::warn!("Unknown --flip-x value '{}', keeping default.", v),
            }
        } else if let Some(v) = arg.strip_prefix("--scale=") {
            match v.parse::<f32>() {
                Ok(scale) if scale > 0.0 => config = config.with_scale(scale),
                _ => log::warn!("Invalid --scale '{}', using exporter detection.", v),
            }
        } else if let Some(v) = arg.strip_prefix("--search-path=") {
            search_paths.push(v.to_string());
        } else if let Some(v) = arg.strip_prefix("--opacity-cap=") {
            match v.parse::<f32>() {
                Ok(cap) => config = config.with_blend_opacity_cap(cap),
                Err(_) => log::warn!("Invalid --opacity-cap '{}', keeping default.", v),
            }
        } else if arg == "--no-textures" {
            config = config.with_decode_textures(false);
        } else if arg == "--auto-textures" {
            config = config.with_auto_assign_textures(true);
        }
    }

    if !search_paths.is_empty() {
        config = config.with_search_paths(search_paths);
    }
    config
}

fn log_mesh(mesh: &ModelMesh) {
    log::info!(
        "  mesh '{}': {} vertices, {} triangles, {} submeshes",
        mesh.name,
        mesh.mesh.vertex_count(),
        mesh.mesh.triangle_count(),
        mesh.mesh.submeshes.len()
    );
    for (sub, material) in mesh.mesh.submeshes.iter().zip(&mesh.materials) {
        let textures = [
            TextureSlot::Diffuse,
            TextureSlot::Bump,
            TextureSlot::Specular,
            TextureSlot::Emission,
            TextureSlot::Opacity,
        ]
        .into_iter()
        .filter(|slot| material.texture(*slot).is_some())
        .count();
        log::info!(
            "    '{}': {} triangles, opacity={:.2}, blend={}, textures={}",
            material.name,
            sub.triangle_count(),
            material.opacity,
            material.alpha_blend,
            textures
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(model_path) = parse_model_arg() else {
        bail!(
            "usage: objload <file.obj> [--offset=x,y,z] [--flip-x=on|off] [--scale=F] \
             [--search-path=T]... [--opacity-cap=F] [--no-textures] [--auto-textures]"
        );
    };
    let offset = parse_offset_arg();
    let config = parse_config_args();
    log::info!(
        "Starting objload. model={}, offset={:?}, flip_x={}, textures={}",
        model_path,
        offset,
        config.flip_x,
        config.decode_textures
    );

    let model = load_obj(&model_path, offset, &config)
        .await
        .with_context(|| format!("Could not import {}", model_path))?;

    let mut scene: SceneTree<ModelMesh> = SceneTree::new();
    let root = model
        .materialize(&mut scene)
        .context("Model produced no scene root")?;

    log::info!(
        "Scene root '{}' at {:?} with {} children",
        scene.name(root).unwrap_or_default(),
        scene.transform(root).map(|t| t.translation).unwrap_or_default(),
        scene.children(root).count()
    );
    for child in scene.children(root) {
        if let Some(mesh) = scene.payload(child) {
            log_mesh(mesh);
        }
    }

    log::info!("Done.");
    Ok(())
}
