//! Runtime Wavefront OBJ/MTL import.
//!
//! `load_obj` scans the file header, resolves the material library, then
//! parses and compacts geometry on the blocking pool. The resulting
//! [`ObjModel`] is materialized into a [`SceneGraph`] by the caller.

pub mod config;
pub mod error;
pub mod loader;
pub mod mesh;
pub mod mtl;
pub mod obj;
pub mod scene;
pub mod search;
pub mod texture;

pub use config::ImportConfig;
pub use error::{AssetError, NumericError, TextureError};
pub use loader::{ModelMesh, ObjModel, load_obj};
pub use mesh::{CompactMesh, SubMesh};
pub use mtl::{MaterialDescriptor, TextureRef, TextureSlot};
pub use scene::{MaterializeCommand, SceneGraph};
pub use texture::{TextureData, TextureFormat};
