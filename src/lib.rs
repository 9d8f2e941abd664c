//! Skeletal animation clips for [glTF 2.0](https://www.khronos.org/gltf) assets.
//!
//! It's based on the [gltf](https://github.com/gltf-rs/gltf) crate. Every animation in an asset
//! becomes a named clip, one clip at a time is active, and every frame the active clip is
//! advanced and sampled into a [`Pose`] keyed by node and channel path.
//!
//! # Example
//!
//! ```
//! use gltf_skeleton::SkeletonAnimator;
//!
//! let mut animator = SkeletonAnimator::new();
//! let clips = animator.bind_asset("tests/robot.gltf").expect("Failed to load glTF");
//! println!("Clips: #{}", clips);
//!
//! animator.set_active_clip("idle").expect("No idle clip");
//! animator.update(1.0 / 60.0).expect("Bad frame time");
//! for (node, path, value) in animator.pose().iter() {
//!     println!("{} {}: {:?}", node, path, value);
//! }
//! ```

mod animator;
mod asset;
mod clip;
mod curve;
mod error;
mod import;
mod node;
mod pose;
mod properties;
mod registry;
mod selector;

use gltf::Gltf;
use import::grab_animations;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use animator::{AnimatorConfig, SkeletonAnimator};
pub use asset::{AssetLoader, GltfLoader, RawAnimation, RawAsset, RawChannel};
pub use clip::{AnimClip, PlaybackState, WrapMode};
pub use curve::{Curve, Interpolation, Keyframes, SampledValue};
pub use error::AnimationError;
pub use node::{AnimNode, AnimProperty, ChannelPath, NodeId};
pub use pose::{Pose, PoseSink};
pub use properties::{find_property, PropertyDescriptor, PropertyKind, PROPERTIES};
pub use registry::{ClipHandle, ClipRegistry, UNIQUE_NAME_LIMIT};
pub use selector::ClipSelector;

/// Load the animations of a glTF 2.0 file.
///
/// Note: You can use this function with either a `Gltf` (standard `glTF`) or `Glb` (binary glTF).
///
/// # Example
///
/// ```
/// let asset = gltf_skeleton::load("tests/robot.gltf").expect("Failed to load glTF");
/// println!("Animations: #{}", asset.animations.len());
/// ```
pub fn load(path: &str) -> Result<RawAsset, AnimationError> {
  // Try to get the file name. If this fails, the path probably doesn't exist.
  let file_name = file_name_from_path(path).map_err(|e| AnimationError::load_failed(path, e))?;

  // We need the base path for the GLTF lib to resolve external buffers.
  let base = Path::new(path).parent().unwrap_or_else(|| Path::new("./"));

  // The buffer we're going to read the model into.
  let model_reader =
    read_path_to_buf_read(path).map_err(|e| AnimationError::load_failed(path, e))?;

  // Now we need to get the "Document" from the GLTF lib.
  let gltf_data =
    Gltf::from_reader(model_reader).map_err(|e| AnimationError::load_failed(path, e))?;

  // Keyframes live in the buffers.
  let buffers = gltf::import_buffers(&gltf_data, Some(base), gltf_data.blob.clone())
    .map_err(|e| AnimationError::load_failed(path, e))?;

  let animations = grab_animations(&gltf_data, &buffers, file_name);
  debug!(
    "gltf-skeleton: [{}] holds {} animation(s).",
    file_name,
    animations.len()
  );

  Ok(RawAsset::new(animations))
}

///
/// Load the animations of a glTF 2.0 document held in memory.
///
/// Buffers have to be embedded, there is no directory to resolve external ones against.
///
pub fn load_slice(bytes: &[u8]) -> Result<RawAsset, AnimationError> {
  const SOURCE: &str = "<memory>";

  let gltf_data = Gltf::from_slice(bytes).map_err(|e| AnimationError::load_failed(SOURCE, e))?;
  let buffers = gltf::import_buffers(&gltf_data, None, gltf_data.blob.clone())
    .map_err(|e| AnimationError::load_failed(SOURCE, e))?;

  Ok(RawAsset::new(grab_animations(&gltf_data, &buffers, SOURCE)))
}

///
/// Automatically parse a file path into a BufReader<File>.
///
fn read_path_to_buf_read(path: &str) -> Result<BufReader<File>, String> {
  match File::open(path) {
    Ok(file) => Ok(BufReader::new(file)),
    Err(e) => Err(format!("Path to BufReader failure. {}", e)),
  }
}

///
/// Get a file name from the path provided.
///
fn file_name_from_path(path: &str) -> Result<&str, &str> {
  let new_path = Path::new(path);

  if !new_path.exists() {
    return Err("File name from file path. Path does not exist.");
  }

  match new_path.file_name() {
    Some(os_str) => match os_str.to_str() {
      Some(final_str) => Ok(final_str),
      None => Err("File name from file path. Failed to convert OsStr to str."),
    },
    None => Err("File name from file path. Failed to parse OS Path str."),
  }
}

// ? ////////////////////////////////////////////////////////////////////////////////////////////// ? //
// ?                            CODE ENDS HERE, BEGIN UNIT TESTS.                                   ? //
// ? ////////////////////////////////////////////////////////////////////////////////////////////// ? //
