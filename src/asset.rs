use crate::{curve::Curve, error::AnimationError, node::NodeId};

/// One animated channel as it came out of the file: a target node and its curve.
#[derive(Clone, Debug)]
pub struct RawChannel {
  pub node: NodeId,
  pub curve: Curve,
}

/// One animation as it came out of the file.
#[derive(Clone, Debug, Default)]
pub struct RawAnimation {
  /// `None` when the file did not name the animation.
  pub name: Option<String>,
  pub channels: Vec<RawChannel>,
}

impl RawAnimation {
  pub fn new(name: Option<String>, channels: Vec<RawChannel>) -> Self {
    RawAnimation {
      // An empty name is no name at all.
      name: name.filter(|name| !name.is_empty()),
      channels,
    }
  }
}

///
/// Raw data container to hold the animations of a loaded asset.
///
/// Animations are kept in document order.
///
#[derive(Clone, Debug, Default)]
pub struct RawAsset {
  pub animations: Vec<RawAnimation>,
}

impl RawAsset {
  pub fn new(animations: Vec<RawAnimation>) -> Self {
    RawAsset { animations }
  }

  ///
  /// Get if the asset is animated.
  ///
  pub fn is_animated(&self) -> bool {
    !self.animations.is_empty()
  }
}

///
/// Turns an asset path into a [`RawAsset`].
///
/// Closures of the shape `Fn(&str) -> Result<RawAsset, AnimationError>` are loaders too.
///
pub trait AssetLoader {
  fn load(&self, path: &str) -> Result<RawAsset, AnimationError>;
}

impl<F> AssetLoader for F
where
  F: Fn(&str) -> Result<RawAsset, AnimationError>,
{
  fn load(&self, path: &str) -> Result<RawAsset, AnimationError> {
    self(path)
  }
}

/// Loads `.gltf` and `.glb` files from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct GltfLoader;

impl AssetLoader for GltfLoader {
  fn load(&self, path: &str) -> Result<RawAsset, AnimationError> {
    crate::load(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_names_are_dropped() {
    assert_eq!(RawAnimation::new(Some(String::new()), vec![]).name, None);
    assert_eq!(
      RawAnimation::new(Some("walk".to_string()), vec![]).name.as_deref(),
      Some("walk")
    );
  }

  #[test]
  fn closures_are_loaders() {
    let loader = |path: &str| -> Result<RawAsset, AnimationError> {
      if path == "ok" {
        Ok(RawAsset::new(vec![RawAnimation::default()]))
      } else {
        Err(AnimationError::load_failed(path, "nope"))
      }
    };
    assert!(loader.load("ok").map(|asset| asset.is_animated()).unwrap_or(false));
    assert!(loader.load("other").is_err());
  }
}
