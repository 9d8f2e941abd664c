//! String valued properties an editor can bind to a [`SkeletonAnimator`].

use crate::animator::SkeletonAnimator;

/// How an editor should present a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
  /// A path to an asset on disk.
  ResourcePath,
  /// One string out of a list of options.
  StringOption,
}

/// A (name, getter, setter) entry of the property table.
#[derive(Clone, Copy)]
pub struct PropertyDescriptor {
  pub name: &'static str,
  pub kind: PropertyKind,
  pub get: fn(&SkeletonAnimator) -> String,
  /// Returns false when the value was rejected.
  pub set: fn(&mut SkeletonAnimator, &str) -> bool,
}

impl std::fmt::Debug for PropertyDescriptor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PropertyDescriptor")
      .field("name", &self.name)
      .field("kind", &self.kind)
      .finish()
  }
}

fn get_gltf(animator: &SkeletonAnimator) -> String {
  animator.asset_path().to_string()
}

fn set_gltf(animator: &mut SkeletonAnimator, path: &str) -> bool {
  animator.bind_asset(path).is_ok()
}

fn get_anim(animator: &SkeletonAnimator) -> String {
  animator.active_clip_name().unwrap_or_default().to_string()
}

fn set_anim(animator: &mut SkeletonAnimator, name: &str) -> bool {
  animator.set_active_clip(name).is_ok()
}

/// Every property a skeleton animator exposes.
pub static PROPERTIES: [PropertyDescriptor; 2] = [
  PropertyDescriptor {
    name: "Gltf",
    kind: PropertyKind::ResourcePath,
    get: get_gltf,
    set: set_gltf,
  },
  PropertyDescriptor {
    name: "Anim",
    kind: PropertyKind::StringOption,
    get: get_anim,
    set: set_anim,
  },
];

pub fn find_property(name: &str) -> Option<&'static PropertyDescriptor> {
  PROPERTIES.iter().find(|property| property.name == name)
}
