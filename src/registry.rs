use ahash::AHashMap;
use log::{debug, warn};

use crate::{
  asset::RawAsset,
  clip::{AnimClip, WrapMode},
  error::AnimationError,
};

/// Generated names run from `anim_0` up to, but not including, `anim_{UNIQUE_NAME_LIMIT}`.
pub const UNIQUE_NAME_LIMIT: u32 = 65535;

const UNIQUE_NAME_PREFIX: &str = "anim_";

/// Position of a clip inside its registry. Only valid for the registry that handed it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClipHandle(usize);

impl ClipHandle {
  pub(crate) fn new(index: usize) -> Self {
    ClipHandle(index)
  }

  pub fn index(self) -> usize {
    self.0
  }
}

///
/// Owns the clips extracted from one asset and keeps their names unique.
///
/// Names are settled when a clip is inserted and never touched afterwards.
///
#[derive(Clone, Debug, Default)]
pub struct ClipRegistry {
  clips: Vec<AnimClip>,
  by_name: AHashMap<String, ClipHandle>,
  wrap_mode: WrapMode,
  // Every generated candidate below this one is already taken.
  name_cursor: u32,
  warnings: Vec<AnimationError>,
}

impl ClipRegistry {
  /// An empty registry stamping `wrap_mode` on the clips it builds.
  pub fn new(wrap_mode: WrapMode) -> Self {
    ClipRegistry {
      wrap_mode,
      ..Default::default()
    }
  }

  ///
  /// Replace every clip with the animations of `asset`.
  ///
  /// Missing or already taken names are replaced by a generated one. Returns how many clips
  /// were registered, zero is fine for an asset without animations.
  ///
  pub fn bind(&mut self, asset: RawAsset) -> usize {
    self.clear();

    for raw in asset.animations {
      // An empty name is no name at all, however the raw animation was built.
      let name = match raw.name.clone().filter(|name| !name.is_empty()) {
        Some(name) if !self.by_name.contains_key(&name) => Some(name),
        source_name => match self.generate_unique_name() {
          Ok(generated) => {
            debug!(
              "gltf-skeleton: clip [{}] named [{}].",
              source_name.as_deref().unwrap_or("<unnamed>"),
              generated
            );
            Some(generated)
          }
          Err(e) => {
            warn!(
              "gltf-skeleton: {}. Clip #{} is registered without a name and cannot be selected.",
              e,
              self.clips.len()
            );
            self.warnings.push(e);
            None
          }
        },
      };

      self.insert(AnimClip::from_raw(name, raw, self.wrap_mode));
    }

    self.clips.len()
  }

  ///
  /// First free name out of `anim_0`, `anim_1`, ... `anim_65534`.
  ///
  /// The same set of registered names always gives the same answer.
  ///
  pub fn generate_unique_name(&self) -> Result<String, AnimationError> {
    (self.name_cursor..UNIQUE_NAME_LIMIT)
      .map(|i| format!("{}{}", UNIQUE_NAME_PREFIX, i))
      .find(|candidate| !self.by_name.contains_key(candidate))
      .ok_or(AnimationError::NameSpaceExhausted)
  }

  fn insert(&mut self, clip: AnimClip) -> ClipHandle {
    let handle = ClipHandle(self.clips.len());

    if let Some(name) = clip.name() {
      self.by_name.insert(name.to_string(), handle);
      self.advance_name_cursor();
    }

    self.clips.push(clip);
    handle
  }

  fn advance_name_cursor(&mut self) {
    while self.name_cursor < UNIQUE_NAME_LIMIT
      && self
        .by_name
        .contains_key(&format!("{}{}", UNIQUE_NAME_PREFIX, self.name_cursor))
    {
      self.name_cursor += 1;
    }
  }

  /// Drop every clip.
  pub fn clear(&mut self) {
    self.clips.clear();
    self.by_name.clear();
    self.name_cursor = 0;
    self.warnings.clear();
  }

  pub fn lookup(&self, name: &str) -> Option<ClipHandle> {
    self.by_name.get(name).copied()
  }

  /// Exact, case sensitive name match.
  pub fn contains(&self, name: &str) -> bool {
    self.by_name.contains_key(name)
  }

  pub fn get(&self, handle: ClipHandle) -> Option<&AnimClip> {
    self.clips.get(handle.0)
  }

  pub fn get_mut(&mut self, handle: ClipHandle) -> Option<&mut AnimClip> {
    self.clips.get_mut(handle.0)
  }

  /// Clips in registration order.
  pub fn clips(&self) -> &[AnimClip] {
    &self.clips
  }

  /// Names in registration order, an unnamed clip shows up as `""`.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.clips.iter().map(|clip| clip.name().unwrap_or(""))
  }

  pub fn len(&self) -> usize {
    self.clips.len()
  }

  pub fn is_empty(&self) -> bool {
    self.clips.is_empty()
  }

  pub fn wrap_mode(&self) -> WrapMode {
    self.wrap_mode
  }

  /// Conditions raised by the last bind that left clips degraded.
  pub fn warnings(&self) -> &[AnimationError] {
    &self.warnings
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset::RawAnimation;

  fn asset(names: &[Option<&str>]) -> RawAsset {
    RawAsset::new(
      names
        .iter()
        .map(|name| RawAnimation::new(name.map(String::from), vec![]))
        .collect(),
    )
  }

  fn names(registry: &ClipRegistry) -> Vec<String> {
    registry.names().map(String::from).collect()
  }

  #[test]
  fn unnamed_clips_get_generated_names() {
    drop(env_logger::try_init());

    let mut registry = ClipRegistry::default();
    assert_eq!(registry.bind(asset(&[None, Some("")])), 2);
    assert_eq!(names(&registry), vec!["anim_0", "anim_1"]);
    assert!(registry.contains("anim_0"));
    assert!(!registry.contains("anim_5"));
    assert!(!registry.contains("ANIM_0"));
    assert_eq!(registry.lookup("anim_1"), Some(ClipHandle(1)));
  }

  #[test]
  fn empty_names_from_struct_literals_are_generated() {
    drop(env_logger::try_init());

    let mut registry = ClipRegistry::default();
    let empty = RawAnimation {
      name: Some(String::new()),
      channels: vec![],
    };
    let count = registry.bind(RawAsset {
      animations: vec![empty.clone(), empty],
    });

    assert_eq!(count, 2);
    assert_eq!(names(&registry), vec!["anim_0", "anim_1"]);
    assert!(!registry.contains(""));
    assert!(registry.warnings().is_empty());
  }

  #[test]
  fn duplicate_and_colliding_names_stay_distinct() {
    drop(env_logger::try_init());

    let mut registry = ClipRegistry::default();
    registry.bind(asset(&[
      Some("walk"),
      None,
      Some("walk"),
      Some("anim_0"),
      Some("anim_3"),
      None,
    ]));

    let names = names(&registry);
    assert_eq!(
      names,
      vec!["walk", "anim_0", "anim_1", "anim_2", "anim_3", "anim_4"]
    );

    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
  }

  #[test]
  fn generation_is_deterministic() {
    let mut registry = ClipRegistry::default();
    registry.bind(asset(&[Some("anim_0"), Some("anim_2")]));

    let first = registry.generate_unique_name();
    let second = registry.generate_unique_name();
    assert_eq!(first, Ok("anim_1".to_string()));
    assert_eq!(first, second);
  }

  #[test]
  fn rebinding_replaces_everything() {
    let mut registry = ClipRegistry::default();
    registry.bind(asset(&[Some("run"), None]));
    assert_eq!(registry.bind(asset(&[])), 0);
    assert!(registry.is_empty());
    assert!(!registry.contains("run"));
    assert_eq!(registry.generate_unique_name(), Ok("anim_0".to_string()));
  }

  #[test]
  fn exhausted_names_leave_the_clip_unnamed() {
    drop(env_logger::try_init());

    let total = UNIQUE_NAME_LIMIT as usize + 1;
    let mut registry = ClipRegistry::default();
    assert_eq!(registry.bind(asset(&vec![None; total])), total);

    assert_eq!(registry.warnings(), &[AnimationError::NameSpaceExhausted]);
    assert_eq!(registry.clips()[total - 1].name(), None);
    assert_eq!(registry.names().last(), Some(""));
    assert!(registry.contains("anim_65534"));
    assert_eq!(
      registry.generate_unique_name(),
      Err(AnimationError::NameSpaceExhausted)
    );
  }
}
