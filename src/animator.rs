use log::{error, info};

use crate::{
  asset::{AssetLoader, GltfLoader},
  clip::{AnimClip, PlaybackState, WrapMode},
  error::AnimationError,
  pose::Pose,
  registry::{ClipHandle, ClipRegistry},
  selector::ClipSelector,
};

/// Knobs for a [`SkeletonAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimatorConfig {
  /// Stamped on every clip built from a bound asset.
  pub wrap_mode: WrapMode,
  /// Start a stopped clip as soon as it is selected.
  pub autoplay: bool,
}

impl Default for AnimatorConfig {
  fn default() -> Self {
    AnimatorConfig {
      wrap_mode: WrapMode::Hold,
      autoplay: true,
    }
  }
}

///
/// The single entry point for whatever drives a skeleton.
///
/// Bind an asset, pick a clip, then call [`SkeletonAnimator::update`] once per frame and read
/// the sampled values back out of [`SkeletonAnimator::pose`].
///
pub struct SkeletonAnimator {
  config: AnimatorConfig,
  loader: Box<dyn AssetLoader>,
  asset_path: String,
  registry: ClipRegistry,
  selector: ClipSelector,
  pose: Pose,
}

impl Default for SkeletonAnimator {
  fn default() -> Self {
    Self::new()
  }
}

impl SkeletonAnimator {
  /// Animator loading glTF files from disk with the default config.
  pub fn new() -> Self {
    Self::with_loader(GltfLoader, AnimatorConfig::default())
  }

  pub fn with_config(config: AnimatorConfig) -> Self {
    Self::with_loader(GltfLoader, config)
  }

  pub fn with_loader<L>(loader: L, config: AnimatorConfig) -> Self
  where
    L: AssetLoader + 'static,
  {
    SkeletonAnimator {
      config,
      loader: Box::new(loader),
      asset_path: String::new(),
      registry: ClipRegistry::new(config.wrap_mode),
      selector: ClipSelector::new(),
      pose: Pose::new(),
    }
  }

  ///
  /// Load `path` and rebuild every clip from it.
  ///
  /// The new registry and selector are built on the side and swapped in together, so callers
  /// only ever see the old binding or the new one. A failed load leaves nothing bound.
  ///
  pub fn bind_asset(&mut self, path: &str) -> Result<usize, AnimationError> {
    self.asset_path = path.to_string();

    let asset = match self.loader.load(path) {
      Ok(asset) => asset,
      Err(e) => {
        error!("gltf-skeleton: No clips are bound. {}", e);
        self.install(ClipRegistry::new(self.config.wrap_mode), ClipSelector::new());
        return Err(e);
      }
    };

    let mut registry = ClipRegistry::new(self.config.wrap_mode);
    let count = registry.bind(asset);

    let mut selector = ClipSelector::new();
    selector.populate(registry.names());

    self.install(registry, selector);
    info!("gltf-skeleton: bound [{}] with {} clip(s).", path, count);

    Ok(count)
  }

  fn install(&mut self, registry: ClipRegistry, selector: ClipSelector) {
    self.registry = registry;
    self.selector = selector;
    self.pose.clear();
  }

  ///
  /// Make `name` the active clip.
  ///
  /// An unknown name changes nothing. Reselecting a clip picks up where it left off.
  ///
  pub fn set_active_clip(&mut self, name: &str) -> Result<(), AnimationError> {
    if !self.selector.select(name) {
      return Err(AnimationError::UnknownClipName(name.to_string()));
    }

    self.pose.clear();

    let autoplay = self.config.autoplay;
    if let Some(clip) = self.current_clip_mut() {
      if autoplay && clip.state() == PlaybackState::Stopped {
        clip.play();
      }
    }

    Ok(())
  }

  pub fn current_clip(&self) -> Option<&AnimClip> {
    self
      .selector
      .active_index()
      .and_then(|index| self.registry.get(ClipHandle::new(index)))
  }

  pub fn current_clip_mut(&mut self) -> Option<&mut AnimClip> {
    self
      .selector
      .active_index()
      .and_then(|index| self.registry.get_mut(ClipHandle::new(index)))
  }

  /// Name of the active clip.
  pub fn active_clip_name(&self) -> Option<&str> {
    self.selector.value()
  }

  ///
  /// Per frame driver: advance the active clip by `dt` and sample it into the pose.
  ///
  /// Nothing happens without an active clip.
  ///
  pub fn update(&mut self, dt: f32) -> Result<(), AnimationError> {
    let Some(index) = self.selector.active_index() else {
      return Ok(());
    };
    let Some(clip) = self.registry.get_mut(ClipHandle::new(index)) else {
      return Ok(());
    };

    clip.advance(dt)?;
    clip.extract(&mut self.pose);

    Ok(())
  }

  /// Exact, case sensitive clip name lookup.
  pub fn has_clip(&self, name: &str) -> bool {
    self.registry.contains(name)
  }

  /// Selectable clip names in registry order.
  pub fn clip_names(&self) -> &[String] {
    self.selector.options()
  }

  /// Path given to the last bind, successful or not.
  pub fn asset_path(&self) -> &str {
    &self.asset_path
  }

  /// Values sampled by the last update.
  pub fn pose(&self) -> &Pose {
    &self.pose
  }

  pub fn registry(&self) -> &ClipRegistry {
    &self.registry
  }

  pub fn selector(&self) -> &ClipSelector {
    &self.selector
  }

  pub fn config(&self) -> AnimatorConfig {
    self.config
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::approx_eq;
  use glam::Vec3;

  use super::*;
  use crate::{
    asset::{RawAnimation, RawAsset, RawChannel},
    curve::{Curve, Interpolation, Keyframes, SampledValue},
    node::{ChannelPath, NodeId},
  };

  fn slide() -> RawChannel {
    match Curve::new(
      vec![0.0, 1.0],
      Keyframes::Translation(vec![Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)]),
      Interpolation::Linear,
    ) {
      Ok(curve) => RawChannel {
        node: NodeId(2),
        curve,
      },
      Err(e) => panic!("curve rejected: {}", e),
    }
  }

  fn fake_loader(path: &str) -> Result<RawAsset, AnimationError> {
    match path {
      "two_unnamed" => Ok(RawAsset::new(vec![
        RawAnimation::new(None, vec![slide()]),
        RawAnimation::new(Some(String::new()), vec![slide()]),
      ])),
      "blank_names" => Ok(RawAsset {
        animations: vec![
          RawAnimation {
            name: Some(String::new()),
            channels: vec![slide()],
          },
          RawAnimation {
            name: Some(String::new()),
            channels: vec![slide()],
          },
        ],
      }),
      "static" => Ok(RawAsset::default()),
      _ => Err(AnimationError::load_failed(path, "no such asset")),
    }
  }

  fn animator() -> SkeletonAnimator {
    drop(env_logger::try_init());
    SkeletonAnimator::with_loader(fake_loader, AnimatorConfig::default())
  }

  #[test]
  fn binding_two_unnamed_tracks() {
    let mut animator = animator();
    assert_eq!(animator.bind_asset("two_unnamed"), Ok(2));
    assert_eq!(animator.clip_names(), &["anim_0".to_string(), "anim_1".to_string()]);
    assert!(animator.has_clip("anim_0"));
    assert!(!animator.has_clip("anim_5"));
    assert!(animator.current_clip().is_none());
    assert_eq!(animator.asset_path(), "two_unnamed");
  }

  #[test]
  fn blank_names_are_never_selectable() {
    let mut animator = animator();
    assert_eq!(animator.bind_asset("blank_names"), Ok(2));
    assert_eq!(animator.clip_names(), &["anim_0".to_string(), "anim_1".to_string()]);
    assert!(!animator.has_clip(""));
    assert!(animator.set_active_clip("").is_err());
  }

  #[test]
  fn failed_rebind_clears_everything() {
    let mut animator = animator();
    assert!(animator.bind_asset("two_unnamed").is_ok());
    assert!(animator.set_active_clip("anim_1").is_ok());
    assert!(animator.update(0.5).is_ok());
    assert!(!animator.pose().is_empty());

    let result = animator.bind_asset("missing");
    assert!(matches!(
      result,
      Err(AnimationError::AssetLoadFailed { .. })
    ));
    assert!(animator.current_clip().is_none());
    assert!(animator.clip_names().is_empty());
    assert!(animator.registry().is_empty());
    assert!(animator.pose().is_empty());
  }

  #[test]
  fn asset_without_animations_is_fine() {
    let mut animator = animator();
    assert_eq!(animator.bind_asset("static"), Ok(0));
    assert!(animator.clip_names().is_empty());
    assert!(animator.update(0.1).is_ok());
  }

  #[test]
  fn unknown_clip_keeps_selection() {
    let mut animator = animator();
    assert!(animator.bind_asset("two_unnamed").is_ok());
    assert!(animator.set_active_clip("anim_0").is_ok());
    assert_eq!(
      animator.set_active_clip("walk"),
      Err(AnimationError::UnknownClipName("walk".to_string()))
    );
    assert_eq!(animator.active_clip_name(), Some("anim_0"));
  }

  #[test]
  fn update_advances_and_samples() {
    let mut animator = animator();
    assert!(animator.bind_asset("two_unnamed").is_ok());

    // Nothing selected, nothing sampled.
    assert!(animator.update(0.25).is_ok());
    assert!(animator.pose().is_empty());

    assert!(animator.set_active_clip("anim_0").is_ok());
    assert!(animator.update(0.25).is_ok());
    assert!(animator.update(0.25).is_ok());

    let time = animator.current_clip().map(AnimClip::time);
    assert_eq!(time, Some(0.5));
    match animator.pose().get(NodeId(2), ChannelPath::Translation) {
      Some(SampledValue::Translation(v)) => assert!(approx_eq!(f32, v.y, 2.0, ulps = 4)),
      other => panic!("unexpected pose value {:?}", other),
    }

    assert_eq!(animator.update(-1.0), Err(AnimationError::InvalidAdvance(-1.0)));
    assert_eq!(animator.current_clip().map(AnimClip::time), Some(0.5));
  }

  #[test]
  fn reselecting_does_not_rewind() {
    let mut animator = animator();
    assert!(animator.bind_asset("two_unnamed").is_ok());
    assert!(animator.set_active_clip("anim_0").is_ok());
    assert!(animator.update(0.75).is_ok());

    assert!(animator.set_active_clip("anim_1").is_ok());
    assert_eq!(animator.current_clip().map(AnimClip::time), Some(0.0));

    assert!(animator.set_active_clip("anim_0").is_ok());
    assert_eq!(animator.current_clip().map(AnimClip::time), Some(0.75));
  }

  #[test]
  fn without_autoplay_clips_stay_stopped() {
    drop(env_logger::try_init());
    let config = AnimatorConfig {
      wrap_mode: WrapMode::Loop,
      autoplay: false,
    };
    let mut animator = SkeletonAnimator::with_loader(fake_loader, config);
    assert!(animator.bind_asset("two_unnamed").is_ok());
    assert!(animator.set_active_clip("anim_0").is_ok());
    assert!(animator.update(0.5).is_ok());
    assert_eq!(animator.current_clip().map(AnimClip::time), Some(0.0));

    if let Some(clip) = animator.current_clip_mut() {
      clip.play();
    }
    assert!(animator.update(1.5).is_ok());
    assert_eq!(animator.current_clip().map(AnimClip::wrap_mode), Some(WrapMode::Loop));
    assert_eq!(animator.current_clip().map(AnimClip::time), Some(0.5));
  }
}
