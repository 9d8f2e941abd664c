use thiserror::Error;

use crate::registry::UNIQUE_NAME_LIMIT;

/// Everything that can go wrong while binding, selecting or playing clips.
///
/// None of these are fatal. The animator recovers locally and hands the condition back to the
/// caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
  /// The asset path could not produce a valid asset.
  #[error("failed to load asset [{path}]: {reason}")]
  AssetLoadFailed {
    /// The path that was being bound.
    path: String,
    /// What the loader reported.
    reason: String,
  },

  /// Every `anim_N` candidate is taken, the clip stays unnamed.
  #[error("no free clip name left, anim_0 to anim_{} are all taken", UNIQUE_NAME_LIMIT - 1)]
  NameSpaceExhausted,

  /// No clip with this name is registered.
  #[error("unknown clip name [{0}]")]
  UnknownClipName(String),

  /// Playback time can only move forward by a finite, non-negative amount.
  #[error("invalid playback delta [{0}], delta time must be finite and non-negative")]
  InvalidAdvance(f32),

  /// Keyframe data that cannot be sampled.
  #[error("malformed curve: {0}")]
  MalformedCurve(String),
}

impl AnimationError {
  pub(crate) fn load_failed(path: &str, reason: impl ToString) -> Self {
    AnimationError::AssetLoadFailed {
      path: path.to_string(),
      reason: reason.to_string(),
    }
  }
}
