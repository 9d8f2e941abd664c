use itertools::Itertools;

use crate::{
  asset::RawAnimation,
  error::AnimationError,
  node::{AnimNode, AnimProperty},
  pose::PoseSink,
};

/// What playback does once the clip reaches its duration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
  /// Clamp at the duration and stay there.
  #[default]
  Hold,
  /// Wrap back around to the start.
  Loop,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
  /// Time is at zero and does not move.
  #[default]
  Stopped,
  /// Time moves on every advance.
  Playing,
  /// Time is kept where it is and does not move.
  Paused,
}

///
/// One named, playable animation.
///
/// The node graph is fixed at import time. Only the playback time and state change afterwards.
///
#[derive(Clone, Debug)]
pub struct AnimClip {
  name: Option<String>,
  duration: f32,
  time: f32,
  state: PlaybackState,
  wrap_mode: WrapMode,
  nodes: Vec<AnimNode>,
}

impl AnimClip {
  pub fn new(name: Option<String>, nodes: Vec<AnimNode>, wrap_mode: WrapMode) -> Self {
    let duration = nodes.iter().map(AnimNode::end_time).fold(0.0, f32::max);
    AnimClip {
      name,
      duration,
      time: 0.0,
      state: PlaybackState::Stopped,
      wrap_mode,
      nodes,
    }
  }

  ///
  /// Build a clip out of raw channels.
  ///
  /// Channels are grouped into one node per target, nodes ordered by id, properties ordered by
  /// path. Curves keep the order they had in the file.
  ///
  pub(crate) fn from_raw(name: Option<String>, raw: RawAnimation, wrap_mode: WrapMode) -> Self {
    let nodes = raw
      .channels
      .into_iter()
      .map(|channel| (channel.node, channel.curve))
      .into_group_map()
      .into_iter()
      .sorted_by_key(|(id, _)| *id)
      .map(|(id, curves)| {
        let properties = curves
          .into_iter()
          .map(|curve| (curve.path(), curve))
          .into_group_map()
          .into_iter()
          .sorted_by_key(|(path, _)| *path)
          .map(|(path, curves)| AnimProperty::new(path, curves))
          .collect();
        AnimNode::new(id, properties)
      })
      .collect();

    AnimClip::new(name, nodes, wrap_mode)
  }

  /// `None` only when no unique name could be generated for it.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  pub fn duration(&self) -> f32 {
    self.duration
  }

  /// Current playback time, always within `[0, duration]`.
  pub fn time(&self) -> f32 {
    self.time
  }

  pub fn state(&self) -> PlaybackState {
    self.state
  }

  pub fn is_playing(&self) -> bool {
    self.state == PlaybackState::Playing
  }

  /// Held at the end of a non looping clip.
  pub fn is_finished(&self) -> bool {
    self.wrap_mode == WrapMode::Hold && self.time >= self.duration
  }

  pub fn wrap_mode(&self) -> WrapMode {
    self.wrap_mode
  }

  pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
    self.wrap_mode = wrap_mode;
  }

  pub fn nodes(&self) -> &[AnimNode] {
    &self.nodes
  }

  /// Start or resume. Time is not rewound.
  pub fn play(&mut self) {
    self.state = PlaybackState::Playing;
  }

  pub fn pause(&mut self) {
    if self.state == PlaybackState::Playing {
      self.state = PlaybackState::Paused;
    }
  }

  /// Stop and rewind to zero.
  pub fn stop(&mut self) {
    self.state = PlaybackState::Stopped;
    self.time = 0.0;
  }

  /// Jump to `time`, clamped into the clip. The playback state is left alone.
  pub fn seek(&mut self, time: f32) -> Result<(), AnimationError> {
    if !time.is_finite() || time < 0.0 {
      return Err(AnimationError::InvalidAdvance(time));
    }
    self.time = time.min(self.duration);
    Ok(())
  }

  ///
  /// Move playback forward by `dt` seconds.
  ///
  /// Does nothing unless the clip is playing. Past the duration a `Hold` clip clamps and a
  /// `Loop` clip wraps around.
  ///
  pub fn advance(&mut self, dt: f32) -> Result<(), AnimationError> {
    if !dt.is_finite() || dt < 0.0 {
      return Err(AnimationError::InvalidAdvance(dt));
    }

    if self.state != PlaybackState::Playing {
      return Ok(());
    }

    let time = self.time + dt;
    self.time = match self.wrap_mode {
      WrapMode::Hold => time.min(self.duration),
      WrapMode::Loop if self.duration > 0.0 => time % self.duration,
      // Nothing to loop over.
      WrapMode::Loop => 0.0,
    };

    Ok(())
  }

  ///
  /// Sample every curve of every node at the current time into `sink`.
  ///
  pub fn extract<S: PoseSink + ?Sized>(&self, sink: &mut S) {
    for node in &self.nodes {
      for property in node.properties() {
        for curve in property.curves() {
          sink.write(node.id(), property.path(), curve.sample(self.time));
        }
      }
    }
  }
}
