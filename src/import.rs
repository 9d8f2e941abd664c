// Based on https://whoisryosuke.com/blog/2022/importing-gltf-with-wgpu-and-rust
// You can thank ryosuke for this information.

use glam::{Quat, Vec3};
use gltf::{animation::util, buffer::Data, Document};
use log::{debug, error};

use crate::{
  asset::{RawAnimation, RawChannel},
  curve::{Curve, Interpolation, Keyframes},
  error::AnimationError,
  node::NodeId,
};

///
/// Pull every animation out of a glTF document, in document order.
///
/// A broken channel is logged and skipped, the rest of its animation still loads.
///
pub(crate) fn grab_animations(
  document: &Document,
  buffers: &[Data],
  file_name: &str,
) -> Vec<RawAnimation> {
  let mut animations = vec![];

  for animation in document.animations() {
    let mut channels = vec![];

    // ? Channels come in random order, the clip sorts them out per node later.
    for (channel_index, channel) in animation.channels().enumerate() {
      match read_channel(&channel, buffers) {
        Ok(raw_channel) => channels.push(raw_channel),
        Err(e) => error!(
          "gltf-skeleton: Skipping channel [{}] of animation [{}] in model [{}]. {}",
          channel_index,
          animation.index(),
          file_name,
          e
        ),
      }
    }

    #[cfg(feature = "names")]
    let name = animation.name().map(String::from);
    #[cfg(not(feature = "names"))]
    let name = None;

    debug!(
      "gltf-skeleton: animation [{}] of [{}] has {} channel(s).",
      animation.index(),
      file_name,
      channels.len()
    );

    animations.push(RawAnimation::new(name, channels));
  }

  animations
}

fn read_channel(
  channel: &gltf::animation::Channel<'_>,
  buffers: &[Data],
) -> Result<RawChannel, AnimationError> {
  let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

  let timestamps: Vec<f32> = match reader.read_inputs() {
    Some(inputs) => inputs.collect(),
    None => {
      return Err(AnimationError::MalformedCurve(
        "no timestamp data".to_string(),
      ))
    }
  };

  // Quantized rotations and weights are normalized into f32 on the way in.
  let keyframes = match reader.read_outputs() {
    Some(util::ReadOutputs::Translations(translations)) => {
      Keyframes::Translation(translations.map(Vec3::from_array).collect())
    }
    Some(util::ReadOutputs::Rotations(rotations)) => {
      Keyframes::Rotation(rotations.into_f32().map(Quat::from_array).collect())
    }
    Some(util::ReadOutputs::Scales(scales)) => {
      Keyframes::Scale(scales.map(Vec3::from_array).collect())
    }
    Some(util::ReadOutputs::MorphTargetWeights(weights)) => {
      Keyframes::Weights(weights.into_f32().collect())
    }
    None => {
      return Err(AnimationError::MalformedCurve(
        "no keyframe data".to_string(),
      ))
    }
  };

  let interpolation = match channel.sampler().interpolation() {
    gltf::animation::Interpolation::Linear => Interpolation::Linear,
    gltf::animation::Interpolation::Step => Interpolation::Step,
    gltf::animation::Interpolation::CubicSpline => Interpolation::CubicSpline,
  };

  let node_index = channel.target().node().index();
  let node = u32::try_from(node_index).map_err(|_| {
    AnimationError::MalformedCurve(format!("node index [{}] out of range", node_index))
  })?;

  Ok(RawChannel {
    node: NodeId(node),
    curve: Curve::new(timestamps, keyframes, interpolation)?,
  })
}
