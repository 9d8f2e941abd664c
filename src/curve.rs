use float_cmp::approx_eq;
use glam::{Quat, Vec3, Vec4};

use crate::{error::AnimationError, node::ChannelPath};

/// How the values between two keyframes are produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
  /// Hold the earlier keyframe until the next one is reached.
  Step,
  /// Lerp for vectors and weights, slerp for rotations.
  #[default]
  Linear,
  /// Hermite spline. Every keyframe stores in-tangent, value, out-tangent.
  CubicSpline,
}

/// Raw animation data. Unionized.
#[derive(Clone, Debug, PartialEq)]
pub enum Keyframes {
  /// Translation raw data.
  Translation(Vec<Vec3>),
  /// Rotation raw data.
  Rotation(Vec<Quat>),
  /// Scale raw data.
  Scale(Vec<Vec3>),
  /// Morph Target Weights raw data, one run of weights per keyframe.
  Weights(Vec<f32>),
}

impl Keyframes {
  /// The node attribute this data drives.
  pub fn path(&self) -> ChannelPath {
    match self {
      Keyframes::Translation(_) => ChannelPath::Translation,
      Keyframes::Rotation(_) => ChannelPath::Rotation,
      Keyframes::Scale(_) => ChannelPath::Scale,
      Keyframes::Weights(_) => ChannelPath::Weights,
    }
  }

  fn value_count(&self) -> usize {
    match self {
      Keyframes::Translation(values) | Keyframes::Scale(values) => values.len(),
      Keyframes::Rotation(values) => values.len(),
      Keyframes::Weights(values) => values.len(),
    }
  }
}

/// A curve evaluated at one point in time.
#[derive(Clone, Debug, PartialEq)]
pub enum SampledValue {
  Translation(Vec3),
  Rotation(Quat),
  Scale(Vec3),
  Weights(Vec<f32>),
}

impl SampledValue {
  pub fn path(&self) -> ChannelPath {
    match self {
      SampledValue::Translation(_) => ChannelPath::Translation,
      SampledValue::Rotation(_) => ChannelPath::Rotation,
      SampledValue::Scale(_) => ChannelPath::Scale,
      SampledValue::Weights(_) => ChannelPath::Weights,
    }
  }
}

trait Interpolate: Copy {
  fn linear(start: Self, end: Self, t: f32) -> Self;

  fn hermite(v0: Self, out_tangent: Self, in_tangent: Self, v1: Self, t: f32, span: f32) -> Self;
}

/// Hermite basis weights for (v0, m0, v1, m1).
fn hermite_basis(t: f32) -> (f32, f32, f32, f32) {
  let t2 = t * t;
  let t3 = t2 * t;
  let s2 = -2.0 * t3 + 3.0 * t2;
  let s3 = t3 - t2;
  (1.0 - s2, s3 - t2 + t, s2, s3)
}

impl Interpolate for f32 {
  fn linear(start: Self, end: Self, t: f32) -> Self {
    start + (end - start) * t
  }

  fn hermite(v0: Self, out_tangent: Self, in_tangent: Self, v1: Self, t: f32, span: f32) -> Self {
    let (s0, s1, s2, s3) = hermite_basis(t);
    s0 * v0 + s1 * out_tangent * span + s2 * v1 + s3 * in_tangent * span
  }
}

impl Interpolate for Vec3 {
  fn linear(start: Self, end: Self, t: f32) -> Self {
    start.lerp(end, t)
  }

  fn hermite(v0: Self, out_tangent: Self, in_tangent: Self, v1: Self, t: f32, span: f32) -> Self {
    let (s0, s1, s2, s3) = hermite_basis(t);
    v0 * s0 + out_tangent * span * s1 + v1 * s2 + in_tangent * span * s3
  }
}

impl Interpolate for Quat {
  fn linear(start: Self, end: Self, t: f32) -> Self {
    start.slerp(end, t)
  }

  fn hermite(v0: Self, out_tangent: Self, in_tangent: Self, v1: Self, t: f32, span: f32) -> Self {
    let (s0, s1, s2, s3) = hermite_basis(t);
    let blended = Vec4::from(v0) * s0
      + Vec4::from(out_tangent) * span * s1
      + Vec4::from(v1) * s2
      + Vec4::from(in_tangent) * span * s3;
    Quat::from_vec4(blended).normalize()
  }
}

/// Where a sample time falls on the timeline.
#[derive(Clone, Copy, Debug)]
enum Frame {
  /// Exactly on (or clamped to) a keyframe.
  Key(usize),
  /// Between `index` and `index + 1`.
  Between { index: usize, factor: f32, span: f32 },
}

///
/// A single animation track: timestamps plus the keyframes they time.
///
/// Timestamps are strictly increasing, finite and non-negative. The structure is fixed once
/// built, only sampling happens afterwards.
///
#[derive(Clone, Debug)]
pub struct Curve {
  timestamps: Vec<f32>,
  keyframes: Keyframes,
  interpolation: Interpolation,
  stride: usize,
}

impl Curve {
  ///
  /// Validate and build a curve.
  ///
  /// Cubic spline data carries three values per keyframe and morph weight data carries one run
  /// of weights per keyframe, anything else has to line up one to one with the timestamps.
  ///
  pub fn new(
    timestamps: Vec<f32>,
    keyframes: Keyframes,
    interpolation: Interpolation,
  ) -> Result<Self, AnimationError> {
    if timestamps.is_empty() {
      return Err(AnimationError::MalformedCurve(
        "curve has no timestamps".to_string(),
      ));
    }

    if let Some(bad) = timestamps.iter().find(|t| !t.is_finite() || **t < 0.0) {
      return Err(AnimationError::MalformedCurve(format!(
        "invalid timestamp [{}]",
        bad
      )));
    }

    if timestamps.windows(2).any(|pair| pair[1] <= pair[0]) {
      return Err(AnimationError::MalformedCurve(
        "timestamps are not strictly increasing".to_string(),
      ));
    }

    let slots = match interpolation {
      Interpolation::CubicSpline => timestamps.len() * 3,
      Interpolation::Step | Interpolation::Linear => timestamps.len(),
    };
    let value_count = keyframes.value_count();

    let stride = match keyframes {
      Keyframes::Weights(_) => {
        if value_count == 0 || value_count % slots != 0 {
          return Err(AnimationError::MalformedCurve(format!(
            "[{}] morph weights do not split evenly over [{}] keyframe slots",
            value_count, slots
          )));
        }
        value_count / slots
      }
      _ => {
        if value_count != slots {
          return Err(AnimationError::MalformedCurve(format!(
            "[{}] {} values for [{}] keyframe slots",
            value_count,
            keyframes.path(),
            slots
          )));
        }
        1
      }
    };

    Ok(Curve {
      timestamps,
      keyframes,
      interpolation,
      stride,
    })
  }

  pub fn path(&self) -> ChannelPath {
    self.keyframes.path()
  }

  pub fn timestamps(&self) -> &[f32] {
    &self.timestamps
  }

  pub fn keyframes(&self) -> &Keyframes {
    &self.keyframes
  }

  pub fn interpolation(&self) -> Interpolation {
    self.interpolation
  }

  pub fn keyframe_count(&self) -> usize {
    self.timestamps.len()
  }

  /// Values per keyframe: the morph target count for weights, 1 otherwise.
  pub fn stride(&self) -> usize {
    self.stride
  }

  pub fn start_time(&self) -> f32 {
    self.timestamps.first().copied().unwrap_or(0.0)
  }

  pub fn end_time(&self) -> f32 {
    self.timestamps.last().copied().unwrap_or(0.0)
  }

  ///
  /// Evaluate the curve at `time`.
  ///
  /// Times before the first keyframe hold the first value, times after the last one hold the
  /// last value. A time landing on a keyframe returns that keyframe untouched.
  ///
  pub fn sample(&self, time: f32) -> SampledValue {
    let frame = self.locate(time);
    match &self.keyframes {
      Keyframes::Translation(values) => {
        SampledValue::Translation(self.sample_element(values, 0, frame))
      }
      Keyframes::Rotation(values) => SampledValue::Rotation(self.sample_element(values, 0, frame)),
      Keyframes::Scale(values) => SampledValue::Scale(self.sample_element(values, 0, frame)),
      Keyframes::Weights(values) => SampledValue::Weights(
        (0..self.stride)
          .map(|element| self.sample_element(values, element, frame))
          .collect(),
      ),
    }
  }

  fn locate(&self, time: f32) -> Frame {
    let last = self.timestamps.len() - 1;

    if time.is_nan() || time <= self.timestamps[0] {
      return Frame::Key(0);
    }
    if time >= self.timestamps[last] {
      return Frame::Key(last);
    }

    // First timestamp past `time`, always within 1..=last here.
    let next = self.timestamps.partition_point(|t| *t <= time);
    let index = next - 1;

    let start = self.timestamps[index];
    let end = self.timestamps[next];

    if approx_eq!(f32, time, start, ulps = 4) {
      return Frame::Key(index);
    }
    if approx_eq!(f32, time, end, ulps = 4) {
      return Frame::Key(next);
    }

    let span = end - start;
    Frame::Between {
      index,
      factor: (time - start) / span,
      span,
    }
  }

  fn value_slot(&self, key: usize, element: usize) -> usize {
    match self.interpolation {
      Interpolation::CubicSpline => (key * 3 + 1) * self.stride + element,
      Interpolation::Step | Interpolation::Linear => key * self.stride + element,
    }
  }

  fn sample_element<T: Interpolate>(&self, values: &[T], element: usize, frame: Frame) -> T {
    match frame {
      Frame::Key(key) => values[self.value_slot(key, element)],
      Frame::Between {
        index,
        factor,
        span,
      } => {
        let v0 = values[self.value_slot(index, element)];
        let v1 = values[self.value_slot(index + 1, element)];
        match self.interpolation {
          Interpolation::Step => v0,
          Interpolation::Linear => T::linear(v0, v1, factor),
          Interpolation::CubicSpline => {
            let out_tangent = values[(index * 3 + 2) * self.stride + element];
            let in_tangent = values[(index + 1) * 3 * self.stride + element];
            T::hermite(v0, out_tangent, in_tangent, v1, factor, span)
          }
        }
      }
    }
  }
}
