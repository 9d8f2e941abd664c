use ahash::AHashMap;

use crate::{
  curve::SampledValue,
  node::{ChannelPath, NodeId},
};

/// Anything that can receive sampled clip values, keyed by node and channel path.
pub trait PoseSink {
  fn write(&mut self, node: NodeId, path: ChannelPath, value: SampledValue);
}

///
/// The sampled values of one clip at one point in time.
///
/// This is what the skinning stage reads every frame. Later writes to the same
/// `(node, path)` replace earlier ones.
///
#[derive(Clone, Debug, Default)]
pub struct Pose {
  values: AHashMap<(NodeId, ChannelPath), SampledValue>,
}

impl Pose {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, node: NodeId, path: ChannelPath) -> Option<&SampledValue> {
    self.values.get(&(node, path))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn clear(&mut self) {
    self.values.clear();
  }

  /// Every sampled value, in no particular order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, ChannelPath, &SampledValue)> {
    self
      .values
      .iter()
      .map(|((node, path), value)| (*node, *path, value))
  }
}

impl PoseSink for Pose {
  fn write(&mut self, node: NodeId, path: ChannelPath, value: SampledValue) {
    self.values.insert((node, path), value);
  }
}
