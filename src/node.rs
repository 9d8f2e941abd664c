use std::fmt;

use log::warn;

use crate::curve::Curve;

///
/// Index of the animated node (bone) inside the asset it was imported from.
///
/// Resolved once at import time. Handles from one asset mean nothing in another.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
  /// The raw index.
  pub fn index(self) -> u32 {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "node {}", self.0)
  }
}

/// Which attribute of a node a property animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelPath {
  /// Node translation.
  Translation,
  /// Node rotation.
  Rotation,
  /// Node scale.
  Scale,
  /// Morph target weights.
  Weights,
}

impl ChannelPath {
  /// The glTF name of the path.
  pub fn as_str(self) -> &'static str {
    match self {
      ChannelPath::Translation => "translation",
      ChannelPath::Rotation => "rotation",
      ChannelPath::Scale => "scale",
      ChannelPath::Weights => "weights",
    }
  }
}

impl fmt::Display for ChannelPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One animated attribute of a node and the curves driving it.
#[derive(Clone, Debug)]
pub struct AnimProperty {
  path: ChannelPath,
  curves: Vec<Curve>,
}

impl AnimProperty {
  /// Curves animating some other path are dropped.
  pub fn new(path: ChannelPath, curves: Vec<Curve>) -> Self {
    let curves = curves
      .into_iter()
      .filter(|curve| {
        let matches = curve.path() == path;
        if !matches {
          warn!(
            "gltf-skeleton: dropping {} curve from {} property.",
            curve.path(),
            path
          );
        }
        matches
      })
      .collect();
    AnimProperty { path, curves }
  }

  /// Property name, same as the channel path name.
  pub fn name(&self) -> &'static str {
    self.path.as_str()
  }

  pub fn path(&self) -> ChannelPath {
    self.path
  }

  pub fn curves(&self) -> &[Curve] {
    &self.curves
  }

  pub fn curve_count(&self) -> usize {
    self.curves.len()
  }

  /// Latest keyframe time over all curves.
  pub fn end_time(&self) -> f32 {
    self
      .curves
      .iter()
      .map(Curve::end_time)
      .fold(0.0, f32::max)
  }
}

/// One animation target, usually a skeleton joint.
#[derive(Clone, Debug)]
pub struct AnimNode {
  id: NodeId,
  properties: Vec<AnimProperty>,
}

impl AnimNode {
  pub fn new(id: NodeId, properties: Vec<AnimProperty>) -> Self {
    AnimNode { id, properties }
  }

  pub fn id(&self) -> NodeId {
    self.id
  }

  pub fn properties(&self) -> &[AnimProperty] {
    &self.properties
  }

  /// Find the property animating `path`, if any.
  pub fn property(&self, path: ChannelPath) -> Option<&AnimProperty> {
    self.properties.iter().find(|property| property.path == path)
  }

  pub fn end_time(&self) -> f32 {
    self
      .properties
      .iter()
      .map(AnimProperty::end_time)
      .fold(0.0, f32::max)
  }
}
