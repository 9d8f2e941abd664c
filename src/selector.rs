///
/// Single choice over the registered clip names.
///
/// Options mirror the registry order, so the active index doubles as a clip index.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipSelector {
  options: Vec<String>,
  active: Option<usize>,
}

impl ClipSelector {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace every option. The selection goes back to none.
  pub fn populate<I, S>(&mut self, names: I)
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.options = names.into_iter().map(Into::into).collect();
    self.active = None;
  }

  ///
  /// Make `name` the active option.
  ///
  /// An unknown (or empty) name returns false and keeps whatever was selected before.
  ///
  pub fn select(&mut self, name: &str) -> bool {
    if name.is_empty() {
      return false;
    }
    match self.options.iter().position(|option| option == name) {
      Some(index) => {
        self.active = Some(index);
        true
      }
      None => false,
    }
  }

  pub fn active_index(&self) -> Option<usize> {
    self.active
  }

  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  /// Name of the active option.
  pub fn value(&self) -> Option<&str> {
    self
      .active
      .and_then(|index| self.options.get(index))
      .map(String::as_str)
  }

  pub fn options(&self) -> &[String] {
    &self.options
  }

  /// Drop every option and the selection.
  pub fn clear(&mut self) {
    self.options.clear();
    self.active = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn select_known_and_unknown() {
    let mut selector = ClipSelector::new();
    selector.populate(["anim_0", "anim_1"]);
    assert!(!selector.is_active());

    assert!(selector.select("anim_1"));
    assert_eq!(selector.active_index(), Some(1));
    assert_eq!(selector.value(), Some("anim_1"));

    assert!(!selector.select("anim_7"));
    assert_eq!(selector.active_index(), Some(1));

    assert!(!selector.select(""));
    assert_eq!(selector.active_index(), Some(1));
  }

  #[test]
  fn populate_resets_selection() {
    let mut selector = ClipSelector::new();
    selector.populate(vec!["a".to_string(), "b".to_string()]);
    assert!(selector.select("a"));

    selector.populate(["b", "a"]);
    assert_eq!(selector.active_index(), None);
    assert_eq!(selector.options(), &["b".to_string(), "a".to_string()]);

    selector.clear();
    assert!(selector.options().is_empty());
    assert_eq!(selector.value(), None);
  }
}
