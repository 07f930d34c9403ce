//! Per-signal change detection.

/// How a [`ChangeDetector`] decides that a sample is reportable.
#[derive(Debug, Clone, Copy)]
pub enum ChangeRule<T> {
    /// Report when the sample differs from the last reported value.
    Inequality,
    /// Report whenever the predicate holds, regardless of history.
    Predicate(fn(&T) -> bool),
}

/// Tracks the last reported value of one signal.
///
/// Starts unset, so the first sample is always reported under
/// [`ChangeRule::Inequality`].
#[derive(Debug, Clone)]
pub struct ChangeDetector<T> {
    last: Option<T>,
    rule: ChangeRule<T>,
}

impl<T: PartialEq> Default for ChangeDetector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> ChangeDetector<T> {
    /// Equality-based detector.
    pub fn new() -> Self {
        Self { last: None, rule: ChangeRule::Inequality }
    }

    /// Predicate-based detector.
    pub fn with_predicate(predicate: fn(&T) -> bool) -> Self {
        Self { last: None, rule: ChangeRule::Predicate(predicate) }
    }

    /// Feed one sample. Returns `true` when it should be reported.
    pub fn observe(&mut self, value: T) -> bool {
        let changed = match self.rule {
            ChangeRule::Inequality => self.last.as_ref() != Some(&value),
            ChangeRule::Predicate(predicate) => predicate(&value),
        };
        if changed {
            self.last = Some(value);
        }
        changed
    }

    /// Last reported value.
    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl ChangeDetector<i32> {
    /// Shortcut ids: any positive sample is a fresh press.
    pub fn shortcut() -> Self {
        Self::with_predicate(|id| *id > 0)
    }
}

impl ChangeDetector<bool> {
    /// Double-tap flag: reported whenever set.
    pub fn double_tap() -> Self {
        Self::with_predicate(|flag| *flag)
    }
}
