use serde::Serialize;
use std::fmt;

/// Number of priority classes (PCP values 0-7) on an 802.1Q link.
pub const MAX_PRIORITY_CLASSES: u8 = 8;

/// Priority code point of a stream. Lower numeric value means higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);

    /// Returns `None` if `value` is outside `0..classes`.
    pub fn new(value: u8, classes: u8) -> Option<Self> {
        if value < classes.min(MAX_PRIORITY_CLASSES) { Some(Priority(value)) } else { None }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// True if `self` is strictly more urgent than `other`.
    pub fn is_higher_than(&self, other: Priority) -> bool {
        self.0 < other.0
    }

    /// All classes in `0..classes`, highest priority first.
    pub fn all(classes: u8) -> impl Iterator<Item = Priority> {
        (0..classes.min(MAX_PRIORITY_CLASSES)).map(Priority)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_value_is_higher_priority() {
        let p0 = Priority::new(0, 8).unwrap();
        let p3 = Priority::new(3, 8).unwrap();
        assert!(p0.is_higher_than(p3));
        assert!(!p3.is_higher_than(p0));
        assert!(!p3.is_higher_than(p3));
    }

    #[test]
    fn rejects_values_outside_class_range() {
        assert!(Priority::new(7, 8).is_some());
        assert!(Priority::new(8, 8).is_none());
        assert!(Priority::new(4, 4).is_none());
        assert_eq!(Priority::all(3).count(), 3);
    }
}
