//! Adapter for range-declaring contract annotations.
//!
//! Hosts let users state value contracts on declarations (`Range(from, to)`,
//! `Min(value)`, `Positive`, ...). The domain treats the annotation names as
//! opaque keys: each recognized annotation contributes a set, the
//! contributions are intersected, and unrecognized annotations contribute the
//! full range (no information).

use crate::set::IntSet;

/// Annotation names carrying an explicit `from`/`to` interval.
pub const RANGE_NAMES: [&str; 2] = ["Range", "IntRange"];
/// Annotation name carrying a lower bound in its `value` attribute.
pub const MIN_NAME: &str = "Min";
/// Annotation name carrying an upper bound in its `value` attribute.
pub const MAX_NAME: &str = "Max";
/// The value is at least -1 (a "found" index or -1 for absence).
pub const GTE_NEGATIVE_ONE_NAME: &str = "GTENegativeOne";
/// Annotation names declaring a non-negative value.
pub const NON_NEGATIVE_NAMES: [&str; 2] = ["NonNegative", "Nonnegative"];
/// The value is strictly positive.
pub const POSITIVE_NAME: &str = "Positive";

/// A contract annotation found on a declaration: a name plus optional
/// integer attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    name: String,
    attributes: Vec<(String, i64)>,
    group_filter: bool,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Annotation {
            name: name.into(),
            attributes: Vec::new(),
            group_filter: false,
        }
    }

    /// Adds an integer attribute (e.g. `from`, `to`, `value`).
    pub fn attribute(mut self, key: impl Into<String>, value: i64) -> Self {
        self.attributes.push((key.into(), value));
        self
    }

    /// Marks the annotation as carrying a validation-group filter; bound
    /// annotations with a group filter apply only to specific validation
    /// phases and contribute nothing here.
    pub fn group_filter(mut self) -> Self {
        self.group_filter = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn value_of(&self, key: &str) -> Option<i64> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

impl IntSet {
    /// Intersects the contributions of every annotation on a declaration.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangeset_rs::annotations::Annotation;
    /// use rangeset_rs::set::IntSet;
    ///
    /// let annotations = vec![
    ///     Annotation::new("NonNegative"),
    ///     Annotation::new("Max").attribute("value", 100),
    /// ];
    /// assert_eq!(IntSet::from_annotations(&annotations), IntSet::range(0, 100));
    /// ```
    pub fn from_annotations<'a, I>(annotations: I) -> IntSet
    where
        I: IntoIterator<Item = &'a Annotation>,
    {
        annotations
            .into_iter()
            .fold(IntSet::ALL, |acc, annotation| acc.intersect(&contribution(annotation)))
    }
}

/// The set contributed by a single annotation; the full range when the
/// annotation is unrecognized or malformed.
fn contribution(annotation: &Annotation) -> IntSet {
    let name = annotation.name();
    if RANGE_NAMES.contains(&name) {
        if let (Some(from), Some(to)) = (annotation.value_of("from"), annotation.value_of("to")) {
            if to >= from {
                return IntSet::range(from, to);
            }
        }
    } else if name == MIN_NAME {
        if let Some(value) = annotation.value_of("value") {
            if !annotation.group_filter {
                return IntSet::range(value, i64::MAX);
            }
        }
    } else if name == MAX_NAME {
        if let Some(value) = annotation.value_of("value") {
            if !annotation.group_filter {
                return IntSet::range(i64::MIN, value);
            }
        }
    } else if name == GTE_NEGATIVE_ONE_NAME {
        return IntSet::range(-1, i64::MAX);
    } else if NON_NEGATIVE_NAMES.contains(&name) {
        return IntSet::range(0, i64::MAX);
    } else if name == POSITIVE_NAME {
        return IntSet::range(1, i64::MAX);
    }
    IntSet::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_annotations_is_full_range() {
        assert_eq!(IntSet::from_annotations(&[]), IntSet::ALL);
    }

    #[test]
    fn test_range_annotation() {
        let a = Annotation::new("Range").attribute("from", -5).attribute("to", 5);
        assert_eq!(IntSet::from_annotations(&[a]), IntSet::range(-5, 5));
        let a = Annotation::new("IntRange").attribute("from", 0).attribute("to", 9);
        assert_eq!(IntSet::from_annotations(&[a]), IntSet::range(0, 9));
        // Reversed or missing bounds contribute nothing
        let a = Annotation::new("Range").attribute("from", 5).attribute("to", -5);
        assert_eq!(IntSet::from_annotations(&[a]), IntSet::ALL);
        let a = Annotation::new("Range").attribute("from", 5);
        assert_eq!(IntSet::from_annotations(&[a]), IntSet::ALL);
    }

    #[test]
    fn test_bound_annotations() {
        let min = Annotation::new("Min").attribute("value", 10);
        assert_eq!(IntSet::from_annotations(&[min]), IntSet::range(10, i64::MAX));
        let max = Annotation::new("Max").attribute("value", 10);
        assert_eq!(IntSet::from_annotations(&[max]), IntSet::range(i64::MIN, 10));
        // A group filter suppresses the bound
        let filtered = Annotation::new("Min").attribute("value", 10).group_filter();
        assert_eq!(IntSet::from_annotations(&[filtered]), IntSet::ALL);
    }

    #[test]
    fn test_half_interval_annotations() {
        assert_eq!(
            IntSet::from_annotations(&[Annotation::new("GTENegativeOne")]),
            IntSet::range(-1, i64::MAX)
        );
        assert_eq!(
            IntSet::from_annotations(&[Annotation::new("NonNegative")]),
            IntSet::range(0, i64::MAX)
        );
        assert_eq!(
            IntSet::from_annotations(&[Annotation::new("Nonnegative")]),
            IntSet::range(0, i64::MAX)
        );
        assert_eq!(
            IntSet::from_annotations(&[Annotation::new("Positive")]),
            IntSet::range(1, i64::MAX)
        );
    }

    #[test]
    fn test_contributions_intersect() {
        let annotations = vec![
            Annotation::new("Min").attribute("value", -10),
            Annotation::new("Max").attribute("value", 10),
            Annotation::new("Positive"),
        ];
        assert_eq!(IntSet::from_annotations(&annotations), IntSet::range(1, 10));
    }

    #[test]
    fn test_unrecognized_annotation_is_ignored() {
        let annotations = vec![
            Annotation::new("Deprecated"),
            Annotation::new("NonNegative"),
        ];
        assert_eq!(
            IntSet::from_annotations(&annotations),
            IntSet::range(0, i64::MAX)
        );
    }
}
