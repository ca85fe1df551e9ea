//! The integer range set and its exact lattice operations.
//!
//! [`IntSet`] denotes a subset of the signed 64-bit integers. Internally a set
//! is one of four shapes --- empty, a single point, a single interval, or a
//! sequence of at least two intervals --- and every public operation returns the
//! canonical shape for its denotation, so `==` compares denotations.
//!
//! # Invariants
//!
//! - A `Range` has `from < to`; equal endpoints collapse to a `Point`.
//! - A multi-interval set holds a flat `[lo0, hi0, lo1, hi1, ...]` array with
//!   at least two intervals, each `lo <= hi`, sorted ascending, pairwise
//!   disjoint and non-adjacent (`hi + 1 < next lo`).
//! - A set representable by fewer intervals is collapsed to the smaller shape.

use std::fmt;

/// An immutable set of `i64` values, optimized for a small number of ranges.
///
/// Construct sets through the factories ([`empty`][IntSet::empty],
/// [`point`][IntSet::point], [`range`][IntSet::range],
/// [`from_ranges`][IntSet::from_ranges]) or the well-known constants
/// ([`ALL`][IntSet::ALL], [`INT`][IntSet::INT], ...). All operations are pure:
/// they never mutate their inputs and always return canonical results.
///
/// # Examples
///
/// ```
/// use rangeset_rs::set::IntSet;
///
/// let a = IntSet::range(0, 10);
/// assert_eq!(a.subtract(&IntSet::point(5)).to_string(), "{0..4, 6..10}");
/// assert_eq!(a.unite(&IntSet::range(11, 15)), IntSet::range(0, 15));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct IntSet(pub(crate) Repr);

#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) enum Repr {
    Empty,
    Point(i64),
    Range(i64, i64),
    Ranges(Box<[i64]>),
}

/// A comparison relation between two integer expressions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl IntSet {
    /// Every 64-bit value.
    pub const ALL: IntSet = IntSet(Repr::Range(i64::MIN, i64::MAX));
    /// Every 32-bit value.
    pub const INT: IntSet = IntSet(Repr::Range(i32::MIN as i64, i32::MAX as i64));
    /// Every 16-bit signed value.
    pub const SHORT: IntSet = IntSet(Repr::Range(i16::MIN as i64, i16::MAX as i64));
    /// Every 8-bit signed value.
    pub const BYTE: IntSet = IntSet(Repr::Range(i8::MIN as i64, i8::MAX as i64));
    /// Every 16-bit unsigned (character) value.
    pub const CHAR: IntSet = IntSet(Repr::Range(0, u16::MAX as i64));
    /// Valid array and string indices: `0..=i32::MAX`.
    pub const INDEX: IntSet = IntSet(Repr::Range(0, i32::MAX as i64));

    /// The empty set.
    pub fn empty() -> IntSet {
        IntSet(Repr::Empty)
    }

    /// The set containing every 64-bit value.
    pub fn all() -> IntSet {
        IntSet::ALL
    }

    /// The set of valid array and string indices.
    pub fn index_range() -> IntSet {
        IntSet::INDEX
    }

    /// The set containing exactly `value`.
    pub fn point(value: i64) -> IntSet {
        IntSet(Repr::Point(value))
    }

    /// The set containing every value between `from` and `to`, both inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `from > to`.
    pub fn range(from: i64, to: i64) -> IntSet {
        assert!(from <= to, "range: from must not exceed to ({} > {})", from, to);
        if from == to {
            IntSet(Repr::Point(from))
        } else {
            IntSet(Repr::Range(from, to))
        }
    }

    /// Builds a set from a flat `[lo0, hi0, lo1, hi1, ...]` interval array.
    ///
    /// The array must already be canonical: sorted ascending, each `lo <= hi`,
    /// intervals disjoint and non-adjacent.
    ///
    /// # Panics
    ///
    /// Panics if the array has odd length or violates canonical form.
    pub fn from_ranges(ranges: &[i64]) -> IntSet {
        assert!(ranges.len() % 2 == 0, "from_ranges: array length must be even, got {}", ranges.len());
        IntSet::from_pairs(ranges.to_vec())
    }

    /// Same as [`from_ranges`][IntSet::from_ranges], taking ownership of the buffer.
    pub(crate) fn from_pairs(pairs: Vec<i64>) -> IntSet {
        match pairs.len() {
            0 => IntSet::empty(),
            2 => IntSet::range(pairs[0], pairs[1]),
            _ => IntSet::range_set(pairs.into_boxed_slice()),
        }
    }

    /// Multi-interval constructor; validates the canonical-form invariants.
    pub(crate) fn range_set(ranges: Box<[i64]>) -> IntSet {
        // 0 intervals = Empty, 1 interval = Point or Range
        assert!(
            ranges.len() >= 4 && ranges.len() % 2 == 0,
            "range_set: bad length {}",
            ranges.len()
        );
        for i in (0..ranges.len()).step_by(2) {
            assert!(
                ranges[i] <= ranges[i + 1],
                "range_set: bad interval #{} [{}, {}]",
                i / 2,
                ranges[i],
                ranges[i + 1]
            );
            if i > 0 {
                assert!(
                    ranges[i - 1] < i64::MAX && ranges[i - 1] + 1 < ranges[i],
                    "range_set: intervals #{} and #{} overlap or touch",
                    i / 2 - 1,
                    i / 2
                );
            }
        }
        IntSet(Repr::Ranges(ranges))
    }

    /// The flat `[lo, hi, ...]` interval array of this set.
    pub(crate) fn pairs(&self) -> Vec<i64> {
        match &self.0 {
            Repr::Empty => Vec::new(),
            Repr::Point(v) => vec![*v, *v],
            Repr::Range(from, to) => vec![*from, *to],
            Repr::Ranges(r) => r.to_vec(),
        }
    }

    /// True if this set contains no values.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Repr::Empty)
    }

    /// True if this set contains every 64-bit value.
    pub fn is_all(&self) -> bool {
        *self == IntSet::ALL
    }

    /// The minimal value contained in the set.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn min(&self) -> i64 {
        match &self.0 {
            Repr::Empty => panic!("min: the empty set has no minimum"),
            Repr::Point(v) => *v,
            Repr::Range(from, _) => *from,
            Repr::Ranges(r) => r[0],
        }
    }

    /// The maximal value contained in the set.
    ///
    /// # Panics
    ///
    /// Panics if the set is empty.
    pub fn max(&self) -> i64 {
        match &self.0 {
            Repr::Empty => panic!("max: the empty set has no maximum"),
            Repr::Point(v) => *v,
            Repr::Range(_, to) => *to,
            Repr::Ranges(r) => r[r.len() - 1],
        }
    }

    /// True if `value` is a member of this set.
    pub fn contains(&self, value: i64) -> bool {
        match &self.0 {
            Repr::Empty => false,
            Repr::Point(v) => *v == value,
            Repr::Range(from, to) => *from <= value && value <= *to,
            Repr::Ranges(r) => r.chunks(2).any(|pair| pair[0] <= value && value <= pair[1]),
        }
    }

    /// True if this set contains every value of `other`.
    pub fn contains_all(&self, other: &IntSet) -> bool {
        if other.is_empty() || self == other {
            return true;
        }
        match &self.0 {
            Repr::Empty => false,
            Repr::Point(v) => matches!(&other.0, Repr::Point(w) if w == v),
            Repr::Range(from, to) => other.min() >= *from && other.max() <= *to,
            Repr::Ranges(r) => {
                if let Repr::Point(v) = &other.0 {
                    return self.contains(*v);
                }
                let mut rest = other.clone();
                for pair in r.chunks(2) {
                    rest = rest.subtract(&IntSet::range(pair[0], pair[1]));
                    if rest.is_empty() {
                        return true;
                    }
                }
                false
            }
        }
    }

    /// True if this set and `other` share at least one value.
    pub fn intersects(&self, other: &IntSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if let Repr::Point(v) = &self.0 {
            return other.contains(*v);
        }
        if let Repr::Point(v) = &other.0 {
            return self.contains(*v);
        }
        if let (Repr::Range(f1, t1), Repr::Range(f2, t2)) = (&self.0, &other.0) {
            return t1 >= f2 && f1 <= t2;
        }
        let a = self.pairs();
        let b = other.pairs();
        let mut i = 0;
        let mut j = 0;
        while i < a.len() && j < b.len() {
            if a[i] <= b[j + 1] && b[j] <= a[i + 1] {
                return true;
            }
            if a[i] > b[j + 1] {
                j += 2;
            } else {
                i += 2;
            }
        }
        false
    }

    /// Intersects this set with `other`. Exact.
    pub fn intersect(&self, other: &IntSet) -> IntSet {
        if self == other {
            return self.clone();
        }
        match (&self.0, &other.0) {
            (Repr::Empty, _) | (_, Repr::Empty) => IntSet::empty(),
            (Repr::Point(v), _) => {
                if other.contains(*v) {
                    self.clone()
                } else {
                    IntSet::empty()
                }
            }
            (_, Repr::Point(v)) => {
                if self.contains(*v) {
                    other.clone()
                } else {
                    IntSet::empty()
                }
            }
            (Repr::Range(f1, t1), Repr::Range(f2, t2)) => {
                if f2 <= f1 && t2 >= t1 {
                    return self.clone();
                }
                if f2 >= f1 && t2 <= t1 {
                    return other.clone();
                }
                let from = (*f1).max(*f2);
                let to = (*t1).min(*t2);
                if from <= to {
                    IntSet::range(from, to)
                } else {
                    IntSet::empty()
                }
            }
            (Repr::Range(..), Repr::Ranges(r)) => intersect_with_pairs(self, r),
            (Repr::Ranges(r), Repr::Range(..)) => intersect_with_pairs(other, r),
            (Repr::Ranges(..), Repr::Ranges(..)) => {
                self.subtract(&IntSet::ALL.subtract(other))
            }
        }
    }

    /// Removes every value of `other` from this set. Exact.
    pub fn subtract(&self, other: &IntSet) -> IntSet {
        if other.is_empty() {
            return self.clone();
        }
        if self == other {
            return IntSet::empty();
        }
        match &self.0 {
            Repr::Empty => IntSet::empty(),
            Repr::Point(v) => {
                if other.contains(*v) {
                    IntSet::empty()
                } else {
                    self.clone()
                }
            }
            Repr::Range(from, to) => subtract_from_range(*from, *to, other),
            Repr::Ranges(r) => {
                let mut result = Vec::with_capacity(r.len() + other.pairs().len());
                for pair in r.chunks(2) {
                    result.extend(IntSet::range(pair[0], pair[1]).subtract(other).pairs());
                }
                IntSet::from_pairs(result)
            }
        }
    }

    /// Removes a single value from this set.
    pub fn without(&self, value: i64) -> IntSet {
        self.subtract(&IntSet::point(value))
    }

    /// Merges this set with `other`. Exact for all shapes; adjacent intervals
    /// collapse.
    pub fn unite(&self, other: &IntSet) -> IntSet {
        if other.is_empty() || self == other {
            return self.clone();
        }
        if other.contains_all(self) {
            return other.clone();
        }
        // TODO: replace the double complement with a direct two-pointer merge;
        // this formulation is exact but allocates two complements per call.
        IntSet::ALL.subtract(&IntSet::ALL.subtract(self).intersect(&IntSet::ALL.subtract(other)))
    }

    /// The set of values that could satisfy `x rel y` for some `x` in this set.
    ///
    /// E.g. if this set is `{0..10}` and the relation is `Gt`, the result is
    /// `{1..i64::MAX}`: the values which can be greater than some value from
    /// this set. On the empty set every relation yields the empty set.
    pub fn from_relation(&self, relation: Relation) -> IntSet {
        if self.is_empty() {
            return IntSet::empty();
        }
        match relation {
            Relation::Eq => self.clone(),
            Relation::Ne => {
                let min = self.min();
                if min == self.max() {
                    IntSet::ALL.without(min)
                } else {
                    IntSet::ALL
                }
            }
            Relation::Gt => {
                let min = self.min();
                if min == i64::MAX {
                    IntSet::empty()
                } else {
                    IntSet::range(min + 1, i64::MAX)
                }
            }
            Relation::Ge => IntSet::range(self.min(), i64::MAX),
            Relation::Le => IntSet::range(i64::MIN, self.max()),
            Relation::Lt => {
                let max = self.max();
                if max == i64::MIN {
                    IntSet::empty()
                } else {
                    IntSet::range(i64::MIN, max - 1)
                }
            }
        }
    }
}

/// Intersection of a `Point`/`Range` set with a flat interval array.
fn intersect_with_pairs(single: &IntSet, pairs: &[i64]) -> IntSet {
    let mut result = Vec::with_capacity(pairs.len());
    for pair in pairs.chunks(2) {
        result.extend(single.intersect(&IntSet::range(pair[0], pair[1])).pairs());
    }
    IntSet::from_pairs(result)
}

/// `[from, to] \ other` for all shapes of `other`.
fn subtract_from_range(from: i64, to: i64, other: &IntSet) -> IntSet {
    match &other.0 {
        Repr::Empty => IntSet::range(from, to),
        Repr::Point(v) => {
            let value = *v;
            if value < from || value > to {
                IntSet::range(from, to)
            } else if value == from {
                IntSet::range(from + 1, to)
            } else if value == to {
                IntSet::range(from, to - 1)
            } else {
                IntSet::range_set(vec![from, value - 1, value + 1, to].into_boxed_slice())
            }
        }
        Repr::Range(f2, t2) => {
            let (f2, t2) = (*f2, *t2);
            if t2 < from || f2 > to {
                IntSet::range(from, to)
            } else if f2 <= from && t2 >= to {
                IntSet::empty()
            } else if f2 > from && t2 < to {
                IntSet::range_set(vec![from, f2 - 1, t2 + 1, to].into_boxed_slice())
            } else if f2 <= from {
                IntSet::range(t2 + 1, to)
            } else {
                debug_assert!(t2 >= to);
                IntSet::range(from, f2 - 1)
            }
        }
        Repr::Ranges(r) => {
            let mut result = IntSet::range(from, to);
            for pair in r.chunks(2) {
                result = result.subtract(&IntSet::range(pair[0], pair[1]));
                if result.is_empty() {
                    return result;
                }
            }
            result
        }
    }
}

/// Formats an endpoint, printing the well-known 32- and 64-bit bounds
/// symbolically.
fn fmt_endpoint(value: i64) -> String {
    match value {
        v if v == i64::MAX => "i64::MAX".to_string(),
        v if v == i64::MAX - 1 => "i64::MAX-1".to_string(),
        v if v == i64::MIN => "i64::MIN".to_string(),
        v if v == i32::MAX as i64 => "i32::MAX".to_string(),
        v if v == i32::MAX as i64 - 1 => "i32::MAX-1".to_string(),
        v if v == i32::MIN as i64 => "i32::MIN".to_string(),
        v => v.to_string(),
    }
}

fn fmt_interval(f: &mut fmt::Formatter<'_>, from: i64, to: i64) -> fmt::Result {
    if from == to {
        write!(f, "{}", fmt_endpoint(from))
    } else if to.wrapping_sub(from) == 1 {
        write!(f, "{}, {}", fmt_endpoint(from), fmt_endpoint(to))
    } else {
        write!(f, "{}..{}", fmt_endpoint(from), fmt_endpoint(to))
    }
}

impl fmt::Display for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        match &self.0 {
            Repr::Empty => {}
            Repr::Point(v) => write!(f, "{}", fmt_endpoint(*v))?,
            Repr::Range(from, to) => fmt_interval(f, *from, *to)?,
            Repr::Ranges(r) => {
                for (i, pair) in r.chunks(2).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_interval(f, pair[0], pair[1])?;
                }
            }
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for IntSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
