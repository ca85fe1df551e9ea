//! Abstract transfer functions for integer arithmetic.
//!
//! Each transfer computes a superset of the concrete image: for all `x` in
//! `A` and `y` in `B`, `x op y` (truncated per the selected width) lies in
//! `A.op(B)`. The `is_long` flag selects 64-bit or 32-bit two's-complement
//! semantics; 32-bit results are obtained by truncating the 64-bit result
//! through `i32`.
//!
//! Overflow is never an error here: whenever a result cannot be represented
//! precisely, the transfer widens, up to the full range of the width.

use log::debug;

use crate::set::{IntSet, Repr};
use crate::types::PrimitiveType;

pub(crate) const fn min_value(is_long: bool) -> i64 {
    if is_long {
        i64::MIN
    } else {
        i32::MIN as i64
    }
}

pub(crate) const fn max_value(is_long: bool) -> i64 {
    if is_long {
        i64::MAX
    } else {
        i32::MAX as i64
    }
}

/// Inserts a `[-1 | 0]` boundary into a flat interval array wherever an
/// interval crosses zero, so that every resulting interval is single-sign.
pub(crate) fn split_at_zero(ranges: Vec<i64>) -> Vec<i64> {
    for i in (0..ranges.len()).step_by(2) {
        if ranges[i] < 0 && ranges[i + 1] >= 0 {
            let mut result = Vec::with_capacity(ranges.len() + 2);
            result.extend_from_slice(&ranges[..=i]);
            result.push(-1);
            result.push(0);
            result.extend_from_slice(&ranges[i + 1..]);
            return result;
        }
    }
    ranges
}

/// The interval array of `set`, collapsed to its `min..max` envelope when the
/// set has more than three intervals.
fn envelope_pairs(set: &IntSet) -> Vec<i64> {
    let pairs = set.pairs();
    if pairs.len() > 6 {
        debug!("collapsing {} to its envelope", set);
        vec![pairs[0], pairs[pairs.len() - 1]]
    } else {
        pairs
    }
}

impl IntSet {
    /// The full range of the selected width.
    pub(crate) fn full(is_long: bool) -> IntSet {
        if is_long {
            IntSet::ALL
        } else {
            IntSet::INT
        }
    }

    /// All possible values of `-x` for `x` in this set.
    ///
    /// The width minimum is its own negation (`-MIN` wraps back to `MIN`), so
    /// a set containing it keeps it.
    pub fn negate(&self, is_long: bool) -> IntSet {
        match &self.0 {
            Repr::Empty => IntSet::empty(),
            Repr::Point(v) => {
                if *v == min_value(is_long) {
                    self.clone()
                } else {
                    IntSet::point(v.wrapping_neg())
                }
            }
            Repr::Range(from, to) => negate_range(*from, *to, is_long),
            Repr::Ranges(r) => {
                let mut rest = IntSet::ALL;
                for pair in r.chunks(2) {
                    rest = rest.subtract(&IntSet::range(pair[0], pair[1]).negate(is_long));
                }
                IntSet::ALL.subtract(&rest)
            }
        }
    }

    /// All possible values of `x.abs()` for `x` in this set.
    ///
    /// As with [`negate`][IntSet::negate], the width minimum maps to itself.
    pub fn abs(&self, is_long: bool) -> IntSet {
        match &self.0 {
            Repr::Empty => IntSet::empty(),
            Repr::Point(v) => {
                if *v >= 0 || *v == min_value(is_long) {
                    self.clone()
                } else {
                    IntSet::point(v.wrapping_neg())
                }
            }
            Repr::Range(from, to) => abs_range(*from, *to, is_long),
            Repr::Ranges(r) => {
                let mut rest = IntSet::ALL;
                for pair in r.chunks(2) {
                    rest = rest.subtract(&IntSet::range(pair[0], pair[1]).abs(is_long));
                }
                IntSet::ALL.subtract(&rest)
            }
        }
    }

    /// All possible values of `x + y` for `x` in this set and `y` in `other`.
    ///
    /// Exact for interval operands up to wrap-around (a sum interval that
    /// wraps becomes the two-piece `[MIN, t] | [f, MAX]` set). Operands with
    /// more than three intervals are collapsed to their envelope first.
    /// Guaranteed to be commutative.
    pub fn plus(&self, other: &IntSet, is_long: bool) -> IntSet {
        if self.is_empty() || other.is_empty() {
            return IntSet::empty();
        }
        if let (Repr::Point(a), Repr::Point(b)) = (&self.0, &other.0) {
            let sum = a.wrapping_add(*b);
            return IntSet::point(if is_long { sum } else { sum as i32 as i64 });
        }
        let full = IntSet::full(is_long);
        if *self == full || *other == full {
            return full;
        }
        let left = envelope_pairs(self);
        let right = envelope_pairs(other);
        let mut result = IntSet::empty();
        for l in left.chunks(2) {
            for r in right.chunks(2) {
                result = result.unite(&plus_ranges(l[0], l[1], r[0], r[1], is_long));
            }
        }
        result
    }

    /// All possible values of `x - y`; defined as `plus(other.negate())`.
    pub fn minus(&self, other: &IntSet, is_long: bool) -> IntSet {
        self.plus(&other.negate(is_long), is_long)
    }

    /// All possible values of `x * y`.
    ///
    /// Precise only when one operand is a single value; any other shape
    /// returns the full range of the width.
    pub fn mul(&self, other: &IntSet, is_long: bool) -> IntSet {
        if self.is_empty() || other.is_empty() {
            return IntSet::empty();
        }
        if let Repr::Point(v) = &self.0 {
            return point_mul(*v, other, is_long);
        }
        if let Repr::Point(v) = &other.0 {
            return point_mul(*v, self, is_long);
        }
        debug!("mul({}, {}): no point operand, widening to full range", self, other);
        IntSet::full(is_long)
    }

    /// All possible values of `x / y` for `x` in this set and `y` in the
    /// divisor set. Division by zero yields no result, so a divisor of `{0}`
    /// produces the empty set.
    ///
    /// `is_long` only affects the `MIN / -1` wrap case; all other quotients
    /// are width-independent.
    pub fn div(&self, divisor: &IntSet, is_long: bool) -> IntSet {
        if divisor.is_empty() || *divisor == IntSet::point(0) {
            return IntSet::empty();
        }
        debug!("div({}, {}, is_long = {})", self, divisor, is_long);
        let left = split_at_zero(self.pairs());
        let right = split_at_zero(vec![divisor.min(), divisor.max()]);
        let mut result = IntSet::empty();
        for l in left.chunks(2) {
            for r in right.chunks(2) {
                result = result.unite(&divide(l[0], l[1], r[0], r[1], is_long));
            }
        }
        result
    }

    /// All possible values of `x % y` for `x` in this set and `y` in the
    /// divisor set. Width-independent. A divisor of `{0}` produces the empty
    /// set.
    pub fn rem(&self, divisor: &IntSet) -> IntSet {
        match &self.0 {
            Repr::Empty => IntSet::empty(),
            Repr::Point(v) => point_rem(*v, divisor),
            Repr::Range(..) => range_rem(self, divisor),
            Repr::Ranges(r) => {
                if divisor.is_empty() {
                    return IntSet::empty();
                }
                let mut result = IntSet::empty();
                for pair in r.chunks(2) {
                    result = result.unite(&IntSet::range(pair[0], pair[1]).rem(divisor));
                }
                result
            }
        }
    }

    /// All possible values of `x >> y` (arithmetic shift) for `x` in this set
    /// and `y` in the shift set. Shift counts are masked with `width - 1`, the
    /// hardware convention.
    pub fn shift_right(&self, shift: &IntSet, is_long: bool) -> IntSet {
        if self.is_empty() || shift.is_empty() {
            return IntSet::empty();
        }
        debug!("shift_right({}, {}, is_long = {})", self, shift, is_long);
        let max_shift = if is_long { 63 } else { 31 };
        let shift = mask_shift(shift, max_shift);
        let min = shift.min();
        let max = shift.max();
        let negative = self.intersect(&IntSet::range(min_value(is_long), -1));
        let positive = self.intersect(&IntSet::range(0, max_value(is_long)));
        // For x < 0: x >> y = -1 - ((-1 - x) >> y)
        positive.shr_positive(min, max, is_long).unite(
            &IntSet::point(-1).minus(
                &IntSet::point(-1).minus(&negative, is_long).shr_positive(min, max, is_long),
                is_long,
            ),
        )
    }

    /// All possible values of `x >>> y` (logical shift) for `x` in this set
    /// and `y` in the shift set. Shift counts are masked with `width - 1`.
    pub fn unsigned_shift_right(&self, shift: &IntSet, is_long: bool) -> IntSet {
        if self.is_empty() || shift.is_empty() {
            return IntSet::empty();
        }
        debug!("unsigned_shift_right({}, {}, is_long = {})", self, shift, is_long);
        let max_shift = if is_long { 63 } else { 31 };
        let shift = mask_shift(shift, max_shift);
        let mut min = shift.min();
        let max = shift.max();
        let negative = self.intersect(&IntSet::range(min_value(is_long), -1));
        let positive = self.intersect(&IntSet::range(0, max_value(is_long)));
        let mut result = positive.shr_positive(min, max, is_long);
        if min == 0 {
            result = result.unite(&negative);
            if max == 0 {
                return result;
            }
            min += 1;
        }
        // For x < 0, y > 0: x >>> y = (MAX - ((-1 - x) >> 1)) >> (y - 1)
        result.unite(
            &IntSet::point(max_value(is_long))
                .minus(
                    &IntSet::point(-1).minus(&negative, is_long).shr_positive(1, 1, is_long),
                    is_long,
                )
                .shr_positive(min - 1, max - 1, is_long),
        )
    }

    /// Right shift of a non-negative set, expressed as division by the
    /// corresponding power-of-two range.
    fn shr_positive(&self, min: i64, max: i64, is_long: bool) -> IntSet {
        if self.is_empty() {
            return IntSet::empty();
        }
        let max_shift = if is_long { 63 } else { 31 };
        if max == max_shift {
            // The divisor's upper half would overflow; it collapses to {0}.
            return if min == max {
                IntSet::point(0)
            } else {
                IntSet::point(0).unite(&self.div(&IntSet::range(1 << min, 1 << (max - 1)), is_long))
            };
        }
        self.div(&IntSet::range(1 << min, 1 << max), is_long)
    }

    /// Truncating cast to the given primitive width. Values already inside the
    /// destination range are kept; a set covering the whole destination range
    /// becomes exactly that range.
    ///
    /// # Panics
    ///
    /// Panics if `target` is not an integral type.
    pub fn cast_to(&self, target: PrimitiveType) -> IntSet {
        match &self.0 {
            Repr::Empty => {
                assert!(target.is_integral(), "cast_to: unsupported target type {:?}", target);
                IntSet::empty()
            }
            Repr::Point(v) => {
                let new_value = match target {
                    PrimitiveType::Long => return self.clone(),
                    PrimitiveType::Char => *v as u16 as i64,
                    PrimitiveType::Int => *v as i32 as i64,
                    PrimitiveType::Short => *v as i16 as i64,
                    PrimitiveType::Byte => *v as i8 as i64,
                    _ => panic!("cast_to: unsupported target type {:?}", target),
                };
                if new_value == *v {
                    self.clone()
                } else {
                    IntSet::point(new_value)
                }
            }
            Repr::Range(from, to) => cast_range(*from, *to, target),
            Repr::Ranges(r) => {
                let mut rest = IntSet::ALL;
                for pair in r.chunks(2) {
                    rest = rest.subtract(&IntSet::range(pair[0], pair[1]).cast_to(target));
                }
                IntSet::ALL.subtract(&rest)
            }
        }
    }

    /// Whether subtracting `other` from this set may overflow the selected
    /// width. A `false` answer is a guarantee; a `true` answer means some
    /// concrete pair overflows.
    ///
    /// # Panics
    ///
    /// Panics if either set is empty.
    pub fn subtraction_may_overflow(&self, other: &IntSet, is_long: bool) -> bool {
        let left_min = self.min();
        let left_max = self.max();
        let right_min = other.min();
        let right_max = other.max();
        if is_long {
            overflows_long(left_min, right_max) || overflows_long(left_max, right_min)
        } else {
            overflows_int(left_min, right_max) || overflows_int(left_max, right_min)
        }
    }

    /// Applies the binary operation named by `token` (`+`, `-`, `*`, `/`,
    /// `%`, `&`, `>>`, `>>>`). Returns `None` for unrecognized tokens so the
    /// caller can degrade gracefully.
    pub fn bin_op(&self, token: &str, right: &IntSet, is_long: bool) -> Option<IntSet> {
        match token {
            "+" => Some(self.plus(right, is_long)),
            "-" => Some(self.minus(right, is_long)),
            "*" => Some(self.mul(right, is_long)),
            "/" => Some(self.div(right, is_long)),
            "%" => Some(self.rem(right)),
            "&" => Some(self.bitwise_and(right)),
            ">>" => Some(self.shift_right(right, is_long)),
            ">>>" => Some(self.unsigned_shift_right(right, is_long)),
            _ => None,
        }
    }
}

/// `x % y` for `&IntSet` operands; remainder is width-independent.
impl std::ops::Rem for &IntSet {
    type Output = IntSet;

    fn rem(self, rhs: &IntSet) -> IntSet {
        IntSet::rem(self, rhs)
    }
}

fn negate_range(from: i64, to: i64, is_long: bool) -> IntSet {
    let min_value = min_value(is_long);
    if from <= min_value {
        if to >= max_value(is_long) {
            return IntSet::full(is_long);
        }
        return IntSet::range_set(
            vec![min_value, min_value, to.wrapping_neg(), -(min_value + 1)].into_boxed_slice(),
        );
    }
    IntSet::range(to.wrapping_neg(), from.wrapping_neg())
}

fn abs_range(from: i64, to: i64, is_long: bool) -> IntSet {
    if from >= 0 {
        return IntSet::range(from, to);
    }
    let min_value = min_value(is_long);
    let mut low = from;
    let hi;
    if low <= min_value {
        low = min_value + 1;
    }
    if to <= 0 {
        hi = -low;
        low = -to;
    } else {
        hi = (-low).max(to);
        low = 0;
    }
    if from <= min_value {
        IntSet::range_set(vec![min_value, min_value, low, hi].into_boxed_slice())
    } else {
        IntSet::range(low, hi)
    }
}

/// `[from1, to1] + [from2, to2]` under the selected width.
fn plus_ranges(from1: i64, to1: i64, from2: i64, to2: i64, is_long: bool) -> IntSet {
    let len1 = to1.wrapping_sub(from1); // may overflow
    let len2 = to2.wrapping_sub(from2); // may overflow
    if (len1 < 0 || len2 < 0) && len1.wrapping_add(len2).wrapping_add(1) >= 0 {
        // Total length longer than the 64-bit modulus
        return IntSet::full(is_long);
    }
    let mut from = from1.wrapping_add(from2);
    let mut to = to1.wrapping_add(to2);
    if !is_long {
        if to.wrapping_sub(from).wrapping_add(1) >= 0x1_0000_0000 {
            return IntSet::INT;
        }
        from = from as i32 as i64;
        to = to as i32 as i64;
    }
    if to < from {
        // The interval wrapped around the width boundary
        IntSet::range_set(
            vec![min_value(is_long), to, from, max_value(is_long)].into_boxed_slice(),
        )
    } else {
        IntSet::range(from, to)
    }
}

fn point_mul(value: i64, multiplier: &IntSet, is_long: bool) -> IntSet {
    match value {
        0 => IntSet::point(0),
        1 => multiplier.clone(),
        -1 => multiplier.negate(is_long),
        _ => {
            if let Repr::Point(m) = &multiplier.0 {
                let product = value.wrapping_mul(*m);
                return IntSet::point(if is_long { product } else { product as i32 as i64 });
            }
            let mut min = multiplier.min();
            let mut max = multiplier.max();
            if is_long {
                match (min.checked_mul(value), max.checked_mul(value)) {
                    (Some(a), Some(b)) => {
                        min = a;
                        max = b;
                    }
                    _ => {
                        debug!("mul: {} * {} overflows, widening to full range", value, multiplier);
                        return IntSet::ALL;
                    }
                }
            } else {
                min = min.wrapping_mul(value);
                max = max.wrapping_mul(value);
                if min != min as i32 as i64 || max != max as i32 as i64 {
                    return IntSet::INT;
                }
            }
            if min > max {
                IntSet::range(max, min)
            } else {
                IntSet::range(min, max)
            }
        }
    }
}

/// Quotient bounds for single-sign dividend and divisor intervals, derived
/// from the monotonicity of integer division within a sign quadrant.
fn divide(dividend_min: i64, dividend_max: i64, divisor_min: i64, divisor_max: i64, is_long: bool) -> IntSet {
    let mut divisor_min = divisor_min;
    if divisor_min == 0 {
        if divisor_max == 0 {
            return IntSet::empty();
        }
        // Zero never divides; the interval effectively starts at 1
        divisor_min = 1;
    }
    if dividend_min >= 0 {
        return if divisor_min > 0 {
            IntSet::range(dividend_min / divisor_max, dividend_max / divisor_min)
        } else {
            IntSet::range(dividend_max / divisor_max, dividend_min / divisor_min)
        };
    }
    if divisor_min > 0 {
        return IntSet::range(dividend_min / divisor_min, dividend_max / divisor_max);
    }
    let min_value = min_value(is_long);
    if dividend_min == min_value && divisor_max == -1 {
        // MIN / -1 wraps back to MIN; keep it as a discrete point
        return IntSet::point(min_value)
            .unite(&if divisor_min == -1 {
                IntSet::empty()
            } else {
                IntSet::range(dividend_min / divisor_min, dividend_min / (divisor_max - 1))
            })
            .unite(&if dividend_max == min_value {
                IntSet::empty()
            } else {
                IntSet::range(
                    dividend_max.wrapping_div(divisor_min),
                    (dividend_min + 1).wrapping_div(divisor_max),
                )
            });
    }
    IntSet::range(
        dividend_max.wrapping_div(divisor_min),
        dividend_min.wrapping_div(divisor_max),
    )
}

fn point_rem(value: i64, divisor: &IntSet) -> IntSet {
    if divisor.is_empty() || *divisor == IntSet::point(0) {
        return IntSet::empty();
    }
    if value == 0 {
        return IntSet::point(0);
    }
    if let Repr::Point(d) = &divisor.0 {
        return IntSet::point(value.wrapping_rem(*d));
    }
    if value != i64::MIN {
        let abs = value.abs();
        if !divisor.intersects(&IntSet::range(-abs, abs)) {
            // Like 10 % [15..20] == 10 regardless of the exact divisor
            return IntSet::point(value);
        }
    }
    let mut divisor = divisor.clone();
    let mut addend = IntSet::empty();
    if divisor.contains(i64::MIN) {
        // x % MIN == x for every x except MIN itself
        divisor = divisor.subtract(&IntSet::point(i64::MIN));
        addend = IntSet::point(value);
    }
    let max = 0.max(divisor.min().abs().max(divisor.max().abs()) - 1);
    if value < 0 {
        // 10 % [-4..7] is [0..6], but 10 % [-30..30] is [0..10]
        IntSet::range(value.max(-max), 0).unite(&addend)
    } else {
        IntSet::range(0, value.min(max)).unite(&addend)
    }
}

fn range_rem(dividend: &IntSet, divisor: &IntSet) -> IntSet {
    if divisor.is_empty() || *divisor == IntSet::point(0) {
        return IntSet::empty();
    }
    if *divisor == IntSet::point(i64::MIN) {
        // x % MIN == x except MIN % MIN == 0
        return if dividend.contains(i64::MIN) {
            dividend.subtract(divisor).unite(&IntSet::point(0))
        } else {
            dividend.clone()
        };
    }
    if divisor.contains(i64::MIN) {
        return possible_rem(dividend);
    }
    let min = divisor.min();
    let max = divisor.max();
    let max_divisor = min.abs().max(max.abs());
    let min_divisor = if min > 0 {
        min
    } else if max < 0 {
        max.abs()
    } else {
        0
    };
    if !dividend.intersects(&IntSet::range(i64::MIN, -min_divisor))
        && !dividend.intersects(&IntSet::range(min_divisor, i64::MAX))
    {
        // Every dividend is smaller in magnitude than every divisor
        return dividend.clone();
    }
    possible_rem(dividend).intersect(&IntSet::range(-max_divisor + 1, max_divisor - 1))
}

/// The sign-preserving envelope of a remainder's dividend.
fn possible_rem(dividend: &IntSet) -> IntSet {
    if dividend.contains(0) {
        return dividend.clone();
    }
    if dividend.min() > 0 {
        IntSet::range(0, dividend.max())
    } else {
        IntSet::range(dividend.min(), 0)
    }
}

/// Reduces a shift-count set to `0..=max_shift` by masking, the way the
/// hardware masks shift amounts.
fn mask_shift(shift: &IntSet, max_shift: i64) -> IntSet {
    if shift.min() < 0 || shift.max() > max_shift {
        shift.bitwise_and(&IntSet::point(max_shift))
    } else {
        shift.clone()
    }
}

fn cast_range(from: i64, to: i64, target: PrimitiveType) -> IntSet {
    match target {
        PrimitiveType::Long => IntSet::range(from, to),
        PrimitiveType::Byte => mask_cast(from, to, 8, IntSet::BYTE),
        PrimitiveType::Short => mask_cast(from, to, 16, IntSet::SHORT),
        PrimitiveType::Int => mask_cast(from, to, 32, IntSet::INT),
        PrimitiveType::Char => {
            if from <= 0 && to >= u16::MAX as i64 {
                IntSet::CHAR
            } else if from >= 0 && to <= u16::MAX as i64 {
                IntSet::range(from, to)
            } else {
                IntSet::range(from, to).bitwise_and(&IntSet::point(u16::MAX as i64))
            }
        }
        _ => panic!("cast_to: unsupported target type {:?}", target),
    }
}

/// Signed truncation of `[from, to]` to `size` bits: shift into the unsigned
/// domain, mask, and shift back.
fn mask_cast(from: i64, to: i64, size: u32, full: IntSet) -> IntSet {
    let addend = 1i64 << (size - 1);
    if from <= -addend && to >= addend - 1 {
        return full;
    }
    if from >= -addend && to <= addend - 1 {
        return IntSet::range(from, to);
    }
    let mask = (1i64 << size) - 1;
    plus_ranges(from, to, addend, addend, true)
        .bitwise_and(&IntSet::point(mask))
        .plus(&IntSet::point(-addend), true)
}

fn overflows_int(a: i64, b: i64) -> bool {
    let diff = a - b;
    diff < i32::MIN as i64 || diff > i32::MAX as i64
}

fn overflows_long(a: i64, b: i64) -> bool {
    let diff = a.wrapping_sub(b);
    // Hacker's Delight 2nd Edition, 2-13 Overflow Detection
    ((a ^ b) & (a ^ diff)) < 0
}
