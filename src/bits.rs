//! Bitwise reasoning over intervals.
//!
//! A single signed interval is summarized as a length-64 vector over
//! `{0, 1, ?}`: bit `i` is fixed when every value in the interval agrees on
//! it, unknown otherwise. Pointwise conjunction of two such vectors yields a
//! sound (and often tight) description of the interval-by-interval bitwise
//! AND, which is then reified back into a set.

use log::debug;

use crate::set::IntSet;
use crate::transfer::split_at_zero;

/// Three-valued knowledge about a single bit position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Bit {
    Zero,
    One,
    Unknown,
}

impl IntSet {
    /// All possible values of `x & y` for `x` in this set and `y` in `other`.
    /// Width-independent. The result may contain extra values.
    pub fn bitwise_and(&self, other: &IntSet) -> IntSet {
        if self.is_empty() || other.is_empty() {
            return IntSet::empty();
        }
        let mut left = split_at_zero(self.pairs());
        let mut right = split_at_zero(other.pairs());
        // More than three intervals: collapse to the envelope to keep the
        // result compact, at the price of precision.
        if left.len() > 6 {
            debug!("bitwise_and: collapsing {} to its envelope", self);
            left = split_at_zero(vec![left[0], left[left.len() - 1]]);
        }
        if right.len() > 6 {
            debug!("bitwise_and: collapsing {} to its envelope", other);
            right = split_at_zero(vec![right[0], right[right.len() - 1]]);
        }
        let mut rest = IntSet::ALL;
        for l in left.chunks(2) {
            for r in right.chunks(2) {
                rest = rest.subtract(&pair_and(l[0], l[1], r[0], r[1]));
            }
        }
        IntSet::ALL.subtract(&rest)
    }
}

/// `x & y` for `&IntSet` operands; bitwise AND is width-independent.
impl std::ops::BitAnd for &IntSet {
    type Output = IntSet;

    fn bitand(self, rhs: &IntSet) -> IntSet {
        self.bitwise_and(rhs)
    }
}

/// Bitwise AND of two single-sign intervals.
fn pair_and(left_from: i64, left_to: i64, right_from: i64, right_to: i64) -> IntSet {
    if left_from == left_to && right_from == right_to {
        return IntSet::point(left_from & right_from);
    }
    // A single value of the form 0..01..1 acts as a plain mask
    if left_from == left_to && left_from.wrapping_add(1).count_ones() == 1 {
        return mask_and(right_from, right_to, left_from);
    }
    if right_from == right_to && right_from.wrapping_add(1).count_ones() == 1 {
        return mask_and(left_from, left_to, right_from);
    }
    let left_bits = bits(left_from, left_to);
    let right_bits = bits(right_from, right_to);
    let mut result_bits = [Bit::Unknown; 64];
    for i in 0..64 {
        result_bits[i] = match (left_bits[i], right_bits[i]) {
            (Bit::Zero, _) | (_, Bit::Zero) => Bit::Zero,
            (Bit::Unknown, _) | (_, Bit::Unknown) => Bit::Unknown,
            _ => Bit::One,
        };
    }
    from_bits(&result_bits)
}

/// `[from, to] & mask` where `mask` looks like `0..01..1` in binary.
fn mask_and(from: i64, to: i64, mask: i64) -> IntSet {
    if to.wrapping_sub(from) > mask {
        // The interval covers every residue modulo mask + 1
        return IntSet::range(0, mask);
    }
    let min = from & mask;
    let max = to & mask;
    debug_assert_ne!(min, max);
    if min < max {
        IntSet::range(min, max)
    } else if max.wrapping_add(1) == min {
        IntSet::range(0, mask)
    } else {
        IntSet::range_set(vec![0, max, min, mask].into_boxed_slice())
    }
}

/// The bit vector of `[from, to]`: `Zero`/`One` where every value in the
/// interval agrees, `Unknown` below the first disagreeing position.
///
/// Index 0 is the most significant bit.
fn bits(mut from: i64, mut to: i64) -> [Bit; 64] {
    let mut bits = [Bit::Zero; 64];
    loop {
        let from_bit = from.leading_zeros() as usize;
        let to_bit = to.leading_zeros() as usize;
        if from_bit != to_bit {
            for bit in bits.iter_mut().skip(from_bit.min(to_bit)) {
                *bit = Bit::Unknown;
            }
            break;
        }
        if from_bit == 64 {
            break;
        }
        bits[from_bit] = Bit::One;
        let clear_mask = !(1i64 << (63 - from_bit));
        from &= clear_mask;
        to &= clear_mask;
    }
    bits
}

/// Reifies a bit vector back into a set: the fixed prefix gives the shared
/// high bits, the unknown suffix spans an interval, and trailing fixed-zero
/// bits force the top of that interval down. May over-approximate.
fn from_bits(bits: &[Bit; 64]) -> IntSet {
    let mut from = 0i64;
    let mut i = 0;
    while i < 64 && bits[i] != Bit::Unknown {
        if bits[i] == Bit::One {
            from |= 1i64 << (63 - i);
        }
        i += 1;
    }
    let suffix = if i == 0 { -1 } else { ((1u64 << (64 - i)) - 1) as i64 };
    let mut to = suffix | from;
    let mut j = 63;
    while j > i && bits[j] != Bit::Unknown {
        if bits[j] == Bit::Zero {
            to &= !(1i64 << (63 - j));
        }
        j -= 1;
    }
    if i == j {
        return IntSet::point(from).unite(&IntSet::point(to));
    }
    if from < to {
        IntSet::range(from, to)
    } else {
        IntSet::range(to, from)
    }
}
