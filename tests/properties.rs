//! Randomized property tests for the range-set domain.
//!
//! Sets are generated from a mix of small, large, boundary (MIN/MAX) and
//! around-zero endpoints, with a reproducible ChaCha8 seed. For every
//! transfer function the tests sample concrete operand pairs and check that
//! the truncated concrete result lands in the abstract result.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use rangeset_rs::set::{IntSet, Relation};
use rangeset_rs::types::PrimitiveType;

// ─── Generators ────────────────────────────────────────────────────────────────

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_endpoint(rng: &mut ChaCha8Rng, is_long: bool) -> i64 {
    let (min, max) = if is_long {
        (i64::MIN, i64::MAX)
    } else {
        (i32::MIN as i64, i32::MAX as i64)
    };
    match rng.random_range(0..6) {
        0 => rng.random_range(-16..=16),
        1 => min + rng.random_range(0..4),
        2 => max - rng.random_range(0..4),
        3 => rng.random_range(-1024..=1024),
        4 => {
            if is_long {
                rng.random::<i64>()
            } else {
                rng.random::<i32>() as i64
            }
        }
        _ => rng.random_range(-3..=3),
    }
}

/// A random set together with some values known to be inside it.
fn random_set(rng: &mut ChaCha8Rng, is_long: bool) -> (IntSet, Vec<i64>) {
    let mut set = IntSet::empty();
    let mut samples = Vec::new();
    for _ in 0..rng.random_range(1..=3) {
        let a = random_endpoint(rng, is_long);
        let b = random_endpoint(rng, is_long);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        set = set.unite(&IntSet::range(lo, hi));
        samples.push(lo);
        samples.push(hi);
        samples.push(rng.random_range(lo..=hi));
    }
    (set, samples)
}

fn trunc(value: i64, is_long: bool) -> i64 {
    if is_long {
        value
    } else {
        value as i32 as i64
    }
}

// ─── Lattice Laws ──────────────────────────────────────────────────────────────

#[test]
fn lattice_laws() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..300 {
        let (a, _) = random_set(&mut rng, true);
        let (b, _) = random_set(&mut rng, true);
        let (c, _) = random_set(&mut rng, true);

        // Idempotence
        assert_eq!(a.intersect(&a), a);
        assert_eq!(a.unite(&a), a);
        assert_eq!(a.subtract(&a), IntSet::empty());

        // Commutativity
        assert_eq!(a.intersect(&b), b.intersect(&a));
        assert_eq!(a.unite(&b), b.unite(&a));

        // Associativity
        assert_eq!(a.intersect(&b).intersect(&c), a.intersect(&b.intersect(&c)));
        assert_eq!(a.unite(&b).unite(&c), a.unite(&b.unite(&c)));

        // Top and bottom
        assert_eq!(a.intersect(&IntSet::ALL), a);
        assert_eq!(a.unite(&IntSet::empty()), a);
        assert_eq!(a.subtract(&IntSet::empty()), a);
        assert_eq!(a.intersect(&IntSet::empty()), IntSet::empty());

        // Containment is equivalent to absorption
        let contained = b.contains_all(&a);
        assert_eq!(contained, a.unite(&b) == b);
        assert_eq!(contained, a.intersect(&b) == a);

        // Difference laws
        let diff = a.subtract(&b);
        assert!(a.contains_all(&diff));
        assert_eq!(diff.intersect(&b), IntSet::empty());
        assert_eq!(diff.unite(&a.intersect(&b)), a);
    }
}

#[test]
fn de_morgan() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..300 {
        let (a, _) = random_set(&mut rng, true);
        let (b, _) = random_set(&mut rng, true);
        assert_eq!(
            IntSet::ALL.subtract(&a.unite(&b)),
            IntSet::ALL.subtract(&a).intersect(&IntSet::ALL.subtract(&b))
        );
    }
}

// ─── Transfer Soundness ────────────────────────────────────────────────────────

#[test]
fn binary_transfer_soundness_sampled() {
    init_logs();
    let mut rng = ChaCha8Rng::seed_from_u64(0xC0FFEE);
    for _ in 0..250 {
        for is_long in [true, false] {
            let (a, xs) = random_set(&mut rng, is_long);
            let (b, ys) = random_set(&mut rng, is_long);

            let plus = a.plus(&b, is_long);
            let minus = a.minus(&b, is_long);
            let mul = a.mul(&b, is_long);
            let div = a.div(&b, is_long);
            let rem = a.rem(&b);
            let and = a.bitwise_and(&b);
            let shr = a.shift_right(&b, is_long);
            let ushr = a.unsigned_shift_right(&b, is_long);

            for &x in &xs {
                for &y in &ys {
                    assert!(
                        plus.contains(trunc(x.wrapping_add(y), is_long)),
                        "{} + {} escaped {} (is_long = {})",
                        x, y, plus, is_long
                    );
                    assert!(
                        minus.contains(trunc(x.wrapping_sub(y), is_long)),
                        "{} - {} escaped {} (is_long = {})",
                        x, y, minus, is_long
                    );
                    assert!(
                        mul.contains(trunc(x.wrapping_mul(y), is_long)),
                        "{} * {} escaped {} (is_long = {})",
                        x, y, mul, is_long
                    );
                    if y != 0 {
                        let q = if is_long {
                            x.wrapping_div(y)
                        } else {
                            (x as i32).wrapping_div(y as i32) as i64
                        };
                        assert!(div.contains(q), "{} / {} escaped {} (is_long = {})", x, y, div, is_long);
                        let r = x.wrapping_rem(y);
                        assert!(rem.contains(r), "{} % {} escaped {}", x, y, rem);
                    }
                    assert!(and.contains(x & y), "{} & {} escaped {}", x, y, and);
                    let shifted = if is_long {
                        x >> (y & 63)
                    } else {
                        ((x as i32) >> (y & 31)) as i64
                    };
                    assert!(
                        shr.contains(shifted),
                        "{} >> {} escaped {} (is_long = {})",
                        x, y, shr, is_long
                    );
                    let ushifted = if is_long {
                        ((x as u64) >> (y & 63)) as i64
                    } else {
                        (((x as i32 as u32) >> (y & 31)) as i32) as i64
                    };
                    assert!(
                        ushr.contains(ushifted),
                        "{} >>> {} escaped {} (is_long = {})",
                        x, y, ushr, is_long
                    );
                }
            }
        }
    }
}

#[test]
fn unary_transfer_soundness_sampled() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xBEEF);
    for _ in 0..400 {
        for is_long in [true, false] {
            let (a, xs) = random_set(&mut rng, is_long);
            let negated = a.negate(is_long);
            let absolute = a.abs(is_long);
            for &x in &xs {
                let neg = if is_long {
                    x.wrapping_neg()
                } else {
                    (x as i32).wrapping_neg() as i64
                };
                assert!(negated.contains(neg), "-{} escaped {}", x, negated);
                let abs = if is_long {
                    x.wrapping_abs()
                } else {
                    (x as i32).wrapping_abs() as i64
                };
                assert!(absolute.contains(abs), "|{}| escaped {}", x, absolute);
            }
        }
    }
}

#[test]
fn cast_soundness_and_idempotence() {
    let targets = [
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(0xCA57);
    for _ in 0..400 {
        let (a, xs) = random_set(&mut rng, true);
        for target in targets {
            let casted = a.cast_to(target);
            for &x in &xs {
                let concrete = match target {
                    PrimitiveType::Byte => x as i8 as i64,
                    PrimitiveType::Char => x as u16 as i64,
                    PrimitiveType::Short => x as i16 as i64,
                    PrimitiveType::Int => x as i32 as i64,
                    _ => x,
                };
                assert!(
                    casted.contains(concrete),
                    "({:?}) {} escaped {}",
                    target, x, casted
                );
            }
            assert_eq!(casted.cast_to(target), casted, "cast to {:?} is not idempotent", target);
        }
    }
}

// ─── Round Trips and Identities ────────────────────────────────────────────────

#[test]
fn negate_is_an_involution() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    for _ in 0..500 {
        let (a, _) = random_set(&mut rng, true);
        assert_eq!(a.negate(true).negate(true), a);
    }
}

#[test]
fn plus_identities() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);
    for _ in 0..300 {
        for is_long in [true, false] {
            let (a, _) = random_set(&mut rng, is_long);
            assert_eq!(a.plus(&IntSet::point(0), is_long), a);
            assert_eq!(IntSet::empty().plus(&a, is_long), IntSet::empty());
            assert_eq!(a.plus(&IntSet::empty(), is_long), IntSet::empty());
        }
    }
}

#[test]
fn rem_respects_divisor_magnitude() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED);
    for _ in 0..500 {
        let (a, _) = random_set(&mut rng, true);
        let (b, _) = random_set(&mut rng, true);
        if b.is_empty() || b == IntSet::point(0) || b.contains(i64::MIN) {
            continue;
        }
        let result = a.rem(&b);
        if result.is_empty() {
            continue;
        }
        let bound = (b.min().unsigned_abs().max(b.max().unsigned_abs()) as i128).max(1) - 1;
        assert!(
            (result.min() as i128) >= -bound && (result.max() as i128) <= bound,
            "{} % {} = {} exceeds [-{}, {}]",
            a, b, result, bound, bound
        );
    }
}

// ─── Relations ─────────────────────────────────────────────────────────────────

#[test]
fn relation_soundness_sampled() {
    let relations: [(Relation, fn(i64, i64) -> bool); 6] = [
        (Relation::Eq, |y, x| y == x),
        (Relation::Ne, |y, x| y != x),
        (Relation::Gt, |y, x| y > x),
        (Relation::Ge, |y, x| y >= x),
        (Relation::Lt, |y, x| y < x),
        (Relation::Le, |y, x| y <= x),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(0xFACE);
    for _ in 0..400 {
        let (a, xs) = random_set(&mut rng, true);
        let candidates: Vec<i64> = (0..8).map(|_| random_endpoint(&mut rng, true)).collect();
        for (relation, holds) in relations {
            let result = a.from_relation(relation);
            for &y in &candidates {
                if xs.iter().any(|&x| holds(y, x)) {
                    assert!(
                        result.contains(y),
                        "{} should satisfy {:?} against {} but escaped {}",
                        y, relation, a, result
                    );
                }
            }
        }
    }
}

// ─── Overflow Detection ────────────────────────────────────────────────────────

#[test]
fn subtraction_overflow_detector() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x0F10);
    for _ in 0..600 {
        for is_long in [true, false] {
            let (a, xs) = random_set(&mut rng, is_long);
            let (b, ys) = random_set(&mut rng, is_long);
            let may_overflow = a.subtraction_may_overflow(&b, is_long);
            let (lo, hi) = if is_long {
                (i64::MIN as i128, i64::MAX as i128)
            } else {
                (i32::MIN as i128, i32::MAX as i128)
            };
            let overflows = |x: i64, y: i64| {
                let diff = x as i128 - y as i128;
                diff < lo || diff > hi
            };
            if !may_overflow {
                // A clean verdict is a guarantee for every concrete pair
                for &x in &xs {
                    for &y in &ys {
                        assert!(
                            !overflows(x, y),
                            "{} - {} overflows though the detector said no",
                            x, y
                        );
                    }
                }
            } else {
                // A dirty verdict must have a witness at the extremes
                assert!(
                    overflows(a.min(), b.max()) || overflows(a.max(), b.min()),
                    "detector said {} - {} may overflow but no extreme pair does",
                    a, b
                );
            }
        }
    }
}
