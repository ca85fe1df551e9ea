//! # rangeset-rs: Canonical Integer Range Sets in Rust
//!
//! **`rangeset-rs`** is an immutable abstract domain of 64-bit integer value sets,
//! built for data-flow engines that reason at compile time about the possible
//! runtime values of integer expressions.
//!
//! ## What is an integer range set?
//!
//! A value of the domain denotes a (possibly empty) subset of the signed 64-bit
//! integers, stored as a sorted sequence of disjoint, non-adjacent closed
//! intervals. The representation is **canonical** --- every denotation has exactly
//! one representation, so structural equality is denotational equality. This
//! property makes the sets cheap to compare, hash, and share between analyses.
//!
//! ## Key Features
//!
//! - **Canonical by construction**: all public constructors normalize; a set
//!   representable by fewer intervals is always collapsed to the smaller shape.
//! - **Exact lattice operations**: union, intersection, difference, and
//!   containment are exact, not approximations.
//! - **Sound transfer functions**: negation, absolute value, addition,
//!   subtraction, multiplication, division, remainder, shifts, bitwise AND, and
//!   truncating casts each over-approximate the concrete image, honoring the
//!   wrap-around of 32- and 64-bit two's-complement arithmetic.
//! - **Immutable value objects**: every operation returns a fresh set; values
//!   can be shared freely across threads without synchronization.
//!
//! ## Basic Usage
//!
//! ```rust
//! use rangeset_rs::set::IntSet;
//!
//! // Build sets from intervals
//! let a = IntSet::range(0, 10);
//! let b = IntSet::range(5, 20);
//!
//! // Exact lattice operations
//! assert_eq!(a.intersect(&b), IntSet::range(5, 10));
//! let hole = a.subtract(&IntSet::range(3, 7));
//! assert_eq!(hole.to_string(), "{0..2, 8..10}");
//! assert!(hole.contains(8));
//! assert!(!hole.contains(5));
//!
//! // Sound arithmetic transfers (64-bit semantics)
//! let sum = a.plus(&b, true);
//! assert_eq!(sum, IntSet::range(5, 30));
//! ```
//!
//! ## Core Components
//!
//! - **[`set`]**: The heart of the library. Contains [`IntSet`][crate::set::IntSet],
//!   its constructors, queries, and the exact lattice operations.
//! - **[`types`]**: Adapters seeding sets from primitive types and boxed constants.
//! - **[`annotations`]**: Adapter folding range-declaring contract annotations
//!   into a set.
//! - **[`dataflow`]**: Adapter extracting sets from data-flow engine values.
//! - **[`iter`]**: Lazy ascending enumeration of set elements, plus exact
//!   cardinality.
//!
//! The arithmetic transfer functions and the bitwise machinery live in private
//! modules and surface as methods on `IntSet`.

pub mod annotations;
mod bits;
pub mod dataflow;
pub mod iter;
pub mod set;
mod transfer;
pub mod types;
