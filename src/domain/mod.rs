//! The abstract domains (spec.md §4.1): the lattice element type, join, and
//! bottom shared by every analysis. `varset` backs analyses 1 and 2; `interval`
//! backs analysis 3.

pub mod interval;
pub mod varset;

pub use interval::{Interval, IntervalMap};
pub use varset::VarSet;

/// A finite-height join-semilattice. `join` mutates `self` in place to
/// `self ⊔ other` and reports whether `self` changed, which is exactly what
/// the solver needs to decide whether a block's successors must be
/// revisited (spec.md §4.4 step 2c).
///
/// Grounded on `move-compiler`'s `AbstractDomain` trait (`absint.rs`) and
/// `program_analysis`'s `AbstractEnv::join_with`; collapsed to a plain bool
/// since this crate has no widening-vs-plain-join distinction to report.
pub trait AbstractDomain: Clone + PartialEq {
    fn bottom() -> Self;
    fn join(&mut self, other: &Self) -> bool;
}
