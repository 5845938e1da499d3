//! Fast, non-cryptographic hash map/set aliases used throughout the crate.
//!
//! Block and variable counts in a single procedure are small, so the exact
//! hashing algorithm barely matters for correctness, but `rustc-hash`'s
//! `FxHasher` avoids the SipHash setup cost the standard library's default
//! hasher pays on every map, which matters when the solver rebuilds state
//! maps every round.

pub use rustc_hash::{FxHashMap, FxHashSet};
