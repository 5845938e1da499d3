//! Per-analysis transfer functions (spec.md §4.2).
//!
//! `TransferFunctions::transfer_block` takes the joined predecessor state at
//! a block's entry and yields the state after the block's instructions,
//! operating at block granularity rather than per-instruction: taint's
//! "last-loaded set" resets at block entry and after every `icmp`, so the
//! natural unit of transfer already owns the whole block (contrast with the
//! per-instruction `TransferFunctions::execute` in `move-compiler`'s
//! `absint.rs`, which this crate's trait is otherwise modeled on).

pub mod initvars;
pub mod interval;
pub mod refine;
pub mod taint;

use crate::domain::AbstractDomain;
use crate::ir::{BlockId, IrView};

pub trait TransferFunctions {
    type State: AbstractDomain;

    /// Run this block's instructions in program order starting from `pre`
    /// (a fresh copy of the joined predecessor contribution) and return the
    /// post-state. Must be monotone: if `pre` only grows across calls with
    /// the same block, the result only grows too (spec.md §3 invariants).
    fn transfer_block(&mut self, view: &dyn IrView, block: BlockId, pre: Self::State) -> Self::State;
}
