//! The narrow IR-facing adapter (spec.md §2, §6 "External Interfaces").
//!
//! Every analysis module is written against this trait, not against
//! `Function` directly, so the core can be unit-tested with tiny synthetic
//! IRs and so a future real IR library could be adapted to it without
//! touching `crate::domain`, `crate::transfer`, or `crate::solver` (Design
//! Notes §9: "Avoid IR-library coupling").

use super::{BlockId, Instruction, Terminator};

pub trait IrView {
    /// Blocks in declaration order — the reference iteration order for the
    /// fixpoint solver (spec.md §4.4).
    fn blocks(&self) -> &[BlockId];

    fn label(&self, block: BlockId) -> &str;

    fn instructions(&self, block: BlockId) -> &[Instruction];

    fn terminator(&self, block: BlockId) -> &Terminator;

    fn successors(&self, block: BlockId) -> &[BlockId];

    fn predecessors(&self, block: BlockId) -> &[BlockId];
}
