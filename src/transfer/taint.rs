//! Analysis 2: taint analysis (spec.md §4.2).
//!
//! Locals whose value transitively depends on a designated `source`
//! variable, propagated through loads, stores, and conditional control
//! flow. The interesting part is the per-block *affect list*: one pass over
//! a block's instructions builds a list of `(stored_var, loaded_vars)`
//! records, built once and replayed against the current incoming state on
//! every fixpoint round (spec.md §5 — the affect list is reused across
//! rounds, only the taint set it's applied to changes).

use crate::common::fx_hash::FxHashMap;
use crate::domain::VarSet;
use crate::ir::{BlockId, IrView, Opcode};

use super::TransferFunctions;

/// One `store v, slot` seen in a block: `target` is `name(slot)`, `sources`
/// is the snapshot of the "last-loaded set" at the point of the store
/// (spec.md §4.2).
#[derive(Debug, Clone)]
struct AffectRecord {
    target: String,
    sources: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Taint {
    /// Affect lists, cached per block on first visit and replayed on every
    /// subsequent round without re-walking the instruction stream.
    affect_lists: FxHashMap<usize, Vec<AffectRecord>>,
}

impl Taint {
    pub fn new() -> Self {
        Self::default()
    }

    fn affect_list(&mut self, view: &dyn IrView, block: BlockId) -> &[AffectRecord] {
        self.affect_lists.entry(block.0).or_insert_with(|| build_affect_list(view, block))
    }
}

fn build_affect_list(view: &dyn IrView, block: BlockId) -> Vec<AffectRecord> {
    let mut records: Vec<AffectRecord> = Vec::new();
    // The "last-loaded set" L: resets at block entry and after every icmp.
    let mut last_loaded: Vec<String> = Vec::new();
    // Names known to be allocated locals within this block's own
    // alloc-slot instructions; used to decide whether a `load` operand
    // actually names a local (vs. a virtual register that isn't a slot).
    let mut allocated: Vec<String> = Vec::new();
    for inst in view.instructions(block) {
        match &inst.opcode {
            Opcode::AllocSlot => {
                if let Some(name) = inst.name.as_deref() {
                    allocated.push(name.to_string());
                }
            }
            Opcode::Load { slot } => {
                if let Some(name) = slot.as_reg() {
                    if allocated.iter().any(|a| a == name) && !last_loaded.iter().any(|l| l == name) {
                        last_loaded.push(name.to_string());
                    }
                }
            }
            Opcode::Icmp { .. } => {
                last_loaded.clear();
            }
            Opcode::Store { slot, .. } => {
                if let Some(target) = slot.as_reg() {
                    records.retain(|r| r.target != target);
                    records.push(AffectRecord {
                        target: target.to_string(),
                        sources: last_loaded.clone(),
                    });
                }
                last_loaded.clear();
            }
            Opcode::Binary { .. } => {}
        }
    }
    records
}

impl TransferFunctions for Taint {
    type State = VarSet;

    fn transfer_block(&mut self, view: &dyn IrView, block: BlockId, mut pre: VarSet) -> VarSet {
        // `source` is seeded only in the block that declares its
        // alloc-slot, independent of the incoming state (spec.md §4.4 tie-breaks).
        for inst in view.instructions(block) {
            if inst.slot_name() == Some("source") {
                pre.insert("source".to_string());
            }
        }

        // Clone the affect list out from under `self` so we can still take
        // `&mut self` to populate the cache on first visit.
        let records = self.affect_list(view, block).to_vec();
        for record in &records {
            let any_source_tainted = record.sources.iter().any(|s| pre.contains(s));
            if any_source_tainted {
                pre.insert(record.target.clone());
            } else if pre.contains(&record.target) {
                // A non-tainted reassignment kills taint.
                pre.remove(&record.target);
            }
        }
        pre
    }
}
