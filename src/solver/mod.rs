//! The monotone fixpoint solver (spec.md §4.4).
//!
//! Owns the global analysis map and the active-block set as fields (Design
//! Notes §9: replacing the original's process-global `analysisMap` /
//! `activeBlocks` so tests can instantiate independent solvers). Each round
//! snapshots the map, recomputes every block's joined predecessor
//! contribution from blocks active in the *previous* round, applies the
//! block transfer, and joins the result into the map; the round repeats
//! until no block's state differs from the snapshot taken before the round.


use log::{debug, trace};

use crate::common::fx_hash::FxHashSet;
use crate::domain::AbstractDomain;
use crate::ir::{BlockId, IrView};
use crate::transfer::TransferFunctions;

/// An edge-refinement hook: given the predecessor's exit state and the
/// specific predecessor->successor edge, returns the (possibly narrowed)
/// contribution that edge makes to the successor's join. The plain set
/// analyses and the non-narrowing interval variant use the identity
/// refiner; the narrowing interval variant (3b) plugs in
/// `crate::transfer::refine::refine`.
pub trait EdgeRefiner<D> {
    fn refine(&mut self, state: &D, view: &dyn IrView, from: BlockId, to: BlockId) -> D;
}

/// The refiner used by analyses with no edge narrowing (1, 2, 3a): passes
/// the predecessor's state through unchanged.
pub struct NoRefine;

impl<D: Clone> EdgeRefiner<D> for NoRefine {
    fn refine(&mut self, state: &D, _view: &dyn IrView, _from: BlockId, _to: BlockId) -> D {
        state.clone()
    }
}

pub struct Solver<TF: TransferFunctions> {
    analysis_map: Vec<TF::State>,
    active: FxHashSet<BlockId>,
    transfer: TF,
}

impl<TF: TransferFunctions> Solver<TF> {
    /// A solver with all blocks starting at bottom and the active set
    /// seeded to every block (a "warm start" per spec.md §4.4, since an
    /// empty active set would never let any block compute its first
    /// contribution).
    pub fn new(view: &dyn IrView, transfer: TF) -> Self {
        let n = view.blocks().len();
        let analysis_map = (0..n).map(|_| TF::State::bottom()).collect();
        let active = view.blocks().iter().copied().collect();
        Self { analysis_map, active, transfer }
    }

    pub fn state(&self, block: BlockId) -> &TF::State {
        &self.analysis_map[block.0]
    }

    /// Run chaotic iteration to a fixpoint (spec.md §4.4). `refiner` narrows
    /// a predecessor's contribution per edge; pass `NoRefine` for analyses
    /// without edge refinement.
    pub fn run<R: EdgeRefiner<TF::State>>(&mut self, view: &dyn IrView, refiner: &mut R) {
        let mut round = 0usize;
        loop {
            round += 1;
            let snapshot = self.analysis_map.clone();
            let mut changed_this_round: FxHashSet<BlockId> = FxHashSet::default();

            for &block in view.blocks() {
                let mut contribution = TF::State::bottom();
                for &pred in view.predecessors(block) {
                    if self.active.contains(&pred) {
                        let edge_state = refiner.refine(&self.analysis_map[pred.0], view, pred, block);
                        contribution.join(&edge_state);
                    }
                }
                // The entry block's predecessor contribution is bottom by
                // construction (it has no predecessors), so its transfer
                // starts from bottom, per spec.md §4.4 tie-breaks.
                let post = self.transfer.transfer_block(view, block, contribution);

                if self.analysis_map[block.0].join(&post) {
                    changed_this_round.insert(block);
                    for &succ in view.successors(block) {
                        changed_this_round.insert(succ);
                    }
                }
            }

            trace!(
                "round {round}: {} blocks visited, {} changed",
                view.blocks().len(),
                changed_this_round.len()
            );

            let any_changed = (0..self.analysis_map.len())
                .any(|i| self.analysis_map[i] != snapshot[i]);
            if !any_changed {
                debug!("fixpoint reached after {round} rounds");
                break;
            }
            self.active = changed_this_round;
        }
    }
}
