//! Analysis 3: interval analysis (spec.md §4.2).
//!
//! `alloc-slot x` seeds `x` to top; stores and loads move intervals between
//! slots and registers; arithmetic evaluates operand intervals and applies
//! the saturating interval arithmetic of `crate::domain::interval`. `icmp`
//! and `br` are identity on the state here — narrowing on conditional edges
//! is `refine` (§4.3), applied by the solver, not by this transfer.

use crate::domain::interval::Interval;
use crate::domain::IntervalMap;
use crate::ir::{BinOp, BlockId, IrView, Opcode, Operand};

use super::TransferFunctions;

#[derive(Debug, Default)]
pub struct IntervalAnalysis;

impl IntervalAnalysis {
    pub fn new() -> Self {
        Self
    }

    fn eval(state: &IntervalMap, operand: &Operand) -> Interval {
        match operand {
            Operand::Const(c) => Interval::point(*c),
            Operand::Reg(name) => state.get(name),
        }
    }
}

impl TransferFunctions for IntervalAnalysis {
    type State = IntervalMap;

    fn transfer_block(&mut self, view: &dyn IrView, block: BlockId, mut pre: IntervalMap) -> IntervalMap {
        for inst in view.instructions(block) {
            match &inst.opcode {
                Opcode::AllocSlot => {
                    if let Some(name) = inst.name.as_deref() {
                        pre.set(name.to_string(), Interval::top());
                    }
                }
                Opcode::Store { value, slot } => {
                    if let Some(slot_name) = slot.as_reg() {
                        match value {
                            // `store const, x`: guarded on the slot itself
                            // already being in scope (spec.md §4.2).
                            Operand::Const(c) => {
                                if pre.contains_key(slot_name) {
                                    pre.set(slot_name.to_string(), Interval::point(*c));
                                }
                            }
                            // `store reg, x`: guarded on the *source*
                            // register being bound, not the slot -- an
                            // unbound value register leaves `x` untouched
                            // rather than clearing a fact it already held.
                            Operand::Reg(reg_name) => {
                                if pre.contains_key(reg_name) {
                                    let v = pre.get(reg_name);
                                    pre.set(slot_name.to_string(), v);
                                }
                            }
                        }
                    }
                }
                Opcode::Load { slot } => {
                    let Some(dest) = inst.name.as_deref() else { continue };
                    match slot {
                        Operand::Reg(slot_name) => {
                            if pre.contains_key(slot_name) {
                                let v = pre.get(slot_name);
                                pre.set(dest.to_string(), v);
                            }
                        }
                        Operand::Const(c) => {
                            pre.set(dest.to_string(), Interval::point(*c));
                        }
                    }
                }
                Opcode::Binary { op, lhs, rhs } => {
                    let Some(dest) = inst.name.as_deref() else { continue };
                    let a = Self::eval(&pre, lhs);
                    let b = Self::eval(&pre, rhs);
                    if a.is_empty() || b.is_empty() {
                        // Transfer is skipped: the result register remains
                        // unbound (spec.md §4.2, §7).
                        continue;
                    }
                    let result = match op {
                        BinOp::Add => a.add(&b),
                        BinOp::Sub => a.sub(&b),
                        BinOp::Mul => a.mul(&b),
                        BinOp::SDiv => a.sdiv(&b),
                        BinOp::SRem => a.srem(&b),
                    };
                    pre.set(dest.to_string(), result);
                }
                Opcode::Icmp { .. } => {}
            }
        }
        pre
    }
}
