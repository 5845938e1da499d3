//! Analysis 1: initialized-variable analysis (spec.md §4.2).
//!
//! For `store _, slot`, add `name(slot)` to the state. Every other
//! instruction is identity. No auxiliary per-block state is needed.

use crate::domain::VarSet;
use crate::ir::{BlockId, IrView, Opcode};

use super::TransferFunctions;

#[derive(Debug, Default)]
pub struct InitializedVars;

impl TransferFunctions for InitializedVars {
    type State = VarSet;

    fn transfer_block(&mut self, view: &dyn IrView, block: BlockId, mut pre: VarSet) -> VarSet {
        for inst in view.instructions(block) {
            if let Opcode::Store { slot, .. } = &inst.opcode {
                if let Some(name) = slot.as_reg() {
                    pre.insert(name.to_string());
                }
            }
        }
        pre
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AbstractDomain;
    use crate::ir::{Block, Function, Instruction, Operand, Terminator};

    fn alloc(name: &str) -> Instruction {
        Instruction { name: Some(name.to_string()), opcode: Opcode::AllocSlot }
    }

    fn store_const(value: i64, slot: &str) -> Instruction {
        Instruction {
            name: None,
            opcode: Opcode::Store { value: Operand::Const(value), slot: Operand::Reg(slot.to_string()) },
        }
    }

    #[test]
    fn straight_line_only_stored_var_is_initialized() {
        // entry: alloc x; alloc y; store 1, x; ret
        let entry = Block {
            label: "entry".to_string(),
            instructions: vec![alloc("x"), alloc("y"), store_const(1, "x")],
            terminator: Terminator::Ret,
        };
        let func = Function::new(vec![entry]);
        let mut tf = InitializedVars;
        let post = tf.transfer_block(&func, crate::ir::BlockId(0), VarSet::bottom());
        assert!(post.contains("x"));
        assert!(!post.contains("y"));
    }
}
