//! The IR data model consumed by the analyses (spec.md §3).
//!
//! A `Function` is an ordered collection of basic blocks; each block has a
//! stable label, an instruction stream, and a terminator. This module only
//! owns the data — it never parses text (see `crate::ir_text`) and never
//! runs an analysis (see `crate::domain`, `crate::transfer`, `crate::solver`).

pub mod view;

use crate::common::fx_hash::FxHashMap;

pub use view::IrView;

/// Index of a block within `Function::blocks`, used as the solver's map key.
/// Cheaper to copy and hash than the block's textual label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpPred {
    Eq,
    Ne,
    Sgt,
    Slt,
    Sge,
    Sle,
}

impl IcmpPred {
    /// The predicate that holds on the *other* edge of a conditional branch.
    pub fn negate(self) -> IcmpPred {
        match self {
            IcmpPred::Eq => IcmpPred::Ne,
            IcmpPred::Ne => IcmpPred::Eq,
            IcmpPred::Sgt => IcmpPred::Sle,
            IcmpPred::Slt => IcmpPred::Sge,
            IcmpPred::Sge => IcmpPred::Slt,
            IcmpPred::Sle => IcmpPred::Sgt,
        }
    }
}

/// An instruction operand: either a reference to another instruction's
/// result (a virtual register, which may itself name a stack slot produced
/// by `alloc-slot`), or a sign-extended integer constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(String),
    Const(i64),
}

impl Operand {
    pub fn as_reg(&self) -> Option<&str> {
        match self {
            Operand::Reg(name) => Some(name.as_str()),
            Operand::Const(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opcode {
    AllocSlot,
    Store { value: Operand, slot: Operand },
    Load { slot: Operand },
    Binary { op: BinOp, lhs: Operand, rhs: Operand },
    Icmp { pred: IcmpPred, lhs: Operand, rhs: Operand },
}

/// A single instruction. `name` is the virtual-register name the
/// instruction's result is bound to; `alloc-slot` binds `name` to the local
/// variable's identity, per spec.md §3 ("Each local is identified by the
/// textual name of its `alloc-slot` instruction").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub name: Option<String>,
    pub opcode: Opcode,
}

impl Instruction {
    /// The name an `alloc-slot` instruction allocates, if this is one.
    pub fn slot_name(&self) -> Option<&str> {
        match self.opcode {
            Opcode::AllocSlot => self.name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminator {
    CondBr { cond: Operand, then_block: BlockId, else_block: BlockId },
    Br(BlockId),
    Ret,
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::CondBr { then_block, else_block, .. } => vec![*then_block, *else_block],
            Terminator::Br(target) => vec![*target],
            Terminator::Ret => vec![],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub label: String,
    pub instructions: Vec<Instruction>,
    pub terminator: Terminator,
}

/// A single procedure: an ordered collection of basic blocks plus the
/// predecessor/successor indices built once at construction time so the
/// solver never has to re-derive them each round.
#[derive(Debug, Clone)]
pub struct Function {
    blocks: Vec<Block>,
    ids: Vec<BlockId>,
    successors: Vec<Vec<BlockId>>,
    predecessors: Vec<Vec<BlockId>>,
    label_to_id: FxHashMap<String, BlockId>,
}

impl Function {
    pub fn new(blocks: Vec<Block>) -> Self {
        let ids: Vec<BlockId> = (0..blocks.len()).map(BlockId).collect();
        let successors: Vec<Vec<BlockId>> =
            blocks.iter().map(|b| b.terminator.successors()).collect();

        let mut predecessors: Vec<Vec<BlockId>> = vec![Vec::new(); blocks.len()];
        for (idx, succs) in successors.iter().enumerate() {
            for &succ in succs {
                predecessors[succ.0].push(BlockId(idx));
            }
        }

        let label_to_id = blocks
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.label.clone(), BlockId(idx)))
            .collect();

        Self { blocks, ids, successors, predecessors, label_to_id }
    }

    pub fn entry(&self) -> Option<BlockId> {
        self.ids.first().copied()
    }

    pub fn block_id_for_label(&self, label: &str) -> Option<BlockId> {
        self.label_to_id.get(label).copied()
    }
}

impl IrView for Function {
    fn blocks(&self) -> &[BlockId] {
        &self.ids
    }

    fn label(&self, block: BlockId) -> &str {
        &self.blocks[block.0].label
    }

    fn instructions(&self, block: BlockId) -> &[Instruction] {
        &self.blocks[block.0].instructions
    }

    fn terminator(&self, block: BlockId) -> &Terminator {
        &self.blocks[block.0].terminator
    }

    fn successors(&self, block: BlockId) -> &[BlockId] {
        &self.successors[block.0]
    }

    fn predecessors(&self, block: BlockId) -> &[BlockId] {
        &self.predecessors[block.0]
    }
}
