//! Recursive-descent parser building `ir::Function` values out of the
//! textual IR format's token stream.
//!
//! Branch targets are textual labels, resolved to `BlockId`s only after
//! every block in the procedure has been parsed and assigned an index —
//! forward references (a block branching to a later label) are routine,
//! so resolution can't happen inline during parsing.

use crate::common::fx_hash::FxHashMap;
use crate::common::error::{AnalysisError, AnalysisResult};
use crate::ir::{Block, BlockId, Function, IcmpPred, Instruction, Opcode, Operand};

use super::lexer::Lexer;
use super::token::{Token, TokenKind};

pub fn parse(src: &str) -> AnalysisResult<Function> {
    let tokens = Lexer::new(src).tokenize()?;
    let raw_blocks = Parser::new(tokens).parse_function()?;
    resolve_labels(raw_blocks)
}

/// A terminator whose branch targets are still labels rather than indices.
enum RawTerminator {
    CondBr { cond: Operand, then_label: String, else_label: String },
    Br(String),
    Ret,
}

struct RawBlock {
    label: String,
    instructions: Vec<Instruction>,
    terminator: RawTerminator,
}

fn resolve_labels(raw_blocks: Vec<RawBlock>) -> AnalysisResult<Function> {
    let index_of: FxHashMap<String, usize> =
        raw_blocks.iter().enumerate().map(|(i, b)| (b.label.clone(), i)).collect();

    let resolve = |label: &str| -> AnalysisResult<BlockId> {
        index_of
            .get(label)
            .map(|&i| BlockId(i))
            .ok_or_else(|| AnalysisError::UnknownBlock(label.to_string()))
    };

    let mut blocks = Vec::with_capacity(raw_blocks.len());
    for raw in raw_blocks {
        let terminator = match raw.terminator {
            RawTerminator::Ret => crate::ir::Terminator::Ret,
            RawTerminator::Br(label) => crate::ir::Terminator::Br(resolve(&label)?),
            RawTerminator::CondBr { cond, then_label, else_label } => crate::ir::Terminator::CondBr {
                cond,
                then_block: resolve(&then_label)?,
                else_block: resolve(&else_label)?,
            },
        };
        blocks.push(Block { label: raw.label, instructions: raw.instructions, terminator });
    }
    Ok(Function::new(blocks))
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn line(&self) -> usize {
        self.peek().line
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> AnalysisResult<()> {
        if &self.peek().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(AnalysisError::Parse { line: self.line(), message: format!("expected {what}") })
        }
    }

    fn expect_ident(&mut self, what: &str) -> AnalysisResult<String> {
        match self.advance().kind {
            TokenKind::Ident(name) => Ok(name),
            other => Err(AnalysisError::Parse {
                line: self.line(),
                message: format!("expected {what}, found {other:?}"),
            }),
        }
    }

    fn parse_function(&mut self) -> AnalysisResult<Vec<RawBlock>> {
        let mut blocks = Vec::new();
        while !self.peek().is_eof() {
            blocks.push(self.parse_block()?);
        }
        if blocks.is_empty() {
            return Err(AnalysisError::NoBlocks);
        }
        Ok(blocks)
    }

    fn parse_block(&mut self) -> AnalysisResult<RawBlock> {
        self.expect(&TokenKind::Block, "`block`")?;
        let label = self.expect_ident("a block label")?;
        self.expect(&TokenKind::Colon, "`:`")?;

        let mut instructions = Vec::new();
        let terminator = loop {
            match &self.peek().kind {
                TokenKind::Br | TokenKind::Ret => break self.parse_terminator()?,
                TokenKind::Block | TokenKind::Eof => {
                    return Err(AnalysisError::MissingTerminator { block: label });
                }
                _ => instructions.push(self.parse_instruction()?),
            }
        };
        Ok(RawBlock { label, instructions, terminator })
    }

    fn parse_operand(&mut self) -> AnalysisResult<Operand> {
        match self.advance().kind {
            TokenKind::Ident(name) => Ok(Operand::Reg(name)),
            TokenKind::Int(value) => Ok(Operand::Const(value)),
            other => Err(AnalysisError::Parse {
                line: self.line(),
                message: format!("expected an operand, found {other:?}"),
            }),
        }
    }

    fn parse_instruction(&mut self) -> AnalysisResult<Instruction> {
        // `alloc-slot <name>` has no `%reg =` prefix: the name *is* the
        // instruction's result name (see `ir_text` module docs).
        if self.peek().kind == TokenKind::AllocSlot {
            self.advance();
            let name = self.expect_ident("the slot's variable name")?;
            return Ok(Instruction { name: Some(name), opcode: Opcode::AllocSlot });
        }

        // Every other value-producing instruction is `%reg = opcode ...`;
        // `store` produces no value and has no destination.
        if self.peek().kind == TokenKind::Store {
            self.advance();
            let value = self.parse_operand()?;
            self.expect(&TokenKind::Comma, "`,` between store's value and slot operands")?;
            let slot = self.parse_operand()?;
            return Ok(Instruction { name: None, opcode: Opcode::Store { value, slot } });
        }

        let dest = self.expect_ident("a destination register (`%name =`)")?;
        self.expect(&TokenKind::Equals, "`=`")?;

        let opcode = match self.advance().kind {
            TokenKind::Load => {
                let slot = self.parse_operand()?;
                Opcode::Load { slot }
            }
            TokenKind::BinOp(op) => {
                let lhs = self.parse_operand()?;
                self.expect(&TokenKind::Comma, "`,` between binary operands")?;
                let rhs = self.parse_operand()?;
                Opcode::Binary { op, lhs, rhs }
            }
            TokenKind::Icmp => {
                let pred = self.parse_pred()?;
                let lhs = self.parse_operand()?;
                self.expect(&TokenKind::Comma, "`,` between icmp operands")?;
                let rhs = self.parse_operand()?;
                Opcode::Icmp { pred, lhs, rhs }
            }
            other => {
                return Err(AnalysisError::Parse {
                    line: self.line(),
                    message: format!("expected an opcode, found {other:?}"),
                })
            }
        };
        Ok(Instruction { name: Some(dest), opcode })
    }

    fn parse_pred(&mut self) -> AnalysisResult<IcmpPred> {
        match self.advance().kind {
            TokenKind::Pred(pred) => Ok(pred),
            other => Err(AnalysisError::Parse {
                line: self.line(),
                message: format!("expected a comparison predicate, found {other:?}"),
            }),
        }
    }

    fn parse_terminator(&mut self) -> AnalysisResult<RawTerminator> {
        match self.advance().kind {
            TokenKind::Ret => Ok(RawTerminator::Ret),
            TokenKind::Br => {
                let first = self.parse_operand()?;
                if self.peek().kind == TokenKind::Comma {
                    self.advance();
                    let then_label = self.expect_ident("a `then` label")?;
                    self.expect(&TokenKind::Comma, "`,` between branch targets")?;
                    let else_label = self.expect_ident("an `else` label")?;
                    Ok(RawTerminator::CondBr { cond: first, then_label, else_label })
                } else {
                    let Operand::Reg(label) = first else {
                        return Err(AnalysisError::Parse {
                            line: self.line(),
                            message: "unconditional `br` target must be a label".to_string(),
                        });
                    };
                    Ok(RawTerminator::Br(label))
                }
            }
            other => Err(AnalysisError::Parse {
                line: self.line(),
                message: format!("expected a terminator, found {other:?}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{IrView, Terminator};

    #[test]
    fn parses_straight_line_function() {
        let src = "block entry:\n  alloc-slot x\n  store 1, x\n  ret\n";
        let func = parse(src).unwrap();
        assert_eq!(func.blocks().len(), 1);
        assert_eq!(func.instructions(BlockId(0)).len(), 2);
        assert!(matches!(func.terminator(BlockId(0)), Terminator::Ret));
    }

    #[test]
    fn resolves_forward_branch_labels() {
        let src = "block entry:\n  %1 = icmp sgt %1, 0\n  br %1, then, else\nblock then:\n  ret\nblock else:\n  ret\n";
        let func = parse(src).unwrap();
        match func.terminator(BlockId(0)) {
            Terminator::CondBr { then_block, else_block, .. } => {
                assert_eq!(*then_block, BlockId(1));
                assert_eq!(*else_block, BlockId(2));
            }
            other => panic!("expected CondBr, got {other:?}"),
        }
    }

    #[test]
    fn unknown_branch_target_is_an_error() {
        let src = "block entry:\n  br nowhere\n";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownBlock(_)));
    }

    #[test]
    fn missing_terminator_is_an_error() {
        let src = "block entry:\n  alloc-slot x\n";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingTerminator { .. }));
    }

    #[test]
    fn full_arithmetic_and_branch_example_from_docs() {
        let src = "\
block entry:
  alloc-slot x
  alloc-slot y
  store 1, x
  %1 = load x
  %2 = add %1, 2
  %3 = icmp sgt %2, 0
  br %3, then, else

block then:
  store 1, x
  br end

block else:
  store 2, x
  br end

block end:
  ret
";
        let func = parse(src).unwrap();
        assert_eq!(func.blocks().len(), 4);
        assert_eq!(func.block_id_for_label("end"), Some(BlockId(3)));
    }
}
