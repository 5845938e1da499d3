//! Structural errors: the fatal, non-recoverable failures described in
//! spec.md §7. Abstract-domain outliers (Empty operands, infeasible edges,
//! division by a zero-containing interval) are *not* errors here — they are
//! handled inside the domain/transfer layer by producing sound
//! approximations, never by returning `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot read IR file: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("procedure has no basic blocks")]
    NoBlocks,

    #[error("block `{block}` has no terminator")]
    MissingTerminator { block: String },

    #[error("no such block: `{0}`")]
    UnknownBlock(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
