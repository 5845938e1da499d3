//! The crate's own minimal textual IR syntax: a line-oriented format read
//! from the file the driver is pointed at, kept deliberately decoupled from
//! `crate::ir`'s in-memory data model (Design Notes §9, "avoid IR-library
//! coupling") so the core can be unit-tested against synthetic IR without
//! this module in the loop at all.

mod lexer;
mod parser;
mod token;

pub use parser::parse;
