//! Normal-order evaluation of untyped lambda terms, printed as text and as
//! Tromp-style combinator diagrams.

#[cfg(test)]
#[macro_use]
mod macros;

pub mod ast;
pub mod compiler;
pub mod error;
pub mod eval;
pub mod glyph;
pub mod parser;
pub mod prelude;
pub mod printer;
pub mod render;
pub mod subst;
pub mod term;
