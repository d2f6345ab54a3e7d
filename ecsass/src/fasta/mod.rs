//! Minimal FASTA support: single-sequence files referenced from recipes and
//! line-wrapped output of assembled sequences.

pub use consts::*;

mod consts;
pub mod reader;
pub mod writer;
