pub mod assemble;
pub mod batch;
pub mod check;
