//! Main module for markup reflow and highlighting

pub mod lexing;
pub mod pipeline;
pub mod reflow;
pub mod spans;
