//! A small virtual microprocessor: a bank of named integer registers and a
//! fixed, line-oriented instruction set that mutates them.

pub mod processor;
pub mod registers;
