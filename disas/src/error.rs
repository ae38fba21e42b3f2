use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("unknown opcode {0}")]
    UnknownOpcode(u16),

    #[error("{opcode} expects {expected} operands, got {found}")]
    OperandCount {
        opcode: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("formatter error")]
    Fmt(#[from] fmt::Error),
}
