//! TriCore instruction printer.
//!
//! Renders `McInst`s as TriCore assembly text.  Per-opcode mnemonic
//! and operand layout comes from `tables/tricore.insn`, turned into
//! Rust by `asmwriter` at build time; this crate supplies the operand
//! printers the generated code calls into.

pub mod error;
pub mod gen;
pub mod inst_printer;
pub mod sysreg;

pub use error::PrintError;
pub use gen::{
    get_register_name, reg, register_by_name, Opcode, NUM_OPCODES, NUM_REGS,
    PSEUDO_REGS, SYS_REGS,
};
pub use inst_printer::{InstPrinter, PrintMethod};
pub use sysreg::{
    lookup_in, lookup_sys_reg_by_encoding, lookup_sys_reg_by_name, SysReg,
};
