//! TriCore MC layer.
//!
//! The machine-code level view of an instruction that the printer
//! consumes: `McInst` with its operands, symbolic `McExpr`s, the
//! assembly-syntax knobs in `AsmInfo`, and the subtarget feature set
//! that gates system register names.

pub mod asm_info;
pub mod expr;
pub mod inst;
pub mod subtarget;

pub use asm_info::{AsmInfo, VariantSyntax};
pub use expr::{BinaryOp, McExpr, UnaryOp, VariantKind};
pub use inst::{McInst, McOperand, RegId, NO_REGISTER};
pub use subtarget::{CpuDesc, FeatureBits, SubtargetError, SubtargetInfo, CPUS};
