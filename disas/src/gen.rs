//! Tables and the `print_instruction` routine generated from
//! `tables/tricore.insn`.

use std::fmt;

use tricore_mc::{FeatureBits, McInst, RegId, SubtargetInfo};

use crate::error::PrintError;
use crate::inst_printer::{InstPrinter, PrintMethod};
use crate::sysreg::SysReg;

include!(concat!(env!("OUT_DIR"), "/tricore_gen.rs"));
