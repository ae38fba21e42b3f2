//! Operand printers behind the generated `print_instruction`.

use std::fmt;

use tricore_mc::{AsmInfo, McInst, McOperand, RegId, SubtargetInfo};

use crate::error::PrintError;
use crate::gen::{self, SYS_REGS};
use crate::sysreg::{self, SysReg};

/// Printer routine the generated code calls for one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrintMethod {
    /// `print_operand`
    Operand,
    /// `print_system_register`; the operand must be an immediate.
    SystemRegister,
    /// `print_pcrel_target`
    PcrelTarget,
}

/// Prints TriCore `McInst`s as assembly text.
///
/// Holds only immutable configuration, so one printer can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct InstPrinter {
    mai: AsmInfo,
    sys_regs: &'static [SysReg],
    print_branch_targets: bool,
}

impl InstPrinter {
    pub fn new(mai: AsmInfo) -> Self {
        Self {
            mai,
            sys_regs: SYS_REGS,
            print_branch_targets: false,
        }
    }

    /// Resolve system registers through `table` instead of the
    /// generated one.  `table` must be sorted by encoding.
    pub fn with_sys_regs(mut self, table: &'static [SysReg]) -> Self {
        debug_assert!(
            table.windows(2).all(|w| w[0].encoding < w[1].encoding),
            "system register table must be sorted by encoding"
        );
        self.sys_regs = table;
        self
    }

    /// Print pc-relative branch displacements as absolute targets.
    pub fn with_branch_targets(mut self, enable: bool) -> Self {
        self.print_branch_targets = enable;
        self
    }

    pub fn asm_info(&self) -> &AsmInfo {
        &self.mai
    }

    /// Print `mi` followed by `annot`.
    pub fn print_inst(
        &self,
        mi: &McInst,
        address: u64,
        annot: &str,
        sti: &SubtargetInfo,
        o: &mut dyn fmt::Write,
    ) -> Result<(), PrintError> {
        self.print_instruction(mi, address, sti, o)?;
        self.print_annotation(o, annot)?;
        Ok(())
    }

    /// Render `mi` into a fresh string.
    pub fn inst_to_string(
        &self,
        mi: &McInst,
        address: u64,
        annot: &str,
        sti: &SubtargetInfo,
    ) -> Result<String, PrintError> {
        let mut s = String::with_capacity(32);
        self.print_inst(mi, address, annot, sti, &mut s)?;
        Ok(s)
    }

    /// Append a non-empty annotation verbatim.
    pub fn print_annotation(
        &self,
        o: &mut dyn fmt::Write,
        annot: &str,
    ) -> fmt::Result {
        if annot.is_empty() {
            return Ok(());
        }
        o.write_str(annot)
    }

    pub fn get_register_name(reg: RegId) -> &'static str {
        gen::get_register_name(reg)
    }

    pub fn print_reg_name(&self, o: &mut dyn fmt::Write, reg: RegId) -> fmt::Result {
        if cfg!(debug_assertions) && gen::PSEUDO_REGS.contains(&reg) {
            unreachable!("pseudo-register should never be emitted");
        }

        write!(o, "%{}", Self::get_register_name(reg))
    }

    pub fn print_operand(
        &self,
        mi: &McInst,
        op_no: usize,
        _sti: &SubtargetInfo,
        o: &mut dyn fmt::Write,
        modifier: Option<&str>,
    ) -> fmt::Result {
        debug_assert!(
            modifier.map_or(true, str::is_empty),
            "no modifiers supported"
        );
        match mi.operand(op_no) {
            McOperand::Reg(reg) => self.print_reg_name(o, *reg),
            McOperand::Imm(imm) => write!(o, "{imm}"),
            McOperand::Expr(expr) => expr.print(o, &self.mai),
        }
    }

    /// Print a CSFR offset by name when the subtarget has it,
    /// otherwise as a plain number.
    pub fn print_system_register(
        &self,
        mi: &McInst,
        op_no: usize,
        sti: &SubtargetInfo,
        o: &mut dyn fmt::Write,
    ) -> fmt::Result {
        let McOperand::Imm(imm) = *mi.operand(op_no) else {
            panic!("system register operand {op_no} is not an immediate");
        };
        let found = u16::try_from(imm)
            .ok()
            .and_then(|enc| sysreg::lookup_in(self.sys_regs, enc));
        match found {
            Some(r) if r.have_features(sti.feature_bits()) => {
                write!(o, "${}", r.name)
            }
            Some(r) => {
                log::debug!(
                    "system register {} ({imm:#x}) not available on {}",
                    r.name,
                    sti.cpu()
                );
                write!(o, "{imm}")
            }
            None => {
                log::debug!("no system register at {imm:#x}");
                write!(o, "{imm}")
            }
        }
    }

    /// Print a pc-relative displacement, as an absolute address when
    /// branch targets are enabled.
    pub fn print_pcrel_target(
        &self,
        mi: &McInst,
        address: u64,
        op_no: usize,
        sti: &SubtargetInfo,
        o: &mut dyn fmt::Write,
    ) -> fmt::Result {
        match *mi.operand(op_no) {
            McOperand::Imm(disp) if self.print_branch_targets => {
                let target = address.wrapping_add(disp as u64);
                write!(o, "{target:#x}")
            }
            _ => self.print_operand(mi, op_no, sti, o, None),
        }
    }
}

impl Default for InstPrinter {
    fn default() -> Self {
        Self::new(AsmInfo::default())
    }
}
