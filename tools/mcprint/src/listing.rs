//! JSON Lines instruction listings.
//!
//! One record per line:
//!
//! ```text
//! {"address": 4096, "opcode": "MFCRrlc", "operands": [{"reg": "d2"}, {"sysreg": "PSW"}]}
//! {"opcode": "MOVH_Arlc", "operands": [{"reg": "a4"}, {"expr": {"sym": {"name": "buf", "variant": "hi"}}}]}
//! ```
//!
//! Blank lines and lines starting with `//` are ignored.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use tricore_disas::{
    lookup_sys_reg_by_name, register_by_name, InstPrinter, Opcode, PrintError,
    PrintMethod, PSEUDO_REGS,
};
use tricore_mc::{
    BinaryOp, McExpr, McInst, McOperand, RegId, SubtargetInfo, UnaryOp,
    VariantKind,
};

#[derive(Debug, Clone, Deserialize)]
pub struct InsnRecord {
    #[serde(default)]
    pub address: u64,
    pub opcode: String,
    #[serde(default)]
    pub operands: Vec<OperandRecord>,
    #[serde(default)]
    pub annotation: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandRecord {
    Reg(String),
    Imm(i64),
    /// System register by name, stored as its encoding.
    Sysreg(String),
    Expr(ExprRecord),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprRecord {
    Const(i64),
    Sym {
        name: String,
        #[serde(default)]
        variant: Option<String>,
    },
    Unary {
        op: String,
        operand: Box<ExprRecord>,
    },
    Binary {
        op: String,
        lhs: Box<ExprRecord>,
        rhs: Box<ExprRecord>,
    },
}

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown opcode '{0}'")]
    UnknownOpcode(String),

    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    #[error("'{0}' is a pseudo-register")]
    PseudoRegister(String),

    #[error("unknown system register '{0}'")]
    UnknownSysReg(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("unknown symbol variant '{0}'")]
    UnknownVariant(String),

    #[error("{opcode} takes {expected} operands, got {found}")]
    OperandCount {
        opcode: String,
        expected: usize,
        found: usize,
    },

    #[error("{opcode} operand {index} must be an imm or sysreg")]
    SysRegOperand { opcode: String, index: usize },

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ListingError>,
    },
}

impl ListingError {
    fn at_line(line: usize, err: ListingError) -> Self {
        ListingError::AtLine {
            line,
            source: Box::new(err),
        }
    }
}

pub fn parse_record(line: &str) -> Result<InsnRecord, ListingError> {
    Ok(serde_json::from_str(line)?)
}

fn resolve_reg(name: &str) -> Result<RegId, ListingError> {
    let bare = name.strip_prefix('%').unwrap_or(name);
    let reg = register_by_name(bare)
        .or_else(|| register_by_name(&bare.to_ascii_lowercase()))
        .ok_or_else(|| ListingError::UnknownRegister(name.to_string()))?;
    if PSEUDO_REGS.contains(&reg) {
        return Err(ListingError::PseudoRegister(name.to_string()));
    }
    Ok(reg)
}

impl ExprRecord {
    pub fn to_expr(&self) -> Result<McExpr, ListingError> {
        let expr = match self {
            ExprRecord::Const(v) => McExpr::constant(*v),
            ExprRecord::Sym { name, variant } => {
                let kind = match variant.as_deref() {
                    None => VariantKind::None,
                    Some(v) => VariantKind::from_name(v)
                        .ok_or_else(|| ListingError::UnknownVariant(v.to_string()))?,
                };
                McExpr::symbol_with_variant(name.clone(), kind)
            }
            ExprRecord::Unary { op, operand } => {
                let op = UnaryOp::from_symbol(op)
                    .ok_or_else(|| ListingError::UnknownOperator(op.clone()))?;
                McExpr::unary(op, operand.to_expr()?)
            }
            ExprRecord::Binary { op, lhs, rhs } => {
                let op = BinaryOp::from_symbol(op)
                    .ok_or_else(|| ListingError::UnknownOperator(op.clone()))?;
                McExpr::binary(op, lhs.to_expr()?, rhs.to_expr()?)
            }
        };
        Ok(expr)
    }
}

impl OperandRecord {
    /// Whether the record resolves to an immediate operand.
    pub fn is_immediate(&self) -> bool {
        matches!(self, OperandRecord::Imm(_) | OperandRecord::Sysreg(_))
    }

    pub fn to_operand(&self) -> Result<McOperand, ListingError> {
        let op = match self {
            OperandRecord::Reg(name) => McOperand::Reg(resolve_reg(name)?),
            OperandRecord::Imm(v) => McOperand::Imm(*v),
            OperandRecord::Sysreg(name) => {
                let r = lookup_sys_reg_by_name(name)
                    .ok_or_else(|| ListingError::UnknownSysReg(name.clone()))?;
                McOperand::Imm(i64::from(r.encoding))
            }
            OperandRecord::Expr(e) => McOperand::Expr(e.to_expr()?),
        };
        Ok(op)
    }
}

impl InsnRecord {
    /// Resolve names and check the operand count against the opcode.
    pub fn to_mc_inst(&self) -> Result<McInst, ListingError> {
        let opcode = Opcode::from_name(&self.opcode)
            .ok_or_else(|| ListingError::UnknownOpcode(self.opcode.clone()))?;
        if self.operands.len() != opcode.num_operands() {
            return Err(ListingError::OperandCount {
                opcode: self.opcode.clone(),
                expected: opcode.num_operands(),
                found: self.operands.len(),
            });
        }
        let mut mi = McInst::new(opcode);
        for (index, (op, method)) in
            self.operands.iter().zip(opcode.operand_methods()).enumerate()
        {
            if *method == PrintMethod::SystemRegister && !op.is_immediate() {
                return Err(ListingError::SysRegOperand {
                    opcode: self.opcode.clone(),
                    index,
                });
            }
            mi = mi.with_operand(op.to_operand()?);
        }
        Ok(mi)
    }
}

fn render_record(
    line: &str,
    printer: &InstPrinter,
    sti: &SubtargetInfo,
    show_address: bool,
    out: &mut dyn fmt::Write,
) -> Result<(), ListingError> {
    let rec = parse_record(line)?;
    let mi = rec.to_mc_inst()?;
    if show_address {
        write!(out, "{:08x}:  ", rec.address).map_err(PrintError::from)?;
    }
    printer.print_inst(&mi, rec.address, &rec.annotation, sti, out)?;
    out.write_char('\n').map_err(PrintError::from)?;
    log::trace!("{:#x}: {}", rec.address, rec.opcode);
    Ok(())
}

/// Print every record of `input` to `out`, one instruction per line.
///
/// Returns the number of instructions printed.
pub fn render_listing(
    input: &str,
    printer: &InstPrinter,
    sti: &SubtargetInfo,
    show_address: bool,
    out: &mut dyn fmt::Write,
) -> Result<usize, ListingError> {
    let mut count = 0;
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        render_record(line, printer, sti, show_address, out)
            .map_err(|e| ListingError::at_line(idx + 1, e))?;
        count += 1;
    }
    Ok(count)
}
