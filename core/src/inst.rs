use crate::expr::McExpr;

/// Register number as assigned by the generated register table.
pub type RegId = u16;

/// Register number 0 is never a real register.
pub const NO_REGISTER: RegId = 0;

/// One operand of an `McInst`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McOperand {
    Reg(RegId),
    Imm(i64),
    Expr(McExpr),
}

impl McOperand {
    #[inline]
    pub fn is_reg(&self) -> bool {
        matches!(self, McOperand::Reg(_))
    }

    #[inline]
    pub fn is_imm(&self) -> bool {
        matches!(self, McOperand::Imm(_))
    }

    #[inline]
    pub fn is_expr(&self) -> bool {
        matches!(self, McOperand::Expr(_))
    }

    pub fn reg(&self) -> Option<RegId> {
        match self {
            McOperand::Reg(r) => Some(*r),
            _ => None,
        }
    }

    pub fn imm(&self) -> Option<i64> {
        match self {
            McOperand::Imm(v) => Some(*v),
            _ => None,
        }
    }

    pub fn expr(&self) -> Option<&McExpr> {
        match self {
            McOperand::Expr(e) => Some(e),
            _ => None,
        }
    }
}

/// A decoded machine instruction: opcode number plus operands.
///
/// Built once through the consuming `with_*` methods and then only
/// read.  Opcode numbers come from the generated `Opcode` enum of the
/// target crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McInst {
    opcode: u16,
    operands: Vec<McOperand>,
}

impl McInst {
    pub fn new(opcode: impl Into<u16>) -> Self {
        Self {
            opcode: opcode.into(),
            operands: Vec::new(),
        }
    }

    pub fn with_operand(mut self, op: McOperand) -> Self {
        self.operands.push(op);
        self
    }

    pub fn with_reg(self, reg: RegId) -> Self {
        self.with_operand(McOperand::Reg(reg))
    }

    pub fn with_imm(self, imm: i64) -> Self {
        self.with_operand(McOperand::Imm(imm))
    }

    pub fn with_expr(self, expr: McExpr) -> Self {
        self.with_operand(McOperand::Expr(expr))
    }

    #[inline]
    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    #[inline]
    pub fn num_operands(&self) -> usize {
        self.operands.len()
    }

    pub fn operands(&self) -> &[McOperand] {
        &self.operands
    }

    /// Operand `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range; printers only ask for operands
    /// the opcode description declares.
    pub fn operand(&self, idx: usize) -> &McOperand {
        match self.operands.get(idx) {
            Some(op) => op,
            None => panic!(
                "operand {idx} out of range for opcode {} ({} operands)",
                self.opcode,
                self.operands.len()
            ),
        }
    }
}
