//! Symbolic operand expressions.
//!
//! Mirrors the shape of LLVM's `MCExpr`: constants, symbol references
//! with an optional relocation variant, and unary/binary trees.

use std::fmt;

use crate::asm_info::{AsmInfo, VariantSyntax};

/// Relocation variant attached to a symbol reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    None,
    /// Upper 16 bits, adjusted for a signed low half.
    Hi,
    /// Lower 16 bits.
    Lo,
    Got,
    /// Small data area offset.
    Sda,
}

impl VariantKind {
    pub fn name(self) -> &'static str {
        match self {
            VariantKind::None => "",
            VariantKind::Hi => "hi",
            VariantKind::Lo => "lo",
            VariantKind::Got => "got",
            VariantKind::Sda => "sda",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "" | "none" => Some(VariantKind::None),
            "hi" => Some(VariantKind::Hi),
            "lo" => Some(VariantKind::Lo),
            "got" => Some(VariantKind::Got),
            "sda" => Some(VariantKind::Sda),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
    LNot,
    Plus,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "~",
            UnaryOp::LNot => "!",
            UnaryOp::Plus => "+",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "-" => Some(UnaryOp::Neg),
            "~" => Some(UnaryOp::Not),
            "!" => Some(UnaryOp::LNot),
            "+" => Some(UnaryOp::Plus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Xor,
    Shl,
    AShr,
    LShr,
    LAnd,
    LOr,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::AShr => ">>",
            BinaryOp::LShr => ">>>",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Self> {
        let op = match s {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "&" => BinaryOp::And,
            "|" => BinaryOp::Or,
            "^" => BinaryOp::Xor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::AShr,
            ">>>" => BinaryOp::LShr,
            "&&" => BinaryOp::LAnd,
            "||" => BinaryOp::LOr,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum McExpr {
    Constant(i64),
    SymbolRef {
        symbol: String,
        variant: VariantKind,
    },
    Unary {
        op: UnaryOp,
        operand: Box<McExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<McExpr>,
        rhs: Box<McExpr>,
    },
}

impl McExpr {
    pub fn constant(value: i64) -> Self {
        McExpr::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Self::symbol_with_variant(name, VariantKind::None)
    }

    pub fn symbol_with_variant(
        name: impl Into<String>,
        variant: VariantKind,
    ) -> Self {
        McExpr::SymbolRef {
            symbol: name.into(),
            variant,
        }
    }

    pub fn unary(op: UnaryOp, operand: McExpr) -> Self {
        McExpr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOp, lhs: McExpr, rhs: McExpr) -> Self {
        McExpr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn add(lhs: McExpr, rhs: McExpr) -> Self {
        Self::binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(lhs: McExpr, rhs: McExpr) -> Self {
        Self::binary(BinaryOp::Sub, lhs, rhs)
    }

    /// Constants and symbol references print without parentheses
    /// when nested.
    fn is_leaf(&self) -> bool {
        matches!(self, McExpr::Constant(_) | McExpr::SymbolRef { .. })
    }

    fn print_nested(
        &self,
        o: &mut dyn fmt::Write,
        mai: &AsmInfo,
    ) -> fmt::Result {
        if self.is_leaf() {
            self.print(o, mai)
        } else {
            o.write_char('(')?;
            self.print(o, mai)?;
            o.write_char(')')
        }
    }

    /// Render the expression as assembly text.
    pub fn print(&self, o: &mut dyn fmt::Write, mai: &AsmInfo) -> fmt::Result {
        match self {
            McExpr::Constant(v) => write!(o, "{v}"),
            McExpr::SymbolRef { symbol, variant } => {
                print_symbol_ref(o, mai, symbol, *variant)
            }
            McExpr::Unary { op, operand } => {
                o.write_str(op.symbol())?;
                match **operand {
                    McExpr::Binary { .. } => operand.print_nested(o, mai),
                    _ => operand.print(o, mai),
                }
            }
            McExpr::Binary { op, lhs, rhs } => {
                lhs.print_nested(o, mai)?;
                if let (BinaryOp::Add, McExpr::Constant(c)) = (op, &**rhs) {
                    if *c < 0 {
                        return write!(o, "{c}");
                    }
                }
                o.write_str(op.symbol())?;
                rhs.print_nested(o, mai)
            }
        }
    }
}

fn print_symbol_name(
    o: &mut dyn fmt::Write,
    mai: &AsmInfo,
    name: &str,
) -> fmt::Result {
    if mai.is_valid_unquoted_name(name) {
        return o.write_str(name);
    }
    o.write_char('"')?;
    for c in name.chars() {
        match c {
            '"' => o.write_str("\\\"")?,
            '\\' => o.write_str("\\\\")?,
            '\n' => o.write_str("\\n")?,
            _ => o.write_char(c)?,
        }
    }
    o.write_char('"')
}

fn print_symbol_ref(
    o: &mut dyn fmt::Write,
    mai: &AsmInfo,
    name: &str,
    variant: VariantKind,
) -> fmt::Result {
    if variant == VariantKind::None {
        return print_symbol_name(o, mai, name);
    }
    match mai.variant_syntax {
        VariantSyntax::Prefix => {
            write!(o, "{}:", variant.name())?;
            print_symbol_name(o, mai, name)
        }
        VariantSyntax::At => {
            print_symbol_name(o, mai, name)?;
            write!(o, "@{}", variant.name())
        }
        VariantSyntax::Parens => {
            print_symbol_name(o, mai, name)?;
            write!(o, "({})", variant.name())
        }
    }
}

impl fmt::Display for McExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f, &AsmInfo::default())
    }
}
