//! Assembly-writer generator.
//!
//! Reads an instruction description (`.insn`) and emits the Rust
//! tables and per-opcode print routine that a target's instruction
//! printer includes from `OUT_DIR`.
//!
//! ```text
//! reg    D0   d0
//! reg    PSW_C psw.c !pseudo
//! sysreg PSW  0xfe04
//! sysreg CORE_ID 0xfe1c !features=tc16
//! ADDrr  "add $d, $s1, $s2"  d s1 s2
//! MFCR   "mfcr $d, $c"       d c:system_register
//! ```
//!
//! The generated code expects these names in scope at the include
//! site: `fmt`, `McInst`, `RegId`, `SubtargetInfo`, `FeatureBits`,
//! `SysReg`, `PrintMethod`, `InstPrinter` and `PrintError`.  The
//! target's `PrintMethod` must mirror this crate's variant names.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;

use thiserror::Error;

// ── Data structures ─────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct RegDef {
    pub name: String,
    pub asm_name: String,
    pub pseudo: bool,
}

#[derive(Clone, Debug)]
pub struct SysRegDef {
    pub name: String,
    pub encoding: u16,
    pub features: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintMethod {
    Operand,
    SystemRegister,
    PcrelTarget,
}

impl PrintMethod {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "operand" => Some(PrintMethod::Operand),
            "system_register" => Some(PrintMethod::SystemRegister),
            "pcrel_target" => Some(PrintMethod::PcrelTarget),
            _ => None,
        }
    }

    /// Variant name of the generated code's `PrintMethod`.
    pub fn variant_name(self) -> &'static str {
        match self {
            PrintMethod::Operand => "Operand",
            PrintMethod::SystemRegister => "SystemRegister",
            PrintMethod::PcrelTarget => "PcrelTarget",
        }
    }
}

#[derive(Clone, Debug)]
pub struct OperandDef {
    pub name: String,
    pub method: PrintMethod,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmPiece {
    Literal(String),
    Operand {
        name: String,
        modifier: Option<String>,
    },
}

#[derive(Clone, Debug)]
pub struct InsnDef {
    pub name: String,
    pub asm: Vec<AsmPiece>,
    pub operands: Vec<OperandDef>,
}

impl InsnDef {
    pub fn operand_index(&self, name: &str) -> Option<usize> {
        self.operands.iter().position(|o| o.name == name)
    }
}

pub struct Parsed {
    pub regs: Vec<RegDef>,
    pub sysregs: Vec<SysRegDef>,
    pub insns: Vec<InsnDef>,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("line {line}: {msg}")]
    Syntax { line: usize, msg: String },

    #[error("line {line}: duplicate {kind} '{name}'")]
    Duplicate {
        line: usize,
        kind: &'static str,
        name: String,
    },

    #[error("line {line}: sysreg {name} reuses encoding {encoding:#06x}")]
    DuplicateEncoding {
        line: usize,
        name: String,
        encoding: u16,
    },

    #[error("description defines no instructions")]
    NoInstructions,

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

// ── Lexical helpers ─────────────────────────────────────────────

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Merge backslash-continuation lines into single logical lines.
///
/// Each logical line is paired with the 1-based physical line it
/// starts on.
pub fn merge_continuations(input: &str) -> Vec<(usize, String)> {
    let mut out: Vec<(usize, String)> = Vec::new();
    let mut cont = false;
    for (idx, line) in input.lines().enumerate() {
        if !cont {
            out.push((idx + 1, String::new()));
        }
        let Some((_, logical)) = out.last_mut() else {
            continue;
        };
        if cont {
            logical.push(' ');
            logical.push_str(line.trim());
        } else {
            logical.push_str(line);
        }
        cont = logical.ends_with('\\');
        if cont {
            logical.pop();
            while logical.ends_with(' ') {
                logical.pop();
            }
        }
    }
    out
}

/// Drop a trailing `#` comment, ignoring `#` inside a quoted string.
pub fn strip_comment(line: &str) -> &str {
    let mut in_str = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_str => escaped = true,
            '"' => in_str = !in_str,
            '#' if !in_str => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse a decimal or `0x` hexadecimal encoding that fits in 16 bits.
pub fn parse_encoding(s: &str) -> Result<u16, String> {
    let val = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse::<u32>(),
    }
    .map_err(|_| format!("bad encoding: {s}"))?;
    u16::try_from(val).map_err(|_| format!("encoding {s} exceeds 16 bits"))
}

/// Split `NAME "asm string" rest...` into its three parts, resolving
/// escapes inside the string.
pub fn split_quoted(line: &str) -> Result<(&str, String, &str), String> {
    let line = line.trim();
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("missing asm string after '{line}'"))?;
    let rest = rest.trim_start();
    let body = rest
        .strip_prefix('"')
        .ok_or_else(|| format!("{name}: asm string must be quoted"))?;

    let mut text = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((name, text, body[i + 1..].trim())),
            '\\' => match chars.next() {
                Some((_, 't')) => text.push('\t'),
                Some((_, '"')) => text.push('"'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, e)) => {
                    return Err(format!("{name}: unknown escape \\{e}"))
                }
                None => break,
            },
            _ => text.push(c),
        }
    }
    Err(format!("{name}: unterminated asm string"))
}

// ── Asm string parsing ─────────────────────────────────────────

fn push_literal(pieces: &mut Vec<AsmPiece>, c: char) {
    if let Some(AsmPiece::Literal(s)) = pieces.last_mut() {
        s.push(c);
    } else {
        pieces.push(AsmPiece::Literal(c.to_string()));
    }
}

/// Split an asm string into literal runs and operand references.
///
/// `$name`, `${name}` and `${name:modifier}` reference operands; `$$`
/// is a literal dollar sign.  No print method takes a modifier, so
/// `parse_insn` rejects any that parse here.
pub fn parse_asm_string(s: &str) -> Result<Vec<AsmPiece>, String> {
    let mut pieces = Vec::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            push_literal(&mut pieces, c);
            continue;
        }
        match chars.peek() {
            Some('$') => {
                chars.next();
                push_literal(&mut pieces, '$');
            }
            Some('{') => {
                chars.next();
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => inner.push(ch),
                        None => return Err(format!("unterminated ${{ in \"{s}\"")),
                    }
                }
                let (name, modifier) = match inner.split_once(':') {
                    Some((n, m)) if !m.is_empty() => (n, Some(m.to_string())),
                    Some(_) => return Err(format!("empty modifier in ${{{inner}}}")),
                    None => (inner.as_str(), None),
                };
                if !is_ident(name) {
                    return Err(format!("bad operand name '{name}'"));
                }
                pieces.push(AsmPiece::Operand {
                    name: name.to_string(),
                    modifier,
                });
            }
            _ => {
                let mut name = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_alphanumeric() || ch == '_' {
                        name.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(format!("'$' without operand name in \"{s}\""));
                }
                pieces.push(AsmPiece::Operand {
                    name,
                    modifier: None,
                });
            }
        }
    }
    Ok(pieces)
}

// ── Line parsing ────────────────────────────────────────────────

pub fn parse_reg(line: &str) -> Result<RegDef, String> {
    // reg NAME asm-name [!pseudo]
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err("usage: reg <NAME> <asm-name> [!pseudo]".into());
    }
    let name = tokens[1];
    if !is_ident(name) {
        return Err(format!("bad register name '{name}'"));
    }
    let mut pseudo = false;
    for &attr in &tokens[3..] {
        match attr {
            "!pseudo" => pseudo = true,
            _ => return Err(format!("unknown register attribute {attr}")),
        }
    }
    Ok(RegDef {
        name: name.to_string(),
        asm_name: tokens[2].to_string(),
        pseudo,
    })
}

pub fn parse_sysreg(line: &str) -> Result<SysRegDef, String> {
    // sysreg NAME encoding [!features=f1,f2]
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err("usage: sysreg <NAME> <encoding> [!features=...]".into());
    }
    let name = tokens[1];
    if !is_ident(name) {
        return Err(format!("bad system register name '{name}'"));
    }
    let encoding = parse_encoding(tokens[2])?;
    let mut features = Vec::new();
    for &attr in &tokens[3..] {
        let list = attr
            .strip_prefix("!features=")
            .ok_or_else(|| format!("unknown sysreg attribute {attr}"))?;
        for f in list.split(',') {
            if !FEATURE_NAMES.contains(&f) {
                return Err(format!(
                    "unknown feature '{f}' (expected one of {})",
                    FEATURE_NAMES.join(", ")
                ));
            }
            features.push(f.to_string());
        }
    }
    Ok(SysRegDef {
        name: name.to_string(),
        encoding,
        features,
    })
}

fn parse_operand_def(tok: &str) -> Result<OperandDef, String> {
    let (name, method) = match tok.split_once(':') {
        Some((n, m)) => {
            let method = PrintMethod::from_name(m)
                .ok_or_else(|| format!("unknown print method '{m}'"))?;
            (n, method)
        }
        None => (tok, PrintMethod::Operand),
    };
    if !is_ident(name) {
        return Err(format!("bad operand name '{name}'"));
    }
    Ok(OperandDef {
        name: name.to_string(),
        method,
    })
}

pub fn parse_insn(line: &str) -> Result<InsnDef, String> {
    let (name, asm_text, rest) = split_quoted(line)?;
    if !is_ident(name) {
        return Err(format!("bad instruction name '{name}'"));
    }
    let asm = parse_asm_string(&asm_text)?;

    let mut operands: Vec<OperandDef> = Vec::new();
    for tok in rest.split_whitespace() {
        let od = parse_operand_def(tok)?;
        if operands.iter().any(|o| o.name == od.name) {
            return Err(format!("{name}: operand '{}' declared twice", od.name));
        }
        operands.push(od);
    }

    let insn = InsnDef {
        name: name.to_string(),
        asm,
        operands,
    };
    for piece in &insn.asm {
        if let AsmPiece::Operand { name: op, modifier } = piece {
            if insn.operand_index(op).is_none() {
                return Err(format!("{name}: unknown operand ${op}"));
            }
            if let Some(m) = modifier {
                return Err(format!(
                    "{name}: modifier '{m}' on ${op} is not supported"
                ));
            }
        }
    }
    Ok(insn)
}

pub fn parse(input: &str) -> Result<Parsed, Error> {
    let lines = merge_continuations(input);
    let mut regs: Vec<RegDef> = Vec::new();
    let mut sysregs: Vec<SysRegDef> = Vec::new();
    let mut insns: Vec<InsnDef> = Vec::new();
    let mut reg_names = HashSet::new();
    let mut sysreg_names = HashSet::new();
    let mut insn_names = HashSet::new();
    let mut encodings = BTreeMap::new();

    for (line_no, raw) in &lines {
        let line_no = *line_no;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }
        let syntax = |msg: String| Error::Syntax { line: line_no, msg };
        let keyword = line.split_whitespace().next().unwrap_or_default();
        match keyword {
            "reg" => {
                let r = parse_reg(line).map_err(syntax)?;
                if r.name == "NoRegister" || !reg_names.insert(r.name.clone()) {
                    return Err(Error::Duplicate {
                        line: line_no,
                        kind: "register",
                        name: r.name,
                    });
                }
                regs.push(r);
            }
            "sysreg" => {
                let s = parse_sysreg(line).map_err(syntax)?;
                if !sysreg_names.insert(s.name.clone()) {
                    return Err(Error::Duplicate {
                        line: line_no,
                        kind: "system register",
                        name: s.name,
                    });
                }
                if encodings.insert(s.encoding, s.name.clone()).is_some() {
                    return Err(Error::DuplicateEncoding {
                        line: line_no,
                        name: s.name,
                        encoding: s.encoding,
                    });
                }
                sysregs.push(s);
            }
            _ => {
                let i = parse_insn(line).map_err(syntax)?;
                if !insn_names.insert(i.name.clone()) {
                    return Err(Error::Duplicate {
                        line: line_no,
                        kind: "instruction",
                        name: i.name,
                    });
                }
                insns.push(i);
            }
        }
    }
    Ok(Parsed {
        regs,
        sysregs,
        insns,
    })
}

// ── Code generation ────────────────────────────────────────────

/// Feature names a `!features=` list may use; each maps to a
/// `FeatureBits` constant of the same name in upper case.
pub const FEATURE_NAMES: &[&str] = &["tc131", "tc16", "tc161", "tc162"];

/// Rust path of the feature flag named `name` (`tc16` → `FeatureBits::TC16`).
pub fn feature_const(name: &str) -> String {
    format!("FeatureBits::{}", name.to_ascii_uppercase())
}

pub fn feature_expr(features: &[String]) -> String {
    let mut iter = features.iter();
    let Some(first) = iter.next() else {
        return "FeatureBits::empty()".to_string();
    };
    let mut expr = feature_const(first);
    for f in iter {
        expr.push_str(&format!(".union({})", feature_const(f)));
    }
    expr
}

fn emit_registers(w: &mut dyn Write, regs: &[RegDef]) -> std::io::Result<()> {
    let num = regs.len() + 1;
    writeln!(w, "/// Register numbers; `0` is reserved for `NO_REGISTER`.")?;
    writeln!(w, "#[allow(non_upper_case_globals, dead_code)]")?;
    writeln!(w, "pub mod reg {{")?;
    writeln!(w, "    use super::RegId;")?;
    for (i, r) in regs.iter().enumerate() {
        writeln!(w, "    pub const {}: RegId = {};", r.name, i + 1)?;
    }
    writeln!(w, "}}\n")?;

    writeln!(w, "pub const NUM_REGS: usize = {num};\n")?;
    writeln!(w, "static REGISTER_NAMES: [&str; NUM_REGS] = [")?;
    writeln!(w, "    \"\",")?;
    for r in regs {
        writeln!(w, "    {:?},", r.asm_name)?;
    }
    writeln!(w, "];\n")?;
    writeln!(w, "static REGISTER_DEFS: [&str; NUM_REGS] = [")?;
    writeln!(w, "    \"NoRegister\",")?;
    for r in regs {
        writeln!(w, "    {:?},", r.name)?;
    }
    writeln!(w, "];\n")?;

    write!(w, "pub static PSEUDO_REGS: &[RegId] = &[")?;
    let pseudo: Vec<String> = regs
        .iter()
        .filter(|r| r.pseudo)
        .map(|r| format!("reg::{}", r.name))
        .collect();
    writeln!(w, "{}];\n", pseudo.join(", "))?;

    writeln!(w, "/// Assembly name of `reg`, without any sigil.")?;
    writeln!(w, "///")?;
    writeln!(w, "/// # Panics")?;
    writeln!(w, "///")?;
    writeln!(w, "/// Panics on `NO_REGISTER` or an id outside the table.")?;
    writeln!(w, "pub fn get_register_name(reg: RegId) -> &'static str {{")?;
    writeln!(
        w,
        "    assert!(reg != 0 && (reg as usize) < NUM_REGS, \
         \"invalid register number {{reg}}\");"
    )?;
    writeln!(w, "    REGISTER_NAMES[reg as usize]")?;
    writeln!(w, "}}\n")?;

    writeln!(
        w,
        "/// Find a register by definition name (`D2`) or assembly name (`d2`)."
    )?;
    writeln!(w, "pub fn register_by_name(name: &str) -> Option<RegId> {{")?;
    writeln!(w, "    (1..NUM_REGS)")?;
    writeln!(
        w,
        "        .find(|&i| REGISTER_DEFS[i] == name || REGISTER_NAMES[i] == name)"
    )?;
    writeln!(w, "        .map(|i| i as RegId)")?;
    writeln!(w, "}}\n")
}

fn emit_opcodes(w: &mut dyn Write, insns: &[InsnDef]) -> std::io::Result<()> {
    writeln!(w, "#[allow(non_camel_case_types)]")?;
    writeln!(w, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(w, "#[repr(u16)]")?;
    writeln!(w, "pub enum Opcode {{")?;
    for (i, insn) in insns.iter().enumerate() {
        writeln!(w, "    {} = {i},", insn.name)?;
    }
    writeln!(w, "}}\n")?;

    writeln!(w, "pub const NUM_OPCODES: usize = {};\n", insns.len())?;
    writeln!(w, "static OPCODE_NAMES: [&str; NUM_OPCODES] = [")?;
    for insn in insns {
        writeln!(w, "    {:?},", insn.name)?;
    }
    writeln!(w, "];\n")?;
    writeln!(
        w,
        "static OPCODE_OPERAND_METHODS: [&[PrintMethod]; NUM_OPCODES] = ["
    )?;
    for insn in insns {
        let methods: Vec<String> = insn
            .operands
            .iter()
            .map(|o| format!("PrintMethod::{}", o.method.variant_name()))
            .collect();
        writeln!(w, "    &[{}],", methods.join(", "))?;
    }
    writeln!(w, "];\n")?;

    writeln!(w, "impl Opcode {{")?;
    writeln!(w, "    pub const ALL: [Opcode; NUM_OPCODES] = [")?;
    for insn in insns {
        writeln!(w, "        Opcode::{},", insn.name)?;
    }
    writeln!(w, "    ];\n")?;
    writeln!(w, "    pub fn from_raw(raw: u16) -> Option<Self> {{")?;
    writeln!(w, "        Self::ALL.get(raw as usize).copied()")?;
    writeln!(w, "    }}\n")?;
    writeln!(w, "    pub fn from_name(name: &str) -> Option<Self> {{")?;
    writeln!(
        w,
        "        OPCODE_NAMES.iter().position(|n| *n == name).map(|i| Self::ALL[i])"
    )?;
    writeln!(w, "    }}\n")?;
    writeln!(w, "    #[inline]")?;
    writeln!(w, "    pub fn raw(self) -> u16 {{")?;
    writeln!(w, "        self as u16")?;
    writeln!(w, "    }}\n")?;
    writeln!(w, "    pub fn name(self) -> &'static str {{")?;
    writeln!(w, "        OPCODE_NAMES[self as usize]")?;
    writeln!(w, "    }}\n")?;
    writeln!(w, "    /// Print method of each operand, in MC operand order.")?;
    writeln!(w, "    pub fn operand_methods(self) -> &'static [PrintMethod] {{")?;
    writeln!(w, "        OPCODE_OPERAND_METHODS[self as usize]")?;
    writeln!(w, "    }}\n")?;
    writeln!(w, "    /// Operands the asm string may reference.")?;
    writeln!(w, "    pub fn num_operands(self) -> usize {{")?;
    writeln!(w, "        self.operand_methods().len()")?;
    writeln!(w, "    }}")?;
    writeln!(w, "}}\n")?;

    writeln!(w, "impl From<Opcode> for u16 {{")?;
    writeln!(w, "    fn from(op: Opcode) -> u16 {{")?;
    writeln!(w, "        op as u16")?;
    writeln!(w, "    }}")?;
    writeln!(w, "}}\n")
}

fn emit_sysregs(w: &mut dyn Write, sysregs: &[SysRegDef]) -> std::io::Result<()> {
    let mut sorted: Vec<&SysRegDef> = sysregs.iter().collect();
    sorted.sort_by_key(|s| s.encoding);
    writeln!(w, "/// System registers, sorted by encoding.")?;
    writeln!(w, "pub static SYS_REGS: &[SysReg] = &[")?;
    for s in sorted {
        writeln!(
            w,
            "    SysReg {{ name: {:?}, encoding: {:#06x}, features_required: {} }},",
            s.name,
            s.encoding,
            feature_expr(&s.features)
        )?;
    }
    writeln!(w, "];\n")
}

fn emit_print_call(
    w: &mut dyn Write,
    insn: &InsnDef,
    name: &str,
) -> std::io::Result<()> {
    // Validated during parsing.
    let idx = insn.operand_index(name).unwrap_or_default();
    match insn.operands[idx].method {
        PrintMethod::Operand => {
            writeln!(w, "                self.print_operand(mi, {idx}, sti, o, None)?;")
        }
        PrintMethod::SystemRegister => {
            writeln!(
                w,
                "                self.print_system_register(mi, {idx}, sti, o)?;"
            )
        }
        PrintMethod::PcrelTarget => {
            writeln!(
                w,
                "                self.print_pcrel_target(mi, address, {idx}, sti, o)?;"
            )
        }
    }
}

fn emit_printer(w: &mut dyn Write, insns: &[InsnDef]) -> std::io::Result<()> {
    writeln!(w, "impl InstPrinter {{")?;
    writeln!(w, "    /// Print the mnemonic and operands of `mi`.")?;
    writeln!(w, "    #[allow(unused_variables)]")?;
    writeln!(w, "    pub fn print_instruction(")?;
    writeln!(w, "        &self,")?;
    writeln!(w, "        mi: &McInst,")?;
    writeln!(w, "        address: u64,")?;
    writeln!(w, "        sti: &SubtargetInfo,")?;
    writeln!(w, "        o: &mut dyn fmt::Write,")?;
    writeln!(w, "    ) -> Result<(), PrintError> {{")?;
    writeln!(w, "        let opcode = Opcode::from_raw(mi.opcode())")?;
    writeln!(w, "            .ok_or(PrintError::UnknownOpcode(mi.opcode()))?;")?;
    writeln!(w, "        if mi.num_operands() < opcode.num_operands() {{")?;
    writeln!(w, "            return Err(PrintError::OperandCount {{")?;
    writeln!(w, "                opcode: opcode.name(),")?;
    writeln!(w, "                expected: opcode.num_operands(),")?;
    writeln!(w, "                found: mi.num_operands(),")?;
    writeln!(w, "            }});")?;
    writeln!(w, "        }}")?;
    writeln!(w, "        match opcode {{")?;
    for insn in insns {
        writeln!(w, "            Opcode::{} => {{", insn.name)?;
        for piece in &insn.asm {
            match piece {
                AsmPiece::Literal(s) => {
                    writeln!(w, "                o.write_str({s:?})?;")?;
                }
                AsmPiece::Operand { name, .. } => {
                    emit_print_call(w, insn, name)?;
                }
            }
        }
        writeln!(w, "            }}")?;
    }
    writeln!(w, "        }}")?;
    writeln!(w, "        Ok(())")?;
    writeln!(w, "    }}")?;
    writeln!(w, "}}")
}

// ── Public API ─────────────────────────────────────────────────

pub fn emit(parsed: &Parsed, output: &mut dyn Write) -> Result<(), Error> {
    if parsed.insns.is_empty() {
        return Err(Error::NoInstructions);
    }
    writeln!(output, "// Auto-generated by asmwriter.")?;
    writeln!(output, "// Do not edit.\n")?;
    emit_registers(output, &parsed.regs)?;
    emit_opcodes(output, &parsed.insns)?;
    emit_sysregs(output, &parsed.sysregs)?;
    emit_printer(output, &parsed.insns)?;
    Ok(())
}

pub fn generate(input: &str, output: &mut dyn Write) -> Result<(), Error> {
    let parsed = parse(input)?;
    emit(&parsed, output)
}
