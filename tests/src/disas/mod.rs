use proptest::prelude::*;
use tricore_disas::*;
use tricore_mc::*;

fn cpu(name: &str) -> SubtargetInfo {
    SubtargetInfo::new(name, "").unwrap()
}

fn print(mi: &McInst, sti: &SubtargetInfo) -> String {
    InstPrinter::default().inst_to_string(mi, 0, "", sti).unwrap()
}

fn mfcr(enc: i64) -> McInst {
    McInst::new(Opcode::MFCRrlc).with_reg(reg::D0).with_imm(enc)
}

// ── Generated tables ─────────────────────────────────────────

#[test]
fn register_names() {
    assert_eq!(get_register_name(reg::D0), "d0");
    assert_eq!(get_register_name(reg::D15), "d15");
    assert_eq!(get_register_name(reg::A10), "a10");
    assert_eq!(get_register_name(reg::E4), "e4");
    assert_eq!(get_register_name(reg::P14), "p14");
    assert_eq!(InstPrinter::get_register_name(reg::A0), "a0");
}

#[test]
fn register_ids_start_after_no_register() {
    assert_eq!(reg::D0, 1);
    assert_ne!(reg::D0, NO_REGISTER);
    assert_eq!(NUM_REGS, reg::PSW_C as usize + 1);
}

#[test]
#[should_panic(expected = "invalid register number 0")]
fn no_register_has_no_name() {
    get_register_name(NO_REGISTER);
}

#[test]
fn register_lookup_by_name() {
    assert_eq!(register_by_name("D2"), Some(reg::D2));
    assert_eq!(register_by_name("d2"), Some(reg::D2));
    assert_eq!(register_by_name("a15"), Some(reg::A15));
    assert_eq!(register_by_name("psw.c"), Some(reg::PSW_C));
    assert_eq!(register_by_name("x9"), None);
    assert_eq!(register_by_name(""), None);
}

#[test]
fn pseudo_registers() {
    assert_eq!(PSEUDO_REGS, &[reg::PSW_C]);
}

#[test]
fn opcode_roundtrip() {
    assert_eq!(Opcode::ALL.len(), NUM_OPCODES);
    for (i, op) in Opcode::ALL.iter().enumerate() {
        assert_eq!(op.raw() as usize, i);
        assert_eq!(Opcode::from_raw(op.raw()), Some(*op));
        assert_eq!(Opcode::from_name(op.name()), Some(*op));
    }
    assert_eq!(Opcode::from_raw(NUM_OPCODES as u16), None);
    assert_eq!(Opcode::from_name("FROB"), None);
}

#[test]
fn opcode_operand_counts() {
    assert_eq!(Opcode::ADDrr.num_operands(), 3);
    assert_eq!(Opcode::MFCRrlc.num_operands(), 2);
    assert_eq!(Opcode::JEQbrr.num_operands(), 3);
    assert_eq!(Opcode::RET.num_operands(), 0);
    assert_eq!(Opcode::MFCRrlc.name(), "MFCRrlc");
}

#[test]
fn opcode_operand_methods() {
    assert_eq!(
        Opcode::MFCRrlc.operand_methods(),
        [PrintMethod::Operand, PrintMethod::SystemRegister]
    );
    assert_eq!(
        Opcode::MTCRrlc.operand_methods(),
        [PrintMethod::SystemRegister, PrintMethod::Operand]
    );
    assert_eq!(
        Opcode::JEQbrr.operand_methods(),
        [PrintMethod::Operand, PrintMethod::Operand, PrintMethod::PcrelTarget]
    );
    assert_eq!(Opcode::JAb.operand_methods(), [PrintMethod::Operand]);
    assert!(Opcode::RET.operand_methods().is_empty());
    for op in Opcode::ALL {
        assert_eq!(op.operand_methods().len(), op.num_operands());
    }
}

#[test]
fn sys_regs_sorted_and_unique() {
    assert!(!SYS_REGS.is_empty());
    assert!(SYS_REGS.windows(2).all(|w| w[0].encoding < w[1].encoding));
}

#[test]
fn sys_reg_lookup() {
    let psw = lookup_sys_reg_by_encoding(0xfe04).unwrap();
    assert_eq!(psw.name, "PSW");
    assert!(psw.features_required.is_empty());

    let core_id = lookup_sys_reg_by_encoding(0xfe1c).unwrap();
    assert_eq!(core_id.name, "CORE_ID");
    assert_eq!(core_id.features_required, FeatureBits::TC16);
    assert!(!core_id.have_features(FeatureBits::TC131));
    assert!(core_id.have_features(FeatureBits::TC16 | FeatureBits::TC131));

    assert!(lookup_sys_reg_by_encoding(0xffff).is_none());
    assert_eq!(lookup_sys_reg_by_name("psw").map(|r| r.encoding), Some(0xfe04));
    assert_eq!(lookup_sys_reg_by_name("Core_Id").map(|r| r.encoding), Some(0xfe1c));
    assert!(lookup_sys_reg_by_name("nope").is_none());
}

// ── Instruction printing ─────────────────────────────────────

#[test]
fn print_register_operands() {
    let mi = McInst::new(Opcode::ADDrr)
        .with_reg(reg::D0)
        .with_reg(reg::D1)
        .with_reg(reg::D2);
    assert_eq!(print(&mi, &cpu("tc1.6.2")), "add %d0, %d1, %d2");
}

#[test]
fn print_negative_immediate() {
    let mi = McInst::new(Opcode::ADDrc)
        .with_reg(reg::D3)
        .with_reg(reg::D3)
        .with_imm(-5);
    assert_eq!(print(&mi, &cpu("generic")), "add %d3, %d3, -5");
}

#[test]
fn print_base_offset_load() {
    let mi = McInst::new(Opcode::LD_Wbo)
        .with_reg(reg::D4)
        .with_reg(reg::A2)
        .with_imm(8);
    assert_eq!(print(&mi, &cpu("generic")), "ld.w %d4, [%a2]8");
}

#[test]
fn print_store_reorders_operands() {
    // MC order is base, offset, value; the asm string prints value last.
    let mi = McInst::new(Opcode::ST_Wbo)
        .with_reg(reg::A3)
        .with_imm(-4)
        .with_reg(reg::D5);
    assert_eq!(print(&mi, &cpu("generic")), "st.w [%a3]-4, %d5");
}

#[test]
fn print_no_operands() {
    let sti = cpu("generic");
    assert_eq!(print(&McInst::new(Opcode::RET), &sti), "ret");
    assert_eq!(print(&McInst::new(Opcode::NOP), &sti), "nop");
    assert_eq!(print(&McInst::new(Opcode::ISYNC), &sti), "isync");
}

#[test]
fn print_extended_register_pair() {
    let mi = McInst::new(Opcode::LD_Dbo)
        .with_reg(reg::E2)
        .with_reg(reg::A10)
        .with_imm(0);
    assert_eq!(print(&mi, &cpu("generic")), "ld.d %e2, [%a10]0");
}

#[test]
fn print_symbol_operands() {
    let sti = cpu("tc1.6.2");
    let movh = McInst::new(Opcode::MOVH_Arlc)
        .with_reg(reg::A4)
        .with_expr(McExpr::symbol_with_variant("buf", VariantKind::Hi));
    assert_eq!(print(&movh, &sti), "movh.a %a4, hi:buf");

    let lea = McInst::new(Opcode::LEAbol)
        .with_reg(reg::A4)
        .with_reg(reg::A4)
        .with_expr(McExpr::symbol_with_variant("buf", VariantKind::Lo));
    assert_eq!(print(&lea, &sti), "lea %a4, [%a4]lo:buf");

    let call = McInst::new(Opcode::CALLb).with_expr(McExpr::symbol("printf"));
    assert_eq!(print(&call, &sti), "call printf");
}

#[test]
fn print_expression_uses_asm_info() {
    let mai = AsmInfo {
        variant_syntax: VariantSyntax::At,
        ..AsmInfo::default()
    };
    let printer = InstPrinter::new(mai);
    let mi = McInst::new(Opcode::MOVHrlc)
        .with_reg(reg::D1)
        .with_expr(McExpr::symbol_with_variant("x", VariantKind::Hi));
    let s = printer
        .inst_to_string(&mi, 0, "", &SubtargetInfo::default())
        .unwrap();
    assert_eq!(s, "movh %d1, x@hi");
}

// ── Annotations ──────────────────────────────────────────────

#[test]
fn annotation_appended_verbatim() {
    let printer = InstPrinter::default();
    let sti = SubtargetInfo::default();
    let mi = McInst::new(Opcode::ADDrr)
        .with_reg(reg::D0)
        .with_reg(reg::D1)
        .with_reg(reg::D2);
    let s = printer.inst_to_string(&mi, 0, "; comment", &sti).unwrap();
    assert_eq!(s, "add %d0, %d1, %d2; comment");
}

#[test]
fn empty_annotation_adds_nothing() {
    let printer = InstPrinter::default();
    let mut s = String::new();
    printer
        .print_inst(&McInst::new(Opcode::NOP), 0, "", &SubtargetInfo::default(), &mut s)
        .unwrap();
    assert_eq!(s, "nop");
}

// ── System registers ─────────────────────────────────────────

#[test]
fn sysreg_without_feature_requirement() {
    for name in ["generic", "tc1.3", "tc1.6", "tc1.6.2"] {
        assert_eq!(print(&mfcr(0xfe04), &cpu(name)), "mfcr %d0, $PSW");
    }
}

#[test]
fn sysreg_as_first_operand() {
    let mi = McInst::new(Opcode::MTCRrlc).with_imm(0xfe00).with_reg(reg::D3);
    assert_eq!(print(&mi, &cpu("generic")), "mtcr $PCXI, %d3");
}

#[test]
fn sysreg_gated_on_feature() {
    assert_eq!(print(&mfcr(0xfe1c), &cpu("tc1.3")), "mfcr %d0, 65052");
    assert_eq!(print(&mfcr(0xfe1c), &cpu("tc1.3.1")), "mfcr %d0, 65052");
    assert_eq!(print(&mfcr(0xfe1c), &cpu("tc1.6")), "mfcr %d0, $CORE_ID");
    assert_eq!(print(&mfcr(0xfe1c), &cpu("tc1.6.2")), "mfcr %d0, $CORE_ID");
}

#[test]
fn sysreg_gated_on_newest_revision() {
    assert_eq!(print(&mfcr(0xe40c), &cpu("tc1.6.1")), "mfcr %d0, 58380");
    assert_eq!(print(&mfcr(0xe40c), &cpu("tc1.6.2")), "mfcr %d0, $TPS_TIMER2");
    assert_eq!(print(&mfcr(0xe404), &cpu("tc1.6.1")), "mfcr %d0, $TPS_TIMER0");
}

#[test]
fn sysreg_feature_disabled_by_attribute() {
    let sti = SubtargetInfo::new("tc1.6.2", "-tc16").unwrap();
    assert_eq!(print(&mfcr(0xfe1c), &sti), "mfcr %d0, 65052");
    assert_eq!(print(&mfcr(0x9400), &sti), "mfcr %d0, $COMPAT");
}

#[test]
fn sysreg_unknown_encoding() {
    assert_eq!(print(&mfcr(0xffff), &cpu("tc1.6.2")), "mfcr %d0, 65535");
}

#[test]
fn sysreg_out_of_range_immediate() {
    let sti = cpu("tc1.6.2");
    assert_eq!(print(&mfcr(-1), &sti), "mfcr %d0, -1");
    assert_eq!(print(&mfcr(0x1fe04), &sti), "mfcr %d0, 130564");
}

static ALT_SYS_REGS: [SysReg; 2] = [
    SysReg {
        name: "XCR",
        encoding: 0x0010,
        features_required: FeatureBits::TC16.union(FeatureBits::TC161),
    },
    SysReg {
        name: "PSW",
        encoding: 0x9180,
        features_required: FeatureBits::empty(),
    },
];

#[test]
fn alternate_sysreg_table() {
    let printer = InstPrinter::default().with_sys_regs(&ALT_SYS_REGS);
    let generic = cpu("generic");
    let s = printer.inst_to_string(&mfcr(0x9180), 0, "", &generic).unwrap();
    assert_eq!(s, "mfcr %d0, $PSW");

    // Not in the generated table.
    assert_eq!(print(&mfcr(0x9180), &generic), "mfcr %d0, 37248");

    // Needs both features.
    let s = printer.inst_to_string(&mfcr(0x10), 0, "", &cpu("tc1.6")).unwrap();
    assert_eq!(s, "mfcr %d0, 16");
    let s = printer.inst_to_string(&mfcr(0x10), 0, "", &cpu("tc1.6.1")).unwrap();
    assert_eq!(s, "mfcr %d0, $XCR");
}

#[test]
#[should_panic(expected = "is not an immediate")]
fn sysreg_operand_must_be_immediate() {
    let mi = McInst::new(Opcode::MFCRrlc).with_reg(reg::D0).with_reg(reg::D1);
    print(&mi, &cpu("generic"));
}

// ── Branch targets ───────────────────────────────────────────

#[test]
fn pcrel_displacement_default() {
    let mi = McInst::new(Opcode::Jb).with_imm(16);
    let s = InstPrinter::default()
        .inst_to_string(&mi, 0x8000_0000, "", &SubtargetInfo::default())
        .unwrap();
    assert_eq!(s, "j 16");
}

#[test]
fn pcrel_absolute_targets() {
    let printer = InstPrinter::default().with_branch_targets(true);
    let sti = SubtargetInfo::default();

    let j = McInst::new(Opcode::Jb).with_imm(16);
    let s = printer.inst_to_string(&j, 0x8000_0000, "", &sti).unwrap();
    assert_eq!(s, "j 0x80000010");

    let back = McInst::new(Opcode::Jb).with_imm(-8);
    let s = printer.inst_to_string(&back, 0x1000, "", &sti).unwrap();
    assert_eq!(s, "j 0xff8");

    let jeq = McInst::new(Opcode::JEQbrr)
        .with_reg(reg::D1)
        .with_reg(reg::D2)
        .with_imm(-4);
    let s = printer.inst_to_string(&jeq, 0x100, "", &sti).unwrap();
    assert_eq!(s, "jeq %d1, %d2, 0xfc");

    // Absolute jumps are not pc-relative.
    let ja = McInst::new(Opcode::JAb).with_imm(4096);
    let s = printer.inst_to_string(&ja, 0x100, "", &sti).unwrap();
    assert_eq!(s, "ja 4096");

    let sym = McInst::new(Opcode::Jb).with_expr(McExpr::symbol(".Lloop"));
    let s = printer.inst_to_string(&sym, 0x100, "", &sti).unwrap();
    assert_eq!(s, "j .Lloop");
}

// ── Operand printers ─────────────────────────────────────────

#[test]
fn print_operand_kinds() {
    let printer = InstPrinter::default();
    let sti = SubtargetInfo::default();
    let mi = McInst::new(Opcode::ADDrc)
        .with_reg(reg::D7)
        .with_imm(42)
        .with_expr(McExpr::add(McExpr::symbol("tbl"), McExpr::constant(8)));
    let mut out = Vec::new();
    for i in 0..3 {
        let mut s = String::new();
        printer.print_operand(&mi, i, &sti, &mut s, None).unwrap();
        out.push(s);
    }
    assert_eq!(out, ["%d7", "42", "tbl+8"]);
}

#[test]
fn print_operand_accepts_empty_modifier() {
    let printer = InstPrinter::default();
    let mi = McInst::new(Opcode::SYSCALLrc).with_imm(3);
    let mut s = String::new();
    printer
        .print_operand(&mi, 0, &SubtargetInfo::default(), &mut s, Some(""))
        .unwrap();
    assert_eq!(s, "3");
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "no modifiers supported")]
fn print_operand_rejects_modifier() {
    let printer = InstPrinter::default();
    let mi = McInst::new(Opcode::SYSCALLrc).with_imm(3);
    let mut s = String::new();
    let _ = printer.print_operand(&mi, 0, &SubtargetInfo::default(), &mut s, Some("x"));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "pseudo-register should never be emitted")]
fn pseudo_register_is_fatal() {
    let mut s = String::new();
    let _ = InstPrinter::default().print_reg_name(&mut s, reg::PSW_C);
}

#[test]
fn print_reg_name_sigil() {
    let mut s = String::new();
    InstPrinter::default().print_reg_name(&mut s, reg::A11).unwrap();
    assert_eq!(s, "%a11");
}

#[test]
#[should_panic(expected = "out of range")]
fn print_operand_index_out_of_range() {
    let mi = McInst::new(Opcode::NOP);
    let mut s = String::new();
    let _ = InstPrinter::default().print_operand(&mi, 0, &SubtargetInfo::default(), &mut s, None);
}

// ── Errors ───────────────────────────────────────────────────

#[test]
fn unknown_opcode() {
    let mi = McInst::new(0xffffu16);
    let err = InstPrinter::default()
        .inst_to_string(&mi, 0, "", &SubtargetInfo::default())
        .unwrap_err();
    assert!(matches!(err, PrintError::UnknownOpcode(0xffff)));
    assert_eq!(err.to_string(), "unknown opcode 65535");
}

#[test]
fn missing_operands() {
    let mi = McInst::new(Opcode::ADDrr).with_reg(reg::D0);
    let err = InstPrinter::default()
        .inst_to_string(&mi, 0, "", &SubtargetInfo::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PrintError::OperandCount {
            opcode: "ADDrr",
            expected: 3,
            found: 1
        }
    ));
}

#[test]
fn printer_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<InstPrinter>();
}

// ── Properties ───────────────────────────────────────────────

proptest! {
    #[test]
    fn immediate_prints_decimal(v in any::<i64>()) {
        let mi = McInst::new(Opcode::ADDrc)
            .with_reg(reg::D0)
            .with_reg(reg::D1)
            .with_imm(v);
        prop_assert_eq!(print(&mi, &SubtargetInfo::default()), format!("add %d0, %d1, {v}"));
    }

    #[test]
    fn register_prints_with_sigil(r in 1..NUM_REGS as u16) {
        prop_assume!(!PSEUDO_REGS.contains(&r));
        let mut s = String::new();
        InstPrinter::default().print_reg_name(&mut s, r).unwrap();
        prop_assert_eq!(s, format!("%{}", get_register_name(r)));
    }

    #[test]
    fn sysreg_name_or_number(enc in any::<u16>(), cpu_idx in 0..CPUS.len()) {
        let sti = SubtargetInfo::new(CPUS[cpu_idx].name, "").unwrap();
        let mut s = String::new();
        InstPrinter::default()
            .print_system_register(&mfcr(i64::from(enc)), 1, &sti, &mut s)
            .unwrap();
        match lookup_sys_reg_by_encoding(enc) {
            Some(r) if sti.feature_bits().contains(r.features_required) => {
                prop_assert_eq!(s, format!("${}", r.name));
            }
            _ => {
                prop_assert_eq!(s, enc.to_string());
            }
        }
    }
}
