use std::env;
use std::fs;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let insn_file = Path::new("tables/tricore.insn");

    println!("cargo::rerun-if-changed={}", insn_file.display());

    let input =
        fs::read_to_string(insn_file).expect("failed to read tricore.insn");

    let mut output = Vec::new();
    if let Err(e) = asmwriter::generate(&input, &mut output) {
        panic!("asmwriter code generation failed: {e}");
    }

    let out_path = Path::new(&out_dir).join("tricore_gen.rs");
    fs::write(&out_path, output).expect("failed to write generated printer");
}
