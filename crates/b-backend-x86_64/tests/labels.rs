use std::collections::HashSet;

use b_backend_x86_64::X86_64Codegen;
use b_frontend::Reader;

fn compile(src: &str) -> anyhow::Result<String> {
    let mut codegen = X86_64Codegen::new();
    codegen.generate(&mut Reader::new(src))?;
    Ok(codegen.finish())
}

#[test]
fn statement_ids_stay_monotonic_across_inputs() {
    let mut codegen = X86_64Codegen::new();
    codegen
        .generate(&mut Reader::new("f() if(1) ;"))
        .expect("first unit");
    codegen
        .generate(&mut Reader::new("g() if(1) ;"))
        .expect("second unit");
    let asm = codegen.finish();
    assert!(asm.contains(".L.else.0:"));
    assert!(asm.contains(".L.else.1:"));
    // first input's output precedes the second's
    assert!(asm.find(".globl f").expect("f") < asm.find(".globl g").expect("g"));
}

#[test]
fn every_emitted_label_is_unique() {
    let asm = compile(
        "f() { if(1) ; while(1) ; switch 1 { case 1: ; } } g() { if(0) ; again: goto again; }",
    )
    .expect("compile ok");
    let labels: Vec<&str> = asm
        .lines()
        .filter(|line| line.starts_with(".L.") && line.ends_with(':'))
        .collect();
    let unique: HashSet<&str> = labels.iter().copied().collect();
    assert_eq!(labels.len(), unique.len());
}
