use b_backend_x86_64::X86_64Codegen;
use b_frontend::Reader;

fn compile(src: &str) -> anyhow::Result<String> {
    let mut codegen = X86_64Codegen::new();
    codegen.generate(&mut Reader::new(src))?;
    Ok(codegen.finish())
}

#[test]
fn empty_function_has_prologue_and_epilogue() {
    let asm = compile("main() { return; }").expect("compile ok");
    assert!(asm.contains(".globl main\n"));
    assert!(asm.contains(".text\n.type main, @function\nmain:\n"));
    assert!(asm.contains("  push %rbp\n  mov %rsp, %rbp\n"));
    assert!(asm.contains("  jmp .L.return.main\n"));
    assert!(asm.contains(".L.return.main:\n  mov %rbp, %rsp\n  pop %rbp\n  ret\n"));
}

#[test]
fn return_value_is_loaded_into_rax() {
    let asm = compile("f() return(42);").expect("compile ok");
    assert!(asm.contains("  mov $42, %rax\n  jmp .L.return.f\n"));
}

#[test]
fn returning_zero_uses_the_xor_idiom() {
    let asm = compile("f() { return(0); }").expect("compile ok");
    assert!(asm.contains("  xor %rax, %rax\n"));
    assert!(!asm.contains("mov $"));
}

#[test]
fn bare_return_leaves_rax_alone() {
    let asm = compile("f() { return; }").expect("compile ok");
    assert!(!asm.contains("mov $"));
    assert!(!asm.contains("xor"));
}

#[test]
fn one_return_label_per_function() {
    let asm = compile("f() { return; return; }").expect("compile ok");
    assert_eq!(asm.matches(".L.return.f:").count(), 1);
    assert_eq!(asm.matches("jmp .L.return.f").count(), 2);
}

#[test]
fn body_may_be_a_single_null_statement() {
    let asm = compile("f() ;").expect("compile ok");
    assert!(asm.contains(".L.return.f:"));
}

#[test]
fn blank_before_the_closing_paren_is_accepted() {
    compile("f( ) ;").expect("compile ok");
}

#[test]
fn character_literal_return_value() {
    let asm = compile("f() return('a');").expect("compile ok");
    assert!(asm.contains("  mov $97, %rax\n"));
}
