use b_backend_x86_64::X86_64Codegen;
use b_frontend::Reader;

fn compile_err(src: &str) -> String {
    let mut codegen = X86_64Codegen::new();
    let err = codegen
        .generate(&mut Reader::new(src))
        .expect_err("should fail");
    format!("{err}")
}

#[test]
fn case_outside_switch_is_rejected() {
    let msg = compile_err("f() { case 1: ; }");
    assert!(msg.contains("unexpected ‘case’ outside of ‘switch’ statements"));
}

#[test]
fn case_inside_an_if_body_is_rejected() {
    let msg = compile_err("f() switch 1 { case 1: if(1) { case 2: ; } }");
    assert!(msg.contains("unexpected ‘case’ outside of ‘switch’ statements"));
}

#[test]
fn declaration_requires_a_terminating_semicolon() {
    let msg = compile_err("x 42");
    assert!(msg.contains("expect ‘;’ at end of declaration"));
}

#[test]
fn garbage_at_top_level_is_rejected() {
    let msg = compile_err("x 1; 2");
    assert!(msg.contains("expect identifier at top level"));
}

#[test]
fn end_of_file_after_a_declaration_name() {
    let msg = compile_err("x");
    assert!(msg.contains("unexpected end of file after declaration"));
}

#[test]
fn statement_must_not_start_with_a_digit() {
    let msg = compile_err("f() { 1; }");
    assert!(msg.contains("unexpected character ‘1’, expect statement"));
}

#[test]
fn return_requires_paren_or_semicolon() {
    let msg = compile_err("f() return 1;");
    assert!(msg.contains("expect ‘(’ or ‘;’ after ‘return’"));
}

#[test]
fn vector_size_requires_a_closing_bracket() {
    let msg = compile_err("v[3 ;");
    assert!(msg.contains("expect ‘]’ after vector size"));
}

#[test]
fn expressions_accept_only_literals() {
    let msg = compile_err("f() if(x) ;");
    assert!(msg.contains("unexpected character ‘x’, expect expression"));
}

#[test]
fn goto_requires_a_label_name() {
    let msg = compile_err("f() goto ;");
    assert!(msg.contains("expect label name after ‘goto’"));
}

#[test]
fn unterminated_function_body() {
    let msg = compile_err("f() { return;");
    assert!(msg.contains("unexpected end of file, expect statement"));
}

#[test]
fn non_keyword_identifier_must_introduce_a_label() {
    let msg = compile_err("f() { x = 1; }");
    assert!(msg.contains("unexpected character ‘=’, expect expression"));
}
