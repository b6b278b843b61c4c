use anyhow::{anyhow, bail, Result};

use b_frontend::lexer::{character, identifier, number, skip_whitespace};
use b_frontend::Reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rdi,
    Rsi,
    Rbp,
    Rsp,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,
}

impl Reg {
    pub fn name(self) -> &'static str {
        match self {
            Reg::Rax => "%rax",
            Reg::Rbx => "%rbx",
            Reg::Rcx => "%rcx",
            Reg::Rdx => "%rdx",
            Reg::Rdi => "%rdi",
            Reg::Rsi => "%rsi",
            Reg::Rbp => "%rbp",
            Reg::Rsp => "%rsp",
            Reg::R8 => "%r8",
            Reg::R9 => "%r9",
            Reg::R10 => "%r10",
            Reg::R11 => "%r11",
            Reg::R12 => "%r12",
            Reg::R13 => "%r13",
            Reg::R14 => "%r14",
            Reg::R15 => "%r15",
        }
    }
}

struct SwitchCtx {
    id: u64,
    cases: Vec<i64>,
}

pub struct X86_64Codegen {
    out: String,
    word_size: u64,
    stmt_id: u64,
}

impl X86_64Codegen {
    pub fn new() -> Self {
        X86_64Codegen {
            out: String::new(),
            word_size: 8,
            stmt_id: 0,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    // Top-level declarations: every identifier becomes a global symbol and
    // the next byte decides between function, vector and scalar.
    pub fn generate(&mut self, src: &mut Reader<'_>) -> Result<()> {
        loop {
            let name = identifier(src);
            if name.is_empty() {
                break;
            }
            self.out.push_str(&format!(".globl {name}\n"));
            skip_whitespace(src);
            match src.next() {
                Some(b'(') => self.function(src, &name)?,
                Some(b'[') => self.vector(src, &name)?,
                None => bail!("unexpected end of file after declaration"),
                Some(_) => {
                    src.unget();
                    self.global(src, &name)?;
                }
            }
        }
        if src.next().is_some() {
            bail!("expect identifier at top level");
        }
        Ok(())
    }

    fn global(&mut self, src: &mut Reader<'_>, name: &str) -> Result<()> {
        self.out.push_str(&format!(
            ".data\n.type {name}, @object\n.align {}\n{name}:\n",
            self.word_size
        ));
        match src.next() {
            Some(b';') => {
                self.out.push_str(&format!("  .zero {}\n", self.word_size));
                Ok(())
            }
            other => {
                if other.is_some() {
                    src.unget();
                }
                self.ival_list(src)
            }
        }
    }

    fn vector(&mut self, src: &mut Reader<'_>, name: &str) -> Result<()> {
        let mut size: i64 = 0;
        skip_whitespace(src);
        match src.next() {
            Some(b']') => {}
            other => {
                if other.is_some() {
                    src.unget();
                }
                size = number(src).ok_or_else(|| {
                    anyhow!("unexpected end of file, expect vector size after ‘[’")
                })?;
                skip_whitespace(src);
                if src.next() != Some(b']') {
                    bail!("expect ‘]’ after vector size");
                }
            }
        }
        self.out.push_str(&format!(
            ".data\n.type {name}, @object\n.align {}\n{name}:\n",
            self.word_size
        ));
        skip_whitespace(src);
        match src.next() {
            Some(b';') => {
                // the declared size only matters when no initializers follow
                let reserve = (self.word_size as i64).wrapping_mul(size);
                if reserve != 0 {
                    self.out.push_str(&format!("  .zero {reserve}\n"));
                }
                Ok(())
            }
            other => {
                if other.is_some() {
                    src.unget();
                }
                self.ival_list(src)
            }
        }
    }

    fn ival_list(&mut self, src: &mut Reader<'_>) -> Result<()> {
        loop {
            skip_whitespace(src);
            self.ival(src)?;
            skip_whitespace(src);
            match src.next() {
                Some(b',') => {}
                Some(b';') => return Ok(()),
                _ => bail!("expect ‘;’ at end of declaration"),
            }
        }
    }

    fn ival(&mut self, src: &mut Reader<'_>) -> Result<()> {
        match src.next() {
            Some(c) if c.is_ascii_alphabetic() => {
                src.unget();
                let name = identifier(src);
                self.out.push_str(&format!("  .long {name}\n"));
            }
            Some(b'\'') => {
                let value = character(src, self.word_size)?;
                self.out.push_str(&format!("  .long {}\n", value as u64));
            }
            Some(_) => {
                src.unget();
                let value =
                    number(src).ok_or_else(|| anyhow!("unexpected end of file, expect ival"))?;
                self.out.push_str(&format!("  .long {}\n", value as u64));
            }
            None => bail!("unexpected end of file, expect ival"),
        }
        Ok(())
    }

    fn function(&mut self, src: &mut Reader<'_>, name: &str) -> Result<()> {
        self.out
            .push_str(&format!(".text\n.type {name}, @function\n{name}:\n"));
        skip_whitespace(src);
        expect(src, b')', "expect ‘)’ after function declaration")?;
        self.out.push_str("  push %rbp\n  mov %rsp, %rbp\n");
        self.statement(src, name, None)?;
        self.out.push_str(&format!(
            ".L.return.{name}:\n  mov %rbp, %rsp\n  pop %rbp\n  ret\n"
        ));
        Ok(())
    }

    // The expression grammar is a single integer or character literal.
    fn expression(&mut self, src: &mut Reader<'_>, reg: Reg) -> Result<()> {
        skip_whitespace(src);
        let value = match src.next() {
            Some(b'\'') => character(src, self.word_size)?,
            Some(c) if c.is_ascii_digit() => {
                src.unget();
                number(src).ok_or_else(|| anyhow!("unexpected end of file, expect expression"))?
            }
            Some(c) => bail!("unexpected character ‘{}’, expect expression", c as char),
            None => bail!("unexpected end of file, expect expression"),
        };
        if value != 0 {
            self.out
                .push_str(&format!("  mov ${}, {}\n", value as u64, reg.name()));
        } else {
            self.out
                .push_str(&format!("  xor {}, {}\n", reg.name(), reg.name()));
        }
        Ok(())
    }

    fn statement(
        &mut self,
        src: &mut Reader<'_>,
        func: &str,
        mut switch: Option<&mut SwitchCtx>,
    ) -> Result<()> {
        skip_whitespace(src);
        match src.next() {
            Some(b'{') => {
                skip_whitespace(src);
                loop {
                    match src.next() {
                        Some(b'}') => return Ok(()),
                        Some(_) => {
                            src.unget();
                            self.statement(src, func, switch.as_deref_mut())?;
                            skip_whitespace(src);
                        }
                        None => bail!("unexpected end of file, expect statement"),
                    }
                }
            }
            Some(b';') => Ok(()),
            Some(c) if c.is_ascii_alphabetic() => {
                src.unget();
                let word = identifier(src);
                skip_whitespace(src);
                match word.as_str() {
                    "goto" => self.goto_statement(src),
                    "return" => self.return_statement(src, func),
                    "if" => self.if_statement(src, func),
                    "while" => self.while_statement(src, func),
                    "switch" => self.switch_statement(src, func),
                    "case" => self.case_statement(src, func, switch),
                    _ => match src.next() {
                        Some(b':') => {
                            self.out.push_str(&format!(".L.label.{word}:\n"));
                            self.statement(src, func, switch)
                        }
                        Some(c) => bail!("unexpected character ‘{}’, expect expression", c as char),
                        None => bail!("unexpected end of file, expect statement"),
                    },
                }
            }
            Some(c) => bail!("unexpected character ‘{}’, expect statement", c as char),
            None => bail!("unexpected end of file, expect statement"),
        }
    }

    fn goto_statement(&mut self, src: &mut Reader<'_>) -> Result<()> {
        let label = identifier(src);
        if label.is_empty() {
            bail!("expect label name after ‘goto’");
        }
        self.out.push_str(&format!("  jmp .L.label.{label}\n"));
        skip_whitespace(src);
        expect(src, b';', "expect ‘;’ after ‘goto’ statement")
    }

    fn return_statement(&mut self, src: &mut Reader<'_>, func: &str) -> Result<()> {
        match src.next() {
            Some(b';') => {}
            Some(b'(') => {
                self.expression(src, Reg::Rax)?;
                skip_whitespace(src);
                expect(src, b')', "expect ‘)’ after ‘return’ statement")?;
                skip_whitespace(src);
                expect(src, b';', "expect ‘;’ after ‘return’ statement")?;
            }
            _ => bail!("expect ‘(’ or ‘;’ after ‘return’"),
        }
        self.out.push_str(&format!("  jmp .L.return.{func}\n"));
        Ok(())
    }

    fn if_statement(&mut self, src: &mut Reader<'_>, func: &str) -> Result<()> {
        let id = self.next_id();
        expect(src, b'(', "expect ‘(’ after ‘if’")?;
        self.expression(src, Reg::Rax)?;
        self.out
            .push_str(&format!("  cmp $0, %rax\n  je .L.else.{id}\n"));
        skip_whitespace(src);
        expect(src, b')', "expect ‘)’ after condition")?;
        self.statement(src, func, None)?;
        self.out
            .push_str(&format!("  jmp .L.end.{id}\n.L.else.{id}:\n"));
        skip_whitespace(src);
        if match_else(src) {
            self.statement(src, func, None)?;
        }
        self.out.push_str(&format!(".L.end.{id}:\n"));
        Ok(())
    }

    fn while_statement(&mut self, src: &mut Reader<'_>, func: &str) -> Result<()> {
        let id = self.next_id();
        expect(src, b'(', "expect ‘(’ after ‘while’")?;
        self.out.push_str(&format!(".L.start.{id}:\n"));
        self.expression(src, Reg::Rax)?;
        self.out
            .push_str(&format!("  cmp $0, %rax\n  je .L.end.{id}\n"));
        skip_whitespace(src);
        expect(src, b')', "expect ‘)’ after condition")?;
        self.statement(src, func, None)?;
        self.out
            .push_str(&format!("  jmp .L.start.{id}\n.L.end.{id}:\n"));
        Ok(())
    }

    // The scrutinee is not parenthesized. The body is emitted first, then the
    // compare-and-jump dispatch table built from the cases it collected.
    fn switch_statement(&mut self, src: &mut Reader<'_>, func: &str) -> Result<()> {
        let id = self.next_id();
        self.expression(src, Reg::Rax)?;
        self.out
            .push_str(&format!("  jmp .L.cmp.{id}\n.L.stmts.{id}:\n"));
        let mut ctx = SwitchCtx {
            id,
            cases: Vec::new(),
        };
        self.statement(src, func, Some(&mut ctx))?;
        self.out
            .push_str(&format!("  jmp .L.end.{id}\n.L.cmp.{id}:\n"));
        for value in &ctx.cases {
            self.out
                .push_str(&format!("  cmp ${value}, %rax\n  je .L.case.{id}.{value}\n"));
        }
        self.out.push_str(&format!(".L.end.{id}:\n"));
        Ok(())
    }

    fn case_statement(
        &mut self,
        src: &mut Reader<'_>,
        func: &str,
        switch: Option<&mut SwitchCtx>,
    ) -> Result<()> {
        // a case burns a statement id even though its label reuses the switch id
        self.next_id();
        let Some(ctx) = switch else {
            bail!("unexpected ‘case’ outside of ‘switch’ statements");
        };
        let value = match src.next() {
            Some(b'\'') => character(src, self.word_size)?,
            Some(c) if c.is_ascii_digit() => {
                src.unget();
                number(src).ok_or_else(|| {
                    anyhow!("unexpected end of file, expect constant after ‘case’")
                })?
            }
            Some(c) => bail!(
                "unexpected character ‘{}’, expect constant after ‘case’",
                c as char
            ),
            None => bail!("unexpected end of file, expect constant after ‘case’"),
        };
        skip_whitespace(src);
        expect(src, b':', "expect ‘:’ after ‘case’")?;
        ctx.cases.push(value);
        self.out
            .push_str(&format!(".L.case.{}.{value}:\n", ctx.id));
        self.statement(src, func, Some(ctx))
    }

    fn next_id(&mut self) -> u64 {
        let id = self.stmt_id;
        self.stmt_id += 1;
        id
    }
}

fn expect(src: &mut Reader<'_>, want: u8, msg: &str) -> Result<()> {
    if src.next() == Some(want) {
        Ok(())
    } else {
        bail!("{msg}")
    }
}

// Probes for `else` plus one byte that must not continue an identifier. On a
// match all probed bytes stay consumed (end of file counts as the trailing
// byte); on a mismatch every byte actually read is pushed back in reverse so
// the next parser sees the input untouched.
fn match_else(src: &mut Reader<'_>) -> bool {
    let mut taken = 0;
    for &want in b"else" {
        match src.next() {
            Some(c) => {
                taken += 1;
                if c != want {
                    back_out(src, taken);
                    return false;
                }
            }
            None => {
                back_out(src, taken);
                return false;
            }
        }
    }
    match src.next() {
        Some(c) if c.is_ascii_alphanumeric() => {
            back_out(src, taken + 1);
            false
        }
        _ => true,
    }
}

fn back_out(src: &mut Reader<'_>, count: usize) {
    for _ in 0..count {
        src.unget();
    }
}
