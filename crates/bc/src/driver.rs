use std::fs;
use std::process::Command;

use anyhow::{anyhow, bail, Result};
use log::debug;

use b_backend_x86_64::X86_64Codegen;
use b_frontend::Reader;

use crate::Cli;

const ASM_FILE: &str = "a.s";
const OBJ_FILE: &str = "a.o";

pub fn run(cli: &Cli) -> Result<()> {
    if cli.files.is_empty() {
        bail!("no input files\ncompilation terminated.");
    }

    // one codegen across all inputs: output order and label ids follow argv
    let mut codegen = X86_64Codegen::new();
    for path in &cli.files {
        if !path.to_string_lossy().ends_with(".b") {
            continue;
        }
        let source = fs::read_to_string(path)
            .map_err(|err| anyhow!("{}: {}\ncompilation terminated.", path.display(), err))?;
        codegen.generate(&mut Reader::new(&source))?;
    }

    let asm = codegen.finish();
    fs::write(ASM_FILE, &asm).map_err(|err| anyhow!("cannot open file ‘{ASM_FILE}’: {err}."))?;
    debug!("wrote {} bytes of assembly to {ASM_FILE}", asm.len());

    if cli.compile_only {
        return Ok(());
    }

    let mut assemble = Command::new("as");
    assemble.args([ASM_FILE, "-o", OBJ_FILE]);
    let code = subprocess(&mut assemble)?;
    if code != 0 {
        bail!("error running assembler (exit code {code})");
    }
    let _ = fs::remove_file(ASM_FILE);

    if cli.no_link {
        return Ok(());
    }

    let mut link = Command::new("ld");
    link.args(["-static", "-nostdlib", OBJ_FILE])
        .args(["-L.", "-L/lib64", "-L/usr/local/lib64", "-lb"])
        .arg("-o")
        .arg(&cli.output);
    let code = subprocess(&mut link)?;
    if code != 0 {
        bail!("error running linker (exit code {code})");
    }
    let _ = fs::remove_file(OBJ_FILE);

    Ok(())
}

fn subprocess(cmd: &mut Command) -> Result<i32> {
    debug!("running {cmd:?}");
    let program = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd
        .status()
        .map_err(|err| anyhow!("error executing ‘{program}’: {err}"))?;
    Ok(status.code().unwrap_or(-1))
}
