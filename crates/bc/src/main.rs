use std::path::PathBuf;
use std::process;

use clap::Parser;

mod driver;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nCopyright (C) 2026 the bc authors.",
    "\nThis is free software; see the source for copying conditions.",
    "\nThere is NO warranty.",
);

#[derive(Parser, Debug)]
#[command(name = "bc")]
#[command(about = "Compiler for the B programming language", long_about = None)]
#[command(version = LONG_VERSION)]
pub struct Cli {
    /// Input source files; names not ending in `.b` are skipped.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Place the output into <FILE>.
    #[arg(short, value_name = "FILE", default_value = "a.out")]
    pub output: PathBuf,

    /// Compile only; do not assemble or link.
    #[arg(short = 'S')]
    pub compile_only: bool,

    /// Compile and assemble, but do not link.
    #[arg(short = 'c')]
    pub no_link: bool,
}

fn main() {
    env_logger::init();

    let program = std::env::args().next().unwrap_or_else(|| "bc".into());
    let cli = Cli::try_parse().unwrap_or_else(|err| {
        // clap renders --help/--version on stdout and argument errors on stderr
        let _ = err.print();
        process::exit(if err.use_stderr() { 1 } else { 0 });
    });

    if let Err(err) = driver::run(&cli) {
        eprintln!("\x1b[1m{program}: \x1b[1;31merror: \x1b[0m{err}");
        process::exit(1);
    }
}
