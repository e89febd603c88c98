use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use nupy::Diagnostic;

/// nupy validates and runs programs written in a small Python-like language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program file. When omitted the program is read from stdin up to `$`,
    /// and the lines after it are what `input()` reads.
    file: Option<PathBuf>,

    /// Only check the program's syntax.
    #[arg(long)]
    check: bool,

    /// Print the variable store after a successful run.
    #[arg(long)]
    dump_memory: bool,
}

fn main() -> Result<ExitCode> {
    nupy::init_tracing();
    let args = Args::parse();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let source = match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?
        }
        None => read_program(&mut input).context("Reading program from stdin")?,
    };

    let stdout = io::stdout();
    let mut output = stdout.lock();

    if args.check {
        return match nupy::compile(&source) {
            Ok(_) => {
                writeln!(output, "**syntax ok**")?;
                Ok(ExitCode::SUCCESS)
            }
            Err(diagnostic) => report(&mut output, &diagnostic),
        };
    }

    match nupy::run(&source, &mut input, &mut output) {
        Ok(memory) => {
            if args.dump_memory {
                writeln!(output, "{memory}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(diagnostic) => report(&mut output, &diagnostic),
    }
}

/// Reads program text up to and including the first `$`. The rest of that
/// line is dropped so the next `input()` starts on a fresh line.
fn read_program(input: &mut impl BufRead) -> io::Result<String> {
    let mut source = String::new();
    let mut line = String::new();
    while input.read_line(&mut line)? > 0 {
        if let Some(end) = end_of_stream(&line) {
            source.push_str(&line[..=end]);
            break;
        }
        source.push_str(&line);
        line.clear();
    }
    Ok(source)
}

/// Byte offset of the first `$` on `line` that is outside a string literal
/// and a `#` comment. Neither can span lines, so every line starts clean.
fn end_of_stream(line: &str) -> Option<usize> {
    let mut quote = None;
    for (index, c) in line.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None => match c {
                '#' => return None,
                '"' | '\'' => quote = Some(c),
                '$' => return Some(index),
                _ => {}
            },
        }
    }
    None
}

fn report(output: &mut impl Write, diagnostic: &Diagnostic) -> Result<ExitCode> {
    writeln!(output, "{diagnostic}")?;
    output.flush()?;
    Ok(ExitCode::FAILURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_ends_at_dollar() {
        let mut input = &b"x = input()\nprint(x)\n$ ignored\nhello\n"[..];
        let source = read_program(&mut input).expect("read");
        assert_eq!(source, "x = input()\nprint(x)\n$");

        let mut rest = String::new();
        input.read_line(&mut rest).expect("read rest");
        assert_eq!(rest, "hello\n");
    }

    #[test]
    fn dollar_in_strings_and_comments_is_program_text() {
        let mut input = &b"print(\"cost $5\")\nx = 1 # costs $1\ny = 'a$' $\n$\nnext\n"[..];
        let source = read_program(&mut input).expect("read");
        assert_eq!(source, "print(\"cost $5\")\nx = 1 # costs $1\ny = 'a$' $");

        let mut rest = String::new();
        input.read_line(&mut rest).expect("read rest");
        assert_eq!(rest, "$\n");
    }

    #[test]
    fn unterminated_string_ends_at_line_break() {
        assert_eq!(end_of_stream("s = \"open $"), None);
        assert_eq!(end_of_stream("$"), Some(0));
        assert_eq!(end_of_stream("x = \"#\" $"), Some(8));
    }

    #[test]
    fn program_without_dollar_reads_everything() {
        let mut input = &b"pass\nprint(1)\n"[..];
        let source = read_program(&mut input).expect("read");
        assert_eq!(source, "pass\nprint(1)\n");
    }
}
