use std::env;
use std::error;
use std::fs;
use std::io::{self, stdin, BufRead, Write};
use std::process;
use std::result;

use program::perror;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

extern crate monkey;
use monkey::core::{parse, Interpreter, Lexer, Object, Program, Statement};

type Error = Box<dyn error::Error>;
type Result<T> = result::Result<T, Error>;

const PROMPT: &str = ">> ";
const LOG_ENV: &str = "MONKEY_LOG";

/// sysexits(3) `EX_DATAERR`
const EX_DATAERR: i32 = 65;

/// Installs a subscriber only when `MONKEY_LOG` is set, e.g.
/// `MONKEY_LOG=monkey=debug monkey script.monkey`.
fn init_tracing() {
    if env::var_os(LOG_ENV).is_some() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_env(LOG_ENV))
            .init();
    }
}

/// Parses `source`, printing any diagnostics. Returns `None` if there were
/// some.
fn parse_or_report(source: String, out: &mut impl Write) -> Result<Option<Program>> {
    let (program, errors) = parse(Lexer::new(source));
    if errors.is_empty() {
        return Ok(Some(program));
    }

    for error in &errors {
        writeln!(out, "\t{}", error)?;
    }

    Ok(None)
}

fn echo(program: &Program, value: &Object, out: &mut impl Write) -> io::Result<()> {
    let silent = match program.statements.last() {
        None | Some(Statement::Let { .. }) => !value.is_error(),
        Some(_) => false,
    };

    if silent {
        Ok(())
    } else {
        writeln!(out, "{}", value.inspect())
    }
}

fn run_prompt() -> Result<()> {
    let stdin = stdin();
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new();
    loop {
        write!(stdout, "{}", PROMPT)?;
        stdout.flush()?;

        let mut buf = String::with_capacity(1024);
        if stdin.lock().read_line(&mut buf)? == 0 {
            return Ok(());
        }

        if let Some(program) = parse_or_report(buf, &mut stdout)? {
            let value = interpreter.interpret(&program);
            echo(&program, &value, &mut stdout)?;
        }
    }
}

/// Evaluates the whole file as one program. Returns whether it ran to
/// completion without a diagnostic or a top-level error.
fn run_file(path: &str) -> Result<bool> {
    let source = fs::read_to_string(path)?;
    let mut stdout = io::stdout();

    let program = match parse_or_report(source, &mut stdout)? {
        Some(program) => program,
        None => return Ok(false),
    };

    let value = Interpreter::new().interpret(&program);
    if value.is_error() {
        writeln!(stdout, "{}", value.inspect())?;
        return Ok(false);
    }

    Ok(true)
}

fn fail_if_err(r: Result<()>) {
    if let Err(e) = r {
        perror(e)
    }
}

fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    match args.len() {
        1 => fail_if_err(run_prompt()),
        2 => match run_file(&args[1]) {
            Ok(true) => {}
            Ok(false) => process::exit(EX_DATAERR),
            Err(e) => perror(e),
        },
        _ => perror("usage: monkey [script]".to_owned()),
    }
}
