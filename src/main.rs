use std::{
    fs,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::Parser;
use rubyish::{
    error::{Error, ParseError},
    interpreter::{machine::Machine, value::core::Value},
};
use tracing_subscriber::EnvFilter;

/// rubyish runs programs written in a small Ruby-like language. Without a
/// script it starts an interactive session.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the contents argument as a path to a script file.
    #[arg(short, long)]
    file: bool,

    /// Print the value of the last command after the script finishes.
    #[arg(short, long)]
    print_result: bool,

    /// The script to run, or a file path with `--file`.
    contents: Option<String>,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    let Some(contents) = args.contents else {
        return repl();
    };

    let script = if args.file {
        match fs::read_to_string(&contents) {
            Ok(script) => script,
            Err(err) => {
                eprintln!("Failed to read the input file '{contents}': {err}");
                return ExitCode::FAILURE;
            },
        }
    } else {
        contents
    };

    let machine = Machine::new();
    match machine.execute(&script) {
        Ok(value) => {
            if args.print_result && value != Value::Nil {
                println!("{}", value.inspect());
            }
            ExitCode::SUCCESS
        },
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        },
    }
}

/// Reads commands from standard input until end of file.
///
/// Input that ends inside an unfinished construct, such as an open `class`,
/// is kept and continued on the next line.
fn repl() -> ExitCode {
    let machine = Machine::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();

    loop {
        if let Err(err) = prompt(&mut stdout, if buffer.is_empty() { "> " } else { ".. " }) {
            eprintln!("Failed to write the prompt: {err}");
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => buffer.push_str(&line),
            Err(err) => {
                eprintln!("Failed to read input: {err}");
                return ExitCode::FAILURE;
            },
        }

        match machine.execute(&buffer) {
            Ok(value) => println!("=> {}", value.inspect()),
            Err(err) if err.as_parse().is_some_and(ParseError::is_incomplete) => continue,
            Err(err) => report(&err),
        }
        buffer.clear();
    }
}

fn prompt(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

fn report(err: &Error) {
    match err.as_parse() {
        Some(parse) => eprintln!("Error on line {}: {parse}", parse.line()),
        None => eprintln!("Error: {err}"),
    }
}
