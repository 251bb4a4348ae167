use std::{
    fs::read_to_string,
    io::{self, BufRead, Write},
    path::Path,
    process::ExitCode,
};

use monkey::{config::Config, parser::parser::parse, render_error};
use tracing::{error, info};

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(config.log_level)
        .with_writer(io::stderr)
        .init();

    let result = match &config.file {
        Some(path) => run_file(path),
        None => run_repl(&config),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(%err, "i/o failure");
            ExitCode::FAILURE
        }
    }
}

/// Parses `source` and prints either the reconstructed program or every error.
///
/// Returns whether the source parsed cleanly.
fn parse_and_print(source: &str, file: Option<String>, out: &mut impl Write) -> io::Result<bool> {
    let (program, errors) = parse(source.to_string(), file);

    if errors.is_empty() {
        writeln!(out, "{}", program)?;
        return Ok(true);
    }

    writeln!(out, "parser errors:")?;
    for err in &errors {
        write!(out, "{}", render_error(err, source))?;
    }
    Ok(false)
}

fn run_file(path: &Path) -> io::Result<bool> {
    let source = read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!(file = %file_name, bytes = source.len(), "parsing file");
    parse_and_print(&source, Some(file_name), &mut io::stdout().lock())
}

fn run_repl(config: &Config) -> io::Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    writeln!(stdout, "Hello {}! This is the Monkey programming language!", config.user)?;
    writeln!(stdout, "Type in expressions to see how they parse.")?;

    let mut line = String::new();
    loop {
        write!(stdout, "{}", config.prompt)?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            writeln!(stdout)?;
            return Ok(true);
        }

        if line.trim().is_empty() {
            continue;
        }

        parse_and_print(&line, None, &mut stdout)?;
    }
}
