//! Wabbit command line
//!
//! Runs, checks and reformats Wabbit programs.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use wabbit::feedback::CheckFeedback;
use wabbit::{check_source, format_source, parse_source, run_source, tokenize_source};

/// Wabbit interpreter
#[derive(Parser, Debug)]
#[command(name = "wabbit")]
#[command(version = "0.1.0")]
#[command(about = "Wabbit - run, check and format Wabbit programs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Program to run when no subcommand is given
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

/// Where the program text comes from
#[derive(Args, Debug)]
struct Input {
    /// Source file (.wb)
    #[arg(value_name = "FILE", required_unless_present = "source")]
    file: Option<PathBuf>,

    /// Inline program text
    #[arg(short = 'e', long = "eval", value_name = "SOURCE", conflicts_with = "file")]
    source: Option<String>,
}

impl Input {
    fn name(&self) -> String {
        match &self.file {
            Some(path) => path.display().to_string(),
            None => "<inline>".to_string(),
        }
    }

    fn read(&self) -> anyhow::Result<String> {
        match (&self.file, &self.source) {
            (_, Some(source)) => Ok(source.clone()),
            (Some(path), None) => {
                fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
            }
            (None, None) => bail!("no input: give a FILE or -e SOURCE"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check and interpret a program
    Run {
        #[command(flatten)]
        input: Input,
    },
    /// Type check a program and report every error
    Check {
        #[command(flatten)]
        input: Input,

        /// Emit diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the token stream
    Tokens {
        #[command(flatten)]
        input: Input,
    },
    /// Print the program in canonical form
    Fmt {
        #[command(flatten)]
        input: Input,
    },
    /// Print the syntax tree as JSON
    Ast {
        #[command(flatten)]
        input: Input,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(command) => dispatch(command),
        None => match cli.input {
            Some(file) => dispatch(Commands::Run {
                input: Input { file: Some(file), source: None },
            }),
            None => {
                eprintln!("Error: No input file specified");
                eprintln!("Usage: wabbit <FILE> or wabbit run <FILE>");
                process::exit(1);
            }
        },
    };

    if let Err(e) = result {
        report(&e);
        process::exit(1);
    }
}

fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Run { input } => run_file(&input),
        Commands::Check { input, json } => check_file(&input, json),
        Commands::Tokens { input } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for token in tokenize_source(&input.read()?)? {
                writeln!(out, "{:>4}  {:<10} {}", token.line, format!("{:?}", token.kind), token.text)?;
            }
            Ok(())
        }
        Commands::Fmt { input } => {
            print!("{}", format_source(&input.read()?)?);
            Ok(())
        }
        Commands::Ast { input } => {
            let program = parse_source(&input.read()?)?;
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(())
        }
    }
}

fn run_file(input: &Input) -> anyhow::Result<()> {
    let source = input.read()?;
    debug!("running {}", input.name());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_source(&source, &mut out)?;
    Ok(())
}

fn check_file(input: &Input, json: bool) -> anyhow::Result<()> {
    let source = input.read()?;
    let result = check_source(&source);

    if json {
        let feedback = match &result {
            Ok(program) => CheckFeedback::success(input.name(), program),
            Err(e) => CheckFeedback::failure(input.name(), e),
        };
        println!("{}", feedback.to_json());
        if !feedback.success {
            process::exit(1);
        }
        return Ok(());
    }

    result?;
    println!("No errors found in {}", input.name());
    Ok(())
}

/// Print an error to stderr; every error of an aggregate gets its own line
fn report(error: &anyhow::Error) {
    match error.downcast_ref::<wabbit::Error>() {
        Some(wabbit::Error::TypeErrors(errors)) => {
            for e in errors {
                eprintln!("error: {}", e);
            }
            eprintln!("error: {}", error);
        }
        _ => eprintln!("error: {:#}", error),
    }
}
