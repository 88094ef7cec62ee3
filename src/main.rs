use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing::Level;

use vmasm::bytecode::{self, table};
use vmasm::Error;

/// Assembler for the tagged-value stack VM
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Command>,

  /// Log more; repeat for more detail. Logs go to stderr.
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Assemble source text into bytecode (the default)
  Assemble {
    /// Source file, stdin if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Bytecode file, stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
  },

  /// Decode bytecode back into source text
  Disassemble {
    /// Bytecode file, stdin if omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print a table of offsets and raw words instead of plain source
    #[arg(short, long)]
    listing: bool,
  },

  /// Print the mnemonic table
  Table,
}

fn init_tracing(verbose: u8) {
  let level = match verbose {
    0 => Level::WARN,
    1 => Level::INFO,
    _ => Level::DEBUG,
  };
  let _ = tracing_subscriber::fmt()
    .without_time()
    .with_target(false)
    .with_max_level(level)
    .with_writer(io::stderr)
    .try_init();
}

fn read_input(input: Option<&Path>) -> Result<Vec<u8>, Error> {
  match input {
    Some(path) => Ok(fs::read(path)?),
    None => {
      let mut bytes = Vec::new();
      io::stdin().read_to_end(&mut bytes)?;
      Ok(bytes)
    }
  }
}

/// Decodes and assembles a whole source file to bytecode.
fn assemble_source(source: Vec<u8>) -> Result<Vec<u8>, Error> {
  let source = String::from_utf8(source)?;
  let program = bytecode::assemble(&source)?;

  #[cfg(feature = "trace_assembly")]
  eprintln!("{}", bytecode::listing(&program));

  Ok(bytecode::encode_program(&program))
}

fn assemble(input: Option<&Path>, output: Option<&Path>) -> Result<(), Error> {
  // Nothing is written unless every line assembled.
  let bytes = assemble_source(read_input(input)?)?;

  match output {
    Some(path) => fs::write(path, &bytes)?,
    None => {
      let mut stdout = io::stdout().lock();
      stdout.write_all(&bytes)?;
      stdout.flush()?;
    }
  }
  Ok(())
}

fn disassemble(input: Option<&Path>, listing: bool) -> Result<(), Error> {
  let bytes = read_input(input)?;

  if listing {
    let program = bytecode::decode_program(&bytes)?;
    print!("{}", bytecode::listing(&program));
  } else {
    print!("{}", bytecode::disassemble(&bytes)?);
  }
  Ok(())
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command.unwrap_or(Command::Assemble { input: None, output: None }) {
    Command::Assemble { input, output } => assemble(input.as_deref(), output.as_deref()),
    Command::Disassemble { input, listing } => disassemble(input.as_deref(), listing),
    Command::Table => {
      println!("Mnemonic table version {}", table::TABLE_VERSION);
      print!("{}", table::render_table());
      Ok(())
    }
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(error) => {
      eprintln!("{}: {}", "error".red(), error);
      ExitCode::FAILURE
    }
  }
}
