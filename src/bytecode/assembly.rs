/*!
  The human readable textual form of bytecode is called assembly. Each non-blank line holds
  one instruction, a mnemonic optionally followed by one operand, separated by whitespace:

    ADD1
    LOAD #t
    JUMP 3

  Lines are independent of one another; there are no labels or symbols to resolve. A run is
  all or nothing: the first bad line rejects the whole input.
*/

use tracing::{debug, info, warn};

use crate::error::{AssemblyError, DecodeError, OperandError};
use super::{binary, table, Instruction, OperandKind, Word};

/**
  Parses a raw integer operand. Unlike immediates these are plain words, so any decimal that
  fits in 64 bits is accepted, negative values in two's complement.
*/
fn parse_raw_operand(token: &str) -> Result<Word, OperandError> {
  token
    .parse::<Word>()
    .or_else(|_| token.parse::<i64>().map(|n| n as Word))
    .map_err(|_| OperandError::MalformedInteger(token.to_string()))
}

/// Assembles a single non-blank line. `line_number` is only used for error reporting.
pub fn assemble_line(line_number: usize, line: &str) -> Result<Instruction, AssemblyError> {
  let tokens: Vec<&str> = line.split_whitespace().collect();

  let unrecognized = || AssemblyError::UnrecognizedInstruction {
    line_number,
    line: line.trim().to_string()
  };
  let operand_error = |source: OperandError| AssemblyError::Operand {
    line_number,
    line: line.trim().to_string(),
    source
  };

  let (mnemonic, operands) = tokens.split_first().ok_or_else(unrecognized)?;
  let entry = table::lookup(mnemonic, operands.len()).ok_or_else(unrecognized)?;
  let operation = entry.operation;

  let instruction =
    match (entry.operand, operands) {

      (OperandKind::None, []) => Instruction::Nullary(operation),

      (OperandKind::Raw, [token]) => {
        Instruction::Raw {
          operation,
          operand: parse_raw_operand(token).map_err(operand_error)?
        }
      }

      (OperandKind::Immediate, [token]) => {
        Instruction::Immediate {
          operation,
          value: token.parse().map_err(operand_error)?
        }
      }

      // The table's arity disagrees with its operand kind.
      _ => return Err(unrecognized())

    };

  debug!(line_number, %instruction, opcode = operation.code(), "assembled");
  Ok(instruction)
}

/**
  Assembles lines in order, skipping blank ones, and appends the terminator. The result holds
  one instruction per non-blank line plus the terminator, in input order.
*/
pub fn assemble_lines<'a, I>(lines: I) -> Result<Vec<Instruction>, AssemblyError>
  where I: IntoIterator<Item = &'a str>
{
  let mut program = Vec::new();

  for (index, line) in lines.into_iter().enumerate() {
    if line.trim().is_empty() {
      continue;
    }
    match assemble_line(index + 1, line) {
      Ok(instruction) => program.push(instruction),
      Err(error) => {
        warn!(%error, "assembly rejected");
        return Err(error);
      }
    }
  }

  program.push(Instruction::TERMINATOR);
  info!(instructions = program.len(), "assembled program");
  Ok(program)
}

/**
  Splits source text into lines. `\n`, `\r\n`, and a lone `\r` all end a line, so text from
  any platform numbers its lines the same way.
*/
fn source_lines(source: &str) -> impl Iterator<Item = &str> {
  source
    .split('\n')
    .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

pub fn assemble(source: &str) -> Result<Vec<Instruction>, AssemblyError> {
  assemble_lines(source_lines(source))
}

/// Assembles `source` straight to the byte stream the VM loads.
pub fn assemble_to_bytes(source: &str) -> Result<Vec<u8>, AssemblyError> {
  let bytes = binary::encode_program(&assemble(source)?);
  info!(bytes = bytes.len(), "encoded program");
  Ok(bytes)
}

/// Renders bytecode as assembly, one instruction per line. The terminator is left implicit.
pub fn disassemble(bytes: &[u8]) -> Result<String, DecodeError> {
  let program = binary::decode_program(bytes)?;
  let mut text = String::new();

  for instruction in program.iter().filter(|instruction| !instruction.is_terminator()) {
    text.push_str(&instruction.to_string());
    text.push('\n');
  }
  Ok(text)
}
