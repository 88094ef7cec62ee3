//! Error types for assembling source text and decoding bytecode.

use thiserror::Error;

use crate::bytecode::Word;

/// The three ways an assembly run can be rejected.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind {
  /// The mnemonic and operand count have no entry in the mnemonic table.
  UnrecognizedInstruction,
  /// An operand token is not a well formed integer or immediate literal.
  Format,
  /// An integer literal lies outside the representable range.
  Range,
}

/// Failure to interpret a single operand token. Each variant carries the offending token.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum OperandError {
  #[error("character constant `{0}` not supported")]
  UnsupportedCharacter(String),

  #[error("unrecognized immediate `{0}`")]
  UnrecognizedImmediate(String),

  #[error("`{0}` is not an integer")]
  MalformedInteger(String),

  #[error("integer `{0}` out of range [0, 2^62 - 1]")]
  OutOfRange(String),
}

impl OperandError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      OperandError::OutOfRange(_) => ErrorKind::Range,
      _ => ErrorKind::Format
    }
  }

  pub fn token(&self) -> &str {
    match self {
      OperandError::UnsupportedCharacter(token)
      | OperandError::UnrecognizedImmediate(token)
      | OperandError::MalformedInteger(token)
      | OperandError::OutOfRange(token) => token
    }
  }
}

/// Failure to assemble a source line. Line numbers count from 1 and include blank lines.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum AssemblyError {
  #[error("line {line_number}: unrecognized instruction `{line}`")]
  UnrecognizedInstruction {
    line_number: usize,
    line: String
  },

  #[error("line {line_number}: {source} in `{line}`")]
  Operand {
    line_number: usize,
    line: String,
    #[source]
    source: OperandError
  },
}

impl AssemblyError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      AssemblyError::UnrecognizedInstruction { .. } => ErrorKind::UnrecognizedInstruction,
      AssemblyError::Operand { source, .. } => source.kind()
    }
  }

  pub fn line_number(&self) -> usize {
    match self {
      AssemblyError::UnrecognizedInstruction { line_number, .. }
      | AssemblyError::Operand { line_number, .. } => *line_number
    }
  }
}

/// Failure to decode a bytecode stream. `index` is the position of the offending instruction.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum DecodeError {
  #[error("invalid bytecode size {0}")]
  InvalidSize(usize),

  #[error("instruction {index}: invalid opcode {opcode:#x}")]
  InvalidOpcode { index: usize, opcode: Word },

  #[error("instruction {index}: {mnemonic} takes no operand but has {operand:#x}")]
  ReservedOperand { index: usize, mnemonic: &'static str, operand: Word },

  #[error("instruction {index}: malformed immediate {word:#x}")]
  MalformedImmediate { index: usize, word: Word },

  #[error("bytecode does not end with the terminator instruction")]
  MissingTerminator,

  #[error("instruction {index}: terminator before the end of the program")]
  EarlyTerminator { index: usize },
}

/// Everything the command line driver can run into.
#[derive(Error, Debug)]
pub enum Error {
  #[error("IO Error: {0}")]
  Io(
    #[from]
    std::io::Error,
  ),

  #[error("input is not valid UTF-8: {0}")]
  Utf8(
    #[from]
    std::string::FromUtf8Error,
  ),

  #[error(transparent)]
  Assembly(#[from] AssemblyError),

  #[error(transparent)]
  Decode(#[from] DecodeError),
}
