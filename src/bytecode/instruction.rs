use std::fmt::{Display, Formatter};

use crate::immediate::Immediate;
use super::{Operation, Word};

/// Holds the unencoded components of an instruction. As such, it enumerates the possible
/// operand kinds.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Instruction {
  /// [OpCode:64][Reserved:64]
  Nullary(Operation),
  /// [OpCode:64][Operand:64]
  Raw {
    operation : Operation,
    operand   : Word
  },
  /// [OpCode:64][Immediate:64]
  Immediate {
    operation : Operation,
    value     : Immediate
  },
}

impl Instruction {
  /// Marks the end of the program for the VM.
  pub const TERMINATOR: Instruction = Instruction::Nullary(Operation::Halt);

  pub fn operation(&self) -> Operation {
    match self {
      Instruction::Nullary(operation)
      | Instruction::Raw { operation, .. }
      | Instruction::Immediate { operation, .. } => *operation
    }
  }

  /// The second word of the encoded instruction.
  pub fn operand_word(&self) -> Word {
    match self {
      Instruction::Nullary(_) => 0,
      Instruction::Raw { operand, .. } => *operand,
      Instruction::Immediate { value, .. } => value.encode()
    }
  }

  pub fn is_terminator(&self) -> bool {
    *self == Instruction::TERMINATOR
  }
}

/// Writes the instruction as a line of assembly.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Nullary(operation) => {
        write!(f, "{}", operation)
      }

      Instruction::Raw { operation, operand } => {
        write!(f, "{} {}", operation, operand)
      }

      Instruction::Immediate { operation, value } => {
        write!(f, "{} {}", operation, value)
      }

    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operand_words(){
    assert_eq!(Instruction::Nullary(Operation::Car).operand_word(), 0);
    assert_eq!(Instruction::Raw { operation: Operation::Jump, operand: 7 }.operand_word(), 7);
    let load = Instruction::Immediate { operation: Operation::Load, value: Immediate::Boolean(true) };
    assert_eq!(load.operand_word(), 0b1001_1111);
    assert_eq!(load.operation(), Operation::Load);
  }

  #[test]
  fn assembly_text(){
    assert_eq!(Instruction::Nullary(Operation::Add1).to_string(), "ADD1");
    assert_eq!(Instruction::Raw { operation: Operation::Get, operand: 2 }.to_string(), "GET 2");
    let load = Instruction::Immediate { operation: Operation::Load, value: Immediate::Character(b'a') };
    assert_eq!(load.to_string(), "LOAD #\\a");
  }

  #[test]
  fn terminator(){
    assert!(Instruction::TERMINATOR.is_terminator());
    assert!(!Instruction::Nullary(Operation::Not).is_terminator());
    assert_eq!(Instruction::TERMINATOR.operation().opcode(), 0xD0D0000);
  }
}
