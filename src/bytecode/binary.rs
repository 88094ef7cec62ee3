/*!
  This module is responsible for the encoding and decoding of binary instructions.

  Decoding performs the same checks the VM performs when it loads a program, so a stream
  that decodes here is one the VM will accept.
*/

use crate::error::DecodeError;
use crate::immediate::Immediate;
use super::{Instruction, OperandKind, Operation, Word};

pub const INSTRUCTION_SIZE: usize = 16;
const WORD_SIZE: usize = 8;

pub type EncodedInstruction = [u8; INSTRUCTION_SIZE];

/// Encodes the instruction as an opcode word followed by an operand word, both little-endian.
pub fn encode_instruction(instruction: &Instruction) -> EncodedInstruction {
  let mut encoded = [0u8; INSTRUCTION_SIZE];
  encoded[..WORD_SIZE].copy_from_slice(&instruction.operation().opcode().to_le_bytes());
  encoded[WORD_SIZE..].copy_from_slice(&instruction.operand_word().to_le_bytes());
  encoded
}

/// Concatenates the encoded instructions. The caller supplies the terminator.
pub fn encode_program(program: &[Instruction]) -> Vec<u8> {
  program.iter().flat_map(encode_instruction).collect()
}

/**
  Decodes one instruction from its two words. `index` is the instruction's position in the
  program and is only used for error reporting.
*/
pub fn decode_instruction(index: usize, opcode: Word, operand: Word)
  -> Result<Instruction, DecodeError>
{
  let operation = Operation::from_opcode(opcode)
    .ok_or(DecodeError::InvalidOpcode { index, opcode })?;

  match operation.operand_kind() {

    OperandKind::None if operand != 0 => {
      Err(DecodeError::ReservedOperand { index, mnemonic: operation.mnemonic(), operand })
    }

    OperandKind::None => Ok(Instruction::Nullary(operation)),

    OperandKind::Raw => Ok(Instruction::Raw { operation, operand }),

    OperandKind::Immediate => {
      Immediate::decode(operand)
        .map(|value| Instruction::Immediate { operation, value })
        .ok_or(DecodeError::MalformedImmediate { index, word: operand })
    }

  }
}

fn word_at(bytes: &[u8], offset: usize) -> Word {
  let mut word = [0u8; WORD_SIZE];
  word.copy_from_slice(&bytes[offset..offset + WORD_SIZE]);
  Word::from_le_bytes(word)
}

/**
  Decodes a whole program. The stream must be a whole number of instructions and must end
  with the terminator, which appears nowhere else. The terminator is included in the result.
*/
pub fn decode_program(bytes: &[u8]) -> Result<Vec<Instruction>, DecodeError> {
  if bytes.len() % INSTRUCTION_SIZE != 0 {
    return Err(DecodeError::InvalidSize(bytes.len()));
  }

  let program = bytes
    .chunks_exact(INSTRUCTION_SIZE)
    .enumerate()
    .map(|(index, chunk)| decode_instruction(index, word_at(chunk, 0), word_at(chunk, WORD_SIZE)))
    .collect::<Result<Vec<Instruction>, DecodeError>>()?;

  match program.iter().position(Instruction::is_terminator) {
    Some(index) if index + 1 == program.len() => Ok(program),
    Some(index) => Err(DecodeError::EarlyTerminator { index }),
    None => Err(DecodeError::MissingTerminator)
  }
}
