/*!

  The VM consumes a flat stream of fixed width instructions. Every instruction is 16 bytes,
  two little-endian 64 bit words, with no delimiters between instructions:

    [Opcode:64][Operand:64]

  The opcode word holds one of the hand-assigned 32 bit values of `Operation`, zero
  extended. What the operand word holds depends on the operation's operand kind:

    none:       Reserved, always zero.
    raw:        An integer (jump target, stack slot, count), stored as is.
    immediate:  A tagged immediate value, see `crate::immediate`.

  The program ends with exactly one terminator instruction, `HALT` with a zero operand.
  The terminator is emitted by the assembler and cannot be written in assembly.

  The opcode values are fixed by the VM. They are not consecutive and their order carries
  no meaning, so each variant of `Operation` spells out its discriminant. Which mnemonics
  exist, their arities, and their operand kinds are given by `table::MNEMONIC_TABLE`.

*/

mod assembly;
mod binary;
mod instruction;
mod listing;
pub mod table;

pub use assembly::{assemble, assemble_line, assemble_lines, assemble_to_bytes, disassemble};
pub use binary::{decode_instruction, decode_program, encode_instruction, encode_program,
                 EncodedInstruction, INSTRUCTION_SIZE};
pub use instruction::Instruction;
pub use listing::{listing, TABLE_DISPLAY_FORMAT};
pub use table::{OperandKind, TableEntry, MNEMONIC_TABLE, TABLE_VERSION};

use strum_macros::{Display as StrumDisplay, EnumIter, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

// If you change this you must also change `encode_instruction` and `decode_instruction`.
pub type Word = u64;

/// Opcodes of the virtual machine, named by their mnemonic.
#[derive(
  StrumDisplay, IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
  Clone,        Copy,          Eq,       PartialEq,        Debug,         Hash
)]
#[repr(u32)]
pub enum Operation {
  // Loads and stack //
  #[strum(serialize = "LOAD")]         Load         = 0x010A_D000,
  #[strum(serialize = "GET")]          Get          = 0x009E_7000,
  #[strum(serialize = "FORGET")]       Forget       = 0x049E_7000,

  // Control flow //
  #[strum(serialize = "JUMP")]         Jump         = 0x070A_D000,
  #[strum(serialize = "CJUMP")]        CJump        = 0x00CA_7000,
  #[strum(serialize = "FALL")]         Fall         = 0x0FA1_1000,

  // Arithmetic and comparison //
  #[strum(serialize = "ADD1")]         Add1         = 0x0ADD_1000,
  #[strum(serialize = "SUB1")]         Sub1         = 0x050B_1000,
  #[strum(serialize = "ADD")]          Add          = 0x00AD_D000,
  #[strum(serialize = "SUB")]          Sub          = 0x0050_B000,
  #[strum(serialize = "MUL")]          Mul          = 0x00A5_5000,
  #[strum(serialize = "LT")]           Lt           = 0x0170_0000,
  #[strum(serialize = "EQ")]           Eq           = 0x0E3E_3000,
  #[strum(serialize = "EQP")]          EqP          = 0x03E3_E000,

  // Predicates //
  #[strum(serialize = "ZEROP")]        ZeroP        = 0x0EEE_E000,
  #[strum(serialize = "INTEGERP")]     IntegerP     = 0x0123_4000,
  #[strum(serialize = "BOOLEANP")]     BooleanP     = 0x0B00_1000,
  #[strum(serialize = "CHARP")]        CharP        = 0x0CAC_A000,
  #[strum(serialize = "NULLP")]        NullP        = 0x0432_1000,
  #[strum(serialize = "NOT")]          Not          = 0x0777_7000,

  // Conversions //
  #[strum(serialize = "INTTOCHAR")]    IntToChar    = 0x0170_C000,
  #[strum(serialize = "CHARTOINT")]    CharToInt    = 0x0C70_1000,

  // Strings //
  #[strum(serialize = "STRING")]       String       = 0x0571_F000,
  #[strum(serialize = "STRINGREF")]    StringRef    = 0x0571_E000,
  #[strum(serialize = "STRINGSET")]    StringSet    = 0x0571_5000,
  #[strum(serialize = "STRINGAPPEND")] StringAppend = 0x0571_A000,

  // Pairs //
  #[strum(serialize = "CONS")]         Cons         = 0x0C0C_0000,
  #[strum(serialize = "CAR")]          Car          = 0x0CA0_0000,
  #[strum(serialize = "CDR")]          Cdr          = 0x0CD0_0000,

  // End of program. Never assembled from text.
  #[strum(serialize = "HALT")]         Halt         = 0x0D0D_0000,
}

impl Operation {
  pub fn code(&self) -> u32 {
    Into::<u32>::into(*self)
  }

  /// The opcode word as it appears in the instruction stream.
  pub fn opcode(&self) -> Word {
    self.code() as Word
  }

  pub fn mnemonic(&self) -> &'static str {
    self.into()
  }

  /// Looks up the operation for an opcode word, if there is one.
  pub fn from_opcode(opcode: Word) -> Option<Operation> {
    u32::try_from(opcode).ok().and_then(|code| Operation::try_from(code).ok())
  }

  /// How the operand word of this operation is interpreted.
  pub fn operand_kind(&self) -> OperandKind {
    table::entry_for(*self).map_or(OperandKind::None, |entry| entry.operand)
  }
}
