/*!
  An assembler for a small tagged-value stack VM. Assembly text goes in, one instruction per
  line, and a stream of fixed width 16 byte instructions comes out. See `bytecode` for the
  instruction format and `immediate` for how literal values are packed into operand words.
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod error;
pub mod immediate;

pub use bytecode::{assemble, assemble_to_bytes, disassemble, Instruction, Operation};
pub use error::{AssemblyError, DecodeError, Error, ErrorKind, OperandError};
pub use immediate::{Fixnum, Immediate};
