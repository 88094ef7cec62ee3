/*!
  The mnemonic table maps a mnemonic and its arity (the number of operands following it on a
  line) to an operation and the kind of operand that operation takes. This is the one
  authoritative description of the assembly language; the VM must agree with it bit for bit.

  Version 1 spells predicates with a trailing `P`, includes `EQP` and the `STRING` family,
  and gives `ADD`, `SUB`, `MUL`, `LT`, `EQ`, `EQP`, and `FALL` a raw integer operand.
*/

use std::collections::HashMap;

use prettytable::Table;

use super::{listing::TABLE_DISPLAY_FORMAT, Operation};

pub const TABLE_VERSION: u32 = 1;

/// How an instruction's operand word is produced from its operand token.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum OperandKind {
  /// No operand token; the operand word is zero.
  None,
  /// A decimal integer stored as a plain little-endian word.
  Raw,
  /// An immediate literal stored in its tagged form.
  Immediate,
}

impl OperandKind {
  pub fn arity(&self) -> usize {
    match self {
      OperandKind::None => 0,
      OperandKind::Raw | OperandKind::Immediate => 1
    }
  }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct TableEntry {
  pub mnemonic  : &'static str,
  pub arity     : usize,
  pub operation : Operation,
  pub operand   : OperandKind,
}

const fn entry(mnemonic: &'static str, arity: usize, operation: Operation, operand: OperandKind)
  -> TableEntry
{
  TableEntry { mnemonic, arity, operation, operand }
}

use OperandKind::{Immediate as Imm, None as Nil, Raw};

pub static MNEMONIC_TABLE: [TableEntry; 29] = [
  entry("LOAD",         1, Operation::Load,         Imm),
  entry("JUMP",         1, Operation::Jump,         Raw),
  entry("CJUMP",        1, Operation::CJump,        Raw),
  entry("GET",          1, Operation::Get,          Raw),
  entry("FORGET",       0, Operation::Forget,       Nil),
  entry("ADD1",         0, Operation::Add1,         Nil),
  entry("SUB1",         0, Operation::Sub1,         Nil),
  entry("ADD",          1, Operation::Add,          Raw),
  entry("SUB",          1, Operation::Sub,          Raw),
  entry("MUL",          1, Operation::Mul,          Raw),
  entry("LT",           1, Operation::Lt,           Raw),
  entry("EQ",           1, Operation::Eq,           Raw),
  entry("EQP",          1, Operation::EqP,          Raw),
  entry("STRING",       1, Operation::String,       Raw),
  entry("ZEROP",        0, Operation::ZeroP,        Nil),
  entry("STRINGREF",    0, Operation::StringRef,    Nil),
  entry("STRINGSET",    0, Operation::StringSet,    Nil),
  entry("STRINGAPPEND", 1, Operation::StringAppend, Raw),
  entry("INTEGERP",     0, Operation::IntegerP,     Nil),
  entry("BOOLEANP",     0, Operation::BooleanP,     Nil),
  entry("CHARP",        0, Operation::CharP,        Nil),
  entry("NULLP",        0, Operation::NullP,        Nil),
  entry("NOT",          0, Operation::Not,          Nil),
  entry("INTTOCHAR",    0, Operation::IntToChar,    Nil),
  entry("CHARTOINT",    0, Operation::CharToInt,    Nil),
  entry("FALL",         1, Operation::Fall,         Raw),
  entry("CONS",         0, Operation::Cons,         Nil),
  entry("CAR",          0, Operation::Car,          Nil),
  entry("CDR",          0, Operation::Cdr,          Nil),
];

lazy_static! {
  // A mnemonic may in principle be listed once per arity.
  static ref BY_MNEMONIC: HashMap<&'static str, Vec<&'static TableEntry>> = {
    let mut map: HashMap<&'static str, Vec<&'static TableEntry>> = HashMap::new();
    for entry in MNEMONIC_TABLE.iter() {
      map.entry(entry.mnemonic).or_default().push(entry);
    }
    map
  };

  static ref BY_OPERATION: HashMap<Operation, &'static TableEntry> =
    MNEMONIC_TABLE.iter().map(|entry| (entry.operation, entry)).collect();
}

/// Finds the entry for a mnemonic used with `arity` operands. Mnemonics are case sensitive.
pub fn lookup(mnemonic: &str, arity: usize) -> Option<&'static TableEntry> {
  BY_MNEMONIC
    .get(mnemonic)
    .and_then(|entries| entries.iter().find(|entry| entry.arity == arity))
    .copied()
}

/// The entry describing `operation`. Only the terminator has none.
pub fn entry_for(operation: Operation) -> Option<&'static TableEntry> {
  BY_OPERATION.get(&operation).copied()
}

/// Renders the whole table for display.
pub fn render_table() -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(row![ubl->"Mnemonic", ubr->"Arity", ubr->"Opcode", ubl->"Operand"]);

  for entry in MNEMONIC_TABLE.iter() {
    let operand = match entry.operand {
      OperandKind::None      => "none",
      OperandKind::Raw       => "raw",
      OperandKind::Immediate => "immediate",
    };
    table.add_row(
      row![entry.mnemonic, r->entry.arity, r->format!("{:#010x}", entry.operation.code()), operand]
    );
  }
  table
}
