//! A tabular view of a program for humans: where each instruction sits, its raw words, and
//! its assembly text.

use prettytable::{format as TableFormat, Table};

use super::{Instruction, INSTRUCTION_SIZE};

lazy_static! {
  pub static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

pub fn listing(program: &[Instruction]) -> Table {
  let mut table = Table::new();

  table.set_format(*TABLE_DISPLAY_FORMAT);
  table.set_titles(
    row![ubr->"Index", ubr->"Offset", ubr->"Opcode", ubr->"Operand", ubl->"Assembly"]
  );

  for (i, instruction) in program.iter().enumerate() {
    table.add_row(
      row![
        r->i,
        r->format!("{:#06x}", i * INSTRUCTION_SIZE),
        r->format!("{:#010x}", instruction.operation().opcode()),
        r->format!("{:#018x}", instruction.operand_word()),
        instruction
      ]
    );
  }
  table
}
