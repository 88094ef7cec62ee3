/*!

  Immediate values are literal runtime values small enough to live directly in an
  instruction's operand word. Each is one 64 bit word whose low order bits identify the
  variant, so the VM can classify a word without any external type information:

    Integer:      [Value:62][00]
    Character:    [Reserved:48][Codepoint:8][0000_1111]
    Boolean:      [Reserved:56][T001_1111]           T is the truth bit
    Null:         [Reserved:56][0010_1111]
    Unspecified:  all ones

  Reserved bits are zero. Integers are non-negative and must survive the 2 bit shift,
  hence the upper bound of 2^62 - 1.

*/

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::{
  IResult,
  bytes::complete::take_while_m_n,
  character::complete::{char as one_char, digit1},
  combinator::{all_consuming, map_res},
  sequence::preceded,
};

use crate::bytecode::Word;
use crate::error::OperandError;

/// The largest integer that can be encoded as an immediate.
pub const MAX_INTEGER: u64 = (1 << 62) - 1;

pub const CHAR_PREFIX: &str = "#\\";

/// Bit patterns of the serialized forms.
pub mod tag {
  use crate::bytecode::Word;

  pub const INTEGER_MASK : Word = 0b11;
  pub const INTEGER      : Word = 0b00;
  pub const INTEGER_SHIFT: u32  = 2;

  pub const CHAR_MASK    : Word = 0xFF;
  pub const CHAR         : Word = 0b0000_1111;
  pub const CHAR_SHIFT   : u32  = 8;

  pub const FALSE        : Word = 0b0001_1111;
  pub const TRUE         : Word = 0b1001_1111;
  pub const NULL         : Word = 0b0010_1111;
  pub const UNSPECIFIED  : Word = Word::MAX;
}

/// A whole number in `[0, MAX_INTEGER]`. The range is checked on construction, so every
/// `Fixnum` survives the tag shift intact.
#[derive(Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Fixnum(u64);

impl Fixnum {
  pub const MAX: Fixnum = Fixnum(MAX_INTEGER);

  pub fn new(n: u64) -> Option<Fixnum> {
    match n <= MAX_INTEGER {
      true  => Some(Fixnum(n)),
      false => None
    }
  }

  pub fn get(&self) -> u64 {
    self.0
  }
}

impl TryFrom<u64> for Fixnum {
  type Error = OperandError;

  fn try_from(n: u64) -> Result<Self, Self::Error> {
    Fixnum::new(n).ok_or_else(|| OperandError::OutOfRange(n.to_string()))
  }
}

impl Display for Fixnum {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Immediate {
  Integer(Fixnum),
  Boolean(bool),
  /// A single byte code point.
  Character(u8),
  /// The empty list.
  Null,
  /// The value of expressions that have no meaningful value.
  Unspecified,
}

impl Immediate {

  /// An integer immediate, or `OutOfRange` if `n` exceeds `MAX_INTEGER`.
  pub fn integer(n: u64) -> Result<Immediate, OperandError> {
    Fixnum::try_from(n).map(Immediate::Integer)
  }

  /// Serializes the value into its tagged word.
  pub fn encode(&self) -> Word {
    match *self {
      Immediate::Integer(n)     => (n.get() << tag::INTEGER_SHIFT) | tag::INTEGER,
      Immediate::Boolean(false) => tag::FALSE,
      Immediate::Boolean(true)  => tag::TRUE,
      Immediate::Character(c)   => ((c as Word) << tag::CHAR_SHIFT) | tag::CHAR,
      Immediate::Null           => tag::NULL,
      Immediate::Unspecified    => tag::UNSPECIFIED,
    }
  }

  /// The serialized word as it appears in the instruction stream.
  pub fn to_bytes(&self) -> [u8; 8] {
    self.encode().to_le_bytes()
  }

  /**
    Classifies a tagged word. Returns `None` for words no immediate serializes to. The
    all ones check must come first, since `UNSPECIFIED` also matches the other masks.
  */
  pub fn decode(word: Word) -> Option<Immediate> {
    if word == tag::UNSPECIFIED {
      return Some(Immediate::Unspecified);
    }
    if word & tag::INTEGER_MASK == tag::INTEGER {
      // Two bits shifted out leave at most 62, always in range.
      return Some(Immediate::Integer(Fixnum(word >> tag::INTEGER_SHIFT)));
    }
    match word {
      tag::FALSE => Some(Immediate::Boolean(false)),
      tag::TRUE  => Some(Immediate::Boolean(true)),
      tag::NULL  => Some(Immediate::Null),
      w if w & tag::CHAR_MASK == tag::CHAR => {
        u8::try_from(w >> tag::CHAR_SHIFT).ok().map(Immediate::Character)
      }
      _ => None
    }
  }
}

fn decimal(input: &str) -> IResult<&str, &str> {
  all_consuming(digit1)(input)
}

// `x` followed by exactly two hex digits.
fn hex_escape(input: &str) -> IResult<&str, u8> {
  map_res(
    all_consuming(
      preceded(one_char('x'), take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()))
    ),
    |digits: &str| u8::from_str_radix(digits, 16)
  )(input)
}

fn parse_character(token: &str, data: &str) -> Result<Immediate, OperandError> {
  let mut chars = data.chars();
  if let (Some(c), None) = (chars.next(), chars.next()) {
    if c.is_ascii() {
      return Ok(Immediate::Character(c as u8));
    }
  }

  match hex_escape(data) {
    Ok((_, byte)) => Ok(Immediate::Character(byte)),
    Err(_) => Err(OperandError::UnsupportedCharacter(token.to_string()))
  }
}

/// Literal forms are tried in a fixed order and the first match wins.
impl FromStr for Immediate {
  type Err = OperandError;

  fn from_str(token: &str) -> Result<Self, Self::Err> {
    match token {
      "#f" | "#F"   => return Ok(Immediate::Boolean(false)),
      "#t" | "#T"   => return Ok(Immediate::Boolean(true)),
      "NULL"        => return Ok(Immediate::Null),
      "UNSPECIFIED" => return Ok(Immediate::Unspecified),
      _ => {}
    }

    if let Ok((_, digits)) = decimal(token) {
      // Parsing only fails here on overflow, which is out of range as well.
      return digits
        .parse::<u64>()
        .ok()
        .and_then(Fixnum::new)
        .map(Immediate::Integer)
        .ok_or_else(|| OperandError::OutOfRange(token.to_string()));
    }

    if let Some(data) = token.strip_prefix(CHAR_PREFIX) {
      return parse_character(token, data);
    }

    Err(OperandError::UnrecognizedImmediate(token.to_string()))
  }
}

/// Writes the value as a literal that parses back to the same value.
impl Display for Immediate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Immediate::Integer(n)       => write!(f, "{}", n),
      Immediate::Boolean(true)    => write!(f, "#t"),
      Immediate::Boolean(false)   => write!(f, "#f"),
      Immediate::Character(c) if c.is_ascii_graphic() => {
        write!(f, "{}{}", CHAR_PREFIX, *c as char)
      }
      Immediate::Character(c)     => write!(f, "{}x{:02x}", CHAR_PREFIX, c),
      Immediate::Null             => write!(f, "NULL"),
      Immediate::Unspecified      => write!(f, "UNSPECIFIED"),
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;
  use proptest::{prelude::any, proptest};

  fn parse(token: &str) -> Result<Immediate, OperandError> {
    token.parse::<Immediate>()
  }

  #[test]
  fn booleans(){
    assert_eq!(parse("#f"), Ok(Immediate::Boolean(false)));
    assert_eq!(parse("#F"), Ok(Immediate::Boolean(false)));
    assert_eq!(parse("#t"), Ok(Immediate::Boolean(true)));
    assert_eq!(parse("#T"), Ok(Immediate::Boolean(true)));
    assert_eq!(Immediate::Boolean(false).to_bytes(), [0b0001_1111, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(Immediate::Boolean(true).to_bytes(),  [0b1001_1111, 0, 0, 0, 0, 0, 0, 0]);
  }

  #[test]
  fn null_and_unspecified(){
    assert_eq!(parse("NULL"), Ok(Immediate::Null));
    assert_eq!(parse("UNSPECIFIED"), Ok(Immediate::Unspecified));
    assert_eq!(Immediate::Null.to_bytes(), [0b0010_1111, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(Immediate::Unspecified.to_bytes(), [0xFF; 8]);
    // Literal keywords are case sensitive.
    assert!(parse("null").is_err());
  }

  #[test]
  fn integer_bounds(){
    assert_eq!(parse("0"), Immediate::integer(0));
    assert_eq!(parse("0042"), Immediate::integer(42));
    assert_eq!(parse("4611686018427387903"), Ok(Immediate::Integer(Fixnum::MAX)));

    let error = parse("4611686018427387904").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Range);
    assert_eq!(error.token(), "4611686018427387904");

    // Wider than a u64 is out of range too, not malformed.
    assert_eq!(parse("99999999999999999999999").unwrap_err().kind(), ErrorKind::Range);
  }

  #[test]
  fn integer_encoding(){
    assert_eq!(Immediate::integer(1).unwrap().encode(), 0b100);
    assert_eq!(Immediate::integer(5).unwrap().to_bytes(), [20, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(Immediate::Integer(Fixnum::MAX).encode(), 0xFFFF_FFFF_FFFF_FFFC);
  }

  #[test]
  fn integers_past_the_bound_cannot_be_built(){
    assert_eq!(Fixnum::new(MAX_INTEGER).map(|n| n.get()), Some(MAX_INTEGER));
    assert_eq!(Fixnum::new(MAX_INTEGER + 1), None);
    assert_eq!(Fixnum::new(u64::MAX), None);

    let error = Immediate::integer(MAX_INTEGER + 1).unwrap_err();
    assert_eq!(error, OperandError::OutOfRange("4611686018427387904".to_string()));
    assert_eq!(error.kind(), ErrorKind::Range);
    assert!(Fixnum::try_from(1u64 << 62).is_err());
  }

  #[test]
  fn decoded_integers_stay_in_range(){
    // The largest integer-tagged word decodes to the bound itself.
    assert_eq!(Immediate::decode(0xFFFF_FFFF_FFFF_FFFC), Some(Immediate::Integer(Fixnum::MAX)));
  }

  #[test]
  fn signed_integers_are_not_immediates(){
    assert_eq!(parse("-1"), Err(OperandError::UnrecognizedImmediate("-1".to_string())));
    assert_eq!(parse("+1"), Err(OperandError::UnrecognizedImmediate("+1".to_string())));
  }

  #[test]
  fn character_forms(){
    assert_eq!(parse("#\\a"), Ok(Immediate::Character(b'a')));
    assert_eq!(parse("#\\x41"), Ok(Immediate::Character(0x41)));
    assert_eq!(parse("#\\xfF"), Ok(Immediate::Character(0xFF)));
    // A lone `x` is the character itself.
    assert_eq!(parse("#\\x"), Ok(Immediate::Character(b'x')));
    assert_eq!(parse("#\\\\"), Ok(Immediate::Character(b'\\')));

    for bad in ["#\\ab", "#\\x4", "#\\", "#\\xg1", "#\\X41", "#\\x411", "#\\é"] {
      assert_eq!(
        parse(bad),
        Err(OperandError::UnsupportedCharacter(bad.to_string())),
        "{}", bad
      );
    }
  }

  #[test]
  fn character_encoding(){
    assert_eq!(Immediate::Character(b'A').encode(), 0x410F);
    assert_eq!(Immediate::Character(0).to_bytes(), [0x0F, 0, 0, 0, 0, 0, 0, 0]);
  }

  #[test]
  fn unrecognized(){
    for bad in ["", "foo", "#true", "1.5", "0x10", "'()"] {
      assert_eq!(parse(bad), Err(OperandError::UnrecognizedImmediate(bad.to_string())));
    }
  }

  #[test]
  fn decode_rejects_untagged_words(){
    assert_eq!(Immediate::decode(0b0011_1111), None);
    assert_eq!(Immediate::decode(0b01), None);
    assert_eq!(Immediate::decode(0b10), None);
    // Character payloads wider than a byte.
    assert_eq!(Immediate::decode(0x1_000F), None);
    // Reserved bits set above a boolean.
    assert_eq!(Immediate::decode(0x100 | tag::TRUE), None);
  }

  #[test]
  fn display_forms(){
    assert_eq!(Immediate::Character(b' ').to_string(), "#\\x20");
    assert_eq!(Immediate::Character(0x7F).to_string(), "#\\x7f");
    assert_eq!(Immediate::Character(b'x').to_string(), "#\\x");
    assert_eq!(Immediate::Null.to_string(), "NULL");
    assert_eq!(Immediate::Boolean(true).to_string(), "#t");
  }

  #[test]
  fn singletons_round_trip(){
    for value in [
      Immediate::Boolean(false),
      Immediate::Boolean(true),
      Immediate::Null,
      Immediate::Unspecified,
      Immediate::Integer(Fixnum::default()),
      Immediate::Integer(Fixnum::MAX),
    ] {
      assert_eq!(Immediate::decode(value.encode()), Some(value));
      assert_eq!(parse(&value.to_string()), Ok(value));
    }
  }

  proptest!
  {
    #[test]
    fn integers_round_trip(n in 0..=MAX_INTEGER)
    {
      let value = Immediate::integer(n).unwrap();
      assert_eq!(Immediate::decode(value.encode()), Some(value));
      assert_eq!(parse(&value.to_string()), Ok(value));
    }

    #[test]
    fn characters_round_trip(c in any::<u8>())
    {
      let value = Immediate::Character(c);
      assert_eq!(Immediate::decode(value.encode()), Some(value));
      assert_eq!(parse(&value.to_string()), Ok(value));
    }
  }
}
