//! Binary codec between raw trinary source and validated [`Code`].
//!
//! Instructions decode greedily: the pattern set is prefix-free, so the
//! first (and only) pattern matching the stream head is the instruction.
//! Number and label arguments follow as bit strings read one symbol at a
//! time until a line feed terminator. `Tab` is a one bit, `Space` a zero
//! bit.

use miette::Result;

use crate::code::{Arg, Code, Instr};
use crate::error;
use crate::ident;
use crate::ops::{table, ArgKind, Op};
use crate::symbol::{Symbol, SymbolStream};

/// Compile raw source into a validated instruction sequence.
pub fn compile(source: &str) -> Result<Code> {
    let mut stream = SymbolStream::new(source);
    let mut instrs = Vec::new();
    'stream: while !stream.is_empty() {
        for proto in table() {
            if stream.consume(proto.pattern) {
                let arg = match proto.kind {
                    ArgKind::None => Arg::None,
                    ArgKind::Number => Arg::Number(parse_number(&mut stream, proto.op)?),
                    ArgKind::Label => Arg::Label(parse_label(&mut stream, proto.op)?),
                };
                instrs.push(Instr::new(proto.op, arg)?);
                continue 'stream;
            }
        }
        return Err(error::bin_unknown_instruction(stream.consumed()));
    }
    Ok(Code::new(instrs))
}

/// Decompile a validated instruction sequence back into source text.
pub fn decompile(code: &Code) -> Result<String> {
    let mut out: Vec<Symbol> = Vec::new();
    for instr in code {
        out.extend_from_slice(instr.op().pattern());
        match instr.arg() {
            Arg::None => continue,
            Arg::Number(number) => push_number_bits(*number, &mut out),
            Arg::Label(name) => push_label_bits(name, &mut out)?,
        }
        // Argument values are closed by a line feed.
        out.push(Symbol::Line);
    }
    Ok(out.into_iter().map(Symbol::as_char).collect())
}

/// Read bits up to the line feed terminator.
fn parse_bits(stream: &mut SymbolStream, op: Op) -> Result<Vec<bool>> {
    let mut bits = Vec::new();
    loop {
        match stream.pop() {
            Some(Symbol::Line) => return Ok(bits),
            Some(sym) => bits.push(sym == Symbol::Tab),
            None => return Err(error::bin_truncated_argument(op)),
        }
    }
}

fn bits_to_magnitude(bits: &[bool]) -> Option<u64> {
    let mut value: u64 = 0;
    for &bit in bits {
        value = value.checked_mul(2)?.checked_add(bit as u64)?;
    }
    Some(value)
}

/// Sign-and-magnitude number: the first bit is the sign, the rest are
/// the magnitude most-significant first. An empty bit string is zero.
fn parse_number(stream: &mut SymbolStream, op: Op) -> Result<i64> {
    let bits = parse_bits(stream, op)?;
    let Some((&negative, magnitude)) = bits.split_first() else {
        return Ok(0);
    };
    let value = bits_to_magnitude(magnitude)
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(error::bin_number_overflow)?;
    Ok(if negative { -value } else { value })
}

/// A label bit string of length L has ordinal `value + 2^L - 1`, placing
/// it after every shorter bit string in the enumeration.
fn parse_label(stream: &mut SymbolStream, op: Op) -> Result<String> {
    let bits = parse_bits(stream, op)?;
    let value = bits_to_magnitude(&bits).ok_or_else(error::bin_label_overflow)?;
    let base = 1u64
        .checked_shl(bits.len() as u32)
        .and_then(|v| v.checked_sub(1))
        .ok_or_else(error::bin_label_overflow)?;
    let ordinal = value
        .checked_add(base)
        .ok_or_else(error::bin_label_overflow)?;
    Ok(ident::number_to_name(ordinal))
}

fn bit_symbol(bit: bool) -> Symbol {
    if bit {
        Symbol::Tab
    } else {
        Symbol::Space
    }
}

fn push_number_bits(number: i64, out: &mut Vec<Symbol>) {
    if number == 0 {
        return;
    }
    out.push(bit_symbol(number < 0));
    let magnitude = number.unsigned_abs();
    let top = 63 - magnitude.leading_zeros();
    for shift in (0..=top).rev() {
        out.push(bit_symbol(magnitude >> shift & 1 == 1));
    }
}

fn push_label_bits(name: &str, out: &mut Vec<Symbol>) -> Result<()> {
    let ordinal = ident::name_to_number(name)?;
    // Invert the length-first enumeration: ordinals of length-L bit
    // strings start at 2^L - 1.
    let next = ordinal as u128 + 1;
    let size = 127 - next.leading_zeros();
    let rest = next - (1u128 << size);
    for shift in (0..size).rev() {
        out.push(bit_symbol(rest >> shift & 1 == 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // One of every instruction, with arguments in canonical encoding.
    const EXERCISER: &str = concat!(
        "\t\t\t",
        "\t\t ",
        "\t\n\t\t",
        "\t\n\t ",
        "\t\n \t",
        "\t\n  ",
        "\t \t\t",
        "\t \t ",
        "\t  \t",
        "\t  \n",
        "\t   ",
        "\n\t\t", "\n",
        "\n\t\n",
        "\n\t ", " \n",
        "\n\n\n",
        "\n \t", "\t\n",
        "\n \n", "  \n",
        "\n  ", " \t\n",
        " \t\n", "\n",
        " \t ", " \t\n",
        " \n\t",
        " \n\n",
        " \n ",
        "  ", "\t\t \n",
    );

    fn exerciser_code() -> Code {
        Code::from_pairs(vec![
            (Op::Retrieve, Arg::None),
            (Op::Store, Arg::None),
            (Op::ReadNumber, Arg::None),
            (Op::ReadCharacter, Arg::None),
            (Op::OutputNumber, Arg::None),
            (Op::OutputCharacter, Arg::None),
            (Op::Modulo, Arg::None),
            (Op::IntegerDivision, Arg::None),
            (Op::Subtraction, Arg::None),
            (Op::Multiplication, Arg::None),
            (Op::Addition, Arg::None),
            (Op::JumpIfNegative, Arg::Label("A".into())),
            (Op::EndSubroutine, Arg::None),
            (Op::JumpIfZero, Arg::Label("B".into())),
            (Op::EndProgram, Arg::None),
            (Op::CallSubroutine, Arg::Label("C".into())),
            (Op::JumpAlways, Arg::Label("D".into())),
            (Op::MarkLocation, Arg::Label("E".into())),
            (Op::Slide, Arg::Number(0)),
            (Op::Copy, Arg::Number(1)),
            (Op::Swap, Arg::None),
            (Op::Discard, Arg::None),
            (Op::Duplicate, Arg::None),
            (Op::Push, Arg::Number(-2)),
        ])
        .unwrap()
    }

    #[test]
    fn compiles_every_instruction() {
        assert_eq!(compile(EXERCISER).unwrap(), exerciser_code());
    }

    #[test]
    fn decompile_inverts_compile_symbol_for_symbol() {
        let code = compile(EXERCISER).unwrap();
        assert_eq!(decompile(&code).unwrap(), EXERCISER);
    }

    #[test]
    fn commentary_text_is_ignored() {
        // Push 3, output it, halt, with prose interleaved.
        let source = "push:   \t\t\nprint:\t\n \tdone:\n\n\n";
        let code = compile(source).unwrap();
        assert_eq!(
            code,
            Code::from_pairs(vec![
                (Op::Push, Arg::Number(3)),
                (Op::OutputNumber, Arg::None),
                (Op::EndProgram, Arg::None),
            ])
            .unwrap()
        );
    }

    #[test]
    fn number_arguments_round_trip() {
        for number in [0, 1, -1, 2, 7, -7, 63, 64, -100, i64::MAX, 1 - i64::MAX] {
            let code = Code::from_pairs(vec![(Op::Push, Arg::Number(number))]).unwrap();
            let source = decompile(&code).unwrap();
            assert_eq!(compile(&source).unwrap(), code, "number {number}");
        }
    }

    #[test]
    fn zero_encodes_as_bare_terminator() {
        let code = Code::from_pairs(vec![(Op::Push, Arg::Number(0))]).unwrap();
        assert_eq!(decompile(&code).unwrap(), "  \n");
    }

    #[test]
    fn label_arguments_round_trip() {
        for name in ["A", "B", "Z", "_", "z", "A0", "Az", "next_word", "LOOP2"] {
            let code =
                Code::from_pairs(vec![(Op::JumpAlways, Arg::Label(name.into()))]).unwrap();
            let source = decompile(&code).unwrap();
            assert_eq!(compile(&source).unwrap(), code, "label {name}");
        }
    }

    #[test]
    fn short_label_bit_strings_decode_in_enumeration_order() {
        // Empty bits, then 0, then 1, then 00.
        for (bits, name) in [("", "A"), (" ", "B"), ("\t", "C"), ("  ", "D")] {
            let source = format!("\n \n{bits}\n");
            let code = compile(&source).unwrap();
            assert_eq!(
                code,
                Code::from_pairs(vec![(Op::JumpAlways, Arg::Label(name.into()))]).unwrap()
            );
        }
    }

    #[test]
    fn unmatched_pattern_is_an_error() {
        // A lone line feed matches no instruction prefix.
        assert!(compile("\n").is_err());
    }

    #[test]
    fn truncated_argument_is_an_error() {
        // Push whose bits never reach a terminator.
        assert!(compile("  \t\t").is_err());
    }

    #[test]
    fn invalid_label_fails_decompilation() {
        let code =
            Code::from_pairs(vec![(Op::JumpAlways, Arg::Label("not valid".into()))]).unwrap();
        assert!(decompile(&code).is_err());
    }
}
