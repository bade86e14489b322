//! Disassembler from instruction sequences to dialect text.

use crate::code::{Arg, Code};
use crate::dialect::Dialect;

/// Renders instruction sequences as one line per instruction in a fixed
/// dialect. One disassembler may serve any number of sequences.
pub struct Disassembler {
    dialect: Dialect,
}

impl Disassembler {
    pub fn new(dialect: &Dialect) -> Disassembler {
        Disassembler {
            dialect: dialect.clone(),
        }
    }

    pub fn disassemble(&self, code: &Code) -> String {
        let mut lines = Vec::with_capacity(code.len());
        for instr in code {
            let template = self.dialect.template(instr.op());
            lines.push(match instr.arg() {
                Arg::None => template.to_string(),
                Arg::Number(number) => template.replace("{number}", &number.to_string()),
                Arg::Label(name) => template.replace("{label}", name),
            });
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::Assembler;
    use crate::code::Arg;
    use crate::ops::Op;

    fn full_code() -> Code {
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
    fn renders_the_original_language() {
        let expected = "\
     get
     set
     iint
     ichr
     oint
     ochr
     mod
     div
     sub
     mul
     add
     less \"A\"
     back
     zero \"B\"
     exit
     call \"C\"
     goto \"D\"
part \"E\"
     away 0
     copy 1
     swap
     away
     copy
     push -2";
        let disasm = Disassembler::new(&Dialect::wsa_v1());
        assert_eq!(disasm.disassemble(&full_code()), expected);
    }

    #[test]
    fn renders_the_canonical_language() {
        let expected = "\
    retrieve
    store
    read_number
    read_character
    output_number
    output_character
    modulo
    integer_division
    subtraction
    multiplication
    addition
    jump_if_negative A
    end_subroutine
    jump_if_zero B
    end_program
    call_subroutine C
    jump_always D
E:
    slide 0
    copy 1
    swap
    discard
    duplicate
    push -2";
        let disasm = Disassembler::new(&Dialect::wsa_v2());
        assert_eq!(disasm.disassemble(&full_code()), expected);
    }

    #[test]
    fn every_dialect_round_trips_through_its_own_assembler() {
        let code = full_code();
        for name in Dialect::NAMES {
            let dialect = Dialect::by_name(name).unwrap();
            let text = Disassembler::new(&dialect).disassemble(&code);
            let back = Assembler::new(&dialect).unwrap().assemble(&text).unwrap();
            assert_eq!(back, code, "dialect {name}");
        }
    }

    #[test]
    fn dialects_agree_through_the_shared_sequence() {
        let code = full_code();
        let via_v1 = {
            let text = Disassembler::new(&Dialect::wsa_v1()).disassemble(&code);
            Assembler::new(&Dialect::wsa_v1()).unwrap().assemble(&text).unwrap()
        };
        let via_es = {
            let text = Disassembler::new(&Dialect::wsa_es()).disassemble(&code);
            Assembler::new(&Dialect::wsa_es()).unwrap().assemble(&text).unwrap()
        };
        assert_eq!(via_v1, via_es);
    }
}
