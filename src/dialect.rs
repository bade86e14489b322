use crate::ops::Op;

/// Textual surface of one mnemonic assembly language.
///
/// One template per operation, using `{number}` and `{label}` as argument
/// placeholders, plus pattern fragments for number literals, label
/// identifiers, comment lines, and empty lines. Templates and fragments
/// are interpreted as regular-expression fragments by the assembler and
/// as literal text with substitution by the disassembler.
#[derive(Clone, Debug)]
pub struct Dialect {
    pub retrieve: String,
    pub store: String,
    pub read_number: String,
    pub read_character: String,
    pub output_number: String,
    pub output_character: String,
    pub modulo: String,
    pub integer_division: String,
    pub subtraction: String,
    pub multiplication: String,
    pub addition: String,
    pub jump_if_negative: String,
    pub end_subroutine: String,
    pub jump_if_zero: String,
    pub end_program: String,
    pub call_subroutine: String,
    pub jump_always: String,
    pub mark_location: String,
    pub slide: String,
    pub copy: String,
    pub swap: String,
    pub discard: String,
    pub duplicate: String,
    pub push: String,
    pub number: String,
    pub label: String,
    pub comment: String,
    pub empty: String,
}

impl Dialect {
    /// Dialect names accepted by [`Dialect::by_name`].
    pub const NAMES: [&'static str; 4] = ["v1", "v2", "es", "py"];

    fn from_parts(templates: [&str; 24], number: &str, label: &str, comment: &str) -> Dialect {
        let [retrieve, store, read_number, read_character, output_number, output_character, modulo, integer_division, subtraction, multiplication, addition, jump_if_negative, end_subroutine, jump_if_zero, end_program, call_subroutine, jump_always, mark_location, slide, copy, swap, discard, duplicate, push] =
            templates.map(String::from);
        Dialect {
            retrieve,
            store,
            read_number,
            read_character,
            output_number,
            output_character,
            modulo,
            integer_division,
            subtraction,
            multiplication,
            addition,
            jump_if_negative,
            end_subroutine,
            jump_if_zero,
            end_program,
            call_subroutine,
            jump_always,
            mark_location,
            slide,
            copy,
            swap,
            discard,
            duplicate,
            push,
            number: number.into(),
            label: label.into(),
            comment: comment.into(),
            empty: String::new(),
        }
    }

    /// Look up a built-in dialect by its short name.
    pub fn by_name(name: &str) -> Option<Dialect> {
        match name {
            "v1" => Some(Dialect::wsa_v1()),
            "v2" => Some(Dialect::wsa_v2()),
            "es" => Some(Dialect::wsa_es()),
            "py" => Some(Dialect::wsa_py()),
            _ => None,
        }
    }

    /// The original terse assembly language.
    pub fn wsa_v1() -> Dialect {
        Dialect::from_parts(
            [
                "     get",
                "     set",
                "     iint",
                "     ichr",
                "     oint",
                "     ochr",
                "     mod",
                "     div",
                "     sub",
                "     mul",
                "     add",
                "     less \"{label}\"",
                "     back",
                "     zero \"{label}\"",
                "     exit",
                "     call \"{label}\"",
                "     goto \"{label}\"",
                "part \"{label}\"",
                "     away {number}",
                "     copy {number}",
                "     swap",
                "     away",
                "     copy",
                "     push {number}",
            ],
            r"[+-]?\d+",
            r"\w+",
            r"#.*",
        )
    }

    /// Canonical long-name assembly language.
    pub fn wsa_v2() -> Dialect {
        Dialect::from_parts(
            [
                "    retrieve",
                "    store",
                "    read_number",
                "    read_character",
                "    output_number",
                "    output_character",
                "    modulo",
                "    integer_division",
                "    subtraction",
                "    multiplication",
                "    addition",
                "    jump_if_negative {label}",
                "    end_subroutine",
                "    jump_if_zero {label}",
                "    end_program",
                "    call_subroutine {label}",
                "    jump_always {label}",
                "{label}:",
                "    slide {number}",
                "    copy {number}",
                "    swap",
                "    discard",
                "    duplicate",
                "    push {number}",
            ],
            r"0|[+-]?[1-9]\d*",
            r"[A-Z_a-z]\w*",
            r"( {4})*#(\s.*\S)?",
        )
    }

    /// Spanish rendering of the canonical language.
    pub fn wsa_es() -> Dialect {
        Dialect::from_parts(
            [
                "    cobrar",
                "    almacenar",
                "    leer_numero",
                "    leer_caracter",
                "    imprimir_numero",
                "    imprimir_caracter",
                "    modulo",
                "    division_entera",
                "    sustraccion",
                "    multiplicacion",
                "    adicion",
                "    saltar_si_negativo {label}",
                "    terminar_subrutina",
                "    saltar_si_cero {label}",
                "    terminar_programa",
                "    llamar_subrutina {label}",
                "    saltar_siempre {label}",
                "{label}:",
                "    resbalar {number}",
                "    copiar {number}",
                "    intercambiar",
                "    desechar",
                "    duplicar",
                "    fomentar {number}",
            ],
            r"0|[+-]?[1-9]\d*",
            r"[A-Z_a-z]\w*",
            r"( {4})*#(\s.*\S)?",
        )
    }

    /// CPython-bytecode flavored rendering.
    pub fn wsa_py() -> Dialect {
        Dialect::from_parts(
            [
                "    LOAD_GLOBAL",
                "    STORE_GLOBAL",
                "    CALL_FUNCTION sys.read_int",
                "    CALL_FUNCTION sys.read_chr",
                "    CALL_FUNCTION sys.write_int",
                "    CALL_FUNCTION sys.write_chr",
                "    INPLACE_MODULO",
                "    INPLACE_FLOOR_DIVIDE",
                "    INPLACE_SUBTRACT",
                "    INPLACE_MULTIPLY",
                "    INPLACE_ADD",
                "    POP_JUMP_IF_NEGATIVE {label}",
                "    RETURN_VALUE",
                "    POP_JUMP_IF_ZERO {label}",
                "    CALL_FUNCTION sys.exit",
                "    CALL_FUNCTION {label}",
                "    JUMP_ABSOLUTE {label}",
                ">>  {label}",
                "    POP_TOS {number}",
                "    DUP_TOS {number}",
                "    ROT_TWO",
                "    POP_TOP",
                "    DUP_TOP",
                "    LOAD_CONST {number}",
            ],
            r"[+-]?([1-9]\d*|0+)",
            r"[a-zA-Z_]\w*",
            r"\s*#.*",
        )
    }

    /// Template for one operation.
    pub fn template(&self, op: Op) -> &str {
        match op {
            Op::Retrieve => &self.retrieve,
            Op::Store => &self.store,
            Op::ReadNumber => &self.read_number,
            Op::ReadCharacter => &self.read_character,
            Op::OutputNumber => &self.output_number,
            Op::OutputCharacter => &self.output_character,
            Op::Modulo => &self.modulo,
            Op::IntegerDivision => &self.integer_division,
            Op::Subtraction => &self.subtraction,
            Op::Multiplication => &self.multiplication,
            Op::Addition => &self.addition,
            Op::JumpIfNegative => &self.jump_if_negative,
            Op::EndSubroutine => &self.end_subroutine,
            Op::JumpIfZero => &self.jump_if_zero,
            Op::EndProgram => &self.end_program,
            Op::CallSubroutine => &self.call_subroutine,
            Op::JumpAlways => &self.jump_always,
            Op::MarkLocation => &self.mark_location,
            Op::Slide => &self.slide,
            Op::Copy => &self.copy,
            Op::Swap => &self.swap,
            Op::Discard => &self.discard,
            Op::Duplicate => &self.duplicate,
            Op::Push => &self.push,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        for name in Dialect::NAMES {
            assert!(Dialect::by_name(name).is_some());
        }
        assert!(Dialect::by_name("x86").is_none());
    }

    #[test]
    fn argument_operations_carry_their_placeholder() {
        use crate::ops::ArgKind;
        for dialect in Dialect::NAMES.map(|name| Dialect::by_name(name).unwrap()) {
            for op in Op::ALL {
                let template = dialect.template(op);
                match op.kind() {
                    ArgKind::None => {
                        assert!(!template.contains("{number}") && !template.contains("{label}"))
                    }
                    ArgKind::Number => assert!(template.contains("{number}")),
                    ArgKind::Label => assert!(template.contains("{label}")),
                }
            }
        }
    }
}
