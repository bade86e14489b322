use miette::{miette, LabeledSpan, Report, Severity};

use crate::code::Arg;
use crate::ops::Op;

// Binary codec errors

pub fn bin_unknown_instruction(offset: usize) -> Report {
    miette!(
        severity = Severity::Error,
        code = "bin::unknown_instruction",
        help = "check for stray tab, line feed, or space glyphs in the source.",
        "No instruction pattern matches the stream at symbol {offset}",
    )
}

pub fn bin_truncated_argument(op: Op) -> Report {
    miette!(
        severity = Severity::Error,
        code = "bin::truncated_argument",
        help = "number and label arguments are closed by a line feed.",
        "Source ended inside the argument of {op}",
    )
}

pub fn bin_number_overflow() -> Report {
    miette!(
        severity = Severity::Error,
        code = "bin::number_overflow",
        help = "number literals are limited to 64-bit signed values.",
        "Encoded number does not fit in 64 bits",
    )
}

pub fn bin_label_overflow() -> Report {
    miette!(
        severity = Severity::Error,
        code = "bin::label_overflow",
        help = "label ordinals are limited to 64-bit values.",
        "Encoded label does not fit in 64 bits",
    )
}

// Identifier numbering errors

pub fn ident_invalid(name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "ident::invalid_name",
        help = "labels start with a letter or underscore and continue with letters, digits, or underscores.",
        "{name:?} is not a valid label identifier",
    )
}

pub fn ident_overflow(name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "ident::overflow",
        help = "label ordinals are limited to 64-bit values.",
        "Ordinal of label {name:?} does not fit in 64 bits",
    )
}

// Instruction sequence validation errors

pub fn code_arg_mismatch(op: Op, arg: &Arg) -> Report {
    miette!(
        severity = Severity::Error,
        code = "code::arg_mismatch",
        help = "check the argument kinds declared by the instruction table.",
        "Instruction {op} expects {} argument, found {} argument",
        op.kind(),
        arg.kind(),
    )
}

// Assembler errors

pub fn asm_bad_dialect(source: regex::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::bad_dialect",
        help = "dialect templates and fragments must form valid patterns.",
        "Dialect description did not compile: {source}",
    )
}

pub fn asm_missing_placeholder(op: Op, placeholder: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::missing_placeholder",
        help = "templates for argument-taking operations must contain the placeholder.",
        "Template for {op} is missing its {placeholder} placeholder",
    )
}

pub fn asm_unmatched_line(line: usize, offset: usize, len: usize, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::unmatched_line",
        help = "every line must be an instruction, a comment, or empty.",
        labels = vec![LabeledSpan::at(offset..offset + len, "unrecognized line")],
        "Line {line}: no dialect rule matches",
    )
    .with_source_code(src.to_string())
}

pub fn asm_bad_number(line: usize, offset: usize, len: usize, src: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "asm::bad_number",
        help = "number literals are limited to 64-bit signed values.",
        labels = vec![LabeledSpan::at(offset..offset + len, "out-of-range literal")],
        "Line {line}: number literal does not fit in 64 bits",
    )
    .with_source_code(src.to_string())
}

// Resolution errors

pub fn resolve_duplicate_mark(name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "resolve::duplicate_mark",
        help = "each label may be marked at most once per program.",
        "Label {name:?} is marked twice",
    )
}

pub fn resolve_unmarked_label(name: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "resolve::unmarked_label",
        help = "every jump and call target needs a matching mark.",
        "Label {name:?} is never marked",
    )
}

// Runtime errors

pub fn run_stack_underflow() -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::stack_underflow",
        help = "the program popped more values than it pushed.",
        "Data stack underflow",
    )
}

pub fn run_call_underflow() -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::call_underflow",
        help = "end_subroutine executed without a pending call_subroutine.",
        "Return address stack underflow",
    )
}

pub fn run_division_by_zero() -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::division_by_zero",
        "Division by zero",
    )
}

pub fn run_past_end() -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::past_end",
        help = "well-formed programs finish with an explicit end_program.",
        "Execution ran past the end of the program",
    )
}

pub fn run_bad_character(value: i64) -> Report {
    miette!(
        severity = Severity::Error,
        code = "run::bad_character",
        help = "output_character requires a valid character scalar value.",
        "Value {value} is not a character",
    )
}

// IO channel conditions

pub fn io_end_of_input() -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::end_of_input",
        "Input stream is exhausted",
    )
}

pub fn io_bad_number(text: &str) -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::bad_number",
        help = "read_number expects one whole decimal number per line.",
        "Could not read a number from input {text:?}",
    )
}

pub fn io_failed(source: std::io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::failed",
        "Terminal channel failed: {source}",
    )
}
