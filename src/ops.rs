use std::fmt;

use lazy_static::lazy_static;

use crate::symbol::Symbol;

/// Operations of the virtual machine, in wire-format order.
///
/// The discriminants index [`table`] directly and double as the opcode
/// values of the instruction sequence format.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Op {
    Retrieve = 0,
    Store,
    ReadNumber,
    ReadCharacter,
    OutputNumber,
    OutputCharacter,
    Modulo,
    IntegerDivision,
    Subtraction,
    Multiplication,
    Addition,
    JumpIfNegative,
    EndSubroutine,
    JumpIfZero,
    EndProgram,
    CallSubroutine,
    JumpAlways,
    MarkLocation,
    Slide,
    Copy,
    Swap,
    Discard,
    Duplicate,
    Push,
}

/// Kind of argument an operation carries in both program representations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgKind {
    None,
    Number,
    Label,
}

/// Decoding data for one instruction: its trinary pattern, the kind of
/// argument that follows it, and the operation it selects.
pub struct Prototype {
    pub pattern: &'static [Symbol],
    pub kind: ArgKind,
    pub op: Op,
}

////////////////////////////////////////
// Tab    Heap Access
//        Tab   Retrieve
//        Space Store
////////////////////////////////////////
// Tab Line    I/O
//        Tab Tab     Read Number
//        Tab Space   Read Character
//        Space Tab   Output Number
//        Space Space Output Character
////////////////////////////////////////
// Tab Space   Arithmetic
//        Tab Tab     Modulo
//        Tab Space   Integer Division
//        Space Tab   Subtraction
//        Space Line  Multiplication
//        Space Space Addition
////////////////////////////////////////
// Line   Flow Control
//        Tab Tab     Jump If Negative
//        Tab Line    End Subroutine
//        Tab Space   Jump If Zero
//        Line Line   End Program
//        Space Tab   Call Subroutine
//        Space Line  Jump Always
//        Space Space Mark Location
////////////////////////////////////////
// Space  Stack Manipulation
//        Tab Line    Slide
//        Tab Space   Copy
//        Line Tab    Swap
//        Line Line   Discard
//        Line Space  Duplicate
//        Space       Push
////////////////////////////////////////

use Symbol::{Line as N, Space as S, Tab as T};

static TABLE: [Prototype; 24] = [
    Prototype { pattern: &[T, T, T], kind: ArgKind::None, op: Op::Retrieve },
    Prototype { pattern: &[T, T, S], kind: ArgKind::None, op: Op::Store },
    Prototype { pattern: &[T, N, T, T], kind: ArgKind::None, op: Op::ReadNumber },
    Prototype { pattern: &[T, N, T, S], kind: ArgKind::None, op: Op::ReadCharacter },
    Prototype { pattern: &[T, N, S, T], kind: ArgKind::None, op: Op::OutputNumber },
    Prototype { pattern: &[T, N, S, S], kind: ArgKind::None, op: Op::OutputCharacter },
    Prototype { pattern: &[T, S, T, T], kind: ArgKind::None, op: Op::Modulo },
    Prototype { pattern: &[T, S, T, S], kind: ArgKind::None, op: Op::IntegerDivision },
    Prototype { pattern: &[T, S, S, T], kind: ArgKind::None, op: Op::Subtraction },
    Prototype { pattern: &[T, S, S, N], kind: ArgKind::None, op: Op::Multiplication },
    Prototype { pattern: &[T, S, S, S], kind: ArgKind::None, op: Op::Addition },
    Prototype { pattern: &[N, T, T], kind: ArgKind::Label, op: Op::JumpIfNegative },
    Prototype { pattern: &[N, T, N], kind: ArgKind::None, op: Op::EndSubroutine },
    Prototype { pattern: &[N, T, S], kind: ArgKind::Label, op: Op::JumpIfZero },
    Prototype { pattern: &[N, N, N], kind: ArgKind::None, op: Op::EndProgram },
    Prototype { pattern: &[N, S, T], kind: ArgKind::Label, op: Op::CallSubroutine },
    Prototype { pattern: &[N, S, N], kind: ArgKind::Label, op: Op::JumpAlways },
    Prototype { pattern: &[N, S, S], kind: ArgKind::Label, op: Op::MarkLocation },
    Prototype { pattern: &[S, T, N], kind: ArgKind::Number, op: Op::Slide },
    Prototype { pattern: &[S, T, S], kind: ArgKind::Number, op: Op::Copy },
    Prototype { pattern: &[S, N, T], kind: ArgKind::None, op: Op::Swap },
    Prototype { pattern: &[S, N, N], kind: ArgKind::None, op: Op::Discard },
    Prototype { pattern: &[S, N, S], kind: ArgKind::None, op: Op::Duplicate },
    Prototype { pattern: &[S, S], kind: ArgKind::Number, op: Op::Push },
];

lazy_static! {
    static ref CHECKED: &'static [Prototype; 24] = {
        check_table(&TABLE);
        &TABLE
    };
}

/// The fixed instruction catalogue, validated on first access.
pub fn table() -> &'static [Prototype; 24] {
    *CHECKED
}

fn check_table(table: &[Prototype; 24]) {
    for (index, proto) in table.iter().enumerate() {
        assert_eq!(proto.op as usize, index, "opcodes must follow table order");
    }
    // Patterns in ascending order makes the table order agree with both
    // sort keys at once.
    for pair in table.windows(2) {
        assert!(
            pair[0].pattern < pair[1].pattern,
            "patterns must follow table order"
        );
    }
    // Greedy decoding relies on at most one pattern matching the head of
    // the stream.
    for a in table {
        for b in table {
            assert!(
                a.op == b.op || !b.pattern.starts_with(a.pattern),
                "pattern for {} prefixes pattern for {}",
                a.op,
                b.op
            );
        }
    }
}

impl Op {
    pub const ALL: [Op; 24] = [
        Op::Retrieve,
        Op::Store,
        Op::ReadNumber,
        Op::ReadCharacter,
        Op::OutputNumber,
        Op::OutputCharacter,
        Op::Modulo,
        Op::IntegerDivision,
        Op::Subtraction,
        Op::Multiplication,
        Op::Addition,
        Op::JumpIfNegative,
        Op::EndSubroutine,
        Op::JumpIfZero,
        Op::EndProgram,
        Op::CallSubroutine,
        Op::JumpAlways,
        Op::MarkLocation,
        Op::Slide,
        Op::Copy,
        Op::Swap,
        Op::Discard,
        Op::Duplicate,
        Op::Push,
    ];

    /// Operation name as used by dialect descriptions and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Op::Retrieve => "retrieve",
            Op::Store => "store",
            Op::ReadNumber => "read_number",
            Op::ReadCharacter => "read_character",
            Op::OutputNumber => "output_number",
            Op::OutputCharacter => "output_character",
            Op::Modulo => "modulo",
            Op::IntegerDivision => "integer_division",
            Op::Subtraction => "subtraction",
            Op::Multiplication => "multiplication",
            Op::Addition => "addition",
            Op::JumpIfNegative => "jump_if_negative",
            Op::EndSubroutine => "end_subroutine",
            Op::JumpIfZero => "jump_if_zero",
            Op::EndProgram => "end_program",
            Op::CallSubroutine => "call_subroutine",
            Op::JumpAlways => "jump_always",
            Op::MarkLocation => "mark_location",
            Op::Slide => "slide",
            Op::Copy => "copy",
            Op::Swap => "swap",
            Op::Discard => "discard",
            Op::Duplicate => "duplicate",
            Op::Push => "push",
        }
    }

    pub fn kind(self) -> ArgKind {
        table()[self as usize].kind
    }

    pub fn pattern(self) -> &'static [Symbol] {
        table()[self as usize].pattern
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::None => "no",
            ArgKind::Number => "number",
            ArgKind::Label => "label",
        })
    }
}
