//! Jump resolution from validated code to an executable program.

use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use miette::Result;

use crate::code::{Arg, Code, Instr};
use crate::error;
use crate::ops::Op;

// Mark table of label -> offset into the mark-free stream
type FxMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// One resolved instruction.
///
/// Marks are stripped during resolution and jump targets become absolute
/// offsets into the mark-free stream, so a mark can never reach the
/// engine and dispatch is an exhaustive match over this type.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Resolved {
    Retrieve,
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
    JumpIfNegative(usize),
    EndSubroutine,
    JumpIfZero(usize),
    EndProgram,
    CallSubroutine(usize),
    JumpAlways(usize),
    Slide(i64),
    Copy(i64),
    Swap,
    Discard,
    Duplicate,
    Push(i64),
}

/// Instruction sequence with all labels resolved to absolute offsets.
#[derive(Debug)]
pub struct Executable {
    instrs: Vec<Resolved>,
}

impl Executable {
    /// Two-pass label resolution over `code`.
    ///
    /// Pass one records each mark against the count of non-mark
    /// instructions emitted before it and buffers everything else. Pass
    /// two rewrites label arguments to the recorded offsets.
    pub fn resolve(code: &Code) -> Result<Executable> {
        let mut marks: FxMap<&str, usize> =
            IndexMap::with_hasher(FxBuildHasher::default());
        let mut action: Vec<&Instr> = Vec::with_capacity(code.len());
        for instr in code {
            if let (Op::MarkLocation, Arg::Label(name)) = (instr.op(), instr.arg()) {
                if marks.insert(name.as_str(), action.len()).is_some() {
                    return Err(error::resolve_duplicate_mark(name));
                }
            } else {
                action.push(instr);
            }
        }
        let instrs = action
            .into_iter()
            .map(|instr| lower(instr, &marks))
            .collect::<Result<Vec<_>>>()?;
        Ok(Executable { instrs })
    }

    pub fn get(&self, index: usize) -> Option<Resolved> {
        self.instrs.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }
}

fn lower(instr: &Instr, marks: &FxMap<&str, usize>) -> Result<Resolved> {
    let target = |name: &String| {
        marks
            .get(name.as_str())
            .copied()
            .ok_or_else(|| error::resolve_unmarked_label(name))
    };
    Ok(match (instr.op(), instr.arg()) {
        (Op::Retrieve, _) => Resolved::Retrieve,
        (Op::Store, _) => Resolved::Store,
        (Op::ReadNumber, _) => Resolved::ReadNumber,
        (Op::ReadCharacter, _) => Resolved::ReadCharacter,
        (Op::OutputNumber, _) => Resolved::OutputNumber,
        (Op::OutputCharacter, _) => Resolved::OutputCharacter,
        (Op::Modulo, _) => Resolved::Modulo,
        (Op::IntegerDivision, _) => Resolved::IntegerDivision,
        (Op::Subtraction, _) => Resolved::Subtraction,
        (Op::Multiplication, _) => Resolved::Multiplication,
        (Op::Addition, _) => Resolved::Addition,
        (Op::JumpIfNegative, Arg::Label(name)) => Resolved::JumpIfNegative(target(name)?),
        (Op::EndSubroutine, _) => Resolved::EndSubroutine,
        (Op::JumpIfZero, Arg::Label(name)) => Resolved::JumpIfZero(target(name)?),
        (Op::EndProgram, _) => Resolved::EndProgram,
        (Op::CallSubroutine, Arg::Label(name)) => Resolved::CallSubroutine(target(name)?),
        (Op::JumpAlways, Arg::Label(name)) => Resolved::JumpAlways(target(name)?),
        (Op::Slide, Arg::Number(count)) => Resolved::Slide(*count),
        (Op::Copy, Arg::Number(depth)) => Resolved::Copy(*depth),
        (Op::Swap, _) => Resolved::Swap,
        (Op::Discard, _) => Resolved::Discard,
        (Op::Duplicate, _) => Resolved::Duplicate,
        (Op::Push, Arg::Number(value)) => Resolved::Push(*value),
        // Argument kinds are enforced when the Code is built, and marks
        // are consumed by pass one.
        _ => unreachable!("malformed instruction survived validation"),
    })
}
