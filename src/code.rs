use miette::Result;

use crate::error;
use crate::ops::{ArgKind, Op};

/// Argument attached to a single instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Arg {
    None,
    Number(i64),
    Label(String),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::None => ArgKind::None,
            Arg::Number(_) => ArgKind::Number,
            Arg::Label(_) => ArgKind::Label,
        }
    }
}

/// One operation paired with a matching argument.
///
/// Fields are private so that a pair can only exist with the argument
/// kind its operation declares.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instr {
    op: Op,
    arg: Arg,
}

impl Instr {
    pub fn new(op: Op, arg: Arg) -> Result<Instr> {
        if arg.kind() != op.kind() {
            return Err(error::code_arg_mismatch(op, &arg));
        }
        Ok(Instr { op, arg })
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn arg(&self) -> &Arg {
        &self.arg
    }
}

/// Validated instruction sequence, the exchange format between the codecs
/// and the execution engine.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Code {
    instrs: Vec<Instr>,
}

impl Code {
    pub fn new(instrs: Vec<Instr>) -> Code {
        Code { instrs }
    }

    /// Build a sequence from raw pairs, rejecting any kind mismatch.
    pub fn from_pairs<I>(pairs: I) -> Result<Code>
    where
        I: IntoIterator<Item = (Op, Arg)>,
    {
        let instrs = pairs
            .into_iter()
            .map(|(op, arg)| Instr::new(op, arg))
            .collect::<Result<Vec<_>>>()?;
        Ok(Code { instrs })
    }

    pub fn get(&self, index: usize) -> Option<&Instr> {
        self.instrs.get(index)
    }

    pub fn len(&self) -> usize {
        self.instrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instrs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instr> {
        self.instrs.iter()
    }
}

impl<'a> IntoIterator for &'a Code {
    type Item = &'a Instr;
    type IntoIter = std::slice::Iter<'a, Instr>;

    fn into_iter(self) -> Self::IntoIter {
        self.instrs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_kinds_are_accepted() {
        assert!(Instr::new(Op::Swap, Arg::None).is_ok());
        assert!(Instr::new(Op::Push, Arg::Number(-2)).is_ok());
        assert!(Instr::new(Op::JumpAlways, Arg::Label("A".into())).is_ok());
    }

    #[test]
    fn kind_mismatches_are_rejected() {
        assert!(Instr::new(Op::Swap, Arg::Number(0)).is_err());
        assert!(Instr::new(Op::Push, Arg::None).is_err());
        assert!(Instr::new(Op::Push, Arg::Label("A".into())).is_err());
        assert!(Instr::new(Op::JumpAlways, Arg::Number(3)).is_err());
        assert!(Instr::new(Op::MarkLocation, Arg::None).is_err());
    }

    #[test]
    fn from_pairs_rejects_any_bad_pair() {
        let pairs = vec![
            (Op::Push, Arg::Number(1)),
            (Op::Addition, Arg::Number(2)),
        ];
        assert!(Code::from_pairs(pairs).is_err());
    }
}
