//! Assembler from dialect text to validated instruction sequences.

use lazy_static::lazy_static;
use miette::Result;
use regex::Regex;

use crate::code::{Arg, Code, Instr};
use crate::dialect::Dialect;
use crate::error;
use crate::ops::{ArgKind, Op};

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
}

/// Split into lines, keeping each line's byte offset for diagnostics.
fn lines(src: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for sep in LINE_BREAK.find_iter(src) {
        out.push((start, &src[start..sep.start()]));
        start = sep.end();
    }
    out.push((start, &src[start..]));
    out
}

/// Compiled line grammar for one dialect.
///
/// The grammar is a single anchored alternation with one named group per
/// operation. Operations that take an argument get the dialect's number
/// or label fragment nested as a capture of its own, so one match yields
/// the operation and its argument text together. Comment and empty
/// alternatives close the grammar; a line matching none of them is a
/// syntax error.
pub struct Assembler {
    line: Regex,
}

impl Assembler {
    pub fn new(dialect: &Dialect) -> Result<Assembler> {
        let mut groups = Vec::with_capacity(Op::ALL.len() + 2);
        for op in Op::ALL {
            let mut expression = dialect.template(op).to_string();
            match op.kind() {
                ArgKind::None => {}
                ArgKind::Number => {
                    if !expression.contains("{number}") {
                        return Err(error::asm_missing_placeholder(op, "{number}"));
                    }
                    expression = expression.replace(
                        "{number}",
                        &format!("(?P<{}_NUMBER>{})", op.name(), dialect.number),
                    );
                }
                ArgKind::Label => {
                    if !expression.contains("{label}") {
                        return Err(error::asm_missing_placeholder(op, "{label}"));
                    }
                    expression = expression.replace(
                        "{label}",
                        &format!("(?P<{}_LABEL>{})", op.name(), dialect.label),
                    );
                }
            }
            groups.push(format!("(?P<{}>{})", op.name(), expression));
        }
        groups.push(format!("(?P<comment>{})", dialect.comment));
        groups.push(format!("(?P<empty>{})", dialect.empty));
        let line = Regex::new(&format!("^(?:{})$", groups.join("|")))
            .map_err(error::asm_bad_dialect)?;
        Ok(Assembler { line })
    }

    /// Assemble dialect text into a validated instruction sequence.
    ///
    /// Syntax errors carry the offending 1-based line number.
    pub fn assemble(&self, source: &str) -> Result<Code> {
        let mut instrs = Vec::new();
        for (index, (offset, text)) in lines(source).into_iter().enumerate() {
            let number = index + 1;
            let Some(caps) = self.line.captures(text) else {
                return Err(error::asm_unmatched_line(number, offset, text.len(), source));
            };
            if caps.name("comment").is_some() || caps.name("empty").is_some() {
                continue;
            }
            let Some(op) = Op::ALL.into_iter().find(|op| caps.name(op.name()).is_some())
            else {
                unreachable!("line grammar has one alternative per operation");
            };
            let arg = match op.kind() {
                ArgKind::None => Arg::None,
                ArgKind::Number => {
                    let text = caps
                        .name(&format!("{}_NUMBER", op.name()))
                        .expect("number operations capture their literal");
                    let value = text.as_str().parse().map_err(|_| {
                        error::asm_bad_number(
                            number,
                            offset + text.start(),
                            text.len(),
                            source,
                        )
                    })?;
                    Arg::Number(value)
                }
                ArgKind::Label => {
                    let text = caps
                        .name(&format!("{}_LABEL", op.name()))
                        .expect("label operations capture their identifier");
                    Arg::Label(text.as_str().to_string())
                }
            };
            instrs.push(Instr::new(op, arg)?);
        }
        Ok(Code::new(instrs))
    }
}
