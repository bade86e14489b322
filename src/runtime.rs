//! Virtual machine: the data stack, sparse heap, and the fetch-decode-
//! execute loop over a resolved program.

use fxhash::FxHashMap;
use miette::Result;

use crate::error;
use crate::exec::{Executable, Resolved};
use crate::io::ProcessorIo;

/// LIFO data stack of the virtual machine.
#[derive(Default, Debug)]
pub struct Stack {
    values: Vec<i64>,
}

impl Stack {
    pub fn new() -> Stack {
        Stack::default()
    }

    pub fn push(&mut self, value: i64) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<i64> {
        self.values.pop().ok_or_else(error::run_stack_underflow)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn top_mut(&mut self) -> Result<&mut i64> {
        self.values.last_mut().ok_or_else(error::run_stack_underflow)
    }

    /// Replace the top two values with `second % top`, flooring.
    pub fn modulo(&mut self) -> Result<()> {
        let value = self.pop()?;
        let top = self.top_mut()?;
        *top = floor_mod(*top, value)?;
        Ok(())
    }

    /// Replace the top two values with `second / top`, flooring.
    pub fn integer_division(&mut self) -> Result<()> {
        let value = self.pop()?;
        let top = self.top_mut()?;
        *top = floor_div(*top, value)?;
        Ok(())
    }

    pub fn subtraction(&mut self) -> Result<()> {
        let value = self.pop()?;
        let top = self.top_mut()?;
        *top = top.wrapping_sub(value);
        Ok(())
    }

    pub fn multiplication(&mut self) -> Result<()> {
        let value = self.pop()?;
        let top = self.top_mut()?;
        *top = top.wrapping_mul(value);
        Ok(())
    }

    pub fn addition(&mut self) -> Result<()> {
        let value = self.pop()?;
        let top = self.top_mut()?;
        *top = top.wrapping_add(value);
        Ok(())
    }

    /// Keep the top value and discard `count` values beneath it.
    pub fn slide(&mut self, count: i64) -> Result<()> {
        let top = self.pop()?;
        for _ in 0..count.max(0) {
            self.pop()?;
        }
        self.push(top);
        Ok(())
    }

    /// Push a duplicate of the value `depth` positions below the top.
    pub fn copy(&mut self, depth: i64) -> Result<()> {
        let index = usize::try_from(depth)
            .ok()
            .and_then(|depth| self.values.len().checked_sub(depth + 1))
            .ok_or_else(error::run_stack_underflow)?;
        self.push(self.values[index]);
        Ok(())
    }

    pub fn swap(&mut self) -> Result<()> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(a);
        self.push(b);
        Ok(())
    }

    pub fn discard(&mut self) -> Result<()> {
        self.pop().map(drop)
    }

    pub fn duplicate(&mut self) -> Result<()> {
        let top = *self.values.last().ok_or_else(error::run_stack_underflow)?;
        self.push(top);
        Ok(())
    }
}

// Quotients round toward negative infinity and remainders take the sign
// of the divisor.

fn floor_div(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(error::run_division_by_zero());
    }
    if b == -1 {
        return Ok(a.wrapping_neg());
    }
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

fn floor_mod(a: i64, b: i64) -> Result<i64> {
    if b == 0 {
        return Err(error::run_division_by_zero());
    }
    if b == -1 {
        return Ok(0);
    }
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

/// Sparse memory addressed by integers. Unset addresses read as zero.
#[derive(Default, Debug)]
pub struct Heap {
    cells: FxHashMap<i64, i64>,
}

impl Heap {
    pub fn new() -> Heap {
        Heap::default()
    }

    pub fn retrieve(&self, address: i64) -> i64 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Store `value` at `address`. Zero clears the cell so the map stays
    /// sparse.
    pub fn store(&mut self, value: i64, address: i64) {
        if value == 0 {
            self.cells.remove(&address);
        } else {
            self.cells.insert(address, value);
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Executes a resolved program against the IO contract.
///
/// The loop is purely sequential. Each step fetches at the instruction
/// pointer, advances it, then dispatches; any runtime or channel failure
/// aborts the run with stack and heap left as last mutated.
pub struct Processor<I> {
    exe: Executable,
    io: I,
}

impl<I: ProcessorIo> Processor<I> {
    pub fn new(exe: Executable, io: I) -> Processor<I> {
        Processor { exe, io }
    }

    /// Run to completion. Returns once `end_program` executes.
    pub fn run(&mut self) -> Result<()> {
        let mut stack = Stack::new();
        let mut heap = Heap::new();
        let mut call: Vec<usize> = Vec::new();
        let mut index = 0;
        loop {
            let instr = self.exe.get(index).ok_or_else(error::run_past_end)?;
            index += 1;
            match instr {
                Resolved::Retrieve => {
                    let address = stack.pop()?;
                    stack.push(heap.retrieve(address));
                }
                Resolved::Store => {
                    let value = stack.pop()?;
                    let address = stack.pop()?;
                    heap.store(value, address);
                }
                Resolved::ReadNumber => {
                    let address = stack.pop()?;
                    heap.store(self.io.read_number()?, address);
                }
                Resolved::ReadCharacter => {
                    let address = stack.pop()?;
                    let character = self
                        .io
                        .read_character()?
                        .ok_or_else(error::io_end_of_input)?;
                    heap.store(character as i64, address);
                }
                Resolved::OutputNumber => {
                    let value = stack.pop()?;
                    self.io.output_number(value)?;
                }
                Resolved::OutputCharacter => {
                    let value = stack.pop()?;
                    let character = u32::try_from(value)
                        .ok()
                        .and_then(char::from_u32)
                        .ok_or_else(|| error::run_bad_character(value))?;
                    self.io.output_character(character)?;
                }
                Resolved::Modulo => stack.modulo()?,
                Resolved::IntegerDivision => stack.integer_division()?,
                Resolved::Subtraction => stack.subtraction()?,
                Resolved::Multiplication => stack.multiplication()?,
                Resolved::Addition => stack.addition()?,
                Resolved::JumpIfNegative(target) => {
                    if stack.pop()? < 0 {
                        index = target;
                    }
                }
                Resolved::EndSubroutine => {
                    index = call.pop().ok_or_else(error::run_call_underflow)?;
                }
                Resolved::JumpIfZero(target) => {
                    if stack.pop()? == 0 {
                        index = target;
                    }
                }
                Resolved::EndProgram => return Ok(()),
                Resolved::CallSubroutine(target) => {
                    call.push(index);
                    index = target;
                }
                Resolved::JumpAlways(target) => index = target,
                Resolved::Slide(count) => stack.slide(count)?,
                Resolved::Copy(depth) => stack.copy(depth)?,
                Resolved::Swap => stack.swap()?,
                Resolved::Discard => stack.discard()?,
                Resolved::Duplicate => stack.duplicate()?,
                Resolved::Push(value) => stack.push(value),
            }
        }
    }

    /// Give the channel back, for callers that capture output.
    pub fn into_io(self) -> I {
        self.io
    }
}
