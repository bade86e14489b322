//! IO contract between the execution engine and its front end.

use std::collections::VecDeque;
use std::io::{stdin, stdout, IsTerminal, Read, Write};

use console::Term;
use miette::Result;

use crate::error;

/// Minimal channel surface the engine requires of a front end.
///
/// `read_character` returns `None` once the input stream is exhausted;
/// the engine reports that as an end-of-input condition that aborts the
/// run. All calls block until the channel completes.
pub trait ProcessorIo {
    fn read_number(&mut self) -> Result<i64>;
    fn read_character(&mut self) -> Result<Option<char>>;
    fn output_number(&mut self, number: i64) -> Result<()>;
    fn output_character(&mut self, character: char) -> Result<()>;
}

/// Terminal-backed IO used by the command line front end.
pub struct TermIo;

impl ProcessorIo for TermIo {
    fn read_number(&mut self) -> Result<i64> {
        let mut line = String::new();
        let read = stdin().read_line(&mut line).map_err(error::io_failed)?;
        if read == 0 {
            return Err(error::io_end_of_input());
        }
        let text = line.trim();
        text.parse().map_err(|_| error::io_bad_number(text))
    }

    fn read_character(&mut self) -> Result<Option<char>> {
        if stdin().is_terminal() {
            // Unbuffered read so a single keypress is enough.
            let term = Term::stdout();
            Ok(term.read_char().ok())
        } else {
            let mut buf = [0; 1];
            match stdin().read_exact(&mut buf) {
                Ok(()) => Ok(Some(buf[0] as char)),
                Err(_) => Ok(None),
            }
        }
    }

    fn output_number(&mut self, number: i64) -> Result<()> {
        print!("{number}");
        stdout().flush().map_err(error::io_failed)
    }

    fn output_character(&mut self, character: char) -> Result<()> {
        print!("{character}");
        stdout().flush().map_err(error::io_failed)
    }
}

/// Scripted IO: reads come from a fixed input string, writes accumulate
/// into a buffer. Used by tests and embedders that capture output.
#[derive(Default)]
pub struct PipeIo {
    input: VecDeque<char>,
    output: String,
}

impl PipeIo {
    pub fn new(input: &str) -> PipeIo {
        PipeIo {
            input: input.chars().collect(),
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

impl ProcessorIo for PipeIo {
    fn read_number(&mut self) -> Result<i64> {
        // One line of input per number, mirroring the terminal reader.
        if self.input.is_empty() {
            return Err(error::io_end_of_input());
        }
        let mut line = String::new();
        while let Some(c) = self.input.pop_front() {
            if c == '\n' {
                break;
            }
            line.push(c);
        }
        let text = line.trim();
        text.parse().map_err(|_| error::io_bad_number(text))
    }

    fn read_character(&mut self) -> Result<Option<char>> {
        Ok(self.input.pop_front())
    }

    fn output_number(&mut self, number: i64) -> Result<()> {
        self.output.push_str(&number.to_string());
        Ok(())
    }

    fn output_character(&mut self, character: char) -> Result<()> {
        self.output.push(character);
        Ok(())
    }
}
