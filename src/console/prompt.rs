use crate::console::{ConsoleError, ConsoleResult};
use std::collections::VecDeque;
use std::fmt::Display;
use std::io::{BufRead, Write};

pub const INVALID_INDEX: &str = "Bruh, there is no answer with such index.";
pub const INVALID_INPUT: &str = "Invalid input!";

/// Line output plus whitespace-separated token input. Several answers may be
/// typed on one line; they are consumed one prompt at a time.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
        }
    }

    pub fn say(&mut self, line: impl Display) -> ConsoleResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// The next answer token. Blocks until one is typed; end of input is
    /// `ConsoleError::InputClosed`.
    pub fn next_token(&mut self) -> ConsoleResult<String> {
        self.output.flush()?;
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ConsoleError::InputClosed);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
    }

    /// Keep asking until the answer is an index below `len` that `accept` allows.
    pub fn ask_index(&mut self, len: usize, accept: impl Fn(usize) -> bool) -> ConsoleResult<usize> {
        loop {
            let token = self.next_token()?;
            match token.parse::<usize>() {
                Ok(index) if index < len && accept(index) => return Ok(index),
                _ => self.say(INVALID_INDEX)?,
            }
        }
    }

    /// Print `title` and a numbered option list, then ask for one of them.
    pub fn choose<T: Display>(&mut self, title: &str, options: &[T]) -> ConsoleResult<usize> {
        self.say(title)?;
        for (index, option) in options.iter().enumerate() {
            self.say(format_args!("{}) {}", index, option))?;
        }
        self.ask_index(options.len(), |_| true)
    }

    pub fn ask_yes_no(&mut self, question: &str) -> ConsoleResult<bool> {
        self.say(question)?;
        loop {
            match self.next_token()?.as_str() {
                "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                _ => self.say(INVALID_INPUT)?,
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}
