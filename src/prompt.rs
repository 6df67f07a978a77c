use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{LayerError, LayerResult};

/// Fills in values the user left off the command line.
///
/// When the session is not interactive a missing value is an error.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self::new(stdin.lock(), io::stdout(), interactive)
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Return `given` if present, otherwise ask with `question`.
    pub fn value(
        &mut self,
        flag: &'static str,
        question: &str,
        given: Option<String>,
    ) -> LayerResult<String> {
        if let Some(value) = given {
            return Ok(value);
        }
        if !self.interactive {
            return Err(LayerError::MissingInput(flag));
        }
        loop {
            write!(self.output, "{question}: ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(LayerError::MissingInput(flag));
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed.to_string());
            }
        }
    }

    /// Like [`Prompter::value`], re-asking until `parse` accepts the answer.
    pub fn parsed<T>(
        &mut self,
        flag: &'static str,
        question: &str,
        given: Option<T>,
        parse: impl Fn(&str) -> Option<T>,
    ) -> LayerResult<T> {
        if let Some(value) = given {
            return Ok(value);
        }
        loop {
            let raw = self.value(flag, question, None)?;
            match parse(&raw) {
                Some(value) => return Ok(value),
                None => writeln!(self.output, "Error: '{raw}' is not a valid choice.")?,
            }
        }
    }
}
