use std::io::{self, BufRead, Write};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Outcome of validating one line of console input.
///
/// `InvalidSelection` and `BadInput` are recoverable: the console reports
/// them and asks again. `Eof` and `Io` end the session.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Your choice is not available.")]
    InvalidSelection,

    #[error("{0}")]
    BadInput(String),

    #[error("input closed")]
    Eof,

    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl PromptError {
    pub fn bad_input(msg: impl Into<String>) -> Self {
        PromptError::BadInput(msg.into())
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, PromptError::InvalidSelection | PromptError::BadInput(_))
    }
}

// ---------------------------------------------------------------------------
// Console – line-oriented prompts over any reader/writer pair
// ---------------------------------------------------------------------------

/// Console front-end.  Generic so tests can drive it with in-memory buffers.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Console::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Console { input, output }
    }

    /// Print a line of text.
    pub fn say(&mut self, text: impl std::fmt::Display) -> Result<(), PromptError> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Show `prompt` and return the next line without its line ending.
    pub fn ask_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask until `validate` accepts the answer.  Recoverable errors are
    /// printed and the prompt is repeated.
    pub fn ask_with<T>(
        &mut self,
        prompt: &str,
        mut validate: impl FnMut(&str) -> Result<T, PromptError>,
    ) -> Result<T, PromptError> {
        loop {
            let line = self.ask_line(prompt)?;
            match validate(line.trim()) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_recoverable() => self.say(&e)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Ask for a finite number.  `NaN` and `inf` parse as `f64` but are
    /// asked again.
    pub fn ask_finite(&mut self, prompt: &str) -> Result<f64, PromptError> {
        self.ask_with(prompt, |s| match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(PromptError::bad_input("Please enter a finite number.")),
            Err(_) => Err(PromptError::bad_input(format!("'{s}' is not a valid number."))),
        })
    }

    /// Ask for a strictly positive count.
    pub fn ask_count(&mut self, prompt: &str) -> Result<usize, PromptError> {
        self.ask_with(prompt, |s| match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            Ok(_) => Err(PromptError::bad_input("Please enter a number greater than zero.")),
            Err(_) => Err(PromptError::bad_input(format!("'{s}' is not a valid count."))),
        })
    }

    /// A `Y/n` question: only an exact `Y` counts as yes.
    pub fn ask_yes(&mut self, prompt: &str) -> Result<bool, PromptError> {
        Ok(self.ask_line(prompt)?.trim() == "Y")
    }

    /// Consume the console and return the writer (used by tests).
    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}
