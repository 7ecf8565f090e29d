use std::fmt::Display;
use std::io::{BufRead, Stdout, Write};

use crate::error::{MoziError, Result};

/// Interactive terminal: status lines go to `output`, answers come from `input`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<std::io::StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Console::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Write one line of status output.
    pub fn line(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }

    pub fn blank(&mut self) -> Result<()> {
        self.line("")
    }

    /// Write raw text without a trailing newline.
    pub fn write_raw(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    /// Print `prompt`, then block until the user enters a line.
    ///
    /// Returns the line without its terminator. Bytes that are not valid
    /// UTF-8 are replaced, so they read as an unrecognized answer. End of
    /// input is an error.
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Err(MoziError::InputClosed);
        }
        let answer = String::from_utf8_lossy(&raw);
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
