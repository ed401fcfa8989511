//! Operator confirmation before any network activity.
//!
//! Resolution asks a [`ConfirmationGate`] exactly once per run. The
//! interactive [`TerminalGate`] keeps asking until it gets a yes or a no;
//! [`PolicyGate`] answers without asking, for unattended installs.

use std::io::{BufRead, Write};

use crate::error::ConfirmError;

/// Prefix shared by every line the loader writes for the operator.
pub const STATUS_PREFIX: &str = "[hoist] ";

/// Obtains a yes/no decision from the operator.
pub trait ConfirmationGate {
    /// Presents `prompt` and returns the decision.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmError`] when no decision could be obtained.
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError>;
}

impl<G: ConfirmationGate + ?Sized> ConfirmationGate for &mut G {
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError> {
        (**self).confirm(prompt)
    }
}

/// Interactive gate reading answers line by line.
///
/// # Example
///
/// ```
/// use hoist_resolver::{ConfirmationGate, TerminalGate};
///
/// let mut output = Vec::new();
/// let mut gate = TerminalGate::new(&b"maybe\nYes\n"[..], &mut output);
/// assert!(gate.confirm("Download 2 missing dependencies?")?);
/// # Ok::<(), hoist_resolver::ConfirmError>(())
/// ```
#[derive(Debug)]
pub struct TerminalGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalGate<R, W> {
    /// Creates a gate over the given input and output streams.
    #[must_use]
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmationGate for TerminalGate<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError> {
        loop {
            write!(self.output, "{STATUS_PREFIX}{prompt} [y/n]: ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(ConfirmError::InputClosed);
            }
            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Non-interactive gate with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGate {
    answer: bool,
}

impl PolicyGate {
    /// Gate that always accepts.
    #[must_use]
    pub const fn assume_yes() -> Self {
        Self { answer: true }
    }

    /// Gate that always declines.
    #[must_use]
    pub const fn assume_no() -> Self {
        Self { answer: false }
    }
}

impl ConfirmationGate for PolicyGate {
    fn confirm(&mut self, _prompt: &str) -> Result<bool, ConfirmError> {
        Ok(self.answer)
    }
}
