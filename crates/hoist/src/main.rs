//! Entry point for the `hoist` bootstrap loader.
//!
//! Delegates to [`hoist::run`], which loads configuration, checks the
//! artifact's dependency cache, and either launches the application or
//! downloads what is missing.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdin = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    hoist::run(std::env::args_os(), stdin, &mut stdout, &mut stderr)
}
