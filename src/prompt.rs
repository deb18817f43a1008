//! Yes/no confirmation strategies.
use std::io::{self, BufRead, Write};

/// Asks the user to confirm a destructive action.
pub trait Confirm: Send + Sync + std::fmt::Debug {
    /// Ask `question`; `true` means the action may proceed.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, question: &str) -> io::Result<bool>;
}

/// Prompts on stdout and reads one line from stdin. Anything but `y`/`yes`
/// (case-insensitive) is a no, including end of input.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{question} [y/N]: ")?;
        stdout.flush()?;
        drop(stdout);

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

/// Answers every question the same way without asking; used for `--yes`
/// and in tests.
#[derive(Debug, Clone, Copy)]
pub struct PresetConfirm(pub bool);

impl Confirm for PresetConfirm {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        Ok(self.0)
    }
}

/// Interpret a typed answer; the default is no.
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
