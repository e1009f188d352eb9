//! Colored terminal output utilities.

use std::io::{self, Write};

use console::{Style, Term};

/// Terminal output formatter.
///
/// Status messages go to stderr so rendered HTML on stdout stays clean.
pub(crate) struct Output {
    term: Term,
    green: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            red: Style::new().red(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}

/// Write each chunk to stdout followed by a newline.
pub(crate) fn write_stdout<S: AsRef<str>>(chunks: &[S]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for chunk in chunks {
        stdout.write_all(chunk.as_ref().as_bytes())?;
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}
