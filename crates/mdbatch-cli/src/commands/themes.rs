//! `mdbatch themes` command implementation.

use crate::error::CliError;
use crate::output::write_stdout;

/// Print every theme name, one per line.
pub(crate) fn execute() -> Result<(), CliError> {
    write_stdout(mdbatch_themes::THEMES)?;
    Ok(())
}
