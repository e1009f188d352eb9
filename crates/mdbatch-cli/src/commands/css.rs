//! `mdbatch css` command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;
use crate::output::{Output, write_stdout};

/// Arguments for the css command.
#[derive(Args)]
pub(crate) struct CssArgs {
    /// Theme name (see `mdbatch themes`).
    theme: String,

    /// Write the stylesheet to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CssArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let css = mdbatch_themes::css(&self.theme)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, css)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => write_stdout(&[css])?,
        }
        Ok(())
    }
}
