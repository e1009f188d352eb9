//! `mdbatch render` command implementation.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use clap::Args;
use mdbatch::Extensions;
use mdbatch_config::{CliSettings, CodeStyle, Config};

use crate::error::CliError;
use crate::output::{Output, write_stdout};

/// Extension switches. Each flag enables; config file values are never
/// turned off from the command line.
#[derive(Args, Default)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct ExtensionFlags {
    /// Enable tables.
    #[arg(long)]
    tables: bool,
    /// Enable GFM footnotes.
    #[arg(long)]
    footnotes: bool,
    /// Enable strikethrough.
    #[arg(long)]
    strikethrough: bool,
    /// Enable task lists.
    #[arg(long)]
    tasklists: bool,
    /// Enable smart punctuation.
    #[arg(long)]
    smart_punctuation: bool,
    /// Enable heading attributes.
    #[arg(long)]
    heading_attributes: bool,
    /// Skip YAML front matter.
    #[arg(long, conflicts_with = "pluses_delimited_metadata_blocks")]
    yaml_style_metadata_blocks: bool,
    /// Skip `+++` delimited front matter.
    #[arg(long)]
    pluses_delimited_metadata_blocks: bool,
    /// Enable vanilla-Markdown footnotes.
    #[arg(long)]
    old_footnotes: bool,
    /// Enable blockquote alert tags.
    #[arg(long)]
    gfm: bool,
    /// Enable definition lists.
    #[arg(long)]
    definition_list: bool,
    /// Enable superscript.
    #[arg(long)]
    superscript: bool,
    /// Enable subscript.
    #[arg(long)]
    subscript: bool,
    /// Enable wikilinks.
    #[arg(long)]
    wikilinks: bool,
    /// Enable math spans, rendered for client-side typesetting.
    #[arg(long)]
    math: bool,
}

impl ExtensionFlags {
    fn to_extensions(&self) -> Extensions {
        Extensions {
            tables: self.tables,
            footnotes: self.footnotes,
            strikethrough: self.strikethrough,
            tasklists: self.tasklists,
            smart_punctuation: self.smart_punctuation,
            heading_attributes: self.heading_attributes,
            yaml_style_metadata_blocks: self.yaml_style_metadata_blocks,
            pluses_delimited_metadata_blocks: self.pluses_delimited_metadata_blocks,
            old_footnotes: self.old_footnotes,
            gfm: self.gfm,
            definition_list: self.definition_list,
            superscript: self.superscript,
            subscript: self.subscript,
            wikilinks: self.wikilinks,
            math: self.math,
        }
    }
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to render (default: read one document from stdin).
    pub(crate) files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover mdbatch.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Highlight code blocks with this theme (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// Emit CSS classes instead of inline styles for highlighted code.
    #[arg(long)]
    classed: bool,

    /// Write one `.html` file per input into this directory (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,

    #[command(flatten)]
    extensions: ExtensionFlags,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading inputs, rendering, or
    /// writing outputs fails. Nothing is written unless every document
    /// renders.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            extensions: self.extensions.to_extensions(),
            theme: self.theme,
            style: self.classed.then_some(CodeStyle::Classed),
            output_dir: self.output_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        let options = config.to_options()?;

        if self.files.is_empty() {
            output.info("Reading one document from stdin");
        }
        let documents = read_inputs(&self.files)?;
        let targets = match &config.output_dir {
            Some(dir) => Some(output_paths(&self.files, dir)?),
            None => None,
        };

        let rendered = mdbatch::render(&documents, Some(&options))?;

        match targets {
            Some(paths) => {
                if let Some(dir) = &config.output_dir {
                    std::fs::create_dir_all(dir)?;
                }
                for (path, html) in paths.iter().zip(&rendered) {
                    std::fs::write(path, html)?;
                    tracing::info!(path = %path.display(), "Wrote document");
                }
                output.success(&format!("Rendered {} document(s)", rendered.len()));
            }
            None => write_stdout(&rendered)?,
        }

        Ok(())
    }
}

/// Read every input file, or stdin when none are given.
fn read_inputs(files: &[PathBuf]) -> Result<Vec<String>, CliError> {
    if files.is_empty() {
        return Ok(vec![io::read_to_string(io::stdin())?]);
    }
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).map_err(|e| {
                CliError::Validation(format!("Failed to read {}: {e}", path.display()))
            })
        })
        .collect()
}

/// Map inputs to `<dir>/<stem>.html`, rejecting collisions.
fn output_paths(files: &[PathBuf], dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    if files.is_empty() {
        return Ok(vec![dir.join("stdin.html")]);
    }
    let mut seen = HashSet::new();
    files
        .iter()
        .map(|file| {
            let stem = file.file_stem().ok_or_else(|| {
                CliError::Validation(format!("Not a file path: {}", file.display()))
            })?;
            let mut name = stem.to_os_string();
            name.push(".html");
            let target = dir.join(name);
            if !seen.insert(target.clone()) {
                return Err(CliError::Validation(format!(
                    "Several inputs would be written to {}",
                    target.display()
                )));
            }
            Ok(target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_paths() {
        let files = vec![PathBuf::from("docs/intro.md"), PathBuf::from("guide.markdown")];
        let paths = output_paths(&files, Path::new("/out")).unwrap();
        assert_eq!(
            paths,
            vec![PathBuf::from("/out/intro.html"), PathBuf::from("/out/guide.html")]
        );
    }

    #[test]
    fn test_output_paths_keep_dotted_stems() {
        let files = vec![PathBuf::from("notes.v1.md"), PathBuf::from("notes.v2.md")];
        let paths = output_paths(&files, Path::new("/out")).unwrap();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/out/notes.v1.html"),
                PathBuf::from("/out/notes.v2.html")
            ]
        );
    }

    #[test]
    fn test_output_paths_stdin() {
        let paths = output_paths(&[], Path::new("/out")).unwrap();
        assert_eq!(paths, vec![PathBuf::from("/out/stdin.html")]);
    }

    #[test]
    fn test_output_paths_collision() {
        let files = vec![PathBuf::from("a/index.md"), PathBuf::from("b/index.md")];
        let err = output_paths(&files, Path::new("/out")).unwrap_err();
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn test_extension_flags() {
        let flags = ExtensionFlags {
            tables: true,
            math: true,
            ..Default::default()
        };
        let extensions = flags.to_extensions();
        assert!(extensions.tables);
        assert!(extensions.math);
        assert!(!extensions.footnotes);
    }
}
