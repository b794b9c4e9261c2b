//! Rendering the unified document and writing it to disk

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::report::{Event, Reporter};
use crate::xml::{pretty_print, writer, Element, FormatConfig};

/// Render `root` as indented XML without declaration or blank lines.
///
/// The tree is serialized compactly first and then re-parsed for printing, so
/// the output only ever reflects what the compact form can express.
pub fn render(root: &Element, config: &FormatConfig) -> Result<String> {
    let compact = writer::element_to_string(root);
    let pretty = pretty_print(&compact, config)?;
    Ok(remove_blank_lines(&pretty))
}

/// Drop every empty or whitespace-only line and join the rest with `\n`
pub fn remove_blank_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `bytes` to `path`, creating missing parent directories.
///
/// The bytes go to a temporary file next to `path` which is then renamed over
/// it, so readers see either the old file or the complete new one.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, &e))?;

    let mut file = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, &e))?;
    file.write_all(bytes).map_err(|e| Error::io(path, &e))?;
    file.persist(path).map_err(|e| Error::io(path, &e.error))?;
    Ok(())
}

/// Render and write the document, reporting the outcome
pub fn save(
    root: &Element,
    path: &Path,
    config: &FormatConfig,
    reporter: &mut dyn Reporter,
) -> Result<()> {
    let result = render(root, config).and_then(|text| write_output(path, text.as_bytes()));

    match &result {
        Ok(()) => reporter.report(Event::Saved {
            path: path.to_path_buf(),
        }),
        Err(error) => reporter.report(Event::SaveFailed {
            path: path.to_path_buf(),
            error: error.clone(),
        }),
    }
    result
}
