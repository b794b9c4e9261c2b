//! Candidate file discovery

use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{Error, Result};
use crate::report::{Event, Reporter};

/// List the files directly inside `dir` whose name matches `pattern`.
///
/// Order is whatever the directory listing yields. Subdirectories are not
/// searched. An empty result is not an error.
pub fn find_xml_files(
    dir: &Path,
    pattern: &Pattern,
    reporter: &mut dyn Reporter,
) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, &e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, &e))?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if matches && path.is_file() {
            files.push(path);
        }
    }

    reporter.report(Event::Discovered {
        dir: dir.to_path_buf(),
        count: files.len(),
    });
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RecordingReporter;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn xml_pattern() -> std::result::Result<Pattern, glob::PatternError> {
        Pattern::new("*.xml")
    }

    #[test]
    fn test_finds_only_matching_files() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("a.xml"), "<urlset/>")?;
        std::fs::write(dir.path().join("b.xml"), "<urlset/>")?;
        std::fs::write(dir.path().join("notes.txt"), "nope")?;
        std::fs::write(dir.path().join("c.xml.bak"), "nope")?;
        std::fs::create_dir(dir.path().join("nested.xml"))?;
        std::fs::create_dir(dir.path().join("sub"))?;
        std::fs::write(dir.path().join("sub").join("d.xml"), "<urlset/>")?;

        let mut recorder = RecordingReporter::new();
        let mut files = find_xml_files(dir.path(), &xml_pattern()?, &mut recorder)?;
        files.sort();

        assert_eq!(
            files,
            vec![dir.path().join("a.xml"), dir.path().join("b.xml")]
        );
        assert_eq!(
            recorder.events,
            vec![Event::Discovered {
                dir: dir.path().to_path_buf(),
                count: 2
            }]
        );
        Ok(())
    }

    #[test]
    fn test_empty_directory() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut recorder = RecordingReporter::new();
        let files = find_xml_files(dir.path(), &xml_pattern()?, &mut recorder)?;
        assert!(files.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_io_error() -> TestResult {
        let mut recorder = RecordingReporter::new();
        let result = find_xml_files(
            Path::new("no/such/input/dir"),
            &xml_pattern()?,
            &mut recorder,
        );
        assert!(result.is_err());
        assert!(recorder.events.is_empty());
        Ok(())
    }
}
