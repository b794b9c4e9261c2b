//! Run configuration

use std::path::PathBuf;

use crate::xml::{self, FormatConfig};

/// Directory scanned when none is given
pub const DEFAULT_INPUT_DIR: &str = "files";
/// Output written when none is given
pub const DEFAULT_OUTPUT_FILE: &str = "output/final_list.xml";
/// File names considered sitemap fragments
pub const DEFAULT_PATTERN: &str = "*.xml";

/// Configuration for one merge run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnifyConfig {
    /// Directory holding the fragments (not searched recursively)
    pub input_dir: PathBuf,
    /// Where the merged document is written
    pub output_file: PathBuf,
    /// Glob matched against file names in `input_dir`
    pub pattern: String,
    /// Limits applied to each fragment
    pub parser: xml::Config,
    /// Output layout
    pub format: FormatConfig,
}

impl Default for UnifyConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            pattern: DEFAULT_PATTERN.to_string(),
            parser: xml::Config::default(),
            format: FormatConfig::default(),
        }
    }
}

impl UnifyConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_file: output_file.into(),
            ..Self::default()
        }
    }

    pub fn with_input_dir(mut self, input_dir: impl Into<PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    pub fn with_output_file(mut self, output_file: impl Into<PathBuf>) -> Self {
        self.output_file = output_file.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_parser(mut self, parser: xml::Config) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_indent(mut self, indent_spaces: usize) -> Self {
        self.format.indent_spaces = indent_spaces;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UnifyConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("files"));
        assert_eq!(config.output_file, PathBuf::from("output/final_list.xml"));
        assert_eq!(config.pattern, "*.xml");
        assert_eq!(config.format.indent_spaces, 2);
        assert!(config.parser.resolve_namespaces);
    }

    #[test]
    fn test_builders() {
        let config = UnifyConfig::new("in", "out/merged.xml")
            .with_pattern("sitemap-*.xml")
            .with_parser(xml::Config::new(16, 1024))
            .with_indent(4);
        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_file, PathBuf::from("out/merged.xml"));
        assert_eq!(config.pattern, "sitemap-*.xml");
        assert_eq!(config.parser.max_depth, 16);
        assert_eq!(config.format.indent_spaces, 4);
    }
}
