//! Per-file parsing and root classification

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::report::{Event, Reporter};
use crate::xml::{self, Content, Element, Parser};

/// Root container of a sitemap document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RootKind {
    SitemapIndex,
    UrlSet,
}

impl RootKind {
    /// Canonical root element name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SitemapIndex => "sitemapindex",
            Self::UrlSet => "urlset",
        }
    }

    /// Recognize a root local name; anything else is not a sitemap root
    pub fn from_local_name(name: &str) -> Option<Self> {
        match name {
            "sitemapindex" => Some(Self::SitemapIndex),
            "urlset" => Some(Self::UrlSet),
            _ => None,
        }
    }
}

impl fmt::Display for RootKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed input file
#[derive(Clone, Debug, PartialEq)]
pub struct Fragment {
    path: PathBuf,
    root: Element,
}

impl Fragment {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root name with any `{uri}` wrapper removed
    pub fn root_name(&self) -> &str {
        self.root.local_name()
    }

    /// Sitemap kind of the root, `None` when unrecognized
    pub fn kind(&self) -> Option<RootKind> {
        RootKind::from_local_name(self.root_name())
    }

    /// Root attributes, namespace declarations included
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.root
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Top-level child elements, names not yet stripped
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.root.child_elements()
    }

    pub fn into_child_elements(self) -> impl Iterator<Item = Element> {
        self.root.children.into_iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }
}

/// Result of classifying one candidate file
#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    Parsed(Fragment),
    Unparseable { path: PathBuf, error: Error },
}

impl Classified {
    pub fn path(&self) -> &Path {
        match self {
            Self::Parsed(fragment) => fragment.path(),
            Self::Unparseable { path, .. } => path,
        }
    }

    pub const fn fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Parsed(fragment) => Some(fragment),
            Self::Unparseable { .. } => None,
        }
    }
}

/// Parse in-memory XML into a fragment attributed to `path`
pub fn parse_fragment(path: &Path, bytes: &[u8], config: xml::Config) -> Result<Fragment> {
    let doc = Parser::with_config(bytes, config).parse()?;
    Ok(Fragment {
        path: path.to_path_buf(),
        root: doc.root,
    })
}

/// Read and parse one file. Failures are reported and returned as
/// [`Classified::Unparseable`]; they never abort the caller.
pub fn classify_file(path: &Path, config: xml::Config, reporter: &mut dyn Reporter) -> Classified {
    let parsed = std::fs::read(path)
        .map_err(|e| Error::io(path, &e))
        .and_then(|bytes| parse_fragment(path, &bytes, config));

    match parsed {
        Ok(fragment) => {
            reporter.report(Event::FragmentParsed {
                path: path.to_path_buf(),
            });
            Classified::Parsed(fragment)
        }
        Err(error) => {
            reporter.report(Event::FragmentUnparseable {
                path: path.to_path_buf(),
                error: error.clone(),
            });
            Classified::Unparseable {
                path: path.to_path_buf(),
                error,
            }
        }
    }
}
