//! sitemerge - merge XML sitemap fragments into one document
//!
//! Every `*.xml` file of an input directory is parsed and classified as a
//! sitemap index or a URL set. A single sitemap index makes the output a
//! sitemap index; otherwise it is a URL set. Children of every fragment of
//! that kind are stripped of namespace wrappers, appended in file order and
//! written as indented XML under a root declaring the sitemap namespace.
//!
//! # Quick Start
//!
//! ```no_run
//! use sitemerge::{unify, TracingReporter, UnifyConfig};
//!
//! let config = UnifyConfig::new("files", "output/final_list.xml");
//! let outcome = unify(&config, &mut TracingReporter);
//! assert!(outcome.is_success());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod xml;
pub use xml::{Content as XmlContent, Document as XmlDocument, Element as XmlElement};

pub mod config;
pub use config::UnifyConfig;

pub mod report;
pub use report::{Event, RecordingReporter, Reporter, TracingReporter};

pub mod classify;
pub use classify::{classify_file, parse_fragment, Classified, Fragment, RootKind};

pub mod locate;
pub use locate::find_xml_files;

pub mod resolve;
pub use resolve::{resolve_root_kind, KindCounts};

pub mod merge;
pub use merge::{merge_fragments, MergeEngine, SkipReason, Skipped, UnifiedDocument, SITEMAP_NAMESPACE};

pub mod serialize;
pub use serialize::{render, save, write_output};

pub mod unify;
pub use unify::{unify, Failure, Outcome, Summary};

/// Parse XML from string, resolving namespaces
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    xml::Parser::new(s.as_bytes()).parse()
}

/// Parse XML from bytes, resolving namespaces
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    xml::Parser::new(bytes).parse()
}
