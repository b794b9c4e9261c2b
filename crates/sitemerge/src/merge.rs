//! Building the unified document from compatible fragments

use std::path::PathBuf;

use indexmap::IndexMap;

use crate::classify::{Classified, Fragment, RootKind};
use crate::report::{Event, Reporter};
use crate::xml::{Content, Element};

/// Default namespace of every merged document
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Attribute carrying the image extension namespace on the merged root
pub const IMAGE_NAMESPACE_ATTR: &str = "xmlns:image";

/// The merged output tree under construction
#[derive(Clone, Debug, PartialEq)]
pub struct UnifiedDocument {
    kind: RootKind,
    attributes: IndexMap<String, String>,
    children: Vec<Element>,
}

impl UnifiedDocument {
    /// Empty document of `kind` declaring the sitemap namespace
    pub fn new(kind: RootKind) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("xmlns".to_string(), SITEMAP_NAMESPACE.to_string());
        Self {
            kind,
            attributes,
            children: Vec::new(),
        }
    }

    pub const fn kind(&self) -> RootKind {
        self.kind
    }

    pub const fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child after removing namespace wrappers from its subtree
    pub fn push(&mut self, child: Element) {
        self.children.push(child.strip_namespaces());
    }

    /// Declare `xmlns:image` unless an earlier fragment already did
    fn declare_image_namespace(&mut self, value: &str) {
        self.attributes
            .entry(IMAGE_NAMESPACE_ATTR.to_string())
            .or_insert_with(|| value.to_string());
    }

    /// Bind `prefix` on the root unless an earlier fragment already did
    fn declare_prefix(&mut self, prefix: &str, uri: &str) {
        self.attributes
            .entry(format!("xmlns:{prefix}"))
            .or_insert_with(|| uri.to_string());
    }

    /// Convert into a plain element tree for serialization
    pub fn into_element(self) -> Element {
        Element {
            name: self.kind.as_str().to_string(),
            attributes: self.attributes,
            children: self.children.into_iter().map(Content::Element).collect(),
        }
    }
}

/// Why a file contributed nothing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Unparseable,
    KindMismatch { found: String },
}

/// A file left out of the merge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Appends compatible fragments to a document whose kind is fixed up front
#[derive(Debug)]
pub struct MergeEngine {
    document: UnifiedDocument,
    skipped: Vec<Skipped>,
}

impl MergeEngine {
    pub fn new(kind: RootKind) -> Self {
        Self {
            document: UnifiedDocument::new(kind),
            skipped: Vec::new(),
        }
    }

    /// Merge one classified file. Unparseable files were already reported by
    /// the classifier and are skipped silently here.
    pub fn merge(&mut self, classified: Classified, reporter: &mut dyn Reporter) {
        match classified {
            Classified::Parsed(fragment) => self.merge_fragment(fragment, reporter),
            Classified::Unparseable { path, .. } => self.skipped.push(Skipped {
                path,
                reason: SkipReason::Unparseable,
            }),
        }
    }

    fn merge_fragment(&mut self, fragment: Fragment, reporter: &mut dyn Reporter) {
        let target = self.document.kind();
        if fragment.root_name() != target.as_str() {
            let found = fragment.root_name().to_string();
            reporter.report(Event::KindMismatch {
                path: fragment.path().to_path_buf(),
                found: found.clone(),
                target,
            });
            self.skipped.push(Skipped {
                path: fragment.path().to_path_buf(),
                reason: SkipReason::KindMismatch { found },
            });
            return;
        }

        if let Some(value) = image_namespace(&fragment) {
            self.document.declare_image_namespace(value);
        }

        let root_bindings: Vec<(String, String)> = fragment
            .attributes()
            .filter_map(|(key, uri)| {
                let prefix = key.strip_prefix("xmlns:")?;
                Some((prefix.to_string(), uri.to_string()))
            })
            .collect();

        for child in fragment.into_child_elements() {
            let mut scope: Vec<(&str, &str)> = root_bindings
                .iter()
                .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
                .collect();
            let mut used = Vec::new();
            attribute_prefix_bindings(&child, &mut scope, &mut used);
            for (prefix, uri) in &used {
                self.document.declare_prefix(prefix, uri);
            }
            self.document.push(child);
        }
    }

    /// Files skipped so far, in processing order
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }

    pub fn finish(self) -> (UnifiedDocument, Vec<Skipped>) {
        (self.document, self.skipped)
    }
}

/// Value for `xmlns:image`: the root's own declaration, else the first root
/// attribute whose value mentions `image`
fn image_namespace(fragment: &Fragment) -> Option<&str> {
    fragment
        .attributes()
        .find(|(key, _)| *key == IMAGE_NAMESPACE_ATTR)
        .or_else(|| fragment.attributes().find(|(_, value)| value.contains("image")))
        .map(|(_, value)| value)
}

/// Collect the bindings of attribute prefixes used in `element`'s subtree.
///
/// Declarations inside the subtree are dropped when it is merged, so every
/// prefix in use has to be bound on the unified root instead.
fn attribute_prefix_bindings<'a>(
    element: &'a Element,
    scope: &mut Vec<(&'a str, &'a str)>,
    used: &mut Vec<(String, String)>,
) {
    let mark = scope.len();
    scope.extend(
        element
            .attributes
            .iter()
            .filter_map(|(key, uri)| Some((key.strip_prefix("xmlns:")?, uri.as_str()))),
    );

    for key in element.attributes.keys() {
        let Some((prefix, _)) = key.split_once(':') else {
            continue;
        };
        if prefix == "xml" || prefix == "xmlns" || used.iter().any(|(p, _)| p == prefix) {
            continue;
        }
        if let Some(&(_, uri)) = scope.iter().rev().find(|(bound, _)| *bound == prefix) {
            used.push((prefix.to_string(), uri.to_string()));
        }
    }

    for child in element.child_elements() {
        attribute_prefix_bindings(child, scope, used);
    }
    scope.truncate(mark);
}

/// Merge every file of `population`, in order, into a document of `kind`
pub fn merge_fragments(
    kind: RootKind,
    population: impl IntoIterator<Item = Classified>,
    reporter: &mut dyn Reporter,
) -> (UnifiedDocument, Vec<Skipped>) {
    let mut engine = MergeEngine::new(kind);
    for classified in population {
        engine.merge(classified, reporter);
    }
    engine.finish()
}
