//! Property-based tests for the merge pipeline
//!
//! These tests use proptest to verify:
//! 1. Any sitemap index fragment forces an index root, otherwise URL set
//! 2. Namespace stripping is idempotent and leaves no `{uri}` names
//! 3. Rendered output never contains blank lines
//! 4. The merged child count is the sum over kind-matching fragments

use std::path::{Path, PathBuf};

use proptest::prelude::*;
use sitemerge::{
    from_xml_str, merge_fragments, parse_fragment, render, resolve_root_kind, xml, Classified,
    Error, ErrorKind, RecordingReporter, RootKind, Span, XmlContent, XmlElement,
    SITEMAP_NAMESPACE,
};

/// Shape of one generated input file
#[derive(Clone, Debug)]
enum FileShape {
    Index(usize),
    UrlSet(usize),
    Unrecognized,
    Broken,
}

fn arb_file_shape() -> impl Strategy<Value = FileShape> {
    prop_oneof![
        (0usize..4).prop_map(FileShape::Index),
        (0usize..6).prop_map(FileShape::UrlSet),
        Just(FileShape::Unrecognized),
        Just(FileShape::Broken),
    ]
}

fn build(index: usize, shape: &FileShape) -> Classified {
    let name = format!("f{index}.xml");
    let xml = match shape {
        FileShape::Index(n) => {
            let maps: String = (0..*n)
                .map(|i| format!("<sitemap><loc>https://e.example/s{index}-{i}.xml</loc></sitemap>"))
                .collect();
            format!("<sitemapindex xmlns=\"{SITEMAP_NAMESPACE}\">\n{maps}\n</sitemapindex>")
        }
        FileShape::UrlSet(n) => {
            let urls: String = (0..*n)
                .map(|i| format!("\n  <url>\n    <loc>https://e.example/{index}/{i}</loc>\n  </url>"))
                .collect();
            format!("<urlset xmlns=\"{SITEMAP_NAMESPACE}\">{urls}\n</urlset>")
        }
        FileShape::Unrecognized => "<rss><channel/></rss>".to_string(),
        FileShape::Broken => {
            return Classified::Unparseable {
                path: PathBuf::from(name),
                error: Error::new(ErrorKind::UnexpectedEof, Span::empty()),
            }
        }
    };

    match parse_fragment(Path::new(&name), xml.as_bytes(), xml::Config::default()) {
        Ok(fragment) => Classified::Parsed(fragment),
        Err(error) => Classified::Unparseable {
            path: PathBuf::from(name),
            error,
        },
    }
}

fn arb_name() -> impl Strategy<Value = String> {
    (
        prop::option::of("urn:[a-z]{1,6}"),
        "[a-z][a-z0-9]{0,6}",
    )
        .prop_map(|(ns, local)| match ns {
            Some(uri) => format!("{{{uri}}}{local}"),
            None => local,
        })
}

fn arb_element() -> impl Strategy<Value = XmlElement> {
    let leaf = (arb_name(), "[ a-zA-Z0-9&<>]{0,12}").prop_map(|(name, text)| XmlElement {
        name,
        attributes: Default::default(),
        children: if text.is_empty() {
            Vec::new()
        } else {
            vec![XmlContent::Text(text)]
        },
    });
    leaf.prop_recursive(4, 32, 4, |inner| {
        (arb_name(), prop::collection::vec(inner, 0..4)).prop_map(|(name, children)| {
            XmlElement {
                name,
                attributes: Default::default(),
                children: children.into_iter().map(XmlContent::Element).collect(),
            }
        })
    })
}

proptest! {
    #[test]
    fn prop_index_priority_and_fallback(shapes in prop::collection::vec(arb_file_shape(), 0..12)) {
        let population: Vec<Classified> =
            shapes.iter().enumerate().map(|(i, s)| build(i, s)).collect();
        let has_index = shapes.iter().any(|s| matches!(s, FileShape::Index(_)));

        let expected = if has_index { RootKind::SitemapIndex } else { RootKind::UrlSet };
        prop_assert_eq!(resolve_root_kind(&population), expected);
    }

    #[test]
    fn prop_merge_count_and_order(shapes in prop::collection::vec(arb_file_shape(), 1..10)) {
        let population: Vec<Classified> =
            shapes.iter().enumerate().map(|(i, s)| build(i, s)).collect();
        let kind = resolve_root_kind(&population);

        let expected: Vec<String> = population
            .iter()
            .filter_map(Classified::fragment)
            .filter(|f| f.kind() == Some(kind))
            .flat_map(|f| f.child_elements())
            .filter_map(|child| child.child_elements().next())
            .map(XmlElement::text)
            .collect();

        let (document, _) = merge_fragments(kind, population, &mut RecordingReporter::new());
        prop_assert_eq!(document.len(), expected.len());

        let text = render(&document.into_element(), &xml::FormatConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(text.split('\n').all(|line| !line.trim().is_empty()));

        let reparsed = from_xml_str(&text).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let locs: Vec<String> = reparsed
            .root
            .child_elements()
            .filter_map(|child| child.child_elements().next())
            .map(XmlElement::text)
            .collect();
        prop_assert_eq!(locs, expected);
    }

    #[test]
    fn prop_strip_is_idempotent(element in arb_element()) {
        let once = element.strip_namespaces();
        prop_assert!(!once.has_expanded_names());
        let twice = once.clone().strip_namespaces();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_render_has_no_blank_lines(element in arb_element()) {
        let root = element.strip_namespaces();
        let text = render(&root, &xml::FormatConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(!text.is_empty());
        prop_assert!(text.split('\n').all(|line| !line.trim().is_empty()));
    }
}
