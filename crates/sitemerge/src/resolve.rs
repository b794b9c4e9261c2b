//! Root-type inference over the classified population

use crate::classify::{Classified, RootKind};

/// How many fragments of each recognized kind were seen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub sitemap_index: usize,
    pub url_set: usize,
}

impl KindCounts {
    /// Count recognized roots; unparseable and unrecognized files are ignored
    pub fn tally<'a>(population: impl IntoIterator<Item = &'a Classified>) -> Self {
        population
            .into_iter()
            .filter_map(|classified| classified.fragment()?.kind())
            .fold(Self::default(), |mut counts, kind| {
                match kind {
                    RootKind::SitemapIndex => counts.sitemap_index += 1,
                    RootKind::UrlSet => counts.url_set += 1,
                }
                counts
            })
    }

    /// A single sitemap index wins over any number of URL sets; with no index
    /// at all the target is a URL set.
    pub const fn target(self) -> RootKind {
        if self.sitemap_index > 0 {
            RootKind::SitemapIndex
        } else {
            RootKind::UrlSet
        }
    }
}

/// Decide the root kind of the merged document
pub fn resolve_root_kind<'a>(population: impl IntoIterator<Item = &'a Classified>) -> RootKind {
    KindCounts::tally(population).target()
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::classify::parse_fragment;
    use crate::error::{Error, ErrorKind, Span};
    use crate::xml::Config;

    fn parsed(name: &str, xml: &str) -> Classified {
        match parse_fragment(Path::new(name), xml.as_bytes(), Config::default()) {
            Ok(fragment) => Classified::Parsed(fragment),
            Err(error) => Classified::Unparseable {
                path: PathBuf::from(name),
                error,
            },
        }
    }

    fn broken(name: &str) -> Classified {
        Classified::Unparseable {
            path: PathBuf::from(name),
            error: Error::new(ErrorKind::UnexpectedEof, Span::empty()),
        }
    }

    #[test]
    fn test_index_has_priority() {
        let mut population: Vec<Classified> = (0..100)
            .map(|i| parsed(&format!("u{i}.xml"), "<urlset/>"))
            .collect();
        population.push(parsed("idx.xml", "<sitemapindex/>"));

        let counts = KindCounts::tally(&population);
        assert_eq!(counts.url_set, 100);
        assert_eq!(counts.sitemap_index, 1);
        assert_eq!(resolve_root_kind(&population), RootKind::SitemapIndex);
    }

    #[test]
    fn test_urlset_only() {
        let population = vec![parsed("a.xml", "<urlset/>"), parsed("b.xml", "<urlset/>")];
        assert_eq!(resolve_root_kind(&population), RootKind::UrlSet);
    }

    #[test]
    fn test_fallback_when_nothing_recognized() {
        let population = vec![broken("x.xml"), parsed("feed.xml", "<rss/>")];
        assert_eq!(KindCounts::tally(&population), KindCounts::default());
        assert_eq!(resolve_root_kind(&population), RootKind::UrlSet);
        assert_eq!(resolve_root_kind(&Vec::<Classified>::new()), RootKind::UrlSet);
    }

    #[test]
    fn test_namespaced_roots_counted() {
        let population = vec![parsed(
            "idx.xml",
            "<sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"/>",
        )];
        assert_eq!(resolve_root_kind(&population), RootKind::SitemapIndex);
    }
}
