//! XML data model
//!
//! Element names are either raw qualified names as written (`image:loc`) or,
//! when the parser resolves namespaces, expanded names in the `{uri}local`
//! form.

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

/// Split an expanded name into its namespace URI and local part
pub fn split_name(name: &str) -> (Option<&str>, &str) {
    name.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .map_or((None, name), |(uri, local)| (Some(uri), local))
}

/// Drop the `{uri}` wrapper from a name, if present
pub fn local_name(name: &str) -> &str {
    split_name(name).1
}

/// Whether an attribute name is a namespace declaration (`xmlns`, `xmlns:p`)
pub fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style child appender
    pub fn with_child(mut self, child: Content) -> Self {
        self.children.push(child);
        self
    }

    /// Name without its namespace wrapper
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Namespace URI of an expanded name
    pub fn namespace(&self) -> Option<&str> {
        split_name(&self.name).0
    }

    /// Iterate over child elements, skipping text
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Concatenated text of the direct text children
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Content::Text(text) => Some(text.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }

    /// Return this element with the namespace wrapper removed from its name and
    /// from every descendant element name. Namespace declarations are dropped
    /// from the whole subtree; other attributes and text are kept as-is.
    pub fn strip_namespaces(self) -> Self {
        let Self {
            name,
            mut attributes,
            children,
        } = self;

        let name = if name.starts_with('{') {
            local_name(&name).to_string()
        } else {
            name
        };
        attributes.retain(|key, _| !is_namespace_declaration(key));

        Self {
            name,
            attributes,
            children: children.into_iter().map(Content::strip_namespaces).collect(),
        }
    }

    /// Whether this element or any descendant still carries a `{uri}` name
    pub fn has_expanded_names(&self) -> bool {
        self.namespace().is_some() || self.child_elements().any(Self::has_expanded_names)
    }
}

impl Content {
    /// Namespace stripping lifted over content nodes
    pub fn strip_namespaces(self) -> Self {
        match self {
            Self::Element(element) => Self::Element(element.strip_namespaces()),
            text @ Self::Text(_) => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SM: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

    fn sample() -> Element {
        Element::new(format!("{{{SM}}}url"))
            .with_attribute("id", "{not}touched")
            .with_child(Content::Element(
                Element::new(format!("{{{SM}}}loc"))
                    .with_child(Content::Text("{kept}text".to_string())),
            ))
            .with_child(Content::Element(Element::new("plain")))
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("{urn:x}loc"), (Some("urn:x"), "loc"));
        assert_eq!(split_name("loc"), (None, "loc"));
        assert_eq!(split_name("image:loc"), (None, "image:loc"));
    }

    #[test]
    fn test_local_name() {
        let element = Element::new(format!("{{{SM}}}urlset"));
        assert_eq!(element.local_name(), "urlset");
        assert_eq!(element.namespace(), Some(SM));
    }

    #[test]
    fn test_strip_namespaces_recursive() {
        let stripped = sample().strip_namespaces();
        assert_eq!(stripped.name, "url");
        assert!(!stripped.has_expanded_names());

        let names: Vec<&str> = stripped.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["loc", "plain"]);
    }

    #[test]
    fn test_strip_namespaces_leaves_attributes_and_text() {
        let stripped = sample().strip_namespaces();
        assert_eq!(stripped.attributes.get("id"), Some(&"{not}touched".to_string()));

        let loc = stripped.child_elements().next().map(Element::text);
        assert_eq!(loc.as_deref(), Some("{kept}text"));
    }

    #[test]
    fn test_strip_namespaces_drops_declarations() {
        let element = Element::new("{urn:other}url")
            .with_attribute("xmlns", "urn:other")
            .with_attribute("xmlns:xhtml", "http://www.w3.org/1999/xhtml")
            .with_attribute("xmlnsish", "kept")
            .with_child(Content::Element(
                Element::new("{urn:other}loc").with_attribute("xmlns", "urn:other"),
            ));
        let stripped = element.strip_namespaces();

        let keys: Vec<&str> = stripped.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["xmlnsish"]);
        let loc = stripped.child_elements().next();
        assert_eq!(loc.map(|e| e.attributes.is_empty()), Some(true));
    }

    #[test]
    fn test_strip_namespaces_idempotent() {
        let once = sample().strip_namespaces();
        let twice = once.clone().strip_namespaces();
        assert_eq!(once, twice);
    }
}
