//! Compact XML serialization

use crate::xml::model::{Content, Element};

/// Serialize a single element subtree without any whitespace between nodes
pub fn element_to_string(element: &Element) -> String {
    let mut output = String::new();
    write_element(element, &mut output);
    output
}

fn write_element(element: &Element, output: &mut String) {
    write_start_tag(element, output);

    if element.children.is_empty() {
        output.push_str(" />");
        return;
    }

    output.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(child, output),
            Content::Text(text) => output.push_str(&escape_text(text)),
        }
    }
    write_end_tag(element, output);
}

/// Write `<name attr="value" ...` without closing the tag
pub(crate) fn write_start_tag(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in &element.attributes {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attribute(value));
        output.push('"');
    }
}

pub(crate) fn write_end_tag(element: &Element, output: &mut String) {
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

pub(crate) fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attribute(input: &str) -> String {
    escape_text(input)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_output() {
        let root = Element::new("urlset")
            .with_attribute("xmlns", "http://www.sitemaps.org/schemas/sitemap/0.9")
            .with_child(Content::Element(
                Element::new("url").with_child(Content::Element(
                    Element::new("loc").with_child(Content::Text("https://a.example/".into())),
                )),
            ));
        assert_eq!(
            element_to_string(&root),
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"><url><loc>https://a.example/</loc></url></urlset>"
        );
    }

    #[test]
    fn test_empty_element_self_closes() {
        assert_eq!(
            element_to_string(&Element::new("sitemapindex")),
            "<sitemapindex />"
        );
    }

    #[test]
    fn test_escaping() {
        let root = Element::new("loc")
            .with_attribute("title", "say \"hi\" & <bye>")
            .with_child(Content::Text("a?b=1&c=<2>".into()));
        assert_eq!(
            element_to_string(&root),
            "<loc title=\"say &quot;hi&quot; &amp; &lt;bye&gt;\">a?b=1&amp;c=&lt;2&gt;</loc>"
        );
    }
}
