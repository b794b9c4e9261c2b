//! Indented XML output

use crate::error::Result;
use crate::xml::model::{Content, Element};
use crate::xml::parser::{Config, Parser};
use crate::xml::writer::{escape_text, write_end_tag, write_start_tag};

/// Configuration options for pretty printing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatConfig {
    /// Number of spaces per nesting level
    pub indent_spaces: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent_spaces: 2 }
    }
}

/// Re-parse compact XML and print it one element per line.
///
/// Qualified names are printed as they appear in `compact`. An element whose
/// only child is text stays on one line; text mixed with elements gets a line
/// of its own. Nothing is written before the root element.
pub fn pretty_print(compact: &str, config: &FormatConfig) -> Result<String> {
    let parser_config = Config::unlimited().raw();
    let doc = Parser::with_config(compact.as_bytes(), parser_config).parse()?;

    let unit = " ".repeat(config.indent_spaces);
    let mut output = String::new();
    write_pretty(&doc.root, &unit, 0, &mut output);
    Ok(output)
}

fn write_pretty(element: &Element, unit: &str, level: usize, output: &mut String) {
    let indent = unit.repeat(level);
    output.push_str(&indent);
    write_start_tag(element, output);

    match element.children.as_slice() {
        [] => output.push_str("/>\n"),
        [Content::Text(text)] => {
            output.push('>');
            output.push_str(&escape_text(text));
            write_end_tag(element, output);
            output.push('\n');
        }
        children => {
            output.push_str(">\n");
            for child in children {
                match child {
                    Content::Element(child) => write_pretty(child, unit, level + 1, output),
                    Content::Text(text) => {
                        output.push_str(&indent);
                        output.push_str(unit);
                        output.push_str(&escape_text(text));
                        output.push('\n');
                    }
                }
            }
            output.push_str(&indent);
            write_end_tag(element, output);
            output.push('\n');
        }
    }
}
