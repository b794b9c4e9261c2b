//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::{Content, Document, Element};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Entities referencing entities deeper than this are rejected
const MAX_ENTITY_NESTING: usize = 8;

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
    /// Rewrite element names to `{uri}local` using in-scope declarations
    pub resolve_namespaces: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 50 * 1024 * 1024, // sitemap protocol limit for one file
            resolve_namespaces: true,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth and size
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            resolve_namespaces: true,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
            resolve_namespaces: true,
        }
    }

    /// Keep qualified names exactly as written
    pub const fn raw(mut self) -> Self {
        self.resolve_namespaces = false;
        self
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
    /// In-scope prefix bindings, innermost last; `""` is the default namespace
    bindings: Vec<(String, String)>,
    /// General entities from the DOCTYPE internal subset, first declaration wins
    entities: IndexMap<String, String>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a parser with custom configuration
    pub fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
            bindings: vec![("xml".to_string(), XML_NAMESPACE.to_string())],
            entities: IndexMap::new(),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.config.max_size > 0 && self.cursor.remaining().len() > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }

        self.skip_misc(true)?;
        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::MissingRoot));
        }

        let root = self.parse_element()?;
        self.skip_misc(false)?;

        if !self.cursor.is_eof() {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::at(self.cursor.position()),
                "content after root element",
            ));
        }

        Ok(Document { root })
    }

    /// Skip whitespace, comments and processing instructions around the root
    fn skip_misc(&mut self, allow_doctype: bool) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if allow_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.parse_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        if self.config.max_depth > 0 && self.depth >= self.config.max_depth {
            return Err(self.error_here(ErrorKind::MaxDepthExceeded {
                max: self.config.max_depth,
            }));
        }

        self.expect_byte(b'<')?;
        let qname = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let scope = self.bindings.len();
        if self.config.resolve_namespaces {
            self.declare_namespaces(&attributes);
        }
        let name = self.resolve_element_name(&qname, &attributes)?;

        let element = if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            Element {
                name,
                attributes,
                children: Vec::new(),
            }
        } else {
            self.expect_byte(b'>')?;
            self.depth += 1;
            let children = self.parse_children(&qname)?;
            self.depth -= 1;
            Element {
                name,
                attributes,
                children,
            }
        };

        self.bindings.truncate(scope);
        Ok(element)
    }

    fn parse_children(&mut self, qname: &str) -> Result<Vec<Content>> {
        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != qname {
                    return Err(self.error_here(ErrorKind::MismatchedTag {
                        expected: qname.to_string(),
                        found: close_name,
                    }));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
            } else if self.cursor.starts_with(b"<![CDATA[") {
                children.push(Content::Text(self.parse_cdata()?));
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.current() == Some(b'<') {
                children.push(Content::Element(self.parse_element()?));
            } else if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof));
            } else {
                let text = self.parse_text()?;
                if !text.is_empty() {
                    children.push(Content::Text(text));
                }
            }
        }

        // indentation between child elements is not content
        if children.iter().any(|c| matches!(c, Content::Element(_))) {
            children.retain(|c| !matches!(c, Content::Text(t) if t.trim().is_empty()));
        }

        Ok(children)
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            let had_space = matches!(self.cursor.current(), Some(b' ' | b'\t' | b'\r' | b'\n'));
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => return Err(self.error_here(ErrorKind::InvalidToken)),
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here(ErrorKind::DuplicateAttribute { name }));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here(ErrorKind::InvalidToken)),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = self.bytes_to_str(raw)?;
                return self.decode_entities(text);
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_str(raw)?;
        self.decode_entities(text)
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return self.bytes_to_str(raw).map(str::to_string);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(_) => return Err(self.error_here(ErrorKind::InvalidToken)),
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_str(raw).map(str::to_string)
    }

    fn declare_namespaces(&mut self, attributes: &IndexMap<String, String>) {
        for (key, value) in attributes {
            if key == "xmlns" {
                self.bindings.push((String::new(), value.clone()));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.bindings.push((prefix.to_string(), value.clone()));
            }
        }
    }

    fn lookup(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    fn resolve_element_name(
        &self,
        qname: &str,
        attributes: &IndexMap<String, String>,
    ) -> Result<String> {
        if !self.config.resolve_namespaces {
            return Ok(qname.to_string());
        }

        for key in attributes.keys() {
            if let Some((prefix, _)) = key.split_once(':') {
                if prefix != "xmlns" && self.lookup(prefix).is_none() {
                    return Err(self.unbound(prefix));
                }
            }
        }

        match qname.split_once(':') {
            Some((prefix, local)) => match self.lookup(prefix) {
                Some(uri) => Ok(format!("{{{uri}}}{local}")),
                None => Err(self.unbound(prefix)),
            },
            None => match self.lookup("") {
                Some(uri) if !uri.is_empty() => Ok(format!("{{{uri}}}{qname}")),
                _ => Ok(qname.to_string()),
            },
        }
    }

    fn skip_comment(&mut self) -> Result<()> {
        self.cursor.advance_by(4);
        self.skip_until(b"-->")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        self.cursor.advance_by(2);
        self.skip_until(b"?>")
    }

    /// Skip the DOCTYPE, keeping general entity declarations of its internal subset
    fn parse_doctype(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!DOCTYPE".len());
        let mut in_subset = false;
        while let Some(b) = self.cursor.current() {
            if in_subset && self.cursor.starts_with(b"<!ENTITY") {
                self.parse_entity_declaration()?;
                continue;
            }
            if in_subset && self.cursor.starts_with(b"<!--") {
                self.skip_comment()?;
                continue;
            }
            match b {
                b'"' | b'\'' => {
                    self.parse_quoted()?;
                }
                b'[' => {
                    in_subset = true;
                    self.cursor.advance();
                }
                b']' => {
                    in_subset = false;
                    self.cursor.advance();
                }
                b'>' if !in_subset => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => self.cursor.advance(),
            }
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    fn parse_entity_declaration(&mut self) -> Result<()> {
        self.cursor.advance_by(b"<!ENTITY".len());
        self.cursor.skip_whitespace();
        if self.cursor.consume(b'%') {
            // parameter entity, never referenced from content
            return self.skip_markup_declaration();
        }

        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        // external entities (SYSTEM/PUBLIC) are not loaded
        if matches!(self.cursor.current(), Some(b'"' | b'\'')) {
            let value = self.parse_quoted()?;
            self.entities
                .entry(name)
                .or_insert_with(|| value.to_string());
        }
        self.skip_markup_declaration()
    }

    /// Skip to the `>` closing a markup declaration, stepping over literals
    fn skip_markup_declaration(&mut self) -> Result<()> {
        while let Some(b) = self.cursor.current() {
            match b {
                b'"' | b'\'' => {
                    self.parse_quoted()?;
                }
                b'>' => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => self.cursor.advance(),
            }
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    /// Read a quoted literal, returning it without quotes or decoding
    fn parse_quoted(&mut self) -> Result<&'a str> {
        let Some(quote) = self.cursor.current() else {
            return Err(self.error_here(ErrorKind::UnexpectedEof));
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                return self.bytes_to_str(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnterminatedMarkup))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else if self.cursor.is_eof() {
            Err(self.error_here(ErrorKind::UnexpectedEof))
        } else {
            Err(self.error_here(ErrorKind::InvalidToken))
        }
    }

    fn bytes_to_str(&self, bytes: &'a [u8]) -> Result<&'a str> {
        std::str::from_utf8(bytes).map_err(|_| self.error_here(ErrorKind::InvalidUtf8))
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }

        let mut result = String::with_capacity(input.len());
        self.expand_entities(input, 0, &mut result)?;
        Ok(result)
    }

    fn expand_entities(&self, input: &str, nesting: usize, result: &mut String) -> Result<()> {
        let mut rest = input;
        while let Some(amp) = rest.find('&') {
            let (before, tail) = rest.split_at(amp);
            result.push_str(before);

            let Some(end) = tail.find(';') else {
                return Err(self.invalid_entity(tail));
            };
            let entity = tail.get(1..end).unwrap_or_default();
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(entity),
            };

            match (decoded, self.entities.get(entity)) {
                (Some(ch), _) => result.push(ch),
                (None, Some(value)) if nesting < MAX_ENTITY_NESTING => {
                    self.expand_entities(value, nesting + 1, result)?;
                }
                _ => return Err(self.invalid_entity(entity)),
            }

            if self.config.max_size > 0 && result.len() > self.config.max_size {
                return Err(self.error_here(ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                }));
            }
            rest = tail.get(end + 1..).unwrap_or_default();
        }
        result.push_str(rest);

        Ok(())
    }

    fn invalid_entity(&self, entity: &str) -> Error {
        self.error_here(ErrorKind::InvalidEntity {
            entity: entity.chars().take(16).collect(),
        })
    }

    fn unbound(&self, prefix: &str) -> Error {
        self.error_here(ErrorKind::UnboundPrefix {
            prefix: prefix.to_string(),
        })
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::new(kind, Span::at(self.cursor.position()))
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
