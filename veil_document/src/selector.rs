// Copyright 2025 the Veil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selectors: single-element predicates used to find close triggers and markers.
//!
//! This module intentionally stays small: a selector is a comma-separated list of compound
//! selectors, and each compound selector is a predicate over one element (no combinators).
//!
//! Supported components:
//! - a tag name (`button`) or the universal selector (`*`),
//! - `#id`,
//! - `.class` (matched against the whitespace-separated `class` attribute),
//! - `[attr]` (presence) and `[attr=value]`, `[attr="value"]`, `[attr='value']` (exact value).
//!
//! ```
//! use veil_document::{Document, ElementData, Selector};
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let close = doc.insert(Some(body), ElementData::new("button").with_attribute("class", "btn close"));
//!
//! let selector: Selector = "button.close, [data-close]".parse().unwrap();
//! assert!(selector.matches(&doc, close));
//! assert_eq!(doc.query_selector(body, &selector), Some(close));
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::iter::Peekable;
use core::str::{CharIndices, FromStr};

use crate::document::Document;
use crate::types::NodeId;

/// Why a selector failed to parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The input (or one item of a comma list) contains no selector.
    Empty {
        /// Byte offset where a selector was expected.
        position: usize,
    },
    /// A character that cannot appear at this position.
    Unexpected {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },
    /// The input ended inside an attribute selector or a quoted value.
    UnexpectedEnd,
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { position } => write!(f, "expected a selector at offset {position}"),
            Self::Unexpected { position, found } => {
                write!(f, "unexpected {found:?} at offset {position} in selector")
            }
            Self::UnexpectedEnd => f.write_str("selector ended unexpectedly"),
        }
    }
}

impl core::error::Error for SelectorError {}

/// An attribute predicate: presence, or an exact value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeMatch {
    /// Attribute name (lowercased).
    pub name: Box<str>,
    /// Required value; `None` only requires presence.
    pub value: Option<Box<str>>,
}

/// A predicate over a single element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Required tag name (lowercased); `None` matches any tag.
    pub tag: Option<Box<str>>,
    /// Required `id` attribute value.
    pub id: Option<Box<str>>,
    /// Required classes.
    pub classes: Vec<Box<str>>,
    /// Required attributes.
    pub attributes: Vec<AttributeMatch>,
}

impl CompoundSelector {
    /// Returns `true` if this selector matches the element `node` of `doc`.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if let Some(required) = &self.tag
            && **required != *tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && doc.attribute(node, "id") != Some(&**id)
        {
            return false;
        }
        if !self.classes.is_empty() {
            let class_attr = doc.attribute(node, "class").unwrap_or("");
            let has_all = self
                .classes
                .iter()
                .all(|c| class_attr.split_ascii_whitespace().any(|have| have == &**c));
            if !has_all {
                return false;
            }
        }
        self.attributes
            .iter()
            .all(|m| match (doc.attribute(node, &m.name), &m.value) {
                (None, _) => false,
                (Some(_), None) => true,
                (Some(have), Some(want)) => have == &**want,
            })
    }
}

/// A comma-separated list of [`CompoundSelector`]s; matches when any item matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    items: Vec<CompoundSelector>,
}

impl Selector {
    /// Parse a selector.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    /// A selector matching elements that carry the attribute `name`.
    pub fn attribute(name: &str) -> Self {
        Self {
            items: alloc::vec![CompoundSelector {
                attributes: alloc::vec![AttributeMatch {
                    name: name.to_ascii_lowercase().into_boxed_str(),
                    value: None,
                }],
                ..CompoundSelector::default()
            }],
        }
    }

    /// The compound selectors of this list.
    pub fn items(&self) -> &[CompoundSelector] {
        &self.items
    }

    /// Returns `true` if any item matches `node`.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.items.iter().any(|item| item.matches(doc, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    saw_universal: bool,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            saw_universal: false,
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_ascii_whitespace()).is_some() {}
    }

    fn expect(&mut self, want: char) -> Result<(), SelectorError> {
        match self.chars.next() {
            Some((_, c)) if c == want => Ok(()),
            Some((position, found)) => Err(SelectorError::Unexpected { position, found }),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut out = String::new();
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| is_ident_char(c)) {
            out.push(c);
        }
        if out.is_empty() {
            return Err(match self.chars.peek() {
                Some(&(position, found)) => SelectorError::Unexpected { position, found },
                None => SelectorError::UnexpectedEnd,
            });
        }
        Ok(out)
    }

    fn parse_list(&mut self) -> Result<Selector, SelectorError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.offset();
            let item = self.parse_compound()?;
            if item == CompoundSelector::default() && !self.saw_universal {
                return Err(SelectorError::Empty { position: start });
            }
            self.saw_universal = false;
            items.push(item);
            self.skip_whitespace();
            match self.chars.next() {
                None => break,
                Some((_, ',')) => continue,
                Some((position, found)) => {
                    return Err(SelectorError::Unexpected { position, found });
                }
            }
        }
        Ok(Selector { items })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut out = CompoundSelector::default();
        if self.chars.next_if(|&(_, c)| c == '*').is_some() {
            self.saw_universal = true;
        } else if self.chars.peek().is_some_and(|&(_, c)| is_ident_char(c)) {
            out.tag = Some(self.ident()?.to_ascii_lowercase().into_boxed_str());
        }
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '#' => {
                    self.chars.next();
                    out.id = Some(self.ident()?.into_boxed_str());
                }
                '.' => {
                    self.chars.next();
                    out.classes.push(self.ident()?.into_boxed_str());
                }
                '[' => {
                    self.chars.next();
                    out.attributes.push(self.parse_attribute()?);
                }
                _ => break,
            }
        }
        Ok(out)
    }

    fn parse_attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase().into_boxed_str();
        self.skip_whitespace();
        let value = if self.chars.next_if(|&(_, c)| c == '=').is_some() {
            self.skip_whitespace();
            let value = match self.chars.peek() {
                Some(&(_, quote @ ('"' | '\''))) => {
                    self.chars.next();
                    let mut value = String::new();
                    loop {
                        match self.chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(SelectorError::UnexpectedEnd),
                        }
                    }
                    value
                }
                _ => self.ident()?,
            };
            self.skip_whitespace();
            Some(value.into_boxed_str())
        } else {
            None
        };
        self.expect(']')?;
        Ok(AttributeMatch { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementData;

    fn doc_with(data: ElementData) -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let id = doc.insert(Some(body), data);
        (doc, id)
    }

    #[test]
    fn parses_compound_components() {
        let sel = Selector::parse("button#ok.primary.large[data-close][type=\"submit\"]").unwrap();
        let item = &sel.items()[0];
        assert_eq!(item.tag.as_deref(), Some("button"));
        assert_eq!(item.id.as_deref(), Some("ok"));
        assert_eq!(item.classes.len(), 2);
        assert_eq!(item.attributes.len(), 2);
        assert_eq!(item.attributes[1].value.as_deref(), Some("submit"));
    }

    #[test]
    fn matches_classes_as_words() {
        let (doc, id) = doc_with(ElementData::new("button").with_attribute("class", " btn  close "));
        assert!(Selector::parse(".close").unwrap().matches(&doc, id));
        assert!(Selector::parse("button.btn.close").unwrap().matches(&doc, id));
        assert!(!Selector::parse(".clo").unwrap().matches(&doc, id));
        assert!(!Selector::parse("a.close").unwrap().matches(&doc, id));
    }

    #[test]
    fn attribute_presence_and_value() {
        let (doc, id) = doc_with(ElementData::new("div").with_attribute("data-label", ""));
        assert!(Selector::parse("[data-label]").unwrap().matches(&doc, id));
        assert!(Selector::parse("[ DATA-LABEL = '' ]").unwrap().matches(&doc, id));
        assert!(!Selector::parse("[data-label=x]").unwrap().matches(&doc, id));
        assert!(Selector::attribute("data-label").matches(&doc, id));
    }

    #[test]
    fn comma_lists_match_any_item() {
        let (doc, id) = doc_with(ElementData::new("span").with_attribute("id", "x"));
        let sel: Selector = "button , #x".parse().unwrap();
        assert_eq!(sel.items().len(), 2);
        assert!(sel.matches(&doc, id));
        assert!(Selector::parse("*").unwrap().matches(&doc, id));
    }

    #[test]
    fn reports_malformed_input() {
        assert_eq!(Selector::parse(""), Err(SelectorError::Empty { position: 0 }));
        assert_eq!(
            Selector::parse("a,,b"),
            Err(SelectorError::Empty { position: 2 })
        );
        assert_eq!(Selector::parse("[x"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(Selector::parse("[x='y"), Err(SelectorError::UnexpectedEnd));
        assert_eq!(
            Selector::parse("a > b"),
            Err(SelectorError::Unexpected {
                position: 2,
                found: '>'
            })
        );
    }
}
