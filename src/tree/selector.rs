//! Compound CSS selectors: enough to express "what counts as a draggable
//! item" without a full selector engine.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{ResizeError, Result};

use super::core::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Tag(String),
    Id(String),
    Class(String),
    Attr { name: String, value: Option<String> },
    Not(Vec<Compound>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    universal: bool,
    parts: Vec<Part>,
}

impl Compound {
    fn matches(&self, element: &Element) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => element.tag().eq_ignore_ascii_case(tag),
            Part::Id(id) => element.id_attr() == Some(id.as_str()),
            Part::Class(class) => element.has_class(class),
            Part::Attr { name, value } => match (element.attribute(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
            Part::Not(inner) => !inner.iter().any(|c| c.matches(element)),
        })
    }
}

/// A parsed selector list such as `.item, li[data-sortable]:not(.ghost)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let mut parser = Parser {
            source,
            chars: source.chars().peekable(),
        };
        let alternatives = parser.list(None)?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, element: &Element) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    /// Comma-separated compounds up to `close` (or the end of input). Commas
    /// inside quoted values and nested `:not(...)` belong to the inner parse.
    fn list(&mut self, close: Option<char>) -> Result<Vec<Compound>> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_whitespace();
            alternatives.push(self.compound()?);
            self.skip_whitespace();
            match self.chars.next() {
                Some(',') => continue,
                next if next == close => return Ok(alternatives),
                Some(ch) => return Err(self.error(&format!("unexpected `{ch}`"))),
                None => return Err(self.error("unterminated `:not(`")),
            }
        }
    }

    fn compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::default();

        match self.chars.peek().copied() {
            Some('*') => {
                self.chars.next();
                compound.universal = true;
            }
            Some(ch) if is_ident_char(ch) => {
                let tag = self.ident("tag name")?;
                compound.parts.push(Part::Tag(tag));
            }
            _ => {}
        }

        while let Some(&ch) = self.chars.peek() {
            match ch {
                '#' => {
                    self.chars.next();
                    compound.parts.push(Part::Id(self.ident("id")?));
                }
                '.' => {
                    self.chars.next();
                    compound.parts.push(Part::Class(self.ident("class name")?));
                }
                '[' => {
                    self.chars.next();
                    compound.parts.push(self.attribute()?);
                }
                ':' => {
                    self.chars.next();
                    compound.parts.push(self.pseudo()?);
                }
                ',' | ')' => break,
                ch if ch.is_whitespace() => {
                    let mut ahead = self.chars.clone();
                    while ahead.peek().is_some_and(|c| c.is_whitespace()) {
                        ahead.next();
                    }
                    if !matches!(ahead.peek(), None | Some(',' | ')')) {
                        return Err(self.error("combinators are not supported"));
                    }
                    break;
                }
                '>' | '+' | '~' => return Err(self.error("combinators are not supported")),
                other => return Err(self.error(&format!("unexpected `{other}`"))),
            }
        }

        if !compound.universal && compound.parts.is_empty() {
            return Err(self.error("empty compound selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<Part> {
        self.skip_whitespace();
        let name = self.ident("attribute name")?;
        self.skip_whitespace();
        let value = match self.chars.next() {
            Some(']') => return Ok(Part::Attr { name, value: None }),
            Some('=') => {
                self.skip_whitespace();
                self.attribute_value()?
            }
            _ => return Err(self.error("only `[attr]` and `[attr=value]` are supported")),
        };
        self.skip_whitespace();
        match self.chars.next() {
            Some(']') => Ok(Part::Attr {
                name,
                value: Some(value),
            }),
            _ => Err(self.error("unterminated attribute selector")),
        }
    }

    fn attribute_value(&mut self) -> Result<String> {
        match self.chars.peek().copied() {
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                let mut value = String::new();
                for ch in self.chars.by_ref() {
                    if ch == quote {
                        return Ok(value);
                    }
                    value.push(ch);
                }
                Err(self.error("unterminated string"))
            }
            _ => self.ident("attribute value"),
        }
    }

    fn pseudo(&mut self) -> Result<Part> {
        let name = self.ident("pseudo-class")?;
        if name != "not" {
            return Err(self.error(&format!("pseudo-class `:{name}` is not supported")));
        }
        if self.chars.next() != Some('(') {
            return Err(self.error("expected `(` after `:not`"));
        }
        Ok(Part::Not(self.list(Some(')'))?))
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        let mut out = String::new();
        while let Some(&ch) = self.chars.peek() {
            if !is_ident_char(ch) {
                break;
            }
            out.push(ch);
            self.chars.next();
        }
        if out.is_empty() {
            return Err(self.error(&format!("expected {what}")));
        }
        Ok(out)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn error(&self, reason: &str) -> ResizeError {
        unsupported(self.source, reason)
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn unsupported(source: &str, reason: &str) -> ResizeError {
    ResizeError::UnsupportedSelector {
        selector: source.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RenderTree;

    #[test]
    fn class_and_tag_compound() {
        let mut tree = RenderTree::new();
        let li = tree.create_element("LI");
        tree.add_class(li, "item").unwrap();

        let selector = Selector::parse("li.item").unwrap();
        assert!(selector.matches(tree.element(li).unwrap()));
        let selector = Selector::parse("div.item").unwrap();
        assert!(!selector.matches(tree.element(li).unwrap()));
    }

    #[test]
    fn selector_lists_and_not() {
        let mut tree = RenderTree::new();
        let el = tree.create_element("div");
        tree.add_class(el, "card").unwrap();
        tree.add_class(el, "ghost").unwrap();
        let element = tree.element(el).unwrap();

        assert!(!Selector::parse(".card:not(.ghost)").unwrap().matches(element));
        assert!(Selector::parse(".row, .card").unwrap().matches(element));
        assert!(Selector::parse("*").unwrap().matches(element));
    }

    #[test]
    fn attribute_forms() {
        let mut tree = RenderTree::new();
        let el = tree.create_element("div");
        tree.set_attribute(el, "data-kind", "tile").unwrap();
        tree.set_attribute(el, "id", "first").unwrap();
        let element = tree.element(el).unwrap();

        assert!(Selector::parse("[data-kind]").unwrap().matches(element));
        assert!(Selector::parse("[data-kind=tile]").unwrap().matches(element));
        assert!(Selector::parse("[data-kind = \"tile\"]").unwrap().matches(element));
        assert!(!Selector::parse("[data-kind='row']").unwrap().matches(element));
        assert!(Selector::parse("div#first").unwrap().matches(element));
    }

    #[test]
    fn commas_split_only_at_top_level() {
        let mut tree = RenderTree::new();
        let el = tree.create_element("div");
        tree.set_attribute(el, "data-kind", "a,b").unwrap();
        tree.add_class(el, "card").unwrap();
        let element = tree.element(el).unwrap();

        let quoted = Selector::parse("[data-kind=\"a,b\"]").unwrap();
        assert!(quoted.matches(element));
        assert_eq!(quoted.as_str(), "[data-kind=\"a,b\"]");
        assert!(Selector::parse("[data-kind='a,b'], .row").unwrap().matches(element));
        assert!(!Selector::parse(".card:not(.ghost, [data-kind])").unwrap().matches(element));
        assert!(Selector::parse(".card:not(.ghost, .row)").unwrap().matches(element));
        assert!(Selector::parse(" .row , .card ").unwrap().matches(element));
    }

    #[test]
    fn rejects_unsupported_syntax() {
        for source in [
            "ul li",
            "ul > li",
            ".a:hover",
            "",
            ".a,",
            "[x~=y]",
            ".a:not(.b",
            ".a)",
            "[data-kind=\"a,b]",
        ] {
            let err = Selector::parse(source).unwrap_err();
            assert!(
                matches!(err, ResizeError::UnsupportedSelector { .. }),
                "{source}"
            );
        }
    }
}
