//! Compound selectors
//!
//! Supports the subset host pages are probed with: tag, `.class`, `#id`,
//! `*` and attribute tests (`[a]`, `[a="v"]`, `[a*="v"]`, `[a^="v"]`),
//! chained without combinators, e.g. `div[contenteditable="true"][aria-label]`.

use std::fmt;

use crate::{ElementData, SelectorError};

/// Attribute comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrOp {
    /// `[name]`
    Exists,
    /// `[name="value"]`
    Equals(String),
    /// `[name*="value"]`
    Contains(String),
    /// `[name^="value"]`
    Prefix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, op: AttrOp },
}

/// Compound selector; every part must match
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selector {
    parts: Vec<Part>,
}

impl Selector {
    /// Universal selector
    pub fn any() -> Self {
        Self::default()
    }

    /// Match a tag name
    pub fn tag(tag: &str) -> Self {
        Self::any().and_tag(tag)
    }

    /// Match `[name="value"]`
    pub fn attr_equals(name: &str, value: &str) -> Self {
        Self::any().and_attr(name, AttrOp::Equals(value.to_string()))
    }

    pub fn and_tag(mut self, tag: &str) -> Self {
        self.parts.push(Part::Tag(tag.to_ascii_lowercase()));
        self
    }

    pub fn and_class(mut self, class: &str) -> Self {
        self.parts.push(Part::Class(class.to_string()));
        self
    }

    pub fn and_attr(mut self, name: &str, op: AttrOp) -> Self {
        self.parts.push(Part::Attr {
            name: name.to_string(),
            op,
        });
        self
    }

    /// Parse a compound selector string
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(SelectorError::Empty);
        }
        let chars: Vec<char> = s.chars().collect();
        let mut parts = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' => i += 1,
                '.' => {
                    let (ident, next) = read_ident(&chars, i + 1)?;
                    parts.push(Part::Class(ident));
                    i = next;
                }
                '#' => {
                    let (ident, next) = read_ident(&chars, i + 1)?;
                    parts.push(Part::Id(ident));
                    i = next;
                }
                '[' => {
                    let (part, next) = read_attr(&chars, i + 1)?;
                    parts.push(part);
                    i = next;
                }
                c if is_ident_char(c) => {
                    let (ident, next) = read_ident(&chars, i)?;
                    parts.push(Part::Tag(ident.to_ascii_lowercase()));
                    i = next;
                }
                c if c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',') => {
                    return Err(SelectorError::Unsupported(s.to_string()));
                }
                found => return Err(SelectorError::Unexpected { found, offset: i }),
            }
        }
        Ok(Self { parts })
    }

    /// Check an element against every part
    pub fn matches(&self, element: &ElementData) -> bool {
        self.parts.iter().all(|part| match part {
            Part::Tag(tag) => element.tag == *tag,
            Part::Class(class) => element.has_class(class),
            Part::Id(id) => element.id() == Some(id.as_str()),
            Part::Attr { name, op } => match (element.get_attr(name), op) {
                (None, _) => false,
                (Some(_), AttrOp::Exists) => true,
                (Some(v), AttrOp::Equals(want)) => v == want,
                (Some(v), AttrOp::Contains(want)) => !want.is_empty() && v.contains(want.as_str()),
                (Some(v), AttrOp::Prefix(want)) => !want.is_empty() && v.starts_with(want.as_str()),
            },
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return f.write_str("*");
        }
        for part in &self.parts {
            match part {
                Part::Tag(t) => write!(f, "{t}")?,
                Part::Class(c) => write!(f, ".{c}")?,
                Part::Id(id) => write!(f, "#{id}")?,
                Part::Attr { name, op } => match op {
                    AttrOp::Exists => write!(f, "[{name}]")?,
                    AttrOp::Equals(v) => write!(f, "[{name}=\"{v}\"]")?,
                    AttrOp::Contains(v) => write!(f, "[{name}*=\"{v}\"]")?,
                    AttrOp::Prefix(v) => write!(f, "[{name}^=\"{v}\"]")?,
                },
            }
        }
        Ok(())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], start: usize) -> Result<(String, usize), SelectorError> {
    let mut end = start;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }
    if end == start {
        return match chars.get(start) {
            Some(&found) => Err(SelectorError::Unexpected { found, offset: start }),
            None => Err(SelectorError::Empty),
        };
    }
    Ok((chars[start..end].iter().collect(), end))
}

fn read_attr(chars: &[char], start: usize) -> Result<(Part, usize), SelectorError> {
    let (name, mut i) = read_ident(chars, start)?;
    let close = |i: usize| -> Result<usize, SelectorError> {
        match chars.get(i) {
            Some(']') => Ok(i + 1),
            Some(&found) => Err(SelectorError::Unexpected { found, offset: i }),
            None => Err(SelectorError::UnterminatedAttribute),
        }
    };

    let op_kind = match chars.get(i) {
        Some(']') => return Ok((Part::Attr { name, op: AttrOp::Exists }, i + 1)),
        Some('=') => {
            i += 1;
            '='
        }
        Some(&c) if matches!(c, '*' | '^') && chars.get(i + 1) == Some(&'=') => {
            i += 2;
            c
        }
        Some(&found) => return Err(SelectorError::Unexpected { found, offset: i }),
        None => return Err(SelectorError::UnterminatedAttribute),
    };

    let value = match chars.get(i) {
        Some(&quote) if matches!(quote, '"' | '\'') => {
            let begin = i + 1;
            let len = chars[begin..]
                .iter()
                .position(|&c| c == quote)
                .ok_or(SelectorError::UnterminatedAttribute)?;
            i = begin + len + 1;
            chars[begin..begin + len].iter().collect()
        }
        _ => {
            let (ident, next) = read_ident(chars, i)?;
            i = next;
            ident
        }
    };

    let op = match op_kind {
        '*' => AttrOp::Contains(value),
        '^' => AttrOp::Prefix(value),
        _ => AttrOp::Equals(value),
    };
    Ok((Part::Attr { name, op }, close(i)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut elem = ElementData::new(tag);
        for (name, value) in attrs {
            elem.set_attr(name, value);
        }
        elem
    }

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse(r#"div[contenteditable="true"][aria-label]"#).unwrap();
        assert!(sel.matches(&element("div", &[("contenteditable", "true"), ("aria-label", "Post text")])));
        assert!(!sel.matches(&element("div", &[("contenteditable", "true")])));
        assert!(!sel.matches(&element("span", &[("contenteditable", "true"), ("aria-label", "x")])));
    }

    #[test]
    fn test_parse_contains_and_prefix() {
        let contains = Selector::parse("a[href*='/status/']").unwrap();
        assert!(contains.matches(&element("a", &[("href", "https://x.com/u/status/1")])));
        assert!(!contains.matches(&element("a", &[("href", "https://x.com/u")])));

        let prefix = Selector::parse("[data-testid^=tweet]").unwrap();
        assert!(prefix.matches(&element("div", &[("data-testid", "tweetTextarea_0")])));
    }

    #[test]
    fn test_class_id_universal() {
        let sel = Selector::parse("button.quill-reply-btn#one").unwrap();
        assert!(sel.matches(&element("button", &[("class", "x quill-reply-btn"), ("id", "one")])));
        assert!(Selector::parse("*").unwrap().matches(&element("p", &[])));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert_eq!(Selector::parse("[role=\"dialog\""), Err(SelectorError::UnterminatedAttribute));
        assert!(matches!(Selector::parse("div > p"), Err(SelectorError::Unsupported(_))));
        assert!(matches!(Selector::parse("div!"), Err(SelectorError::Unexpected { found: '!', .. })));
    }

    #[test]
    fn test_display_roundtrips_builder() {
        let sel = Selector::tag("div")
            .and_attr("contenteditable", AttrOp::Equals("true".into()))
            .and_attr("aria-label", AttrOp::Exists);
        assert_eq!(sel.to_string(), r#"div[contenteditable="true"][aria-label]"#);
        assert_eq!(Selector::parse(&sel.to_string()).unwrap(), sel);
    }
}
