//! Minimal selector matcher for snapshot scopes.
//!
//! Supports type selectors, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`
//! (value optionally quoted), compounds of those, and the descendant
//! combinator (whitespace). Anything else is rejected as invalid.

use pagelens_protocols::{HostDocument, HostError, NodeId};

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

/// A parsed descendant chain, outermost compound first.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selector {
    chain: Vec<Compound>,
}

impl Selector {
    pub(crate) fn parse(input: &str) -> Result<Self, HostError> {
        let chain = input
            .split_whitespace()
            .map(|part| parse_compound(part).ok_or_else(|| HostError::InvalidSelector(input.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        if chain.is_empty() {
            return Err(HostError::InvalidSelector(input.to_string()));
        }
        Ok(Self { chain })
    }

    pub(crate) fn matches<D: HostDocument + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        let Some((last, rest)) = self.chain.split_last() else {
            return false;
        };
        if !compound_matches(doc, node, last) {
            return false;
        }
        // Right-to-left greedy ancestor matching is exact for descendant-only chains.
        let mut pending = rest.len();
        let mut current = doc.parent(node);
        while pending > 0 {
            let Some(ancestor) = current else {
                break;
            };
            if compound_matches(doc, ancestor, &rest[pending - 1]) {
                pending -= 1;
            }
            current = doc.parent(ancestor);
        }
        pending == 0
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(part: &str) -> Option<Compound> {
    let chars: Vec<char> = part.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if chars.first() == Some(&'*') {
        pos = 1;
    } else if let Some(tag) = take_ident(&chars, &mut pos) {
        compound.tag = Some(tag.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.id = Some(take_ident(&chars, &mut pos)?);
            }
            '.' => {
                pos += 1;
                compound.classes.push(take_ident(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                let name = take_ident(&chars, &mut pos)?.to_ascii_lowercase();
                let value = if chars.get(pos) == Some(&'=') {
                    pos += 1;
                    Some(take_attr_value(&chars, &mut pos)?)
                } else {
                    None
                };
                if chars.get(pos) != Some(&']') {
                    return None;
                }
                pos += 1;
                compound.attrs.push((name, value));
            }
            _ => return None,
        }
    }
    Some(compound)
}

fn take_attr_value(chars: &[char], pos: &mut usize) -> Option<String> {
    match chars.get(*pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            *pos += 1;
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != quote {
                *pos += 1;
            }
            if *pos >= chars.len() {
                return None;
            }
            let value = chars[start..*pos].iter().collect();
            *pos += 1;
            Some(value)
        }
        _ => take_ident(chars, pos),
    }
}

fn compound_matches<D: HostDocument + ?Sized>(doc: &D, node: NodeId, compound: &Compound) -> bool {
    if !doc.is_element(node) {
        return false;
    }
    if let Some(tag) = &compound.tag {
        if doc.tag_name(node) != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if doc.attribute(node, "id").as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.is_empty() {
        let class_attr = doc.attribute(node, "class").unwrap_or_default();
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        if !compound.classes.iter().all(|c| classes.contains(&c.as_str())) {
            return false;
        }
    }
    compound.attrs.iter().all(|(name, expected)| match (doc.attribute(node, name), expected) {
        (Some(actual), Some(expected)) => actual == *expected,
        (Some(_), None) => true,
        (None, _) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse("form#login.card.wide[data-kind='x'][hidden]").unwrap();
        assert_eq!(sel.chain.len(), 1);
        let c = &sel.chain[0];
        assert_eq!(c.tag.as_deref(), Some("form"));
        assert_eq!(c.id.as_deref(), Some("login"));
        assert_eq!(c.classes, vec!["card".to_string(), "wide".to_string()]);
        assert_eq!(
            c.attrs,
            vec![
                ("data-kind".to_string(), Some("x".to_string())),
                ("hidden".to_string(), None)
            ]
        );
    }

    #[test]
    fn test_parse_descendant_chain() {
        let sel = Selector::parse("main  .card button").unwrap();
        assert_eq!(sel.chain.len(), 3);
    }

    #[test]
    fn test_parse_rejects_unsupported_syntax() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("a:hover").is_err());
        assert!(Selector::parse("[unclosed").is_err());
        assert!(Selector::parse("#").is_err());
    }
}
