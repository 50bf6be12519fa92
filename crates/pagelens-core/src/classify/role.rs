//! Role vocabulary and the tag-default table.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of roles a node can be classified as.
///
/// `Clickable` and `Focusable` are synthetic roles assigned by the
/// cursor-interactive pass; they never come from markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Button,
    Link,
    Textbox,
    Searchbox,
    Checkbox,
    Radio,
    Spinbutton,
    Slider,
    Switch,
    Combobox,
    Listbox,
    Option,
    Menuitem,
    Tab,
    Heading,
    List,
    Listitem,
    Img,
    Paragraph,
    Table,
    Row,
    Cell,
    Columnheader,
    Form,
    Navigation,
    Main,
    Banner,
    Contentinfo,
    Complementary,
    Region,
    Dialog,
    Document,
    Generic,
    Clickable,
    Focusable,
}

const ALL: &[Role] = &[
    Role::Button,
    Role::Link,
    Role::Textbox,
    Role::Searchbox,
    Role::Checkbox,
    Role::Radio,
    Role::Spinbutton,
    Role::Slider,
    Role::Switch,
    Role::Combobox,
    Role::Listbox,
    Role::Option,
    Role::Menuitem,
    Role::Tab,
    Role::Heading,
    Role::List,
    Role::Listitem,
    Role::Img,
    Role::Paragraph,
    Role::Table,
    Role::Row,
    Role::Cell,
    Role::Columnheader,
    Role::Form,
    Role::Navigation,
    Role::Main,
    Role::Banner,
    Role::Contentinfo,
    Role::Complementary,
    Role::Region,
    Role::Dialog,
    Role::Document,
    Role::Generic,
    Role::Clickable,
    Role::Focusable,
];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Link => "link",
            Role::Textbox => "textbox",
            Role::Searchbox => "searchbox",
            Role::Checkbox => "checkbox",
            Role::Radio => "radio",
            Role::Spinbutton => "spinbutton",
            Role::Slider => "slider",
            Role::Switch => "switch",
            Role::Combobox => "combobox",
            Role::Listbox => "listbox",
            Role::Option => "option",
            Role::Menuitem => "menuitem",
            Role::Tab => "tab",
            Role::Heading => "heading",
            Role::List => "list",
            Role::Listitem => "listitem",
            Role::Img => "img",
            Role::Paragraph => "paragraph",
            Role::Table => "table",
            Role::Row => "row",
            Role::Cell => "cell",
            Role::Columnheader => "columnheader",
            Role::Form => "form",
            Role::Navigation => "navigation",
            Role::Main => "main",
            Role::Banner => "banner",
            Role::Contentinfo => "contentinfo",
            Role::Complementary => "complementary",
            Role::Region => "region",
            Role::Dialog => "dialog",
            Role::Document => "document",
            Role::Generic => "generic",
            Role::Clickable => "clickable",
            Role::Focusable => "focusable",
        }
    }

    /// Parse a markup role token. Synthetic roles are not accepted here.
    pub fn from_token(token: &str) -> Option<Role> {
        let token = token.trim().to_ascii_lowercase();
        match token.as_str() {
            "image" => Some(Role::Img),
            "gridcell" => Some(Role::Cell),
            "clickable" | "focusable" => None,
            _ => ALL.iter().copied().find(|r| r.as_str() == token),
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            Role::Button
                | Role::Link
                | Role::Textbox
                | Role::Searchbox
                | Role::Checkbox
                | Role::Radio
                | Role::Spinbutton
                | Role::Slider
                | Role::Switch
                | Role::Combobox
                | Role::Listbox
                | Role::Option
                | Role::Menuitem
                | Role::Tab
                | Role::Clickable
                | Role::Focusable
        )
    }

    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Role::Heading | Role::Img | Role::List | Role::Listitem | Role::Paragraph
        )
    }

    pub fn is_landmark(&self) -> bool {
        matches!(
            self,
            Role::Main
                | Role::Navigation
                | Role::Banner
                | Role::Contentinfo
                | Role::Complementary
                | Role::Region
                | Role::Form
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(match token.as_str() {
            "clickable" => Role::Clickable,
            "focusable" => Role::Focusable,
            other => Role::from_token(other).unwrap_or(Role::Generic),
        })
    }
}

/// First recognised token of an explicit `role` attribute.
pub(crate) fn explicit_role(attr: &str) -> Option<Role> {
    attr.split_whitespace().find_map(Role::from_token)
}

/// Default role for an `input` element by its `type` attribute.
fn input_role(input_type: &str) -> Role {
    match input_type.to_ascii_lowercase().as_str() {
        "search" => Role::Searchbox,
        "checkbox" => Role::Checkbox,
        "radio" => Role::Radio,
        "number" => Role::Spinbutton,
        "range" => Role::Slider,
        "submit" | "button" | "reset" | "image" => Role::Button,
        _ => Role::Textbox,
    }
}

/// Whether an `input` of this type renders as a button.
pub(crate) fn is_button_input(input_type: &str) -> bool {
    input_role(input_type) == Role::Button
}

/// Tag-default role. `has_href` applies to anchors; `input_type` to inputs.
pub(crate) fn implicit_role(tag: &str, has_href: bool, input_type: Option<&str>) -> Role {
    match tag {
        "a" if has_href => Role::Link,
        "button" => Role::Button,
        "input" => input_role(input_type.unwrap_or("text")),
        "textarea" => Role::Textbox,
        "select" => Role::Combobox,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Role::Heading,
        "ul" | "ol" => Role::List,
        "li" => Role::Listitem,
        "table" => Role::Table,
        "tr" => Role::Row,
        "td" => Role::Cell,
        "th" => Role::Columnheader,
        "img" => Role::Img,
        "p" => Role::Paragraph,
        "form" => Role::Form,
        "nav" => Role::Navigation,
        "main" => Role::Main,
        "header" => Role::Banner,
        "footer" => Role::Contentinfo,
        "aside" => Role::Complementary,
        "section" => Role::Region,
        "dialog" => Role::Dialog,
        "body" | "html" => Role::Document,
        _ => Role::Generic,
    }
}

/// Heading level implied by an `h1`..`h6` tag.
pub(crate) fn heading_level(tag: &str) -> Option<u8> {
    let digit = tag.strip_prefix('h')?;
    match digit.parse::<u8>() {
        Ok(level @ 1..=6) if digit.len() == 1 => Some(level),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_tokens_round_trip() {
        for role in ALL {
            let json = serde_json::to_string(role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, *role);
        }
    }

    #[test]
    fn test_unknown_token_deserializes_to_generic() {
        let role: Role = serde_json::from_str("\"tooltip\"").unwrap();
        assert_eq!(role, Role::Generic);
    }

    #[test]
    fn test_explicit_role_first_recognised_token() {
        assert_eq!(explicit_role("presentation-ish button link"), Some(Role::Button));
        assert_eq!(explicit_role("IMAGE"), Some(Role::Img));
        assert_eq!(explicit_role("clickable"), None);
        assert_eq!(explicit_role(""), None);
    }

    #[test]
    fn test_implicit_roles() {
        assert_eq!(implicit_role("a", true, None), Role::Link);
        assert_eq!(implicit_role("a", false, None), Role::Generic);
        assert_eq!(implicit_role("input", false, Some("email")), Role::Textbox);
        assert_eq!(implicit_role("input", false, Some("SEARCH")), Role::Searchbox);
        assert_eq!(implicit_role("input", false, Some("weird")), Role::Textbox);
        assert_eq!(implicit_role("input", false, None), Role::Textbox);
        assert_eq!(implicit_role("input", false, Some("range")), Role::Slider);
        assert_eq!(implicit_role("input", false, Some("reset")), Role::Button);
        assert_eq!(implicit_role("section", false, None), Role::Region);
        assert_eq!(implicit_role("html", false, None), Role::Document);
        assert_eq!(implicit_role("div", false, None), Role::Generic);
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("hr"), None);
        assert_eq!(heading_level("h10"), None);
    }

    #[test]
    fn test_role_sets() {
        assert!(Role::Clickable.is_interactive());
        assert!(!Role::Heading.is_interactive());
        assert!(Role::Paragraph.is_content());
        assert!(Role::Form.is_landmark());
        assert!(!Role::Dialog.is_landmark());
    }
}
