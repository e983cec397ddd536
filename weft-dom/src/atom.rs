//! Numeric identifiers for well-known HTML tags.
//!
//! The compiler stores the atom of every element it emits so that the
//! runtime can compare tags without string comparisons. Unknown tags get
//! [`Atom::NONE`].

use std::fmt;

/// Sorted; an atom's value is its index here plus one.
const TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base",
    "blockquote", "body", "br", "button", "canvas", "caption", "code", "col",
    "colgroup", "dd", "details", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figure", "footer", "foreignobject", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "head", "header", "hr", "html", "i", "iframe", "img",
    "input", "label", "legend", "li", "link", "main", "math", "meta", "nav",
    "ol", "optgroup", "option", "p", "path", "pre", "script", "section",
    "select", "slot", "small", "source", "span", "strong", "style", "svg",
    "table", "tbody", "td", "template", "textarea", "tfoot", "th", "thead",
    "title", "tr", "track", "ul", "video", "wbr",
];

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Atom(pub u32);

impl Atom {
    pub const NONE: Atom = Atom(0);
    pub const FOREIGN_OBJECT: Atom = Atom(30);
    pub const MATH: Atom = Atom(51);
    pub const SCRIPT: Atom = Atom(60);
    pub const STYLE: Atom = Atom(68);
    pub const SVG: Atom = Atom(69);

    /// Looks up a lower-case tag name.
    pub fn lookup(name: &str) -> Atom {
        match TAGS.binary_search(&name) {
            Ok(i) => Atom(i as u32 + 1),
            Err(_) => Atom::NONE,
        }
    }

    pub fn name(self) -> Option<&'static str> {
        (self.0 as usize)
            .checked_sub(1)
            .and_then(|i| TAGS.get(i))
            .copied()
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Atom({}:{name})", self.0),
            None => write!(f, "Atom({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(TAGS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn named_constants_match_table() {
        assert_eq!(Atom::FOREIGN_OBJECT.name(), Some("foreignobject"));
        assert_eq!(Atom::MATH.name(), Some("math"));
        assert_eq!(Atom::SCRIPT.name(), Some("script"));
        assert_eq!(Atom::STYLE.name(), Some("style"));
        assert_eq!(Atom::SVG.name(), Some("svg"));
    }

    #[test]
    fn unknown_tags_have_no_atom() {
        assert_eq!(Atom::lookup("my-widget"), Atom::NONE);
        assert_eq!(Atom::NONE.name(), None);
        assert_eq!(Atom::lookup("div").name(), Some("div"));
    }
}
