//! Per-node directive extraction.
//!
//! Recognised attributes:
//! - `v-if="expr"`: emit the node only when `expr` holds
//! - `v-for="pat in expr"`: emit the node once per item
//! - `v-html="expr"`: raw inner HTML from `expr`'s `Display` output
//! - `:name="expr"`: dynamic property
//! - `@name="call(..)"`: DOM event handler
//!
//! Everything else, including unrecognised `v-` attributes, is static.

use std::collections::BTreeMap;

use crate::template_ast::{TemplateAttr, TemplateNode};

pub const PROP_SIGIL: char = ':';
pub const EVENT_SIGIL: char = '@';
const DIRECTIVE_PREFIX: &str = "v-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForClause {
    /// Text placed between `for` and `{`.
    pub clause: String,
    /// The loop binds `key` and `value`; generated code marks them used.
    pub binds_key_value: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directives<'a> {
    pub if_expr: Option<&'a str>,
    pub for_clause: Option<ForClause>,
    pub html_expr: Option<&'a str>,
    /// Sorted by key, so emission order is independent of attribute order.
    pub props: BTreeMap<&'a str, &'a str>,
    pub events: BTreeMap<&'a str, &'a str>,
    pub static_attrs: Vec<&'a TemplateAttr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    If,
    For,
    Html,
}

impl<'a> Directives<'a> {
    pub fn extract(node: &'a TemplateNode) -> Self {
        let mut out = Directives::default();

        for a in &node.attrs {
            if let Some(dir) = directive(&a.key) {
                let expr = a.val.trim();
                if expr.is_empty() {
                    continue;
                }
                match dir {
                    Directive::If => out.if_expr = Some(expr),
                    Directive::For => out.for_clause = Some(ForClause::parse(expr)),
                    Directive::Html => out.html_expr = Some(expr),
                }
            } else if let Some(name) = a.key.strip_prefix(PROP_SIGIL) {
                if name.is_empty() || a.val.trim().is_empty() {
                    log::warn!("ignoring incomplete property binding {:?} on <{}>", a.key, node.data);
                    continue;
                }
                out.props.insert(name, a.val.as_str());
            } else if let Some(name) = a.key.strip_prefix(EVENT_SIGIL) {
                if name.is_empty() {
                    log::warn!("ignoring event binding without a name on <{}>", node.data);
                    continue;
                }
                out.events.insert(name, a.val.as_str());
            } else {
                out.static_attrs.push(a);
            }
        }

        if out.if_expr.is_some() && out.for_clause.is_some() {
            log::warn!(
                "<{}> declares both v-if and v-for; only v-if is honoured",
                node.data
            );
        }
        out
    }
}

impl ForClause {
    /// `pat in expr` is kept as written. Without a top-level `in` the
    /// clause is the shorthand form and iterates `expr` with an index.
    pub fn parse(expr: &str) -> Self {
        match split_in(expr) {
            Some((pat, iter)) => {
                let compact: String = pat.chars().filter(|c| !c.is_whitespace()).collect();
                ForClause {
                    clause: format!("{pat} in {iter}"),
                    binds_key_value: compact == "(key,value)",
                }
            }
            None => ForClause {
                clause: format!("(key, value) in ({expr}).iter().enumerate()"),
                binds_key_value: true,
            },
        }
    }
}

/// Splits at the first `in` with whitespace of any kind on both sides.
fn split_in(expr: &str) -> Option<(&str, &str)> {
    let space = |c: Option<char>| c.is_some_and(char::is_whitespace);
    expr.match_indices("in")
        .find(|&(at, _)| space(expr[..at].chars().next_back()) && space(expr[at + 2..].chars().next()))
        .map(|(at, _)| (expr[..at].trim(), expr[at + 2..].trim()))
}

fn directive(key: &str) -> Option<Directive> {
    let name = key.strip_prefix(DIRECTIVE_PREFIX)?;
    match normalize_directive_name(name).as_str() {
        "if" => Some(Directive::If),
        "for" => Some(Directive::For),
        "html" => Some(Directive::Html),
        _ => None,
    }
}

/// Case-insensitive, with `_` read as `-`: `v--if` and `v-IF` both name `if`.
fn normalize_directive_name(s: &str) -> String {
    s.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_directive_spellings() {
        assert_eq!(normalize_directive_name("if"), "if");
        assert_eq!(normalize_directive_name("Html"), "html");
        assert_eq!(normalize_directive_name("_for_"), "for");
        assert_eq!(normalize_directive_name("else__if"), "else-if");
    }

    #[test]
    fn explicit_clause_kept_verbatim() {
        let c = ForClause::parse("row in data.rows.iter()");
        assert_eq!(c.clause, "row in data.rows.iter()");
        assert!(!c.binds_key_value);
    }

    #[test]
    fn key_value_pattern_is_marked() {
        let c = ForClause::parse("(key,  value) in data.items.iter().enumerate()");
        assert!(c.binds_key_value);
    }

    #[test]
    fn shorthand_expands_to_enumerate() {
        let c = ForClause::parse("data.items");
        assert_eq!(c.clause, "(key, value) in (data.items).iter().enumerate()");
        assert!(c.binds_key_value);
    }

    #[test]
    fn clause_split_accepts_any_whitespace() {
        let c = ForClause::parse("row\tin data.rows.iter()");
        assert_eq!(c.clause, "row in data.rows.iter()");
        assert!(!c.binds_key_value);

        let c = ForClause::parse("(key, value)\n  in\tdata.items.iter().enumerate()");
        assert_eq!(c.clause, "(key, value) in data.items.iter().enumerate()");
        assert!(c.binds_key_value);
    }

    #[test]
    fn field_named_like_keyword_is_not_a_clause() {
        let c = ForClause::parse("data.in_stock");
        assert!(c.binds_key_value);
        assert!(c.clause.starts_with("(key, value) in (data.in_stock)"));
    }
}
