use std::borrow::Cow;

use pest::Parser;
use pest::error::LineColLocation;
use pest::iterators::Pair;

use crate::error::ParseError;
use crate::template_ast::{Fragment, NodeId, TemplateAttr, TemplateNode};

#[derive(pest_derive::Parser)]
#[grammar = "fragment.pest"]
struct FragmentGrammar;

/// Turns template text into a [`Fragment`]. The compiler only depends on
/// this trait, so a different markup front end can be plugged in.
pub trait FragmentParser {
    fn parse_fragment(&self, source: &str) -> Result<Fragment, ParseError>;
}

/// The default parser, backed by a pest grammar.
///
/// Supports:
/// - nested elements, self-closing tags (`<input/>`) and HTML void elements
/// - `<script>`/`<style>` bodies kept verbatim
/// - quoted, unquoted and valueless attributes, including `:prop`, `@event`
///   and `v-` directives
/// - comments and character references
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFragmentParser;

impl FragmentParser for HtmlFragmentParser {
    fn parse_fragment(&self, source: &str) -> Result<Fragment, ParseError> {
        parse_fragment(source)
    }
}

pub fn parse_fragment(source: &str) -> Result<Fragment, ParseError> {
    let mut pairs = FragmentGrammar::parse(Rule::fragment, source).map_err(to_parse_error)?;
    let file = pairs.next().ok_or_else(|| ParseError {
        message: "empty fragment".to_string(),
        line: 1,
        col: 1,
    })?;
    debug_assert!(file.as_rule() == Rule::fragment);

    let mut fragment = Fragment::new();
    for node in file.into_inner() {
        consume_node(node, &mut fragment, None, "");
    }
    log::trace!("parsed fragment with {} nodes", fragment.len());
    Ok(fragment)
}

fn to_parse_error(e: pest::error::Error<Rule>) -> ParseError {
    let (line, col) = match e.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    ParseError {
        message: e.variant.message().into_owned(),
        line,
        col,
    }
}

fn attach(fragment: &mut Fragment, parent: Option<NodeId>, node: TemplateNode) -> NodeId {
    match parent {
        Some(p) => fragment.append_child(p, node),
        None => fragment.push_top_level(node),
    }
}

fn consume_node(pair: Pair<Rule>, fragment: &mut Fragment, parent: Option<NodeId>, namespace: &str) {
    match pair.as_rule() {
        Rule::text => {
            let text = decode_entities(pair.as_str());
            attach(fragment, parent, TemplateNode::text(text));
        }
        Rule::comment => {
            let body = pair
                .into_inner()
                .next()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default();
            attach(fragment, parent, TemplateNode::comment(body));
        }
        Rule::self_closing | Rule::void_element | Rule::raw_element | Rule::normal_element => {
            consume_element(pair, fragment, parent, namespace);
        }
        _ => {}
    }
}

fn consume_element(pair: Pair<Rule>, fragment: &mut Fragment, parent: Option<NodeId>, parent_ns: &str) {
    let mut tag = String::new();
    let mut attrs = Vec::new();
    let mut raw_text: Option<&str> = None;
    let mut children = Vec::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::tag_name | Rule::raw_name | Rule::void_name => {
                tag = part.as_str().to_ascii_lowercase();
            }
            Rule::attribute => attrs.push(part),
            Rule::raw_text => raw_text = Some(part.as_str()),
            _ => children.push(part),
        }
    }

    let namespace = match tag.as_str() {
        "svg" => "svg",
        "math" => "math",
        _ => parent_ns,
    };
    let attrs = attrs
        .into_iter()
        .map(|a| parse_attr(a, namespace))
        .collect();
    let id = attach(fragment, parent, TemplateNode::element(&tag, namespace, attrs));

    if let Some(raw) = raw_text.filter(|r| !r.is_empty()) {
        fragment.append_child(id, TemplateNode::text(raw));
    }

    let child_ns = if namespace == "svg" && tag == "foreignobject" {
        ""
    } else {
        namespace
    };
    for child in children {
        consume_node(child, fragment, Some(id), child_ns);
    }
}

fn parse_attr(attr: Pair<Rule>, namespace: &str) -> TemplateAttr {
    // attribute = name ( "=" value )?
    let mut name = String::new();
    let mut value = String::new();

    for part in attr.into_inner() {
        match part.as_rule() {
            Rule::attr_name => name = part.as_str().to_ascii_lowercase(),
            Rule::dq_value | Rule::sq_value | Rule::bare_value => {
                value = decode_entities(part.as_str()).into_owned();
            }
            _ => {}
        }
    }

    if !namespace.is_empty() {
        for prefix in ["xlink", "xml"] {
            if let Some(key) = name.strip_prefix(prefix).and_then(|k| k.strip_prefix(':')) {
                return TemplateAttr {
                    namespace: prefix.to_string(),
                    key: key.to_string(),
                    val: value,
                };
            }
        }
    }
    TemplateAttr::new(name, value)
}

/// Decodes the common named character references plus decimal and hex
/// numeric ones. Unknown references are left untouched.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|end| decode_reference(&tail[1..end]).map(|c| (c, end))) {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
