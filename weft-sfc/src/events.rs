//! Event handler expressions: `receiver.method(args)` or `function(args)`.

use quote::ToTokens;
use syn::parse::Parser;
use syn::punctuated::Punctuated;

use crate::code_writer::{CodeWriter, str_lit};
use crate::error::DirectiveParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBinding {
    /// `None` for the free-function form.
    pub receiver: Option<String>,
    /// Method name, or the function path for the free-function form.
    pub method: String,
    pub args: String,
}

impl EventBinding {
    /// Decomposes a handler expression. The pieces are kept as written; the
    /// expression as a whole must parse as a Rust call or method call.
    pub fn parse(expr: &str) -> Result<Self, DirectiveParseError> {
        let expr = expr.trim();
        let (callee, args) = split_call(expr)
            .ok_or_else(|| DirectiveParseError::new(expr, "expected a call such as `comp.method(args)`"))?;

        let parsed = syn::parse_str::<syn::Expr>(expr)
            .map_err(|e| DirectiveParseError::new(expr, e.to_string()))?;

        let binding = match split_receiver(callee) {
            Some((receiver, method)) => {
                if !matches!(parsed, syn::Expr::MethodCall(_)) {
                    return Err(DirectiveParseError::new(expr, "expected a method call"));
                }
                syn::parse_str::<syn::PathSegment>(method)
                    .map_err(|_| DirectiveParseError::new(expr, format!("bad method name {method:?}")))?;
                EventBinding {
                    receiver: Some(receiver.to_string()),
                    method: method.to_string(),
                    args: args.to_string(),
                }
            }
            None => {
                if !matches!(parsed, syn::Expr::Call(_)) {
                    return Err(DirectiveParseError::new(expr, "expected a function call"));
                }
                syn::parse_str::<syn::Path>(callee)
                    .map_err(|_| DirectiveParseError::new(expr, format!("bad function name {callee:?}")))?;
                EventBinding {
                    receiver: None,
                    method: callee.to_string(),
                    args: args.to_string(),
                }
            }
        };
        if binding.method.is_empty() {
            return Err(DirectiveParseError::new(expr, "empty method name"));
        }
        Ok(binding)
    }

    pub fn call_expr(&self) -> String {
        match &self.receiver {
            Some(r) => format!("{r}.{}({})", self.method, self.args),
            None => format!("{}({})", self.method, self.args),
        }
    }

    /// The arguments one by one, as written.
    pub fn arg_list(&self) -> Vec<String> {
        let pieces = split_args(&self.args);
        // top-level commas also appear in closures and turbofish lists
        match Punctuated::<syn::Expr, syn::Token![,]>::parse_terminated.parse_str(&self.args) {
            Ok(exprs) if exprs.len() != pieces.len() => {
                exprs.iter().map(|e| e.to_token_stream().to_string()).collect()
            }
            _ => pieces.into_iter().map(str::to_string).collect(),
        }
    }

    /// Method name without any turbofish.
    fn method_ident(&self) -> &str {
        self.method.split("::").next().unwrap_or(&self.method).trim()
    }

    /// Compile-time identity of a free-function handler.
    pub fn function_hash(&self) -> Option<u64> {
        self.receiver
            .is_none()
            .then(|| weft_dom::function_hash(&self.method))
    }

    /// Writes the registration of this handler on `n` for `event`.
    ///
    /// The `if false` block calls the handler with its arguments so rustc
    /// type-checks them; it never runs.
    ///
    /// The closure outlives the build, so it may not borrow `data` or loop
    /// variables. Arguments are snapshotted into owned values first, except
    /// those naming `event`, which are evaluated against the dispatched
    /// event. A receiver reached from the component is looked up again on
    /// the component passed to [`weft_dom::DomEventHandler::call`]; any
    /// other receiver is snapshotted like an argument.
    pub(crate) fn emit(&self, w: &mut CodeWriter, event: &str, source: &str) {
        let source = source.split_whitespace().collect::<Vec<_>>().join(" ");
        w.line(format!("// @{event} = {{ {source} }}"));

        w.open("if false {");
        w.line("// force compiler to check arguments for type safety");
        w.line(format!("let _ = {};", self.call_expr()));
        w.close();

        let event = str_lit(event);
        w.open("{");
        let hash = match &self.receiver {
            Some(receiver) => {
                w.line(format!("let receiver_words_ = ({receiver}).receiver_words();"));
                w.line(format!(
                    "let method_words_ = ({receiver}).method_words({});",
                    str_lit(self.method_ident())
                ));
                "receiver_words_[0] ^ receiver_words_[1] ^ method_words_[0] ^ method_words_[1]".to_string()
            }
            // just the function name, so a static hash will do
            None => format!("{:#018x}_u64", weft_dom::function_hash(&self.method)),
        };

        let live = self.receiver.as_deref().and_then(component_receiver);
        if let (Some(receiver), None) = (&self.receiver, &live) {
            w.line(format!("let receiver_ = {};", capture(receiver)));
        }
        let mut call_args = Vec::new();
        for (i, arg) in self.arg_list().into_iter().enumerate() {
            if mentions_event(&arg) {
                call_args.push(arg);
            } else {
                w.line(format!("let arg_{i}_ = {};", capture(&arg)));
                call_args.push(format!("arg_{i}_.get()"));
            }
        }
        let call_args = call_args.join(", ");

        w.open(format!("n.set_dom_event_handler({event}, DomEventHandler::new("));
        w.line(format!("{hash},"));
        match (&self.receiver, live) {
            (Some(_), Some(receiver)) => {
                w.open("move |component_: &dyn ::std::any::Any, event: &DomEvent| {");
                w.line(
                    "let comp = component_.downcast_ref::<Self>().ok_or_else(weft_dom::BuildError::component_type::<Self>)?;",
                );
                w.line(format!("let _ = {receiver}.{}({call_args});", self.method));
            }
            (Some(_), None) => {
                w.open("move |_component: &dyn ::std::any::Any, event: &DomEvent| {");
                w.line(format!("let _ = receiver_.get().{}({call_args});", self.method));
            }
            (None, _) => {
                w.open("move |_component: &dyn ::std::any::Any, event: &DomEvent| {");
                w.line(format!("let _ = {}({call_args});", self.method));
            }
        }
        w.line("Ok(())");
        w.close_with("},");
        w.close_with("));");
        w.close();
    }
}

fn capture(expr: &str) -> String {
    format!("(&weft_dom::Arg(&({expr}))).capture()")
}

/// Whether `expr` uses the handler's `event` parameter. Fields named
/// `event` do not count.
fn mentions_event(expr: &str) -> bool {
    let ident = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    expr.match_indices("event").any(|(at, word)| {
        let before = expr[..at].chars().next_back();
        let after = expr[at + word.len()..].chars().next();
        !ident(before) && !ident(after) && before != Some('.')
    })
}

/// The receiver re-rooted at `comp`, when it is reached from the component
/// through fields, literal indexes and argument-free method calls only.
/// `self` is rewritten to `comp` since the closure cannot name it.
fn component_receiver(receiver: &str) -> Option<String> {
    let mut expr = syn::parse_str::<syn::Expr>(receiver).ok()?;
    let mut cursor = &mut expr;
    let rewritten = loop {
        cursor = match cursor {
            syn::Expr::Field(f) => &mut *f.base,
            syn::Expr::Paren(p) => &mut *p.expr,
            syn::Expr::Index(i) if matches!(*i.index, syn::Expr::Lit(_)) => &mut *i.expr,
            syn::Expr::MethodCall(m) if m.args.is_empty() => &mut *m.receiver,
            syn::Expr::Path(p) if p.qself.is_none() && p.path.is_ident("comp") => break false,
            syn::Expr::Path(p) if p.qself.is_none() && p.path.is_ident("self") => {
                *p = syn::parse_quote!(comp);
                break true;
            }
            _ => return None,
        };
    };
    Some(if rewritten {
        expr.to_token_stream().to_string()
    } else {
        receiver.to_string()
    })
}

/// Byte offset, character and nesting depth of every bracket and comma
/// outside string and char literals. A bracket carries the depth of the
/// level it opens from or closes back to. `None` when a literal is left
/// open or the brackets do not balance.
fn structure(expr: &str) -> Option<Vec<(usize, char, usize)>> {
    let chars: Vec<(usize, char)> = expr.char_indices().collect();
    let mut marks = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        match c {
            '"' => {
                i += 1;
                while i < chars.len() && chars[i].1 != '"' {
                    if chars[i].1 == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= chars.len() {
                    return None;
                }
            }
            '\'' => {
                // char literal; a lone quote is a lifetime
                if chars.get(i + 1).map(|c| c.1) == Some('\\') {
                    i += 2;
                    while i < chars.len() && chars[i].1 != '\'' {
                        i += 1;
                    }
                } else if chars.get(i + 2).map(|c| c.1) == Some('\'') {
                    i += 2;
                }
            }
            '(' | '[' | '{' => {
                marks.push((pos, c, depth));
                depth += 1;
            }
            ')' | ']' | '}' => {
                depth = depth.checked_sub(1)?;
                marks.push((pos, c, depth));
            }
            ',' => marks.push((pos, c, depth)),
            _ => {}
        }
        i += 1;
    }
    (depth == 0).then_some(marks)
}

/// Splits `callee(args)` at the final top-level parenthesised group.
fn split_call(expr: &str) -> Option<(&str, &str)> {
    if !expr.ends_with(')') {
        return None;
    }
    let marks = structure(expr)?;
    let top = |want: char| marks.iter().rev().find(|&&(_, c, d)| c == want && d == 0).map(|m| m.0);
    if top(')') != Some(expr.len() - 1) {
        return None;
    }
    let open = top('(')?;
    let callee = expr[..open].trim();
    if callee.is_empty() {
        return None;
    }
    Some((callee, expr[open + 1..expr.len() - 1].trim()))
}

/// Splits an argument list at its top-level commas, dropping a trailing one.
fn split_args(args: &str) -> Vec<&str> {
    let Some(marks) = structure(args) else {
        return vec![args];
    };
    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, c, depth) in marks {
        if c == ',' && depth == 0 {
            pieces.push(args[start..pos].trim());
            start = pos + 1;
        }
    }
    pieces.push(args[start..].trim());
    pieces.retain(|p| !p.is_empty());
    pieces
}

/// Splits `receiver.method` at the last top-level dot.
fn split_receiver(callee: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut dot = None;
    for (pos, c) in callee.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => dot = Some(pos),
            _ => {}
        }
    }
    let dot = dot?;
    let receiver = callee[..dot].trim();
    let method = callee[dot + 1..].trim();
    (!receiver.is_empty()).then_some((receiver, method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_nested_groups() {
        assert_eq!(split_call("a.b(c(d), [e])"), Some(("a.b", "c(d), [e]")));
        assert_eq!(split_call("f(\")\")"), Some(("f", "\")\"")));
        assert_eq!(split_call("f(')')"), Some(("f", "')'")));
        assert_eq!(split_call("(f)"), None);
        assert_eq!(split_call("f(x"), None);
    }

    #[test]
    fn args_split_at_top_level_commas() {
        assert_eq!(split_args("event, row"), vec!["event", "row"]);
        assert_eq!(split_args("f(a, b), [c, d], \"e,f\""), vec!["f(a, b)", "[c, d]", "\"e,f\""]);
        assert_eq!(split_args("x,"), vec!["x"]);
        assert!(split_args("").is_empty());
    }

    #[test]
    fn event_parameter_is_recognised() {
        assert!(mentions_event("event"));
        assert!(mentions_event("&event"));
        assert!(mentions_event("event.target_id.clone()"));
        assert!(!mentions_event("data.event"));
        assert!(!mentions_event("events"));
        assert!(!mentions_event("prevent"));
    }

    #[test]
    fn component_receivers_are_looked_up_live() {
        assert_eq!(component_receiver("comp").as_deref(), Some("comp"));
        assert_eq!(component_receiver("comp.form.rows[0]").as_deref(), Some("comp.form.rows[0]"));
        assert_eq!(component_receiver("comp.current()").as_deref(), Some("comp.current()"));
        assert_eq!(component_receiver("self.form").map(|r| r.replace(' ', "")).as_deref(), Some("comp.form"));
        assert_eq!(component_receiver("comp.rows[i]"), None);
        assert_eq!(component_receiver("comp.row(key)"), None);
        assert_eq!(component_receiver("data.form"), None);
        assert_eq!(component_receiver("row"), None);
    }

    #[test]
    fn receiver_split_ignores_dots_in_brackets() {
        assert_eq!(split_receiver("self.rows[a.b].item.on"), Some(("self.rows[a.b].item", "on")));
        assert_eq!(split_receiver("handlers::on_click"), None);
    }
}
