//! Single-pass, non-recursive walk that turns a template subtree into
//! statements rebuilding it as `weft_dom` nodes.
//!
//! The generated statements share two locals: `n`, the node just built,
//! and `parent`, rebound in a fresh block each time the walk descends.
//! `v-if`/`v-for` wrap a node's statements and all of its descendants'.

use crate::code_writer::{CodeWriter, str_lit};
use crate::directives::Directives;
use crate::error::CompileError;
use crate::events::EventBinding;
use crate::template_ast::{Fragment, NodeId, TemplateAttr, TemplateNode};

/// Writes the statements for the subtree at `root`. The root's node is
/// stored in `vdom`; every other node is appended to its parent.
pub fn write_tree(fragment: &Fragment, root: NodeId, w: &mut CodeWriter) -> Result<(), CompileError> {
    // set when a node opens an if/for block, taken when its subtree is left
    let mut close_req = vec![false; fragment.len()];
    let start_depth = w.depth();
    let mut n = root;

    'write_node: loop {
        let node = fragment.node(n);
        let dirs = Directives::extract(node);
        log::trace!("visiting <{}> ({:?})", node.data, node.kind);

        // mutually exclusive; the conditional wins
        if let Some(expr) = dirs.if_expr {
            w.open(format!("if {expr} {{"));
            close_req[n.index()] = true;
        } else if let Some(f) = &dirs.for_clause {
            w.open(format!("for {} {{", f.clause));
            if f.binds_key_value {
                // shorthand loops often ignore the key; that must not fail the build
                w.line("let _ = (&key, &value);");
            }
            close_req[n.index()] = true;
        }

        w.line(format!("n = {};", node_literal(node, &dirs.static_attrs)));
        if n == root {
            w.line("vdom = Some(n.clone());");
        } else {
            w.line("parent.append_child(&n);");
        }

        if let Some(expr) = dirs.html_expr {
            w.line(format!("n.set_inner_html(format!(\"{{}}\", {expr}));"));
        }

        if !dirs.props.is_empty() {
            w.open("n.set_props(weft_dom::props! {");
            for (key, expr) in &dirs.props {
                w.line(format!("{} => {},", str_lit(key), expr.trim()));
            }
            w.close_with("});");
        }

        for (event, expr) in &dirs.events {
            let binding = EventBinding::parse(expr)?;
            binding.emit(w, event, expr);
        }

        if let Some(child) = node.first_child {
            w.open("{");
            w.line("let parent = n.clone();");
            n = child;
            continue 'write_node;
        }

        if let Some(next) = node.next_sibling {
            close_block(w, &mut close_req, n);
            n = next;
            continue 'write_node;
        }

        // nowhere left but up toward the root
        close_block(w, &mut close_req, n);
        let mut up = node.parent;
        while let Some(p) = up {
            w.close(); // the `parent` scope opened on descent
            close_block(w, &mut close_req, p);
            if p == root {
                break;
            }
            if let Some(next) = fragment.node(p).next_sibling {
                n = next;
                continue 'write_node;
            }
            up = fragment.node(p).parent;
        }
        break;
    }

    debug_assert!(close_req.iter().all(|c| !c), "unclosed control-flow block");
    debug_assert_eq!(w.depth(), start_depth);
    Ok(())
}

fn close_block(w: &mut CodeWriter, close_req: &mut [bool], id: NodeId) {
    if std::mem::take(&mut close_req[id.index()]) {
        w.close();
    }
}

/// Construction expression for `node` built from literal data only.
pub(crate) fn node_literal(node: &TemplateNode, attrs: &[&TemplateAttr]) -> String {
    let attrs = attrs
        .iter()
        .map(|a| {
            format!(
                "Attribute::new({}, {}, {})",
                str_lit(&a.namespace),
                str_lit(&a.key),
                str_lit(&a.val)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "NodeRef::new(VNode::new(NodeType::{:?}, {}, Atom({}), {}, vec![{}]))",
        node.kind,
        str_lit(&node.data),
        node.atom.0,
        str_lit(&node.namespace),
        attrs
    )
}
