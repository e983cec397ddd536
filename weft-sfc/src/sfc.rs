//! Splits the top level of a template fragment into its parts: the content
//! root, an optional `<style>` and an optional embedded-code `<script>`.

use weft_dom::{Atom, NodeType};

use crate::error::{CompileError, StructuralError};
use crate::template_ast::{Fragment, NodeId};

/// `type` a `<script>` must declare to be spliced into the generated file.
pub const SCRIPT_TYPE: &str = "application/x-rust";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sfc {
    pub root: NodeId,
    pub style: Option<NodeId>,
    pub script: Option<NodeId>,
}

/// Only element nodes count; top-level text and comments are ignored.
pub fn split_fragment(fragment: &Fragment, script_type: &str) -> Result<Sfc, StructuralError> {
    let mut root = None;
    let mut style = None;
    let mut script = None;

    for &id in fragment.top_level() {
        let node = fragment.node(id);
        if !node.is_element() {
            continue;
        }

        if node.atom == Atom::STYLE {
            if style.is_some() {
                return Err(StructuralError::MultipleStyles);
            }
            style = Some(id);
            continue;
        }

        if node.atom == Atom::SCRIPT {
            if node.attrs.iter().any(|a| a.key == "type" && a.val == script_type) {
                if script.is_some() {
                    return Err(StructuralError::MultipleScripts(script_type.to_string()));
                }
                script = Some(id);
                continue;
            }
            return Err(StructuralError::UntypedScript(script_type.to_string()));
        }

        if root.is_some() {
            return Err(StructuralError::MultipleRoots);
        }
        root = Some(id);
    }

    let root = root.ok_or(StructuralError::NoRoot)?;
    debug_assert!(fragment.node(root).parent.is_none());
    log::debug!(
        "classified fragment: root <{}>, style: {}, script: {}",
        fragment.node(root).data,
        style.is_some(),
        script.is_some()
    );
    Ok(Sfc {
        root,
        style,
        script,
    })
}

impl Sfc {
    /// Verbatim source of the embedded-code node. An empty `<script>` yields
    /// `None`; anything but a single text child is a content error.
    pub fn embedded_code<'f>(&self, fragment: &'f Fragment) -> Result<Option<&'f str>, CompileError> {
        let Some(id) = self.script else {
            return Ok(None);
        };
        let mut children = fragment.children(id);
        let Some(first) = children.next() else {
            return Ok(None);
        };
        let txt = fragment.node(first);
        if txt.kind != NodeType::Text || children.next().is_some() {
            return Err(CompileError::Content {
                tag: fragment.node(id).data.clone(),
                found: format!("{:?} node {:?}", txt.kind, txt.data),
            });
        }
        Ok(Some(txt.data.as_str()))
    }

    /// The style node and its first child, when that child is text.
    pub fn style_text(&self, fragment: &Fragment) -> Option<(NodeId, NodeId)> {
        let style = self.style?;
        let first = fragment.node(style).first_child?;
        (fragment.node(first).kind == NodeType::Text).then_some((style, first))
    }
}
