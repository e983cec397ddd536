//! Arena representation of a parsed template fragment.
//!
//! Nodes are addressed by [`NodeId`]; links are indices, never pointers.
//! Top-level nodes have neither a parent nor siblings.

use weft_dom::{Atom, NodeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateAttr {
    pub namespace: String,
    pub key: String,
    pub val: String,
}

impl TemplateAttr {
    pub fn new(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            namespace: String::new(),
            key: key.into(),
            val: val.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateNode {
    pub kind: NodeType,
    pub atom: Atom,
    /// Tag name for elements, literal text for text and comment nodes.
    pub data: String,
    pub namespace: String,
    pub attrs: Vec<TemplateAttr>,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    last_child: Option<NodeId>,
}

impl TemplateNode {
    pub fn element(tag: &str, namespace: &str, attrs: Vec<TemplateAttr>) -> Self {
        let tag = tag.to_ascii_lowercase();
        Self::new(NodeType::Element, Atom::lookup(&tag), tag, namespace, attrs)
    }

    pub fn text(data: impl Into<String>) -> Self {
        Self::new(NodeType::Text, Atom::NONE, data.into(), "", Vec::new())
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Self::new(NodeType::Comment, Atom::NONE, data.into(), "", Vec::new())
    }

    fn new(kind: NodeType, atom: Atom, data: String, namespace: &str, attrs: Vec<TemplateAttr>) -> Self {
        Self {
            kind,
            atom,
            data,
            namespace: namespace.to_string(),
            attrs,
            parent: None,
            first_child: None,
            next_sibling: None,
            last_child: None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeType::Element
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.val.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<TemplateNode>,
    top_level: Vec<NodeId>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_top_level(&mut self, node: TemplateNode) -> NodeId {
        let id = self.alloc(node);
        self.top_level.push(id);
        id
    }

    pub fn append_child(&mut self, parent: NodeId, node: TemplateNode) -> NodeId {
        let id = self.alloc(node);
        self.nodes[id.0].parent = Some(parent);
        match self.nodes[parent.0].last_child {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.nodes[parent.0].last_child = Some(id);
        id
    }

    fn alloc(&mut self, mut node: TemplateNode) -> NodeId {
        node.parent = None;
        node.first_child = None;
        node.next_sibling = None;
        node.last_child = None;
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &TemplateNode {
        &self.nodes[id.0]
    }

    pub fn top_level(&self) -> &[NodeId] {
        &self.top_level
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            fragment: self,
            next: self.nodes[id.0].first_child,
        }
    }
}

pub struct Children<'a> {
    fragment: &'a Fragment,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.fragment.node(id).next_sibling;
        Some(id)
    }
}
