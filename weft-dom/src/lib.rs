//! Virtual node model targeted by programs generated by `weft-sfc`.
//!
//! Generated `build_vdom` functions construct a tree of [`NodeRef`] handles
//! from literal template data, then attach inner HTML, [`Props`] and
//! [`DomEventHandler`]s. Rendering and diffing live downstream.

pub mod atom;
pub mod capture;
pub mod event;

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub use atom::Atom;
pub use capture::{Arg, CaptureBorrowed, CaptureOwned, Cloned, OwnedRef};
pub use event::{DomEvent, DomEventHandler, HandlerIdentity, function_hash};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Text,
    Element,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub namespace: String,
    pub key: String,
    pub val: String,
}

impl Attribute {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>, val: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            val: val.into(),
        }
    }
}

#[derive(Debug)]
pub struct VNode {
    pub node_type: NodeType,
    pub data: String,
    pub data_atom: Atom,
    pub namespace: String,
    pub attrs: Vec<Attribute>,
    pub children: Vec<NodeRef>,
    /// Set by `v-html`; replaces structured children when rendered.
    pub inner_html: Option<String>,
    pub props: Props,
    pub dom_event_handlers: BTreeMap<String, DomEventHandler>,
}

impl VNode {
    pub fn new(
        node_type: NodeType,
        data: impl Into<String>,
        data_atom: Atom,
        namespace: impl Into<String>,
        attrs: Vec<Attribute>,
    ) -> Self {
        Self {
            node_type,
            data: data.into(),
            data_atom,
            namespace: namespace.into(),
            attrs,
            children: Vec::new(),
            inner_html: None,
            props: Props::new(),
            dom_event_handlers: BTreeMap::new(),
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.val.as_str())
    }
}

/// Shared, mutable handle to a [`VNode`].
///
/// Generated code keeps one handle for the node under construction and one
/// for the current lexical parent, so nodes are reference counted.
#[derive(Clone)]
pub struct NodeRef(Rc<RefCell<VNode>>);

impl NodeRef {
    pub fn new(node: VNode) -> Self {
        NodeRef(Rc::new(RefCell::new(node)))
    }

    pub fn append_child(&self, child: &NodeRef) {
        self.0.borrow_mut().children.push(child.clone());
    }

    pub fn set_inner_html(&self, html: impl Into<String>) {
        self.0.borrow_mut().inner_html = Some(html.into());
    }

    pub fn set_props(&self, props: Props) {
        self.0.borrow_mut().props = props;
    }

    pub fn set_dom_event_handler(&self, event: impl Into<String>, handler: DomEventHandler) {
        self.0
            .borrow_mut()
            .dom_event_handlers
            .insert(event.into(), handler);
    }

    pub fn borrow(&self) -> Ref<'_, VNode> {
        self.0.borrow()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    pub fn ptr_eq(&self, other: &NodeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

/// Dynamic properties bound with `:name="expr"`.
#[derive(Clone, Default)]
pub struct Props {
    values: BTreeMap<String, Rc<dyn Any>>,
}

impl Props {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn with<T: Any>(mut self, key: impl Into<String>, value: T) -> Self {
        self.values.insert(key.into(), Rc::new(value));
        self
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

/// Builds [`Props`] from `"key" => expr` pairs, cloning each value.
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        $crate::Props::new()$(.with($key, ::std::clone::Clone::clone(&$value)))+
    };
}

/// What a generated `build_vdom` returns: the root node (absent when the
/// root itself is conditional and the condition was false) and the
/// optional style node kept apart from the main tree.
#[derive(Debug, Default, Clone)]
pub struct BuildOutput {
    pub vdom: Option<NodeRef>,
    pub css: Option<NodeRef>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("data handle is not a `{expected}`")]
    DataType { expected: &'static str },
    #[error("handler dispatched to a component that is not a `{expected}`")]
    ComponentType { expected: &'static str },
    #[error("{0}")]
    Component(String),
}

impl BuildError {
    pub fn data_type<T: ?Sized>() -> Self {
        BuildError::DataType {
            expected: std::any::type_name::<T>(),
        }
    }

    pub fn component_type<T: ?Sized>() -> Self {
        BuildError::ComponentType {
            expected: std::any::type_name::<T>(),
        }
    }
}

/// Implemented by generated code.
pub trait BuildVdom {
    fn build_vdom(&self, data: &dyn Any) -> Result<BuildOutput, BuildError>;
}

/// Implemented by hand next to the generated file. Generated files carry a
/// static assertion that their component type implements this.
pub trait Component: BuildVdom {
    fn new_data(&self, props: &Props) -> Result<Box<dyn Any>, BuildError>;
}
