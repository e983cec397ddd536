use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

use crate::BuildError;

const METHOD_SEED: u64 = 0x7765_6674;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomEvent {
    pub event_type: String,
    pub target_id: Option<String>,
}

impl DomEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            target_id: None,
        }
    }

    /// Placeholder bound to `event` while a tree is being built, so that
    /// handler argument lists referring to `event` type-check.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn is_stub(&self) -> bool {
        self.event_type.is_empty()
    }
}

type Callback = dyn Fn(&dyn Any, &DomEvent) -> Result<(), BuildError>;

/// A registered handler plus the identity key used to tell whether two
/// renders bound the same handler. Equality compares the key only.
///
/// The callback does not own the component. Whoever dispatches the event
/// passes the live component in, and a handler bound to a component method
/// downcasts it back to its concrete type.
#[derive(Clone)]
pub struct DomEventHandler {
    pub receiver_and_method_hash: u64,
    callback: Rc<Callback>,
}

impl DomEventHandler {
    pub fn new(
        receiver_and_method_hash: u64,
        callback: impl Fn(&dyn Any, &DomEvent) -> Result<(), BuildError> + 'static,
    ) -> Self {
        Self {
            receiver_and_method_hash,
            callback: Rc::new(callback),
        }
    }

    /// Run the handler against `component`, the instance whose
    /// `build_vdom` produced it.
    pub fn call(&self, component: &dyn Any, event: &DomEvent) -> Result<(), BuildError> {
        (self.callback)(component, event)
    }
}

impl PartialEq for DomEventHandler {
    fn eq(&self, other: &Self) -> bool {
        self.receiver_and_method_hash == other.receiver_and_method_hash
    }
}

impl Eq for DomEventHandler {}

impl fmt::Debug for DomEventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomEventHandler")
            .field(
                "receiver_and_method_hash",
                &format_args!("{:#018x}", self.receiver_and_method_hash),
            )
            .finish_non_exhaustive()
    }
}

/// Two-word identities for bound-method handlers.
///
/// Implemented for references only, so method-call autoref resolves
/// `comp.receiver_words()` to the address of the value `comp` points at
/// (or of `comp` itself when it is not a reference).
pub trait HandlerIdentity {
    /// Address of the receiver and a hash of its type.
    fn receiver_words(self) -> [u64; 2];
    /// Two independent hashes of the method path `Type::method`.
    fn method_words(self, method: &str) -> [u64; 2];
}

impl<T: ?Sized> HandlerIdentity for &T {
    fn receiver_words(self) -> [u64; 2] {
        let addr = self as *const T as *const () as usize as u64;
        [addr, xxh3_64(type_name::<T>().as_bytes())]
    }

    fn method_words(self, method: &str) -> [u64; 2] {
        let path = format!("{}::{}", type_name::<T>(), method);
        [
            xxh3_64(path.as_bytes()),
            xxh3_64_with_seed(path.as_bytes(), METHOD_SEED),
        ]
    }
}

/// Identity of a free-function handler; the compiler computes it ahead of
/// time and emits it as a literal.
pub fn function_hash(name: &str) -> u64 {
    xxh3_64(name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counter {
        hits: Cell<u32>,
    }

    fn combined<T: ?Sized>(r: &T, method: &str) -> u64 {
        let rw = r.receiver_words();
        let mw = r.method_words(method);
        rw[0] ^ rw[1] ^ mw[0] ^ mw[1]
    }

    #[test]
    fn same_receiver_same_method_is_stable() {
        let c = Counter { hits: Cell::new(0) };
        assert_eq!(combined(&c, "inc"), combined(&c, "inc"));
    }

    #[test]
    fn identity_differs_by_method_and_instance() {
        let a = Counter { hits: Cell::new(0) };
        let b = Counter { hits: Cell::new(0) };
        assert_ne!(combined(&a, "inc"), combined(&a, "dec"));
        assert_ne!(combined(&a, "inc"), combined(&b, "inc"));
    }

    fn bump(component: &dyn Any, _event: &DomEvent) -> Result<(), BuildError> {
        let c = component
            .downcast_ref::<Counter>()
            .ok_or_else(BuildError::component_type::<Counter>)?;
        c.hits.set(c.hits.get() + 1);
        Ok(())
    }

    #[test]
    fn handler_equality_uses_hash_only() {
        let h1 = DomEventHandler::new(7, bump);
        let h2 = DomEventHandler::new(7, |_, _| Ok(()));
        let h3 = DomEventHandler::new(8, bump);
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn handler_mutates_the_live_component() {
        let c = Counter { hits: Cell::new(0) };
        let handler = DomEventHandler::new(combined(&c, "bump"), bump);
        let copy = handler.clone();

        handler.call(&c, &DomEvent::new("click")).unwrap();
        copy.call(&c, &DomEvent::new("click")).unwrap();
        assert_eq!(c.hits.get(), 2);
    }

    #[test]
    fn handler_rejects_foreign_component() {
        let handler = DomEventHandler::new(1, bump);
        let err = handler.call(&"not a counter", &DomEvent::new("click")).unwrap_err();
        assert!(matches!(err, BuildError::ComponentType { .. }));
        assert!(err.to_string().contains("Counter"), "{err}");
    }

    #[test]
    fn stub_event_is_recognisable() {
        assert!(DomEvent::stub().is_stub());
        assert!(!DomEvent::new("click").is_stub());
    }

    #[test]
    fn function_hash_is_deterministic() {
        assert_eq!(function_hash("on_click"), function_hash("on_click"));
        assert_ne!(function_hash("on_click"), function_hash("on_submit"));
    }
}
