//! Owned snapshots of handler arguments.
//!
//! Handler arguments are evaluated while the tree is built, when they may
//! borrow the data handle, but the handler runs later. Generated code
//! snapshots each argument with
//!
//! ```ignore
//! let arg_ = (&weft_dom::Arg(&(expr))).capture();
//! ```
//!
//! and passes `arg_.get()` at dispatch. Method resolution picks
//! [`CaptureBorrowed`] when `expr` is itself a reference, storing the owned
//! form of the pointee and handing back a reference. Otherwise autoref
//! falls through to [`CaptureOwned`], which stores a clone and hands back
//! a fresh clone per call. Either way the argument keeps the type the
//! handler was written against.

use std::borrow::Borrow;

/// Wrapper that drives the choice between the two capture traits.
pub struct Arg<T>(pub T);

/// Snapshot of a `&T` argument.
pub struct OwnedRef<T: ?Sized + ToOwned>(T::Owned);

impl<T: ?Sized + ToOwned> OwnedRef<T> {
    pub fn get(&self) -> &T {
        Borrow::borrow(&self.0)
    }
}

/// Snapshot of a by-value argument.
pub struct Cloned<T>(T);

impl<T: Clone> Cloned<T> {
    pub fn get(&self) -> T {
        self.0.clone()
    }
}

pub trait CaptureBorrowed {
    type Captured;
    fn capture(&self) -> Self::Captured;
}

impl<T: ?Sized + ToOwned> CaptureBorrowed for Arg<&&T> {
    type Captured = OwnedRef<T>;

    fn capture(&self) -> OwnedRef<T> {
        OwnedRef((**self.0).to_owned())
    }
}

pub trait CaptureOwned {
    type Captured;
    fn capture(&self) -> Self::Captured;
}

impl<T: Clone> CaptureOwned for &Arg<&T> {
    type Captured = Cloned<T>;

    fn capture(&self) -> Cloned<T> {
        Cloned(self.0.clone())
    }
}
