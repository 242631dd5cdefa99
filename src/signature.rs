//! # Method-pointer classification.
//!
//! [`Method`] is the compile-time seam between the binding surface and the
//! dispatch core: it classifies a bindable method pointer, names the shared
//! handle type its receiver must be supplied through, and carries the pointer
//! identity used by the comparison contract. The core consumes it as a black
//! box; it has no run-time footprint beyond the monomorphized calls.
//!
//! ## Classification
//! | Pointer shape             | Receiver handle   | `SHARED` |
//! |---------------------------|-------------------|----------|
//! | `fn(&T, Args) -> Ret`     | `Rc<T>`           | `true`   |
//! | `fn(&T) -> Ret`           | `Rc<T>`           | `true`   |
//! | `fn(&mut T, Args) -> Ret` | `Rc<RefCell<T>>`  | `false`  |
//! | `fn(&mut T) -> Ret`       | `Rc<RefCell<T>>`  | `false`  |
//!
//! A method that mutates its receiver can only be bound through a
//! `Rc<RefCell<T>>` handle; handing it a plain `Rc<T>` is a type error the
//! compiler reports at the bind site. That is the whole validation story —
//! there is no run-time check to fail.
//!
//! ## Pointer identity
//! Bindings compare by code address, so methods are taken as concrete `fn`
//! pointers. Cast once and reuse the same pointer for binding and matching:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use bindcast::Invoker;
//!
//! struct Counter { hits: u32 }
//! impl Counter {
//!     fn bump(&mut self, by: u32) { self.hits += by; }
//! }
//!
//! let bump = Counter::bump as fn(&mut Counter, u32);
//! let counter = Rc::new(RefCell::new(Counter { hits: 0 }));
//!
//! let invoker = Invoker::method(&counter, bump);
//! assert!(invoker.targets_method(bump));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// Classification of a bindable method pointer.
///
/// Implemented for the four `fn` pointer shapes a method reference can decay
/// to: shared (`&T`) and exclusive (`&mut T`) receivers, with or without an
/// argument pack. `Args` follows the crate-wide convention of one type per
/// signature (a tuple for several arguments, `()` for none).
pub trait Method<Args, Ret>: Copy + 'static {
    /// The shared handle the receiver is bound through.
    type Receiver: Clone + 'static;

    /// Whether the method only needs shared access to its receiver.
    const SHARED: bool;

    /// Code address of the pointer, the identity bindings compare by.
    fn addr(self) -> usize;

    /// Address of the referenced receiver, for object-identity comparisons.
    fn receiver_addr(receiver: &Self::Receiver) -> usize;

    /// Dispatches to the method through the receiver handle.
    fn apply(self, receiver: &Self::Receiver, args: Args) -> Ret;
}

impl<T, Args, Ret> Method<Args, Ret> for fn(&T, Args) -> Ret
where
    T: 'static,
    Args: 'static,
    Ret: 'static,
{
    type Receiver = Rc<T>;

    const SHARED: bool = true;

    fn addr(self) -> usize {
        self as usize
    }

    fn receiver_addr(receiver: &Self::Receiver) -> usize {
        Rc::as_ptr(receiver) as *const () as usize
    }

    fn apply(self, receiver: &Self::Receiver, args: Args) -> Ret {
        self(receiver, args)
    }
}

impl<T, Args, Ret> Method<Args, Ret> for fn(&mut T, Args) -> Ret
where
    T: 'static,
    Args: 'static,
    Ret: 'static,
{
    type Receiver = Rc<RefCell<T>>;

    const SHARED: bool = false;

    fn addr(self) -> usize {
        self as usize
    }

    fn receiver_addr(receiver: &Self::Receiver) -> usize {
        Rc::as_ptr(receiver) as *const () as usize
    }

    fn apply(self, receiver: &Self::Receiver, args: Args) -> Ret {
        self(&mut receiver.borrow_mut(), args)
    }
}

impl<T, Ret> Method<(), Ret> for fn(&T) -> Ret
where
    T: 'static,
    Ret: 'static,
{
    type Receiver = Rc<T>;

    const SHARED: bool = true;

    fn addr(self) -> usize {
        self as usize
    }

    fn receiver_addr(receiver: &Self::Receiver) -> usize {
        Rc::as_ptr(receiver) as *const () as usize
    }

    fn apply(self, receiver: &Self::Receiver, _args: ()) -> Ret {
        self(receiver)
    }
}

impl<T, Ret> Method<(), Ret> for fn(&mut T) -> Ret
where
    T: 'static,
    Ret: 'static,
{
    type Receiver = Rc<RefCell<T>>;

    const SHARED: bool = false;

    fn addr(self) -> usize {
        self as usize
    }

    fn receiver_addr(receiver: &Self::Receiver) -> usize {
        Rc::as_ptr(receiver) as *const () as usize
    }

    fn apply(self, receiver: &Self::Receiver, _args: ()) -> Ret {
        self(&mut receiver.borrow_mut())
    }
}
