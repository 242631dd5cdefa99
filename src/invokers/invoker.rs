//! # Single type-erased callable handle (`Invoker`)
//!
//! [`Invoker`] binds exactly one target at a time — a free function, a method
//! plus the shared handle of its receiver, or a captured stateful callable —
//! and dispatches to it behind one calling signature.
//!
//! ## Storage scheme
//! ```text
//! Invoker
//!   ├── unbound                      (no target)
//!   ├── Function(fn(Args) -> Ret)    (bare pointer, no allocation)
//!   └── Boxed(dyn Trampoline)
//!         ├── MethodSlot   receiver handle + method pointer
//!         └── CapturedSlot owned callable, deep-copied on clone
//! ```
//!
//! The call shape is fixed at bind time: the `Function` arm dispatches with no
//! receiver, the boxed arm dispatches through the slot that already knows its
//! receiver. Rebinding or dropping the invoker releases the owned slot.
//!
//! ## Example
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use bindcast::Invoker;
//!
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! struct Counter { hits: i32 }
//! impl Counter {
//!     fn bump(&mut self, by: i32) -> i32 { self.hits += by; self.hits }
//! }
//!
//! // Free function: no allocation, static binding.
//! let doubler = Invoker::function(double as fn(i32) -> i32);
//! assert_eq!(doubler.invoke(21), 42);
//! assert!(doubler.is_static());
//!
//! // Method: the receiver is shared, never copied.
//! let counter = Rc::new(RefCell::new(Counter { hits: 0 }));
//! let bump = Counter::bump as fn(&mut Counter, i32) -> i32;
//! let bumper = Invoker::method(&counter, bump);
//! assert_eq!(bumper.invoke(3), 3);
//! assert_eq!(counter.borrow().hits, 3);
//!
//! // Captured callable: moved in, state owned by the invoker.
//! let mut seen = 0;
//! let tally = Invoker::callable(move |x: i32| { seen += x; seen });
//! assert_eq!(tally.invoke(5), 5);
//! assert_eq!(tally.invoke(5), 10);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::CallError;
use crate::invokers::slot::{CapturedSlot, FunctionKey, MethodSlot, SlotIdentity, Trampoline};
use crate::signature::Method;

/// An invoker that returns nothing.
pub type Action<Args = ()> = Invoker<Args, ()>;

/// An invoker that returns a boolean.
pub type Predicate<Args> = Invoker<Args, bool>;

enum Slot<Args, Ret> {
    Function(fn(Args) -> Ret),
    Boxed(Box<dyn Trampoline<Args, Ret>>),
}

/// A type-erased callable handle bindable to one target at a time.
///
/// `Args` is one type per signature: a tuple for several arguments, `()` for
/// none. Size and layout are independent of the bound target's concrete type.
///
/// Dispatch mutates captured state and method receivers through interior
/// mutability, so every `invoke` flavor takes `&self`; that is what lets a
/// [`Delegate`](crate::Delegate) broadcast while its callbacks edit the
/// subscriber list underneath it.
pub struct Invoker<Args = (), Ret = ()> {
    slot: Option<Slot<Args, Ret>>,
}

impl<Args: 'static, Ret: 'static> Invoker<Args, Ret> {
    /// Creates an unbound invoker.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Creates an invoker bound to a free function.
    ///
    /// Stateless closures coerce to `fn` pointers at the call site, so they
    /// bind through here without any heap allocation.
    #[must_use]
    pub fn function(function: fn(Args) -> Ret) -> Self {
        let mut invoker = Self::new();
        invoker.bind_function(function);
        invoker
    }

    /// Creates an invoker bound to a method on a shared receiver.
    ///
    /// The receiver handle type is dictated by the method pointer: `Rc<T>`
    /// for `fn(&T, ...)`, `Rc<RefCell<T>>` for `fn(&mut T, ...)`. See
    /// [`Method`] for the full classification.
    #[must_use]
    pub fn method<M: Method<Args, Ret>>(receiver: &M::Receiver, method: M) -> Self {
        let mut invoker = Self::new();
        invoker.bind_method(receiver, method);
        invoker
    }

    /// Creates an invoker owning a captured stateful callable.
    #[must_use]
    pub fn callable<F>(callable: F) -> Self
    where
        F: FnMut(Args) -> Ret + Clone + 'static,
    {
        let mut invoker = Self::new();
        invoker.bind_callable(callable);
        invoker
    }

    /// Binds a free function, releasing any previous binding.
    pub fn bind_function(&mut self, function: fn(Args) -> Ret) {
        self.slot = Some(Slot::Function(function));
    }

    /// Binds a method and its receiver handle, releasing any previous binding.
    ///
    /// The handle is cloned; the receiver object itself is never copied and
    /// outlives the binding.
    pub fn bind_method<M: Method<Args, Ret>>(&mut self, receiver: &M::Receiver, method: M) {
        self.slot = Some(Slot::Boxed(Box::new(MethodSlot {
            receiver: receiver.clone(),
            method,
        })));
    }

    /// Moves a stateful callable into freshly owned storage, releasing any
    /// previous binding.
    ///
    /// The callable must be `Clone` so the invoker itself stays deep-copyable;
    /// each copy owns independent captured state.
    pub fn bind_callable<F>(&mut self, callable: F)
    where
        F: FnMut(Args) -> Ret + Clone + 'static,
    {
        self.slot = Some(Slot::Boxed(Box::new(CapturedSlot {
            callable: RefCell::new(callable),
        })));
    }

    /// Releases the current binding, if any.
    pub fn unbind(&mut self) {
        self.slot = None;
    }

    /// Whether the invoker currently has a bound target.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Whether the bound target, if any, is a free function.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self.slot, Some(Slot::Function(_)))
    }

    /// Dispatches to the bound target.
    ///
    /// # Panics
    /// Panics if the invoker is unbound. Use [`invoke_safe`](Self::invoke_safe)
    /// or [`try_invoke`](Self::try_invoke) where that is a live possibility.
    pub fn invoke(&self, args: Args) -> Ret {
        match &self.slot {
            Some(Slot::Function(function)) => function(args),
            Some(Slot::Boxed(slot)) => slot.call(args),
            None => panic!("invoke on unbound invoker"),
        }
    }

    /// Dispatches to the bound target, reporting an unbound slot as an error.
    pub fn try_invoke(&self, args: Args) -> Result<Ret, CallError> {
        match &self.slot {
            Some(Slot::Function(function)) => Ok(function(args)),
            Some(Slot::Boxed(slot)) => Ok(slot.call(args)),
            None => Err(CallError::Unbound),
        }
    }

    /// Dispatches to the bound target, falling back to `Ret::default()` when
    /// unbound.
    pub fn invoke_safe(&self, args: Args) -> Ret
    where
        Ret: Default,
    {
        self.try_invoke(args).unwrap_or_default()
    }

    /// Whether the bound target is exactly the given free function.
    #[must_use]
    pub fn targets_function(&self, function: fn(Args) -> Ret) -> bool {
        matches!(
            self.identity().function,
            Some(FunctionKey::Addr(addr)) if addr == function as usize
        )
    }

    /// Whether the bound target's receiver is the referenced object,
    /// regardless of which method is bound.
    #[must_use]
    pub fn targets_receiver<T>(&self, receiver: &Rc<T>) -> bool {
        self.identity().object == Rc::as_ptr(receiver) as *const () as usize
    }

    /// Whether the bound target is the given method, on any receiver.
    #[must_use]
    pub fn targets_method<M: Method<Args, Ret>>(&self, method: M) -> bool {
        matches!(
            self.identity().function,
            Some(FunctionKey::Addr(addr)) if addr == method.addr()
        )
    }

    fn identity(&self) -> SlotIdentity {
        match &self.slot {
            None => SlotIdentity::UNBOUND,
            Some(Slot::Function(function)) => SlotIdentity {
                function: Some(FunctionKey::Addr(*function as usize)),
                object: 0,
            },
            Some(Slot::Boxed(slot)) => slot.identity(),
        }
    }
}

impl<Args: 'static, Ret: 'static> Default for Invoker<Args, Ret> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static, Ret: 'static> Clone for Invoker<Args, Ret> {
    /// Deep copy: an owned captured callable is duplicated, so the two
    /// invokers mutate independent state afterwards.
    fn clone(&self) -> Self {
        let slot = match &self.slot {
            None => None,
            Some(Slot::Function(function)) => Some(Slot::Function(*function)),
            Some(Slot::Boxed(slot)) => Some(Slot::Boxed(slot.clone_box())),
        };
        Self { slot }
    }
}

impl<Args: 'static, Ret: 'static> PartialEq for Invoker<Args, Ret> {
    /// Two invokers are equal iff both the code half and the object half of
    /// their bindings match. Fresh unbound invokers compare equal; invokers
    /// owning captured state only ever equal themselves.
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<Args: 'static, Ret: 'static> Eq for Invoker<Args, Ret> {}

impl<Args: 'static, Ret: 'static> PartialEq<fn(Args) -> Ret> for Invoker<Args, Ret> {
    /// Compares the code half only, mirroring [`targets_function`](Invoker::targets_function).
    fn eq(&self, other: &fn(Args) -> Ret) -> bool {
        self.targets_function(*other)
    }
}

impl<Args: 'static, Ret: 'static> fmt::Debug for Invoker<Args, Ret> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.slot {
            None => "unbound",
            Some(Slot::Function(_)) => "function",
            Some(Slot::Boxed(slot)) => slot.kind(),
        };
        f.debug_struct("Invoker").field("kind", &kind).finish()
    }
}
