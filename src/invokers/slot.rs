//! # Erased storage slots behind an invoker.
//!
//! [`Trampoline`] is the owned polymorphic box that lets callables of
//! incompatible concrete types share one run-time representation: a fixed-size
//! handle with `call`, `clone_box` and `identity` operations, one concrete
//! implementation per binding kind. [`MethodSlot`] pairs a shared receiver
//! handle with a method pointer; [`CapturedSlot`] owns a stateful callable
//! moved in at bind time. Free functions never reach this module — they stay
//! as bare `fn` pointers in the invoker itself.
//!
//! [`SlotIdentity`] is the comparison key: the code address of the bound
//! pointer (or the type of a captured callable) plus the receiver address (or
//! the owned block address). Two separately captured callables therefore never
//! compare equal, while two bindings of the same `(receiver, method)` pair do.

use std::any::TypeId;
use std::cell::RefCell;

use crate::signature::Method;

/// Identity of the code half of a binding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum FunctionKey {
    /// Address of a `fn` pointer (free function or method).
    Addr(usize),
    /// Concrete type of a captured callable.
    Captured(TypeId),
}

/// Comparison key for a whole binding: code half plus object half.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct SlotIdentity {
    pub function: Option<FunctionKey>,
    pub object: usize,
}

impl SlotIdentity {
    pub(crate) const UNBOUND: SlotIdentity = SlotIdentity {
        function: None,
        object: 0,
    };
}

/// One erased dispatch target.
///
/// The shape of the call (receiver-prefixed or not) is fixed when the concrete
/// slot is built, never rediscovered at call time.
pub(crate) trait Trampoline<Args, Ret> {
    /// Dispatches to the bound target.
    fn call(&self, args: Args) -> Ret;

    /// Deep-copies the slot, including any owned callable state.
    fn clone_box(&self) -> Box<dyn Trampoline<Args, Ret>>;

    /// Comparison key backing the equality contract.
    fn identity(&self) -> SlotIdentity;

    /// Binding kind tag for diagnostics.
    fn kind(&self) -> &'static str;
}

/// Method pointer plus the shared handle of its receiver.
///
/// The handle is cloned at bind time; the receiver object itself is never
/// copied, and stays alive for as long as any binding references it.
pub(crate) struct MethodSlot<R, M> {
    pub receiver: R,
    pub method: M,
}

impl<Args, Ret, M> Trampoline<Args, Ret> for MethodSlot<M::Receiver, M>
where
    Args: 'static,
    Ret: 'static,
    M: Method<Args, Ret>,
{
    fn call(&self, args: Args) -> Ret {
        self.method.apply(&self.receiver, args)
    }

    fn clone_box(&self) -> Box<dyn Trampoline<Args, Ret>> {
        Box::new(MethodSlot {
            receiver: self.receiver.clone(),
            method: self.method,
        })
    }

    fn identity(&self) -> SlotIdentity {
        SlotIdentity {
            function: Some(FunctionKey::Addr(self.method.addr())),
            object: M::receiver_addr(&self.receiver),
        }
    }

    fn kind(&self) -> &'static str {
        "method"
    }
}

/// Exclusively owned storage for a captured stateful callable.
///
/// The callable sits behind a `RefCell` so dispatch can mutate captured state
/// through a shared reference; reentrant self-invocation of the same slot is
/// rejected by the cell at run time.
pub(crate) struct CapturedSlot<F> {
    pub callable: RefCell<F>,
}

impl<Args, Ret, F> Trampoline<Args, Ret> for CapturedSlot<F>
where
    Args: 'static,
    Ret: 'static,
    F: FnMut(Args) -> Ret + Clone + 'static,
{
    fn call(&self, args: Args) -> Ret {
        (&mut *self.callable.borrow_mut())(args)
    }

    fn clone_box(&self) -> Box<dyn Trampoline<Args, Ret>> {
        Box::new(CapturedSlot {
            callable: RefCell::new(self.callable.borrow().clone()),
        })
    }

    fn identity(&self) -> SlotIdentity {
        SlotIdentity {
            function: Some(FunctionKey::Captured(TypeId::of::<F>())),
            object: self as *const Self as *const () as usize,
        }
    }

    fn kind(&self) -> &'static str {
        "captured"
    }
}
