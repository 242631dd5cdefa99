//! # Reentrancy-safe multicast collection (`Delegate`)
//!
//! [`Delegate`] owns an ordered list of [`Invoker`] entries and broadcasts to
//! all of them in insertion order. The interesting part is that a callback
//! running inside a broadcast may add, remove, clear, or re-broadcast on the
//! very same delegate, on the same call stack, and the iteration stays
//! consistent.
//!
//! ## Protocol
//! ```text
//! broadcast(args)
//!   ├── already broadcasting?  ──► no-op (nested calls are swallowed)
//!   ├── flag up, cursor = 0
//!   ├── loop: clone entry handle at cursor ──► dispatch ──► cursor += 1
//!   │         │
//!   │         └── callback may reenter:
//!   │              - remove at/before cursor  ──► cursor -= 1
//!   │              - insert at/before cursor  ──► redirected past the cursor
//!   │              - clear                    ──► cursor parked, loop ends
//!   └── flag down, cursor = -1
//! ```
//!
//! The bookkeeping is a single integer cursor plus a busy flag. Removal swaps
//! the last entry into the gap and shrinks, so it is O(1) and only disturbs
//! the order of the slot it fills. The net effect: every entry present at
//! broadcast start and not removed during it runs exactly once, an entry
//! removed before its turn never runs, and an entry inserted into the
//! remaining range runs before the broadcast ends.
//!
//! ## Reentrancy, not concurrency
//! All of the above is same-stack reentrancy. Nothing here is `Send` or
//! `Sync`; cross-thread use needs external synchronization around every call.
//!
//! ## Example
//! ```
//! use std::rc::Rc;
//! use bindcast::{Delegate, Invoker};
//!
//! fn cheer(name: &'static str) { println!("welcome, {name}!"); }
//!
//! let on_join: Rc<Delegate<&'static str>> = Rc::new(Delegate::new());
//! on_join.add_function(cheer as fn(&'static str));
//!
//! // A one-shot subscriber that unsubscribes itself mid-broadcast.
//! let hook = Rc::clone(&on_join);
//! on_join.add_callable(move |name: &'static str| {
//!     println!("first joiner is {name}");
//!     hook.remove_at(1);
//! });
//!
//! on_join.broadcast("ada");
//! on_join.broadcast("grace");
//! assert_eq!(on_join.len(), 1);
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::rc::Rc;

use log::{debug, trace};

use crate::invokers::Invoker;
use crate::signature::Method;

/// Shared handle to an entry stored in a delegate.
///
/// Borrow it for inspection, or mutably (outside a broadcast) to rebind the
/// entry in place.
pub type InvokerRef<Args, Ret> = Rc<RefCell<Invoker<Args, Ret>>>;

/// Cursor value while no broadcast is running.
const IDLE: isize = -1;

/// An ordered, reentrancy-safe collection of invokers.
///
/// Mutating and broadcasting methods take `&self`: callbacks reach the
/// delegate through a captured `Rc`, so the collection manages its interior
/// mutability itself. Duplicate entries are allowed except through the
/// `add_unique` operations.
pub struct Delegate<Args = (), Ret = ()> {
    entries: RefCell<Vec<InvokerRef<Args, Ret>>>,
    broadcasting: Cell<bool>,
    cursor: Cell<isize>,
}

impl<Args: 'static, Ret: 'static> Delegate<Args, Ret> {
    /// Creates an empty delegate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            broadcasting: Cell::new(false),
            cursor: Cell::new(IDLE),
        }
    }

    /// Creates an empty delegate with room for `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RefCell::new(Vec::with_capacity(capacity)),
            broadcasting: Cell::new(false),
            cursor: Cell::new(IDLE),
        }
    }

    /// The count of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the delegate stores no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether a broadcast is currently running on this delegate.
    #[must_use]
    pub fn is_broadcasting(&self) -> bool {
        self.broadcasting.get()
    }

    /// Appends an invoker; it broadcasts after every existing entry.
    pub fn add(&self, invoker: Invoker<Args, Ret>) {
        self.entries
            .borrow_mut()
            .push(Rc::new(RefCell::new(invoker)));
    }

    /// Appends an invoker bound to a free function.
    pub fn add_function(&self, function: fn(Args) -> Ret) {
        self.add(Invoker::function(function));
    }

    /// Appends an invoker bound to a method on a shared receiver.
    pub fn add_method<M: Method<Args, Ret>>(&self, receiver: &M::Receiver, method: M) {
        self.add(Invoker::method(receiver, method));
    }

    /// Appends an invoker owning a captured stateful callable.
    pub fn add_callable<F>(&self, callable: F)
    where
        F: FnMut(Args) -> Ret + Clone + 'static,
    {
        self.add(Invoker::callable(callable));
    }

    /// Inserts an invoker at the given index.
    ///
    /// During a broadcast, an index at or before the live cursor is redirected
    /// to just after it: entries already invoked are never shifted back into
    /// the remaining range, and the new entry still gets its turn before the
    /// broadcast ends.
    ///
    /// # Panics
    /// Panics if `index > len`, like `Vec::insert`.
    pub fn add_at(&self, index: usize, invoker: Invoker<Args, Ret>) {
        let mut entries = self.entries.borrow_mut();
        let index = self.live_index(index);
        entries.insert(index, Rc::new(RefCell::new(invoker)));
    }

    /// Appends the invoker unless an equal entry already exists.
    ///
    /// Returns `true` when the invoker was inserted.
    pub fn add_unique(&self, invoker: Invoker<Args, Ret>) -> bool {
        if self.contains(&invoker) {
            return false;
        }
        self.add(invoker);
        true
    }

    /// Inserts the invoker at the given index unless an equal entry already
    /// exists, with the same live-cursor redirect as [`add_at`](Self::add_at).
    ///
    /// Returns `true` when the invoker was inserted.
    pub fn add_unique_at(&self, index: usize, invoker: Invoker<Args, Ret>) -> bool {
        if self.contains(&invoker) {
            return false;
        }
        self.add_at(index, invoker);
        true
    }

    /// Removes the first entry equal to the probe.
    ///
    /// Build the probe from an equivalent binding: `remove(&Invoker::function(f))`,
    /// `remove(&Invoker::method(&receiver, m))`. A probe built from a captured
    /// callable never matches, since captured state compares by identity.
    ///
    /// Returns `true` when an entry was removed.
    pub fn remove(&self, probe: &Invoker<Args, Ret>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|e| *e.borrow() == *probe) else {
            return false;
        };
        self.detach(&mut entries, index);
        true
    }

    /// Removes the first entry bound to the given free function.
    pub fn remove_function(&self, function: fn(Args) -> Ret) -> bool {
        self.remove(&Invoker::function(function))
    }

    /// Removes the first entry bound to the given method and receiver.
    pub fn remove_method<M: Method<Args, Ret>>(&self, receiver: &M::Receiver, method: M) -> bool {
        self.remove(&Invoker::method(receiver, method))
    }

    /// Removes the entry at the given index.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove_at(&self, index: usize) {
        let mut entries = self.entries.borrow_mut();
        assert!(
            index < entries.len(),
            "remove_at index {index} out of bounds (len {})",
            entries.len()
        );
        self.detach(&mut entries, index);
    }

    /// Removes every entry equal to the probe, returning how many went.
    ///
    /// Scans the not-yet-visited tail first, then the visited prefix, so a
    /// live broadcast neither skips a survivor nor re-runs one.
    pub fn remove_all(&self, probe: &Invoker<Args, Ret>) -> usize {
        let mut entries = self.entries.borrow_mut();
        let mut removed = 0;
        let cursor = self.cursor.get();

        let mut index = entries.len() as isize - 1;
        while index > cursor {
            if *entries[index as usize].borrow() == *probe {
                Self::swap_out(&mut entries, index as usize);
                removed += 1;
            }
            index -= 1;
        }

        let mut index = cursor.min(entries.len() as isize - 1);
        while index >= 0 {
            if *entries[index as usize].borrow() == *probe {
                Self::swap_out(&mut entries, index as usize);
                self.cursor.set(self.cursor.get() - 1);
                removed += 1;
            }
            index -= 1;
        }

        removed
    }

    /// Removes every entry.
    ///
    /// A broadcast in progress finds nothing left to visit and ends.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
        if self.broadcasting.get() {
            debug!("delegate cleared during broadcast");
        }
        self.cursor.set(IDLE);
    }

    /// Index of the first entry equal to the probe.
    #[must_use]
    pub fn position(&self, probe: &Invoker<Args, Ret>) -> Option<usize> {
        self.entries
            .borrow()
            .iter()
            .position(|e| *e.borrow() == *probe)
    }

    /// Whether any entry equals the probe.
    #[must_use]
    pub fn contains(&self, probe: &Invoker<Args, Ret>) -> bool {
        self.position(probe).is_some()
    }

    /// Shared handle to the entry at the given index.
    ///
    /// Borrow it mutably to rebind the entry in place — outside a broadcast.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<InvokerRef<Args, Ret>> {
        self.entries.borrow().get(index).cloned()
    }

    /// Visits every entry in broadcast order.
    ///
    /// Read-only sweep for host code inspecting subscribers; the visitor must
    /// not mutate the delegate.
    pub fn visit(&self, mut visitor: impl FnMut(&Invoker<Args, Ret>)) {
        for entry in self.entries.borrow().iter() {
            visitor(&entry.borrow());
        }
    }

    /// Visits every entry in reverse broadcast order.
    pub fn visit_rev(&self, mut visitor: impl FnMut(&Invoker<Args, Ret>)) {
        for entry in self.entries.borrow().iter().rev() {
            visitor(&entry.borrow());
        }
    }

    /// Invokes every live entry in order with the given arguments.
    ///
    /// A nested call on the same delegate is a no-op. Unbound entries panic
    /// on this path; use [`broadcast_safe`](Self::broadcast_safe) when entries
    /// may be unbound.
    pub fn broadcast(&self, args: Args)
    where
        Args: Clone,
    {
        self.run(args, |invoker, args| {
            invoker.invoke(args);
        });
    }

    /// Invokes every live entry in order, substituting `Ret::default()` for
    /// unbound entries so none is skipped.
    ///
    /// A nested call on the same delegate is a no-op.
    pub fn broadcast_safe(&self, args: Args)
    where
        Args: Clone,
        Ret: Default,
    {
        self.run(args, |invoker, args| {
            invoker.invoke_safe(args);
        });
    }

    /// The broadcast protocol shared by both dispatch flavors.
    fn run(&self, args: Args, dispatch: fn(&Invoker<Args, Ret>, Args))
    where
        Args: Clone,
    {
        if self.broadcasting.get() {
            trace!("nested broadcast ignored");
            return;
        }
        trace!("broadcast begin over {} entries", self.len());
        self.broadcasting.set(true);
        self.cursor.set(0);

        loop {
            // Clone the handle out so the entry list is not borrowed while the
            // callback runs; the handle also keeps a self-removing entry alive
            // through its own dispatch.
            let entry = {
                let entries = self.entries.borrow();
                let Ok(index) = usize::try_from(self.cursor.get()) else {
                    break;
                };
                match entries.get(index) {
                    Some(entry) => Rc::clone(entry),
                    None => break,
                }
            };
            dispatch(&entry.borrow(), args.clone());
            self.cursor.set(self.cursor.get() + 1);
        }

        self.broadcasting.set(false);
        self.cursor.set(IDLE);
        trace!("broadcast end");
    }

    /// Replace-with-last removal plus the live-cursor decrement.
    fn detach(&self, entries: &mut Vec<InvokerRef<Args, Ret>>, index: usize) {
        if self.broadcasting.get() && (index as isize) <= self.cursor.get() {
            self.cursor.set(self.cursor.get() - 1);
            trace!(
                "entry {index} removed at/before live cursor, cursor now {}",
                self.cursor.get()
            );
        }
        Self::swap_out(entries, index);
    }

    fn swap_out(entries: &mut Vec<InvokerRef<Args, Ret>>, index: usize) {
        let last = entries.pop().expect("swap_out on empty entry list");
        if index < entries.len() {
            entries[index] = last;
        }
    }

    /// Redirects an insertion landing at or before the live cursor to the
    /// slot just after it.
    fn live_index(&self, requested: usize) -> usize {
        if self.broadcasting.get() && (requested as isize) <= self.cursor.get() {
            let redirected = (self.cursor.get() + 1) as usize;
            trace!("insert at {requested} redirected to {redirected} past live cursor");
            redirected
        } else {
            requested
        }
    }
}

impl<Args: 'static, Ret: 'static> Default for Delegate<Args, Ret> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static, Ret: 'static> Clone for Delegate<Args, Ret> {
    /// Deep copy: entries are cloned invoker by invoker (captured state
    /// included), and the copy starts idle regardless of the source's
    /// broadcast state.
    fn clone(&self) -> Self {
        let entries = self
            .entries
            .borrow()
            .iter()
            .map(|entry| Rc::new(RefCell::new(entry.borrow().clone())))
            .collect();
        Self {
            entries: RefCell::new(entries),
            broadcasting: Cell::new(false),
            cursor: Cell::new(IDLE),
        }
    }
}

impl<Args: 'static, Ret: 'static> AddAssign<Invoker<Args, Ret>> for Delegate<Args, Ret> {
    /// `delegate += invoker` appends, like [`add`](Delegate::add).
    fn add_assign(&mut self, invoker: Invoker<Args, Ret>) {
        self.add(invoker);
    }
}

impl<Args: 'static, Ret: 'static> SubAssign<&Invoker<Args, Ret>> for Delegate<Args, Ret> {
    /// `delegate -= &probe` removes the first equal entry, like
    /// [`remove`](Delegate::remove).
    fn sub_assign(&mut self, probe: &Invoker<Args, Ret>) {
        self.remove(probe);
    }
}

impl<Args: 'static, Ret: 'static> fmt::Debug for Delegate<Args, Ret> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("entries", &self.len())
            .field("broadcasting", &self.is_broadcasting())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: i32) {}

    fn other(_: i32) {}

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(log: &Log, label: &'static str) -> Invoker<i32, ()> {
        let log = Rc::clone(log);
        Invoker::callable(move |_: i32| {
            log.borrow_mut().push(label);
        })
    }

    #[test]
    fn test_broadcast_runs_in_insertion_order() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add(recorder(&log, "a"));
        delegate.add(recorder(&log, "b"));
        delegate.add(recorder(&log, "c"));

        delegate.broadcast(0);
        assert_eq!(*log.borrow(), ["a", "b", "c"]);
        assert!(!delegate.is_broadcasting());
    }

    #[test]
    fn test_add_unique_is_idempotent() {
        let f = noop as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();

        assert!(delegate.add_unique(Invoker::function(f)));
        assert!(!delegate.add_unique(Invoker::function(f)));
        assert_eq!(delegate.len(), 1);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let f = noop as fn(i32);
        let g = other as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add_function(f);
        delegate.add_function(g);
        delegate.add_function(f);

        assert!(delegate.remove_function(f));
        assert_eq!(delegate.len(), 2);
        assert!(delegate.contains(&Invoker::function(f)));

        assert!(delegate.remove_function(f));
        assert!(!delegate.contains(&Invoker::function(f)));
        assert!(!delegate.remove_function(f));
        assert!(delegate.contains(&Invoker::function(g)));
    }

    #[test]
    fn test_remove_all_counts_matches() {
        let f = noop as fn(i32);
        let g = other as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add_function(f);
        delegate.add_function(g);
        delegate.add_function(f);
        delegate.add_function(f);

        assert_eq!(delegate.remove_all(&Invoker::function(f)), 3);
        assert_eq!(delegate.len(), 1);
        assert!(delegate.contains(&Invoker::function(g)));
    }

    #[test]
    fn test_position_and_entry_accessors() {
        let f = noop as fn(i32);
        let g = other as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add_function(f);
        delegate.add_function(g);

        assert_eq!(delegate.position(&Invoker::function(g)), Some(1));
        let handle = delegate.entry(1).expect("entry present");
        assert!(handle.borrow().targets_function(g));
        assert!(delegate.entry(2).is_none());

        // Rebind in place through the handle.
        handle.borrow_mut().bind_function(f);
        assert_eq!(delegate.position(&Invoker::function(g)), None);
    }

    #[test]
    fn test_visit_orders() {
        let f = noop as fn(i32);
        let g = other as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add_function(f);
        delegate.add_function(g);

        let mut forward = Vec::new();
        delegate.visit(|invoker| forward.push(invoker.targets_function(f)));
        assert_eq!(forward, [true, false]);

        let mut backward = Vec::new();
        delegate.visit_rev(|invoker| backward.push(invoker.targets_function(f)));
        assert_eq!(backward, [false, true]);
    }

    #[test]
    fn test_clone_is_deep_and_idle() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add(recorder(&log, "x"));

        let copy = delegate.clone();
        copy.broadcast(0);
        delegate.broadcast(0);
        assert_eq!(*log.borrow(), ["x", "x"]);
        assert_eq!(copy.len(), 1);

        // Entries are copies, not shared handles.
        copy.clear();
        assert_eq!(delegate.len(), 1);
    }

    #[test]
    fn test_operator_sugar() {
        let f = noop as fn(i32);
        let mut delegate: Delegate<i32> = Delegate::new();

        delegate += Invoker::function(f);
        assert_eq!(delegate.len(), 1);
        delegate -= &Invoker::function(f);
        assert!(delegate.is_empty());
    }

    #[test]
    fn test_broadcast_safe_dispatches_unbound_entries() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add(recorder(&log, "before"));
        delegate.add(Invoker::new());
        delegate.add(recorder(&log, "after"));

        delegate.broadcast_safe(0);
        assert_eq!(*log.borrow(), ["before", "after"]);
    }

    #[test]
    #[should_panic(expected = "unbound invoker")]
    fn test_broadcast_panics_on_unbound_entry() {
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add(Invoker::new());
        delegate.broadcast(0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_remove_at_rejects_bad_index() {
        let delegate: Delegate<i32> = Delegate::new();
        delegate.remove_at(0);
    }

    #[test]
    fn test_clear_resets_entries() {
        let f = noop as fn(i32);
        let delegate: Delegate<i32> = Delegate::new();
        delegate.add_function(f);
        delegate.add_function(f);

        delegate.clear();
        assert!(delegate.is_empty());
        assert!(!delegate.is_broadcasting());
    }
}
