//! # bindcast
//!
//! **Bindcast** is a small single-threaded library for type-erased callable
//! handles and multicast broadcast, in the delegate/event style: bind a free
//! function, a method on a shared receiver, or a capturing closure behind one
//! calling signature, collect the handles, and broadcast to all of them while
//! the callbacks themselves subscribe and unsubscribe mid-flight.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   fn pointer          method + receiver        capturing closure
//!       │                      │                        │
//!       ▼                      ▼                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Invoker (one erased callable slot)                               │
//! │  - Function arm: bare fn pointer, no allocation                   │
//! │  - Boxed arm:    Trampoline box (MethodSlot / CapturedSlot)       │
//! │  - identity:     code address + receiver address                  │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │  add / add_at / add_unique / remove / remove_all
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Delegate (ordered entries + busy flag + integer cursor)          │
//! │  - broadcast(args): each live entry, in order, exactly once       │
//! │  - callbacks may add/remove/clear/re-broadcast reentrantly        │
//! │  - nested broadcasts on the same delegate are no-ops              │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Reentrancy protocol
//! ```text
//! broadcast:
//!   cursor = 0
//!   while cursor in range:
//!     dispatch entries[cursor]
//!       │  callback removes at/before cursor ──► cursor -= 1
//!       │  callback inserts at/before cursor ──► entry lands after cursor
//!       │  callback clears                   ──► cursor parked, loop ends
//!     cursor += 1
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits            |
//! |-----------------|----------------------------------------------------------|-------------------------------|
//! | **Binding**     | One handle for functions, methods, capturing closures.   | [`Invoker`], [`Method`]       |
//! | **Dispatch**    | Unchecked, checked, and default-fallback invocation.     | [`Invoker`], [`CallError`]    |
//! | **Fan-out**     | Ordered multicast with reentrancy-safe mutation.         | [`Delegate`], [`InvokerRef`]  |
//! | **Aliases**     | Event-style shorthands.                                  | [`Action`], [`Predicate`]     |
//!
//! ## Threading
//! Single-threaded by contract: handles are `Rc`-based, state lives in cells,
//! and nothing is `Send` or `Sync`. Reentrancy on one call stack is the only
//! "concurrent" pattern the delegate defends against; parallel use requires
//! external mutual exclusion around every call.
//!
//! ## Example
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use bindcast::Delegate;
//!
//! struct Scoreboard { points: u32 }
//! impl Scoreboard {
//!     fn award(&mut self, points: u32) { self.points += points; }
//! }
//!
//! fn announce(points: u32) { println!("{points} points scored!"); }
//!
//! let board = Rc::new(RefCell::new(Scoreboard { points: 0 }));
//! let award = Scoreboard::award as fn(&mut Scoreboard, u32);
//!
//! let on_score: Delegate<u32> = Delegate::new();
//! on_score.add_method(&board, award);
//! on_score.add_function(announce as fn(u32));
//!
//! on_score.broadcast(3);
//! on_score.broadcast(2);
//! assert_eq!(board.borrow().points, 5);
//!
//! on_score.remove_method(&board, award);
//! on_score.broadcast(10);
//! assert_eq!(board.borrow().points, 5);
//! ```

mod delegates;
mod error;
mod invokers;
mod signature;

// ---- Public re-exports ----

pub use delegates::{Delegate, InvokerRef};
pub use error::CallError;
pub use invokers::{Action, Invoker, Predicate};
pub use signature::Method;
