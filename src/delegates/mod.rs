//! # Multicast broadcast collections.
//!
//! This module provides the fan-out side of the crate:
//! - [`Delegate`] - ordered invoker collection with reentrancy-safe broadcast
//! - [`InvokerRef`] - shared handle to one stored entry
//!
//! A delegate's callbacks may mutate the delegate they are being broadcast
//! from; the cursor bookkeeping in [`Delegate`] keeps that consistent.

mod delegate;

pub use delegate::{Delegate, InvokerRef};
