//! Collection aliases used throughout the crate.
//!
//! The storage backend (`SlotMap` or `DenseSlotMap`) and the fast hashers are
//! chosen here so that the rest of the crate never names a concrete
//! implementation.

mod aliases;
mod helpers;

pub use aliases::*;
pub use helpers::*;
