//! Cart domain module.
//!
//! This crate contains the cart collection and its business rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Mutation helpers return a new [`Cart`] so callers commit by
//! swapping the whole value only after every validation has passed.

pub mod cart;
pub mod item;

pub use cart::{Cart, CartIntegrityError};
pub use item::{CartItem, Metadata};
