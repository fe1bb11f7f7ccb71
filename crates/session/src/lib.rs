//! The cart state manager.
//!
//! [`CartManager`] owns the authoritative in-memory cart, runs the three
//! mutating operations against the stock/catalog collaborators, keeps the
//! persistent store consistent with memory, and fans committed snapshots out
//! to subscribers. Failures are reported both to the caller and through the
//! [`Notifier`].

pub mod manager;
pub mod notify;
pub mod subscription;

pub use manager::CartManager;
pub use notify::{Notice, Notifier, TracingNotifier};
pub use subscription::Subscription;
