//! User-visible failure notices.
//!
//! The manager only signals *which* category of failure occurred; rendering
//! (toast, dialog, status bar) is the consumer's concern.

use trolley_core::CartError;

/// Category of a user-visible failure message.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The requested quantity is not available in stock.
    StockShortage,
    /// Adding a product failed (service or store error).
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product quantity failed.
    UpdateFailed,
}

impl Notice {
    /// Default human-readable message for this notice.
    pub fn message(&self) -> &'static str {
        match self {
            Notice::StockShortage => "Requested quantity is out of stock",
            Notice::AddFailed => "Error while adding the product",
            Notice::RemoveFailed => "Error while removing the product",
            Notice::UpdateFailed => "Error while changing the product quantity",
        }
    }
}

/// Sink for failure notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that logs notices through `tracing`.
///
/// Useful as a default when no UI notifier is wired up.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        tracing::warn!(?notice, "{}", notice.message());
    }
}

/// Which mutating operation a failure belongs to.
#[derive(Debug, Copy, Clone)]
pub(crate) enum Operation {
    Add,
    Remove,
    Update,
}

impl Notice {
    /// Map an operation failure onto the notice category the UI should show.
    ///
    /// Stock shortage gets its own message regardless of the operation; every
    /// other failure is reported per operation.
    pub(crate) fn for_failure(op: Operation, err: &CartError) -> Self {
        match err {
            CartError::InsufficientStock => Notice::StockShortage,
            _ => match op {
                Operation::Add => Notice::AddFailed,
                Operation::Remove => Notice::RemoveFailed,
                Operation::Update => Notice::UpdateFailed,
            },
        }
    }
}
