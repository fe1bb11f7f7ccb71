//! Cart error model.

use thiserror::Error;

/// Result type used across the cart domain.
pub type CartResult<T> = Result<T, CartError>;

/// Cart-level error.
///
/// Every failure of a mutating cart operation collapses into exactly one of
/// these kinds. None of them is fatal: the manager stays usable after any of
/// them, and the cart state is guaranteed unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds what the stock source has available.
    ///
    /// This is an expected, recoverable condition rather than a fault.
    #[error("requested amount exceeds available stock")]
    InsufficientStock,

    /// The operation targets a product that is not in the cart.
    #[error("product not found in cart")]
    ProductNotFound,

    /// A collaborator call (stock, catalog, store) failed for any reason.
    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl CartError {
    pub fn operation_failed(msg: impl Into<String>) -> Self {
        Self::OperationFailed(msg.into())
    }
}
