//! Ticker Errors

use thiserror::Error;

/// Errors raised while constructing or initializing a [`Ticker`](crate::Ticker)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    /// The container, or the viewport nested inside it, does not exist
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that failed to resolve
        selector: String,
    },

    /// The rotation has nothing to show
    #[error("Ticker items must not be empty")]
    EmptyItems,

    /// The container selector is blank
    #[error("Container selector must not be empty")]
    EmptySelector,

    /// `initialize` was called on a ticker that is already running
    #[error("Ticker is already initialized")]
    AlreadyInitialized,
}
