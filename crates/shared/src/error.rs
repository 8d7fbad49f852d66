use thiserror::Error;

use crate::domain::CatalogId;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("unknown catalog item '{0}'")]
    UnknownItem(CatalogId),
    /// Zero, or large enough that the line or cart would overflow.
    #[error("quantity must be at least 1 and keep the cart within its limits")]
    InvalidQuantity,
    #[error("cannot check out an empty cart")]
    EmptyCartCheckout,
    /// The in-memory cart was updated but could not be written.
    #[error("cart persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error("'{action}' is not allowed while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

impl CartError {
    pub fn persistence(source: impl std::fmt::Display) -> Self {
        Self::PersistenceUnavailable(source.to_string())
    }

    /// Message suitable for showing to the shopper.
    pub fn user_message(&self) -> String {
        match self {
            CartError::UnknownItem(id) => format!("Sorry, '{id}' is not in our catalog."),
            CartError::InvalidQuantity => {
                "Please choose a quantity of at least 1 that fits in your cart.".to_string()
            }
            CartError::EmptyCartCheckout => "Your cart is empty!".to_string(),
            CartError::PersistenceUnavailable(_) => {
                "Your cart could not be saved; changes will be lost when you leave.".to_string()
            }
            CartError::InvalidTransition { .. } => self.to_string(),
        }
    }
}
