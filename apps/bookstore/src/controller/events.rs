//! What the controller asks the front-end to show after a gesture.

use shared::protocol::{CartView, CheckoutSummary, Notice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Notice(Notice),
    CartOpened(CartView),
    CheckoutStarted(CheckoutSummary),
    PurchaseConfirmed,
    ConfirmationDismissed,
    ViewClosed,
}
