//! Cart drawer / checkout / confirmation flow.
//!
//! ```text
//! Idle -> CartOpen -> CheckingOut -> Completed -> Idle
//!            ^             |
//!            +--- cancel --+
//! ```
//!
//! Closing the view returns to `Idle` from any state without touching the
//! cart. The cart is frozen from the start of checkout until the
//! confirmation goes away.

use shared::{error::CartError, protocol::CheckoutSummary};
use tracing::{debug, info, warn};

use crate::{Cart, CartStore};

/// Identifies one confirmation display. A dismissal carrying an older ticket
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DismissTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    CartOpen,
    CheckingOut(CheckoutSummary),
    Completed(DismissTicket),
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::CartOpen => "cart open",
            CheckoutState::CheckingOut(_) => "checking out",
            CheckoutState::Completed(_) => "showing confirmation",
        }
    }
}

#[derive(Debug)]
pub struct CheckoutFlow {
    state: CheckoutState,
    last_ticket: u64,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        Self {
            state: CheckoutState::Idle,
            last_ticket: 0,
        }
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn open_cart(&mut self) -> Result<(), CartError> {
        match self.state {
            CheckoutState::Idle => {
                self.transition(CheckoutState::CartOpen);
                Ok(())
            }
            CheckoutState::CartOpen => Ok(()),
            _ => Err(self.rejected("open cart")),
        }
    }

    /// Moves to the checkout form when `cart` has at least one line.
    pub fn begin_checkout(&mut self, cart: &Cart) -> Result<CheckoutSummary, CartError> {
        if self.state != CheckoutState::CartOpen {
            return Err(self.rejected("begin checkout"));
        }
        if cart.is_empty() {
            debug!("checkout: rejected, cart is empty");
            return Err(CartError::EmptyCartCheckout);
        }
        let summary = summarize(cart);
        self.transition(CheckoutState::CheckingOut(summary));
        Ok(summary)
    }

    /// Rejects `action` while a checkout or its confirmation is on screen.
    pub fn ensure_cart_editable(&self, action: &'static str) -> Result<(), CartError> {
        match self.state {
            CheckoutState::CheckingOut(_) | CheckoutState::Completed(_) => {
                Err(self.rejected(action))
            }
            CheckoutState::Idle | CheckoutState::CartOpen => Ok(()),
        }
    }

    pub fn cancel(&mut self) -> Result<(), CartError> {
        match self.state {
            CheckoutState::CheckingOut(_) => {
                self.transition(CheckoutState::CartOpen);
                Ok(())
            }
            _ => Err(self.rejected("cancel checkout")),
        }
    }

    /// Completes the simulated purchase and empties the cart.
    ///
    /// Payment always succeeds. If the emptied cart cannot be saved the
    /// purchase still completes; the store has already broadcast the
    /// degraded-persistence event.
    pub async fn confirm(&mut self, store: &mut CartStore) -> Result<DismissTicket, CartError> {
        let CheckoutState::CheckingOut(shown) = self.state else {
            return Err(self.rejected("confirm purchase"));
        };
        if store.cart().is_empty() {
            debug!("checkout: cart emptied before confirmation");
            self.transition(CheckoutState::CartOpen);
            return Err(CartError::EmptyCartCheckout);
        }
        let summary = summarize(store.cart());
        if summary != shown {
            warn!(
                shown_items = shown.item_count,
                items = summary.item_count,
                "checkout: cart changed after the summary was shown"
            );
        }

        if let Err(error) = store.clear().await {
            warn!("checkout: purchase completed but cleared cart was not saved: {error}");
        }

        self.last_ticket += 1;
        let ticket = DismissTicket(self.last_ticket);
        info!(
            items = summary.item_count,
            total = %summary.total,
            "checkout: purchase completed"
        );
        self.transition(CheckoutState::Completed(ticket));
        Ok(ticket)
    }

    /// Leaves the confirmation if `ticket` is still the one on display.
    pub fn dismiss(&mut self, ticket: DismissTicket) -> bool {
        match self.state {
            CheckoutState::Completed(current) if current == ticket => {
                self.transition(CheckoutState::Idle);
                true
            }
            _ => {
                debug!(?ticket, state = self.state.name(), "checkout: stale dismissal ignored");
                false
            }
        }
    }

    /// Explicit dismissal of whatever confirmation is on display.
    pub fn dismiss_current(&mut self) -> Result<DismissTicket, CartError> {
        match self.state {
            CheckoutState::Completed(ticket) => {
                self.transition(CheckoutState::Idle);
                Ok(ticket)
            }
            _ => Err(self.rejected("dismiss confirmation")),
        }
    }

    pub fn close_view(&mut self) {
        if self.state != CheckoutState::Idle {
            self.transition(CheckoutState::Idle);
        }
    }

    fn transition(&mut self, next: CheckoutState) {
        debug!(from = self.state.name(), to = next.name(), "checkout: transition");
        self.state = next;
    }

    fn rejected(&self, action: &'static str) -> CartError {
        CartError::InvalidTransition {
            state: self.state.name(),
            action,
        }
    }
}

fn summarize(cart: &Cart) -> CheckoutSummary {
    CheckoutSummary {
        item_count: cart.item_count(),
        total: cart.total(),
    }
}

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod tests;
