//! Controller layer: relays UI gestures into the cart store and checkout flow.

pub mod events;

use std::time::Duration;

use cart::{CartStore, CheckoutFlow, CheckoutState, DismissTicket};
use shared::{
    domain::CatalogId,
    error::CartError,
    protocol::{CartEvent, Notice, UiCommand},
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use events::UiEvent;

pub struct CartController {
    store: CartStore,
    flow: CheckoutFlow,
    confirmation_display: Duration,
    dismiss_tx: mpsc::UnboundedSender<DismissTicket>,
}

impl CartController {
    /// The returned receiver yields tickets from expired confirmation timers;
    /// feed them back through [`CartController::on_dismiss_timer`].
    pub fn new(
        store: CartStore,
        confirmation_display: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<DismissTicket>) {
        let (dismiss_tx, dismiss_rx) = mpsc::unbounded_channel();
        let controller = Self {
            store,
            flow: CheckoutFlow::new(),
            confirmation_display,
            dismiss_tx,
        };
        (controller, dismiss_rx)
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn state(&self) -> CheckoutState {
        self.flow.state()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.store.subscribe()
    }

    pub async fn handle(&mut self, command: UiCommand) -> Vec<UiEvent> {
        debug!(command = command.name(), state = self.flow.state().name(), "controller: gesture");

        match command {
            UiCommand::AddItem {
                catalog_id,
                quantity,
            } => match self.flow.ensure_cart_editable("add to cart") {
                Ok(()) => self.add_item(&catalog_id, quantity).await,
                Err(error) => vec![self.notice_for(error)],
            },
            UiCommand::RemoveItem { id } => {
                let removed = match self.flow.ensure_cart_editable("remove from cart") {
                    Ok(()) => self.store.remove_item(&id).await.map(|_| ()),
                    Err(error) => Err(error),
                };
                self.events_for(removed)
            }
            UiCommand::ClearCart => {
                let cleared = match self.flow.ensure_cart_editable("clear cart") {
                    Ok(()) => self.store.clear().await,
                    Err(error) => Err(error),
                };
                self.events_for(cleared)
            }
            UiCommand::OpenCart => match self.flow.open_cart() {
                Ok(()) => vec![UiEvent::CartOpened(self.store.view())],
                Err(error) => vec![self.notice_for(error)],
            },
            UiCommand::CloseCart => {
                self.flow.close_view();
                vec![UiEvent::ViewClosed]
            }
            UiCommand::BeginCheckout => match self.flow.begin_checkout(self.store.cart()) {
                Ok(summary) => vec![UiEvent::CheckoutStarted(summary)],
                Err(error) => vec![self.notice_for(error)],
            },
            UiCommand::CancelCheckout => match self.flow.cancel() {
                Ok(()) => vec![UiEvent::CartOpened(self.store.view())],
                Err(error) => vec![self.notice_for(error)],
            },
            UiCommand::ConfirmPurchase => match self.flow.confirm(&mut self.store).await {
                Ok(ticket) => {
                    self.schedule_dismiss(ticket);
                    vec![UiEvent::PurchaseConfirmed]
                }
                Err(error) => vec![self.notice_for(error)],
            },
            UiCommand::DismissConfirmation => match self.flow.dismiss_current() {
                Ok(_) => vec![UiEvent::ConfirmationDismissed],
                Err(error) => vec![self.notice_for(error)],
            },
        }
    }

    /// Called when a confirmation timer fires. Does nothing if the shopper
    /// already dismissed that confirmation.
    pub fn on_dismiss_timer(&mut self, ticket: DismissTicket) -> Vec<UiEvent> {
        if self.flow.dismiss(ticket) {
            debug!(?ticket, "controller: confirmation auto-dismissed");
            vec![UiEvent::ConfirmationDismissed]
        } else {
            Vec::new()
        }
    }

    async fn add_item(&mut self, catalog_id: &CatalogId, quantity: u32) -> Vec<UiEvent> {
        match self.store.add_item(catalog_id, quantity).await {
            Ok(()) => {
                let title = self
                    .store
                    .cart()
                    .get(catalog_id)
                    .map_or_else(|| catalog_id.to_string(), |item| item.title.clone());
                vec![UiEvent::Notice(Notice::info(format!(
                    "Added '{title}' to your cart ({} in cart).",
                    self.store.item_count()
                )))]
            }
            Err(error) => vec![self.notice_for(error)],
        }
    }

    fn events_for(&self, outcome: Result<(), CartError>) -> Vec<UiEvent> {
        match outcome {
            Ok(()) => Vec::new(),
            Err(error) => vec![self.notice_for(error)],
        }
    }

    fn schedule_dismiss(&self, ticket: DismissTicket) {
        let tx = self.dismiss_tx.clone();
        let delay = self.confirmation_display;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ticket);
        });
    }

    fn notice_for(&self, error: CartError) -> UiEvent {
        match &error {
            CartError::UnknownItem(id) => {
                warn!(id = %id, "controller: add ignored, id not in catalog");
            }
            CartError::PersistenceUnavailable(reason) => {
                warn!("controller: cart not saved: {reason}");
            }
            CartError::InvalidTransition { .. } => {
                debug!("controller: {error}");
                return UiEvent::Notice(Notice::info(error.user_message()));
            }
            CartError::EmptyCartCheckout | CartError::InvalidQuantity => {
                info!("controller: {error}");
            }
        }
        UiEvent::Notice(Notice::warning(error.user_message()))
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
