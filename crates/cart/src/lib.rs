use std::sync::Arc;

use shared::{
    domain::{CatalogId, LineItem, Price},
    error::CartError,
    protocol::{CartEvent, CartView, LineView},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

mod catalog;
pub mod checkout;
mod persistence;

pub use catalog::{CatalogLookup, CategoryFilter, StaticCatalog};
pub use checkout::{CheckoutFlow, CheckoutState, DismissTicket};
pub use persistence::{CartPersistence, MemoryPersistence};

const EVENT_CAPACITY: usize = 64;

/// Ordered line items; at most one line per catalog id, every quantity >= 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from stored rows, dropping zero quantities and folding
    /// repeated ids into the first occurrence.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            let id = item.id.clone();
            if let Err(error) = cart.merge(item) {
                warn!(id = %id, "cart: stored row dropped: {error}");
            }
        }
        cart
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &CatalogId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    pub fn view(&self) -> CartView {
        CartView {
            lines: self.items.iter().map(LineView::from).collect(),
            total: self.total().to_string(),
            item_count: self.item_count(),
        }
    }

    /// Adds `item` to its line, or appends it as a new line. Leaves the cart
    /// untouched when the quantity, the line total, the cart total or the
    /// item count would overflow.
    fn merge(&mut self, item: LineItem) -> Result<(), CartError> {
        let position = self.items.iter().position(|existing| existing.id == item.id);
        let (quantity, unit_price) = match position {
            Some(index) => {
                let existing = &self.items[index];
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::InvalidQuantity)?;
                (quantity, existing.unit_price)
            }
            None => (item.quantity, item.unit_price),
        };

        let mut item_count = Some(quantity);
        let mut total = unit_price.checked_times(quantity);
        for existing in self.items.iter().filter(|existing| existing.id != item.id) {
            item_count = item_count.and_then(|count| count.checked_add(existing.quantity));
            total = total.and_then(|sum| {
                sum.checked_add(existing.unit_price.checked_times(existing.quantity)?)
            });
        }
        if item_count.is_none() || total.is_none() {
            return Err(CartError::InvalidQuantity);
        }

        match position {
            Some(index) => self.items[index].quantity = quantity,
            None => self.items.push(item),
        }
        Ok(())
    }

    fn remove(&mut self, id: &CatalogId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Single owner of the shopper's cart.
///
/// Every mutation rewrites the whole persisted cart and then broadcasts a
/// [`CartEvent::Changed`] with the fresh view.
pub struct CartStore {
    catalog: Arc<dyn CatalogLookup>,
    persistence: Arc<dyn CartPersistence>,
    cart: Cart,
    events: broadcast::Sender<CartEvent>,
    restore_warning: Option<String>,
}

impl CartStore {
    /// Restores the cart from `persistence`, starting empty if nothing was
    /// stored or the store cannot be read.
    pub async fn open(
        catalog: Arc<dyn CatalogLookup>,
        persistence: Arc<dyn CartPersistence>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (cart, restore_warning) = match persistence.load().await {
            Ok(Some(items)) => {
                let cart = Cart::from_items(items);
                info!(
                    lines = cart.items().len(),
                    items = cart.item_count(),
                    "cart: restored from storage"
                );
                (cart, None)
            }
            Ok(None) => (Cart::new(), None),
            Err(error) => {
                warn!("cart: failed to restore persisted cart, starting empty: {error:#}");
                (Cart::new(), Some(format!("{error:#}")))
            }
        };

        Self {
            catalog,
            persistence,
            cart,
            events,
            restore_warning,
        }
    }

    /// Reason the persisted cart could not be read at startup, if any.
    pub fn restore_warning(&self) -> Option<&str> {
        self.restore_warning.as_deref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn compute_total(&self) -> Price {
        self.cart.total()
    }

    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    pub fn view(&self) -> CartView {
        self.cart.view()
    }

    pub async fn add_item(&mut self, catalog_id: &CatalogId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let entry = self
            .catalog
            .lookup(catalog_id)
            .ok_or_else(|| CartError::UnknownItem(catalog_id.clone()))?;

        self.cart.merge(LineItem::from_entry(&entry, quantity))?;
        info!(
            id = %catalog_id,
            added = quantity,
            now = self.cart.get(catalog_id).map_or(0, |item| item.quantity),
            "cart: item added"
        );
        self.commit().await
    }

    /// Drops the whole line for `id`. Returns `false` without touching
    /// storage when no such line exists.
    pub async fn remove_item(&mut self, id: &CatalogId) -> Result<bool, CartError> {
        if !self.cart.remove(id) {
            debug!(id = %id, "cart: remove ignored, item not in cart");
            return Ok(false);
        }
        info!(id = %id, "cart: item removed");
        self.commit().await?;
        Ok(true)
    }

    pub async fn clear(&mut self) -> Result<(), CartError> {
        self.cart.clear();
        info!("cart: cleared");
        self.commit().await
    }

    async fn commit(&mut self) -> Result<(), CartError> {
        let saved = self.persistence.save(self.cart.items()).await;
        let view = self.cart.view();

        match saved {
            Ok(()) => {
                let _ = self.events.send(CartEvent::Changed(view));
                Ok(())
            }
            Err(error) => {
                let reason = format!("{error:#}");
                warn!("cart: change kept in memory only, save failed: {reason}");
                let _ = self.events.send(CartEvent::PersistenceDegraded {
                    reason: reason.clone(),
                });
                let _ = self.events.send(CartEvent::Changed(view));
                Err(CartError::PersistenceUnavailable(reason))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
