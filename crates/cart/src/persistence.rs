use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::domain::LineItem;
use tokio::sync::Mutex;

/// Storage for exactly one serialized cart.
///
/// `save` always receives the complete item list and must replace whatever
/// was stored before; implementations never merge or append.
#[async_trait]
pub trait CartPersistence: Send + Sync {
    async fn load(&self) -> Result<Option<Vec<LineItem>>>;
    async fn save(&self, items: &[LineItem]) -> Result<()>;
}

/// Keeps the cart in process memory. Used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<Vec<LineItem>>>,
    unavailable: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            slot: Mutex::new(Some(items)),
            ..Self::default()
        }
    }

    /// Makes every subsequent `load` and `save` fail, like a disabled or full
    /// browser store.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn stored_items(&self) -> Option<Vec<LineItem>> {
        self.slot.lock().await.clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("memory cart slot marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl CartPersistence for MemoryPersistence {
    async fn load(&self) -> Result<Option<Vec<LineItem>>> {
        self.check_available()?;
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, items: &[LineItem]) -> Result<()> {
        self.check_available()?;
        *self.slot.lock().await = Some(items.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
