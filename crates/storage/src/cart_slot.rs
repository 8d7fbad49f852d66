use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use cart::CartPersistence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::domain::{CatalogId, LineItem, Price};
use tracing::{debug, info, warn};

use crate::Storage;

pub const CART_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CartEnvelope {
    version: u32,
    saved_at: DateTime<Utc>,
    items: Vec<LineItem>,
}

/// Row shape written before the blob carried a version: a bare array with
/// `price` instead of `unit_price` and an optional cover `image`.
#[derive(Debug, Deserialize)]
struct LegacyLineItem {
    id: CatalogId,
    title: String,
    author: String,
    price: Price,
    quantity: u32,
}

impl From<LegacyLineItem> for LineItem {
    fn from(legacy: LegacyLineItem) -> Self {
        Self {
            id: legacy.id,
            title: legacy.title,
            author: legacy.author,
            unit_price: legacy.price,
            quantity: legacy.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCart {
    /// `0` for the legacy unversioned array.
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    pub items: Vec<LineItem>,
}

pub fn encode_cart(items: &[LineItem]) -> Result<String> {
    let envelope = CartEnvelope {
        version: CART_SCHEMA_VERSION,
        saved_at: Utc::now(),
        items: items.to_vec(),
    };
    serde_json::to_string(&envelope).context("failed to encode cart envelope")
}

pub fn decode_cart(raw: &str) -> Result<DecodedCart> {
    let value: Value = serde_json::from_str(raw).context("stored cart is not valid json")?;

    match value {
        Value::Array(_) => {
            let legacy: Vec<LegacyLineItem> =
                serde_json::from_value(value).context("invalid legacy cart rows")?;
            Ok(DecodedCart {
                version: 0,
                saved_at: None,
                items: legacy.into_iter().map(LineItem::from).collect(),
            })
        }
        Value::Object(ref fields) => {
            let version = fields
                .get("version")
                .and_then(Value::as_u64)
                .context("cart envelope has no numeric version")?;
            if version != u64::from(CART_SCHEMA_VERSION) {
                bail!("unsupported cart schema version {version} (expected {CART_SCHEMA_VERSION})");
            }
            let envelope: CartEnvelope =
                serde_json::from_value(value).context("invalid cart envelope")?;
            Ok(DecodedCart {
                version: envelope.version,
                saved_at: Some(envelope.saved_at),
                items: envelope.items,
            })
        }
        _ => bail!("stored cart must be a json object or array"),
    }
}

/// Persists the cart as one JSON blob under a single named slot.
#[derive(Clone)]
pub struct SqliteCartSlot {
    storage: Storage,
    key: String,
}

impl SqliteCartSlot {
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Slot that receives a copy of a cart this build cannot read, so the
    /// next save does not destroy it.
    pub fn backup_key(&self) -> String {
        format!("{}.unreadable", self.key)
    }

    /// Decoded slot contents, keeping the schema version and save time.
    pub async fn load_decoded(&self) -> Result<Option<DecodedCart>> {
        let Some(slot) = self.storage.get_slot(&self.key).await? else {
            return Ok(None);
        };
        self.decode(&slot.value).map(Some)
    }

    fn decode(&self, raw: &str) -> Result<DecodedCart> {
        let decoded = decode_cart(raw)
            .with_context(|| format!("slot '{}' holds an unreadable cart", self.key))?;
        if decoded.version < CART_SCHEMA_VERSION {
            info!(
                slot = %self.key,
                from = decoded.version,
                to = CART_SCHEMA_VERSION,
                "storage: legacy cart found, will be upgraded on next save"
            );
        }
        Ok(decoded)
    }

    pub async fn reset(&self) -> Result<bool> {
        self.storage.delete_slot(&self.key).await
    }
}

#[async_trait]
impl CartPersistence for SqliteCartSlot {
    async fn load(&self) -> Result<Option<Vec<LineItem>>> {
        let Some(slot) = self.storage.get_slot(&self.key).await? else {
            return Ok(None);
        };
        match self.decode(&slot.value) {
            Ok(decoded) => Ok(Some(decoded.items)),
            Err(error) => {
                let backup = self.backup_key();
                self.storage
                    .put_slot(&backup, &slot.value)
                    .await
                    .with_context(|| format!("{error:#}; backup to slot '{backup}' failed"))?;
                warn!(slot = %self.key, backup = %backup, "storage: unreadable cart preserved");
                Err(error.context(format!("original kept in slot '{backup}'")))
            }
        }
    }

    async fn save(&self, items: &[LineItem]) -> Result<()> {
        let encoded = encode_cart(items)?;
        self.storage.put_slot(&self.key, &encoded).await?;
        debug!(slot = %self.key, lines = items.len(), "storage: cart saved");
        Ok(())
    }
}
