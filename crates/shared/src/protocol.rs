use serde::{Deserialize, Serialize};

use crate::domain::{CatalogId, LineItem, Price};

/// Gestures relayed from the UI to the cart controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum UiCommand {
    AddItem {
        catalog_id: CatalogId,
        #[serde(default = "default_quantity")]
        quantity: u32,
    },
    RemoveItem {
        id: CatalogId,
    },
    ClearCart,
    OpenCart,
    CloseCart,
    BeginCheckout,
    ConfirmPurchase,
    CancelCheckout,
    DismissConfirmation,
}

fn default_quantity() -> u32 {
    1
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::AddItem { .. } => "add_item",
            UiCommand::RemoveItem { .. } => "remove_item",
            UiCommand::ClearCart => "clear_cart",
            UiCommand::OpenCart => "open_cart",
            UiCommand::CloseCart => "close_cart",
            UiCommand::BeginCheckout => "begin_checkout",
            UiCommand::ConfirmPurchase => "confirm_purchase",
            UiCommand::CancelCheckout => "cancel_checkout",
            UiCommand::DismissConfirmation => "dismiss_confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    pub id: CatalogId,
    pub title: String,
    pub author: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&LineItem> for LineView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            author: item.author.clone(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Everything a renderer needs to draw the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<LineView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub item_count: u32,
    pub total: Price,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Broadcast by the cart store after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CartEvent {
    Changed(CartView),
    PersistenceDegraded { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_defaults_quantity_to_one() {
        let cmd: UiCommand =
            serde_json::from_str(r#"{"type":"add_item","payload":{"catalog_id":"1984"}}"#)
                .expect("decode");
        assert_eq!(
            cmd,
            UiCommand::AddItem {
                catalog_id: CatalogId::from("1984"),
                quantity: 1,
            }
        );
    }

    #[test]
    fn unit_commands_use_tag_only() {
        let encoded = serde_json::to_string(&UiCommand::BeginCheckout).expect("encode");
        assert_eq!(encoded, r#"{"type":"begin_checkout"}"#);
    }
}
