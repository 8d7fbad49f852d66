use std::fmt::Write as _;

use shared::{
    domain::CatalogEntry,
    protocol::{CartView, CheckoutSummary, Notice, NoticeLevel},
};

use crate::controller::events::UiEvent;

pub fn cart(view: &CartView) -> String {
    if view.is_empty() {
        return "Your cart is empty\nTotal: $0.00".to_string();
    }

    let mut out = String::new();
    for line in &view.lines {
        let _ = writeln!(
            out,
            "  {} by {}  ${} x {} = ${}  [{}]",
            line.title, line.author, line.unit_price, line.quantity, line.line_total, line.id
        );
    }
    let _ = write!(
        out,
        "Total: ${}  ({} {})",
        view.total,
        view.item_count,
        if view.item_count == 1 { "item" } else { "items" }
    );
    out
}

pub fn badge(item_count: u32) -> String {
    format!("[cart: {item_count}]")
}

pub fn catalog(entries: &[&CatalogEntry]) -> String {
    if entries.is_empty() {
        return "No books in this category.".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<14} {} by {}  ${}{}",
            entry.id,
            entry.title,
            entry.author,
            entry.unit_price,
            entry
                .category
                .as_deref()
                .map(|category| format!("  ({category})"))
                .unwrap_or_default()
        );
    }
    out.pop();
    out
}

pub fn checkout(summary: &CheckoutSummary) -> String {
    format!(
        "Checkout\n  Total Items: {}\n  Total Amount: ${}\n  confirm | cancel",
        summary.item_count, summary.total
    )
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => notice.message.clone(),
        NoticeLevel::Warning => format!("! {}", notice.message),
    }
}

pub fn event(event: &UiEvent) -> String {
    match event {
        UiEvent::Notice(n) => notice(n),
        UiEvent::CartOpened(view) => format!("Shopping Cart\n{}", cart(view)),
        UiEvent::CheckoutStarted(summary) => checkout(summary),
        UiEvent::PurchaseConfirmed => {
            "Purchase Successful!\nYour books have been added to your digital library.".to_string()
        }
        UiEvent::ConfirmationDismissed => "Continue reading.".to_string(),
        UiEvent::ViewClosed => "Cart closed.".to_string(),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
