use super::*;
use shared::{
    domain::{CatalogId, LineItem, Price},
    protocol::LineView,
};

#[test]
fn empty_cart_shows_zero_total() {
    let view = CartView {
        lines: Vec::new(),
        total: "0.00".into(),
        item_count: 0,
    };
    assert_eq!(cart(&view), "Your cart is empty\nTotal: $0.00");
}

#[test]
fn cart_lists_lines_with_two_decimal_prices() {
    let item = LineItem {
        id: CatalogId::from("1984"),
        title: "1984".into(),
        author: "George Orwell".into(),
        unit_price: Price::from_cents(999),
        quantity: 2,
    };
    let view = CartView {
        lines: vec![LineView::from(&item)],
        total: "19.98".into(),
        item_count: 2,
    };

    assert_eq!(
        cart(&view),
        "  1984 by George Orwell  $9.99 x 2 = $19.98  [1984]\nTotal: $19.98  (2 items)"
    );
}

#[test]
fn checkout_summary_shows_count_and_amount() {
    let summary = CheckoutSummary {
        item_count: 3,
        total: Price::from_cents(3297),
    };
    assert!(checkout(&summary).contains("Total Items: 3"));
    assert!(checkout(&summary).contains("Total Amount: $32.97"));
}

#[test]
fn warnings_are_marked() {
    assert_eq!(notice(&Notice::warning("Your cart is empty!")), "! Your cart is empty!");
    assert_eq!(notice(&Notice::info("Added")), "Added");
}
