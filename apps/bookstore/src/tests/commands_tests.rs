use super::*;

#[test]
fn blank_line_is_ignored() {
    assert_eq!(parse_line("   "), Ok(None));
}

#[test]
fn add_defaults_to_one_copy() {
    assert_eq!(
        parse_line("add 1984"),
        Ok(Some(Input::Ui(UiCommand::AddItem {
            catalog_id: CatalogId::from("1984"),
            quantity: 1,
        })))
    );
    assert_eq!(
        parse_line("  add   sapiens 3 "),
        Ok(Some(Input::Ui(UiCommand::AddItem {
            catalog_id: CatalogId::from("sapiens"),
            quantity: 3,
        })))
    );
}

#[test]
fn add_rejects_zero_and_non_numeric_quantity() {
    assert!(parse_line("add 1984 0").is_err());
    assert!(parse_line("add 1984 lots").is_err());
}

#[test]
fn flow_gestures_map_to_ui_commands() {
    let cases = [
        ("open", UiCommand::OpenCart),
        ("close", UiCommand::CloseCart),
        ("checkout", UiCommand::BeginCheckout),
        ("confirm", UiCommand::ConfirmPurchase),
        ("cancel", UiCommand::CancelCheckout),
        ("dismiss", UiCommand::DismissConfirmation),
        ("clear", UiCommand::ClearCart),
    ];
    for (line, expected) in cases {
        assert_eq!(parse_line(line), Ok(Some(Input::Ui(expected))), "line: {line}");
    }
}

#[test]
fn catalog_category_may_span_words() {
    assert_eq!(
        parse_line("catalog fantasy fiction"),
        Ok(Some(Input::Catalog(CategoryFilter::Category(
            "fantasy fiction".into()
        ))))
    );
    assert_eq!(
        parse_line("catalog"),
        Ok(Some(Input::Catalog(CategoryFilter::All)))
    );
}

#[test]
fn exit_is_an_alias_for_quit() {
    assert_eq!(parse_line("exit"), Ok(Some(Input::Quit)));
}

#[test]
fn unknown_command_returns_usage() {
    let err = parse_line("buy 1984").expect_err("unknown command");
    assert!(err.contains("buy"));
}
