//! Line commands typed at the bookstore prompt.

use cart::CategoryFilter;
use clap::{Parser, Subcommand};
use shared::{domain::CatalogId, protocol::UiCommand};

#[derive(Parser, Debug)]
#[command(name = "bookstore", no_binary_name = true, disable_version_flag = true)]
struct Line {
    #[command(subcommand)]
    command: LineCommand,
}

#[derive(Subcommand, Debug)]
enum LineCommand {
    /// List books, optionally only those in one category
    Catalog { category: Vec<String> },
    /// List the catalog's categories
    Categories,
    /// Put a book in the cart
    Add {
        id: String,
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Take a book out of the cart entirely
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Open the cart view
    Open,
    /// Close whatever view is open
    Close,
    /// Start checkout from the open cart
    Checkout,
    /// Complete the purchase
    Confirm,
    /// Go back from checkout to the cart
    Cancel,
    /// Dismiss the purchase confirmation
    Dismiss,
    /// Print the cart without changing views
    Show,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Ui(UiCommand),
    Catalog(CategoryFilter),
    Categories,
    Show,
    Quit,
}

/// Parses one prompt line. Blank lines yield `Ok(None)`; errors carry
/// clap's rendered usage text, help output included.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }

    let parsed = Line::try_parse_from(words).map_err(|err| err.render().to_string())?;
    let input = match parsed.command {
        LineCommand::Catalog { category } => {
            let filter = category
                .join(" ")
                .parse::<CategoryFilter>()
                .unwrap_or(CategoryFilter::All);
            Input::Catalog(filter)
        }
        LineCommand::Categories => Input::Categories,
        LineCommand::Add { id, quantity } => Input::Ui(UiCommand::AddItem {
            catalog_id: CatalogId::new(id),
            quantity,
        }),
        LineCommand::Remove { id } => Input::Ui(UiCommand::RemoveItem {
            id: CatalogId::new(id),
        }),
        LineCommand::Clear => Input::Ui(UiCommand::ClearCart),
        LineCommand::Open => Input::Ui(UiCommand::OpenCart),
        LineCommand::Close => Input::Ui(UiCommand::CloseCart),
        LineCommand::Checkout => Input::Ui(UiCommand::BeginCheckout),
        LineCommand::Confirm => Input::Ui(UiCommand::ConfirmPurchase),
        LineCommand::Cancel => Input::Ui(UiCommand::CancelCheckout),
        LineCommand::Dismiss => Input::Ui(UiCommand::DismissConfirmation),
        LineCommand::Show => Input::Show,
        LineCommand::Quit => Input::Quit,
    };
    Ok(Some(input))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
