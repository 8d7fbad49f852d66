use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use cart::{Cart, CartPersistence};
use clap::{Parser, Subcommand};
use storage::{decode_cart, SqliteCartSlot, Storage};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/bookstore.db")]
    database_url: String,
    #[arg(long, default_value = "bookCart")]
    cart_key: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored cart as JSON
    Dump,
    /// Delete the stored cart
    Reset,
    /// List every slot in the database
    Slots,
    /// Load a cart blob from a file (legacy arrays included) and store it
    /// in the current format
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;
    let slot = SqliteCartSlot::new(storage.clone(), cli.cart_key);

    match cli.command {
        Command::Dump => match slot.load_decoded().await? {
            Some(decoded) => {
                let cart = Cart::from_items(decoded.items.clone());
                println!(
                    "slot={} version={} saved_at={} lines={} items={} total={}",
                    slot.key(),
                    decoded.version,
                    decoded
                        .saved_at
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "-".into()),
                    cart.items().len(),
                    cart.item_count(),
                    cart.total()
                );
                println!("{}", serde_json::to_string_pretty(&decoded.items)?);
            }
            None => println!("slot={} is empty", slot.key()),
        },
        Command::Reset => {
            let removed = slot.reset().await?;
            println!("slot={} removed={removed}", slot.key());
        }
        Command::Slots => {
            for key in storage.list_slot_keys().await? {
                println!("{key}");
            }
        }
        Command::Import { path } => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let decoded = decode_cart(&raw)?;
            let cart = Cart::from_items(decoded.items);
            slot.save(cart.items()).await?;
            println!(
                "slot={} imported lines={} from version={}",
                slot.key(),
                cart.items().len(),
                decoded.version
            );
        }
    }

    Ok(())
}
