use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use cart::{CartPersistence, CartStore, CheckoutState, MemoryPersistence, StaticCatalog};
use clap::Parser;
use shared::protocol::{CartEvent, Notice};
use storage::{SqliteCartSlot, Storage};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod controller;
mod render;

use commands::{parse_line, Input};
use config::{load_settings, normalize_database_url};
use controller::CartController;

#[derive(Parser, Debug)]
#[command(about = "Browse the bookstore catalog and manage your cart")]
struct Args {
    /// Settings file (defaults to ./bookstore.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    database_url: Option<String>,
    /// Storage slot holding the serialized cart
    #[arg(long)]
    cart_key: Option<String>,
    /// TOML file with `[[books]]` entries replacing the built-in catalog
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// How long the purchase confirmation stays up
    #[arg(long)]
    confirmation_ms: Option<u64>,
    /// Keep the cart in memory only
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(v) = args.database_url {
        settings.database_url = v;
    }
    if let Some(v) = args.cart_key {
        settings.cart_slot_key = v;
    }
    if let Some(v) = args.catalog {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = args.confirmation_ms {
        settings.confirmation_display_ms = v;
    }

    let catalog = Arc::new(match &settings.catalog_path {
        Some(path) => StaticCatalog::from_path(path)?,
        None => StaticCatalog::bookstore_default(),
    });

    let persistence: Arc<dyn CartPersistence> = if args.ephemeral {
        info!("cart kept in memory only (--ephemeral)");
        Arc::new(MemoryPersistence::new())
    } else {
        let database_url = normalize_database_url(&settings.database_url);
        let storage = Storage::new(&database_url)
            .await
            .with_context(|| format!("failed to open cart storage at '{database_url}'"))?;
        info!(database_url = %database_url, slot = %settings.cart_slot_key, "cart storage ready");
        Arc::new(SqliteCartSlot::new(storage, settings.cart_slot_key.clone()))
    };

    let store = CartStore::open(catalog.clone(), persistence).await;
    if store.restore_warning().is_some() {
        println!(
            "{}",
            render::notice(&Notice::warning(
                "Your saved cart could not be loaded; starting with an empty cart."
            ))
        );
    }
    let (mut controller, mut dismiss_rx) =
        CartController::new(store, settings.confirmation_display());
    let mut cart_events = controller.subscribe();

    println!("Welcome to the bookstore. Type 'help' for commands.");
    println!("{}", render::badge(controller.store().item_count()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(None) => {}
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Ui(command))) => {
                        for event in controller.handle(command).await {
                            println!("{}", render::event(&event));
                        }
                    }
                    Ok(Some(Input::Catalog(filter))) => {
                        println!("{}", render::catalog(&catalog.filter(&filter)));
                    }
                    Ok(Some(Input::Categories)) => {
                        println!("{}", catalog.categories().join("\n"));
                    }
                    Ok(Some(Input::Show)) => {
                        println!("{}", render::cart(&controller.store().view()));
                    }
                    Err(usage) => println!("{}", usage.trim_end()),
                }
            }
            Some(ticket) = dismiss_rx.recv() => {
                for event in controller.on_dismiss_timer(ticket) {
                    println!("{}", render::event(&event));
                }
            }
            event = cart_events.recv() => match event {
                Ok(CartEvent::Changed(view)) => {
                    if controller.state() == CheckoutState::CartOpen {
                        println!("{}", render::cart(&view));
                    }
                    println!("{}", render::badge(view.item_count));
                }
                Ok(CartEvent::PersistenceDegraded { reason }) => {
                    tracing::debug!("persistence degraded: {reason}");
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "render fell behind cart events");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    Ok(())
}
