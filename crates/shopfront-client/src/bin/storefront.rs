//! # Storefront Development Entry Point
//!
//! Boots the store against the configured API and prints what a fresh
//! session would see.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (shopfront.toml + SHOPFRONT_* env)
//! 3. Open file storage (token + cart)
//! 4. Build the store, restore cart and session
//! 5. Fetch the catalog
//! 6. Print catalog, cart totals and the guard decision for every route
//!
//! ## Usage
//! ```text
//! SHOPFRONT_DEMO_MODE=true RUST_LOG=debug cargo run --bin storefront
//! ```

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shopfront_client::{ClientConfig, FileStorage, Store};
use shopfront_core::{GuardDecision, ProductFilters, RouteTable};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting storefront client");

    let config = ClientConfig::load_or_default(None);
    info!(base_url = %config.base_url(), demo_mode = config.is_demo_mode(), "Configuration loaded");

    let storage = FileStorage::from_settings(&config.storage)?;
    info!(path = ?storage.path(), "Storage opened");

    let store = Store::new(config, Arc::new(storage))?;
    if let Err(e) = store.initialize().await {
        warn!(error = %e, "Session could not be restored");
    }

    match store.fetch_products(&ProductFilters::new()).await {
        Ok(products) => {
            println!("Catalog ({:?}):", store.products_status());
            for product in &products {
                println!(
                    "  #{:<4} {:<30} {:>10}  stock {}",
                    product.id, product.name, product.price, product.stock
                );
            }
            println!("Categories: {}", store.categories().join(", "));
        }
        Err(e) => println!("Catalog unavailable: {}", e),
    }

    let totals = store.cart_totals();
    println!(
        "Cart: {} lines, {} items, total {}",
        totals.line_count, totals.item_count, totals.total
    );

    match store.current_user() {
        Some(user) => println!("Signed in as {} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }

    let router = store.router(RouteTable::storefront());
    println!("Routes:");
    for route in router.table().routes() {
        let nav = router.navigate(&route.path);
        let outcome = match nav.decision {
            GuardDecision::Allow => "allow".to_string(),
            GuardDecision::Redirect(to) => format!("redirect {}", to),
        };
        println!("  {:<18} {:<16} {:<14} {}", route.path, route.name, outcome, nav.title);
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=shopfront=trace` - Show trace for shopfront crates only
/// - Default: info, debug for shopfront crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shopfront=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
