//! # Store
//!
//! The client-side application state: who is signed in, what is in the cart,
//! what the catalog looks like and which orders the user has placed.
//!
//! ## State Containers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Store State                                  │
//! │                                                                         │
//! │  watch channel          type                 written by                │
//! │  ─────────────          ────                 ──────────                │
//! │  user                   Option<User>         auth.rs                   │
//! │  loading                bool (ref-counted)   every async operation     │
//! │  cart                   Cart                 cart.rs, orders.rs        │
//! │  cart_totals            CartTotals           derived from cart         │
//! │  products               Vec<Product>         catalog.rs                │
//! │  categories             Vec<String>          derived from products     │
//! │  orders                 Vec<Order>           orders.rs                 │
//! │  products/orders_status FetchStatus          catalog.rs, orders.rs     │
//! │                                                                         │
//! │  Consumers call subscribe_*() and await changed() on the receiver.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//! Only the bearer token and the cart are persisted, through the injected
//! [`KeyValueStore`]. Cart changes are written before they are published, so
//! observers never see a cart that is not on disk.
//!
//! ## Startup
//! ```rust,ignore
//! let store = Store::new(config, storage)?;
//! store.initialize().await?; // restore cart, then session
//! ```

mod auth;
mod cart;
mod catalog;
mod orders;

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use shopfront_core::{Cart, CartTotals, Order, Product, RouteTable, User};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::loading::LoadingTracker;
use crate::navigation::Router;
use crate::storage::KeyValueStore;

// =============================================================================
// Fetch Status
// =============================================================================

/// How the current contents of a list came to be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Never fetched.
    #[default]
    Idle,
    /// Filled from the API.
    Loaded { at: DateTime<Utc> },
    /// Filled with demo data after a failed fetch.
    Placeholder,
    /// Last fetch failed; the list holds whatever it held before.
    Failed { message: String },
}

impl FetchStatus {
    pub fn loaded_now() -> Self {
        FetchStatus::Loaded { at: Utc::now() }
    }

    pub fn failed(err: &impl std::fmt::Display) -> Self {
        FetchStatus::Failed {
            message: err.to_string(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchStatus::Loaded { .. })
    }
}

// =============================================================================
// Store
// =============================================================================

/// Application state plus the operations that change it.
///
/// One instance per session, built explicitly and shared by reference
/// (usually inside an `Arc`).
pub struct Store {
    config: ClientConfig,
    api: ApiClient,
    storage: Arc<dyn KeyValueStore>,
    loading: LoadingTracker,

    user: watch::Sender<Option<User>>,
    cart: watch::Sender<Cart>,
    cart_totals: watch::Sender<CartTotals>,
    products: watch::Sender<Vec<Product>>,
    categories: watch::Sender<Vec<String>>,
    orders: watch::Sender<Vec<Order>>,
    products_status: watch::Sender<FetchStatus>,
    orders_status: watch::Sender<FetchStatus>,

    /// Serializes read-modify-persist-publish cycles on the cart.
    cart_write: Mutex<()>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("api", &self.api)
            .field("user", &*self.user.borrow())
            .field("cart_lines", &self.cart.borrow().line_count())
            .field("products", &self.products.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Builds an empty store. Nothing is read from storage until
    /// [`Store::initialize`] runs.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> ClientResult<Self> {
        let api = ApiClient::new(&config.api, storage.clone())?;

        Ok(Store {
            config,
            api,
            storage,
            loading: LoadingTracker::new(),
            user: watch::Sender::new(None),
            cart: watch::Sender::new(Cart::new()),
            cart_totals: watch::Sender::new(CartTotals::default()),
            products: watch::Sender::new(Vec::new()),
            categories: watch::Sender::new(Vec::new()),
            orders: watch::Sender::new(Vec::new()),
            products_status: watch::Sender::new(FetchStatus::Idle),
            orders_status: watch::Sender::new(FetchStatus::Idle),
            cart_write: Mutex::new(()),
        })
    }

    /// Restores the saved cart, then the saved session.
    pub async fn initialize(&self) -> ClientResult<()> {
        self.initialize_cart()?;
        self.initialize_auth().await?;
        Ok(())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Guarded router observing this store's user.
    pub fn router(&self, table: RouteTable) -> Router {
        Router::new(table, self.subscribe_user(), self.config.site_title())
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn cart(&self) -> Cart {
        self.cart.borrow().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    pub fn categories(&self) -> Vec<String> {
        self.categories.borrow().clone()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.borrow().clone()
    }

    pub fn products_status(&self) -> FetchStatus {
        self.products_status.borrow().clone()
    }

    pub fn orders_status(&self) -> FetchStatus {
        self.orders_status.borrow().clone()
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.user.subscribe()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn subscribe_cart(&self) -> watch::Receiver<Cart> {
        self.cart.subscribe()
    }

    pub fn subscribe_cart_totals(&self) -> watch::Receiver<CartTotals> {
        self.cart_totals.subscribe()
    }

    pub fn subscribe_products(&self) -> watch::Receiver<Vec<Product>> {
        self.products.subscribe()
    }

    pub fn subscribe_categories(&self) -> watch::Receiver<Vec<String>> {
        self.categories.subscribe()
    }

    pub fn subscribe_orders(&self) -> watch::Receiver<Vec<Order>> {
        self.orders.subscribe()
    }

    pub fn subscribe_products_status(&self) -> watch::Receiver<FetchStatus> {
        self.products_status.subscribe()
    }

    pub fn subscribe_orders_status(&self) -> watch::Receiver<FetchStatus> {
        self.orders_status.subscribe()
    }

    fn cart_write_lock(&self) -> MutexGuard<'_, ()> {
        self.cart_write
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
