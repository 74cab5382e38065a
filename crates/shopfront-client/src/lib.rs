//! # shopfront-client: Storefront Store and API Client
//!
//! The I/O half of the storefront client. It talks to the REST API, persists
//! the session and cart, and exposes the application state as observable
//! `watch` channels.
//!
//! ## Module Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        shopfront-client                                 │
//! │                                                                         │
//! │  store/        Store: auth, catalog, cart, orders                      │
//! │    │                                                                    │
//! │    ├──► http.rs       ApiClient (reqwest, bearer token, request ids)   │
//! │    ├──► storage.rs    KeyValueStore (memory or JSON file)              │
//! │    └──► loading.rs    ref-counted loading flag                         │
//! │                                                                         │
//! │  navigation.rs   Router: route guard over the store's user             │
//! │  config.rs       ClientConfig (TOML + SHOPFRONT_* env)                 │
//! │  error.rs        ClientError, StorageError                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use shopfront_client::{ClientConfig, MemoryStorage, Store};
//! use shopfront_core::{ProductFilters, RouteTable};
//!
//! # async fn run() -> shopfront_client::ClientResult<()> {
//! let store = Store::new(ClientConfig::default(), Arc::new(MemoryStorage::new()))?;
//! store.initialize().await?;
//!
//! let products = store.fetch_products(&ProductFilters::new()).await?;
//! if let Some(first) = products.first() {
//!     store.add_to_cart(first, 1)?;
//! }
//!
//! let router = store.router(RouteTable::storefront());
//! let nav = router.navigate("/checkout");
//! println!("{} -> {}", nav.requested, nav.path);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod loading;
pub mod navigation;
pub mod storage;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, StorageError, StorageResult};
pub use http::{ApiClient, ApiRequest};
pub use loading::{LoadingGuard, LoadingTracker};
pub use navigation::{Navigation, Router};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
pub use store::{FetchStatus, Store};
