//! # shopfront-core: Pure Domain Logic for the Storefront Client
//!
//! Everything here is deterministic and free of I/O: the domain types the
//! API speaks, integer money, the cart with its derived totals, input
//! validation, and the route table with its guard rules.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfront Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI (views, components)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          shopfront-client (Store, ApiClient, Router)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ shopfront-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   guard   │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ RouteMeta │  │   │
//! │  │   │   User    │  │           │  │ CartItem  │  │  evaluate │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Order, request bodies)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart lines and derived totals
//! - [`guard`] - Route table and navigation guard
//! - [`validation`] - Input validation before requests are sent
//! - [`demo`] - Placeholder catalog for demo mode
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use shopfront_core::{Cart, Money, Product, ProductId};
//!
//! let product = Product::new(ProductId::new(1), "Mug", Money::from_cents(1000));
//! let mut cart = Cart::new();
//! cart.add_item(&product, 2).unwrap();
//! cart.add_item(&product, 3).unwrap();
//!
//! assert_eq!(cart.line_count(), 1);
//! assert_eq!(cart.item_count(), 5);
//! assert_eq!(cart.total().cents(), 5000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod demo;
pub mod error;
pub mod guard;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use guard::{GuardDecision, Route, RouteMatch, RouteMeta, RouteTable};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page title used when a route does not declare its own.
pub const DEFAULT_SITE_TITLE: &str = "TuTienda";

/// Path guests are sent to when a route needs a session.
pub const LOGIN_PATH: &str = "/login";

/// Path used for every other redirect.
pub const HOME_PATH: &str = "/";
