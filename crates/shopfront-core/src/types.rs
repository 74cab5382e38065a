//! # Domain Types
//!
//! Types exchanged with the storefront API and held in the client store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id (opt)       │       │
//! │  │  name, email    │   │  name, price    │   │  status, total  │       │
//! │  │  role           │   │  category,stock │   │  extra fields   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Request bodies: Credentials, Registration, ProductDraft               │
//! │  Reply shapes:   AuthResponse, *Listing / *Envelope (bare or wrapped)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::money::Money;

/// Reads `null` or an absent field as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Product Identifier
// =============================================================================

/// Numeric product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric coercion for ids taken from route parameters.
///
/// Leading whitespace is skipped and parsing stops at the first non-digit,
/// so `"7"`, `" 7"` and `"7-mug"` all yield `7`.
impl FromStr for ProductId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start();
        let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(format!("'{}' is not a product id", s));
        }
        digits
            .parse::<u64>()
            .map(ProductId)
            .map_err(|e| format!("'{}' is not a product id: {}", s, e))
    }
}

// =============================================================================
// User
// =============================================================================

/// Account role. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    /// Missing roles are read as customer.
    #[serde(default)]
    pub role: Role,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    pub name: String,

    /// Unit price, never negative.
    pub price: Money,

    /// Image URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Category tag (e.g. "electronics").
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// Units in stock.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: i64,
}

impl Product {
    /// Creates a product with empty optional fields.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money) -> Self {
        Product {
            id,
            name: name.into(),
            price,
            image: String::new(),
            description: String::new(),
            category: String::new(),
            stock: 0,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Admin payload for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub stock: i64,
}

/// Ordered query filters for the product listing.
///
/// ## Example
/// ```rust
/// use shopfront_core::ProductFilters;
///
/// let filters = ProductFilters::new()
///     .with("category", "electronics")
///     .with("search", "usb hub");
/// assert_eq!(filters.pairs().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    pairs: Vec<(String, String)>,
}

impl ProductFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter. A repeated key replaces the earlier value in place.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

// =============================================================================
// Order
// =============================================================================

/// A server-side order record.
///
/// Only the commonly present fields are typed. Everything else the server
/// sends is kept in `details` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,

    /// Line items in whatever shape the server reports them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Value>,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

// =============================================================================
// Auth Request / Response Bodies
// =============================================================================

/// Login request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Successful login reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// Reply Shapes
// =============================================================================
// The API is inconsistent about wrapping: lists come bare or under a key,
// single records come bare or under their singular name. Wrapped variants
// are tried first so a bare record never shadows them.

/// `GET /products` reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductListing {
    Wrapped { products: Vec<Product> },
    Bare(Vec<Product>),
}

impl ProductListing {
    pub fn into_vec(self) -> Vec<Product> {
        match self {
            ProductListing::Wrapped { products } => products,
            ProductListing::Bare(products) => products,
        }
    }
}

/// Single product reply (`GET /products/:id`, admin create/update).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProductEnvelope {
    Wrapped { product: Product },
    Bare(Product),
}

impl ProductEnvelope {
    pub fn into_inner(self) -> Product {
        match self {
            ProductEnvelope::Wrapped { product } => product,
            ProductEnvelope::Bare(product) => product,
        }
    }
}

/// `GET /orders` reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OrderListing {
    Wrapped { orders: Vec<Order> },
    Bare(Vec<Order>),
}

impl OrderListing {
    pub fn into_vec(self) -> Vec<Order> {
        match self {
            OrderListing::Wrapped { orders } => orders,
            OrderListing::Bare(orders) => orders,
        }
    }
}

/// Current-user reply (`GET /auth/me`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum UserEnvelope {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelope {
    pub fn into_inner(self) -> User {
        match self {
            UserEnvelope::Wrapped { user } => user,
            UserEnvelope::Bare(user) => user,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
