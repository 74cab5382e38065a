//! # Demo Data
//!
//! Placeholder records installed when demo mode is on and the API cannot be
//! reached. They let the storefront render something without a backend.

use crate::money::Money;
use crate::types::{Product, ProductId, Role, User};

/// The two placeholder catalog entries.
pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new(ProductId::new(1), "Producto Demo 1", Money::from_cents(2999))
            .with_image("https://picsum.photos/300/300?random=1")
            .with_description("Descripción del producto demo")
            .with_category("electronics")
            .with_stock(10),
        Product::new(ProductId::new(2), "Producto Demo 2", Money::from_cents(4999))
            .with_image("https://picsum.photos/300/300?random=2")
            .with_description("Descripción del producto demo 2")
            .with_category("clothing")
            .with_stock(5),
    ]
}

/// The placeholder session user.
pub fn demo_user() -> User {
    User {
        id: 1,
        name: "Usuario Demo".to_string(),
        email: "demo@ejemplo.com".to_string(),
        role: Role::Customer,
    }
}
