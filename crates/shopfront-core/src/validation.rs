//! # Validation Module
//!
//! Input validation applied before a request leaves the client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form inputs (UI)                                             │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store functions (Rust)                                       │
//! │  └── THIS MODULE: reject malformed input without a round trip          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: API server                                                   │
//! │  └── Authoritative rules (uniqueness, permissions, stock)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_email("ana@example.com").is_ok());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Credentials, ProductDraft, Registration};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum product name length.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

fn required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity (must be > 0).
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price (must be ≥ 0).
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a stock count (must be ≥ 0).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required("name", name)?;

    if name.trim().chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// Only a shape check: one `@` with something on each side. The server
/// decides whether the address is acceptable.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    required("email", email)?;

    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a password is present.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Request Body Validators
// =============================================================================

pub fn validate_credentials(credentials: &Credentials) -> ValidationResult<()> {
    validate_email(&credentials.email)?;
    validate_password(&credentials.password)
}

pub fn validate_registration(registration: &Registration) -> ValidationResult<()> {
    required("name", &registration.name)?;
    validate_email(&registration.email)?;
    validate_password(&registration.password)?;

    if registration.password != registration.password_confirmation {
        return Err(ValidationError::Mismatch {
            field: "password_confirmation".to_string(),
            other: "password".to_string(),
        });
    }
    Ok(())
}

pub fn validate_product_draft(draft: &ProductDraft) -> ValidationResult<()> {
    validate_product_name(&draft.name)?;
    validate_price(draft.price)?;
    validate_stock(draft.stock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("demo@ejemplo.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("demo").is_err());
        assert!(validate_email("@ejemplo.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Taza").is_ok());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_registration_mismatch() {
        let registration = Registration {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            password_confirmation: "secreto".to_string(),
        };
        assert!(matches!(
            validate_registration(&registration),
            Err(ValidationError::Mismatch { .. })
        ));
    }

    #[test]
    fn test_validate_product_draft() {
        let mut draft = ProductDraft {
            name: "Taza".to_string(),
            price: Money::from_cents(1200),
            image: String::new(),
            description: String::new(),
            category: "kitchen".to_string(),
            stock: 3,
        };
        assert!(validate_product_draft(&draft).is_ok());

        draft.price = Money::from_cents(-1);
        assert!(validate_product_draft(&draft).is_err());

        draft.price = Money::zero();
        draft.stock = -1;
        assert!(validate_product_draft(&draft).is_err());
    }
}
