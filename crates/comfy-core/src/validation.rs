//! # Validation Module
//!
//! Form and input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form submission (THIS MODULE)                                │
//! │  ├── Required fields (checkout, login, register)                       │
//! │  ├── Quantity bounds for cart lines                                    │
//! │  └── Failure blocks submission: no request, no navigation              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Store API                                                    │
//! │  ├── Credentials, uniqueness of username/e-mail                        │
//! │  └── Failure surfaces as an API error notice                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use comfy_core::validation::{validate_checkout, validate_quantity};
//!
//! assert!(validate_checkout("Anna", "1 Main St").is_ok());
//! assert!(validate_checkout("Anna", "  ").is_err());
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Requires a non-blank value and returns it trimmed.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(value.to_string())
}

/// Validates the checkout form: both name and address are required.
pub fn validate_checkout(name: &str, address: &str) -> ValidationResult<()> {
    validate_required("name", name)?;
    validate_required("address", address)?;
    Ok(())
}

/// Validates the login form.
pub fn validate_login(identifier: &str, password: &str) -> ValidationResult<()> {
    validate_required("identifier", identifier)?;
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

/// Validates the registration form.
///
/// ## Rules
/// - username and password are required
/// - email is required and must look like `local@domain`
pub fn validate_registration(username: &str, email: &str, password: &str) -> ValidationResult<()> {
    validate_required("username", username)?;
    let email = validate_required("email", email)?;

    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && !domain.is_empty() && !domain.contains('@'))
        .unwrap_or(false);
    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be an address like name@example.com".to_string(),
        });
    }

    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "amount".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
