//! Validation utilities for the Wholesale Business Management Platform
//!
//! Pure checks applied before input reaches the services or the ledger.

use rust_decimal::Decimal;

// ============================================================================
// Inventory & Order Validations
// ============================================================================

/// Validate an order-line quantity (positive packages only)
pub fn validate_line_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be a positive number of packages");
    }
    Ok(())
}

/// Validate an on-hand stock quantity (restock target, never negative)
pub fn validate_stock_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Stock quantity cannot be negative");
    }
    Ok(())
}

/// Validate a currency amount (price or total, never negative)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a low-stock threshold
pub fn validate_threshold(threshold: i64) -> Result<(), &'static str> {
    if threshold <= 0 {
        return Err("Threshold must be positive");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email address")
    }
}

/// Validate a required name field
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name cannot be empty");
    }
    if trimmed.len() > 255 {
        return Err("Name is too long");
    }
    Ok(())
}

/// Validate an employee code (uppercase alphanumeric, 2-20 chars)
pub fn validate_employee_id(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 || code.len() > 20 {
        return Err("Employee ID must be 2-20 characters");
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Employee ID must be alphanumeric");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_quantity_positive() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-3).is_err());
    }

    #[test]
    fn test_stock_quantity_non_negative() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(10).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_amount_non_negative() {
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::from_str("19.99").unwrap()).is_ok());
        assert!(validate_amount(Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn test_email_basic_format() {
        assert!(validate_email("ops@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_employee_id_format() {
        assert!(validate_employee_id("EMP001").is_ok());
        assert!(validate_employee_id("E").is_err());
        assert!(validate_employee_id("EMP-001").is_err());
    }
}
