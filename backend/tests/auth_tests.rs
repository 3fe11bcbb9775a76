//! Authentication and role tests
//!
//! Tests for role parsing and the pure account validations.

use shared::{validate_email, validate_employee_id, UserRole};

// ============================================================================
// Roles
// ============================================================================

#[test]
fn test_role_round_trip() {
    for role in [UserRole::Admin, UserRole::Employee] {
        assert_eq!(UserRole::parse(role.as_str()), Some(role));
    }
}

#[test]
fn test_unknown_role_rejected() {
    assert_eq!(UserRole::parse("superuser"), None);
    assert_eq!(UserRole::parse(""), None);
    assert_eq!(UserRole::parse("Admin"), None); // roles are stored lowercase
}

#[test]
fn test_only_admin_is_admin() {
    assert!(UserRole::Admin.is_admin());
    assert!(!UserRole::Employee.is_admin());
}

#[test]
fn test_role_serde_representation() {
    assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    let role: UserRole = serde_json::from_str("\"employee\"").unwrap();
    assert_eq!(role, UserRole::Employee);
}

// ============================================================================
// Account Validations
// ============================================================================

#[test]
fn test_valid_employee_ids() {
    assert!(validate_employee_id("EMP001").is_ok());
    assert!(validate_employee_id("E1").is_ok());
    assert!(validate_employee_id("A1B2C3D4E5F6G7H8I9J0").is_ok());
}

#[test]
fn test_invalid_employee_ids() {
    assert!(validate_employee_id("E").is_err()); // Too short
    assert!(validate_employee_id("A1B2C3D4E5F6G7H8I9J0X").is_err()); // Too long
    assert!(validate_employee_id("EMP-001").is_err()); // Special char
    assert!(validate_employee_id("EMP 01").is_err()); // Whitespace
}

#[test]
fn test_email_validation() {
    assert!(validate_email("staff@example.com").is_ok());
    assert!(validate_email("no-at-sign").is_err());
    assert!(validate_email("").is_err());
}
