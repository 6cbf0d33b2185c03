//! Input validation tests
//!
//! Boundary checks for shopper-supplied values in storefront-api.

use rust_decimal::Decimal;
use serde_json::{json, Value};

/// Coerce a JSON quantity field to an integer (mirrors the handler logic)
fn parse_quantity(body: &Value) -> Option<i64> {
    match body.get("quantity") {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepted order status values (must match the dashboard choices)
const STATUS_VALUES: [&str; 5] = ["PENDING", "PROCESSING", "SHIPPED", "DELIVERED", "CANCELLED"];

fn is_valid_status(s: &str) -> bool {
    STATUS_VALUES.contains(&s)
}

// ============================================================================
// Quantity Coercion
// ============================================================================

#[test]
fn test_quantity_integer() {
    assert_eq!(parse_quantity(&json!({"quantity": 3})), Some(3));
}

#[test]
fn test_quantity_zero_and_negative_pass_through() {
    // Zero (delete) and negative (rejected later) must survive coercion so
    // the engine can apply its validation order.
    assert_eq!(parse_quantity(&json!({"quantity": 0})), Some(0));
    assert_eq!(parse_quantity(&json!({"quantity": -1})), Some(-1));
}

#[test]
fn test_quantity_numeric_string() {
    assert_eq!(parse_quantity(&json!({"quantity": "12"})), Some(12));
    assert_eq!(parse_quantity(&json!({"quantity": "  5"})), Some(5));
}

#[test]
fn test_quantity_fractional_rejected() {
    assert_eq!(parse_quantity(&json!({"quantity": 1.5})), None);
    assert_eq!(parse_quantity(&json!({"quantity": "1.5"})), None);
}

#[test]
fn test_quantity_garbage_rejected() {
    assert_eq!(parse_quantity(&json!({"quantity": "three"})), None);
    assert_eq!(parse_quantity(&json!({"quantity": true})), None);
    assert_eq!(parse_quantity(&json!({"quantity": null})), None);
    assert_eq!(parse_quantity(&json!({"quantity": [3]})), None);
    assert_eq!(parse_quantity(&json!({})), None);
}

#[test]
fn test_quantity_huge_string_rejected() {
    // Overflows i64 and must not wrap.
    assert_eq!(
        parse_quantity(&json!({"quantity": "99999999999999999999999999"})),
        None
    );
}

// ============================================================================
// Order Status Values
// ============================================================================

#[test]
fn test_all_dashboard_statuses_accepted() {
    for status in STATUS_VALUES {
        assert!(is_valid_status(status), "should accept {status}");
    }
}

#[test]
fn test_unknown_status_rejected() {
    assert!(!is_valid_status("REFUNDED"));
    assert!(!is_valid_status("pending"));
    assert!(!is_valid_status(""));
    assert!(!is_valid_status("PENDING "));
}

// ============================================================================
// Identifier Parsing
// ============================================================================

#[test]
fn test_valid_uuid_ids() {
    assert!(uuid::Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").is_ok());
}

#[test]
fn test_invalid_uuid_ids() {
    let invalid = [
        "",
        "not-a-uuid",
        "550e8400-e29b-41d4-a716", // truncated
        "' OR 1=1 --",             // SQL injection attempt
        "../../../etc/passwd",     // path traversal attempt
    ];
    for id in invalid {
        assert!(uuid::Uuid::parse_str(id).is_err(), "should reject: {id}");
    }
}

// ============================================================================
// Price Filter Bounds
// ============================================================================

#[test]
fn test_price_bounds_parse_as_decimal() {
    assert_eq!(
        "19.99".parse::<Decimal>().ok(),
        Some(Decimal::new(1999, 2))
    );
    // Bad bounds are ignored by the catalog filter, not rejected.
    assert!("cheap".parse::<Decimal>().is_err());
    assert!("".parse::<Decimal>().is_err());
}

#[test]
fn test_decimal_totals_do_not_drift() {
    let unit: Decimal = "19.99".parse().unwrap();
    let total = unit * Decimal::from(3);
    assert_eq!(total, "59.97".parse::<Decimal>().unwrap());
    assert_eq!(total.to_string(), "59.97");
}

// ============================================================================
// Session Cookie Shape
// ============================================================================

#[test]
fn test_session_cookie_splits_payload_and_signature() {
    // payload.signature format: the last dot separates the signature.
    let cookie = "eyJmb28iOiJiYXIifQ.c2lnbmF0dXJl";
    let (payload, signature) = cookie.rsplit_once('.').unwrap();
    assert!(!payload.is_empty());
    assert!(!signature.is_empty());
    assert!(!signature.contains('.'));
}
