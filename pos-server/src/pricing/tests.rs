use super::*;

fn menu_item(item_id: i64, price: f64, available: bool) -> MenuItem {
    MenuItem {
        id: None,
        item_id,
        name: format!("Item {}", item_id),
        price,
        category: "mains".to_string(),
        is_available: available,
        is_popular: false,
        is_veg: false,
        spice_level: 0,
        created_at: 0,
    }
}

fn line(item_id: i64, quantity: i32) -> OrderLine {
    OrderLine { item_id, quantity }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_price_order_basic() {
    // The canonical scenario: {id:1, price:100} × 2 + tax 18 = 218
    let menu = vec![menu_item(1, 100.0, true)];
    let charges = price_order(
        &[line(1, 2)],
        &menu,
        &ChargeInput {
            tax: 18.0,
            discount: 0.0,
            extras: vec![],
        },
    )
    .unwrap();

    assert_eq!(charges.subtotal, 200.0);
    assert_eq!(charges.total, 218.0);
}

#[test]
fn test_declared_total_mismatch_surfaces_calculated() {
    let menu = vec![menu_item(1, 100.0, true)];
    let charges = price_order(
        &[line(1, 2)],
        &menu,
        &ChargeInput {
            tax: 18.0,
            discount: 0.0,
            extras: vec![],
        },
    )
    .unwrap();

    // Declaring 200 for a 218 cart is rejected with the calculated value
    let err = check_declared_total(&charges, 200.0).unwrap_err();
    assert_eq!(
        err,
        PricingError::TotalMismatch {
            calculated: 218.0,
            declared: 200.0
        }
    );

    // The AppError carries the calculated total in its details
    let app_err: shared::error::AppError = err.into();
    assert_eq!(app_err.code, shared::error::ErrorCode::OrderTotalMismatch);
    assert_eq!(app_err.message, "total price is changed");
    let details = app_err.details.unwrap();
    assert_eq!(details.get("calculated_total").unwrap(), 218.0);
}

#[test]
fn test_declared_total_within_tolerance_accepted() {
    let menu = vec![menu_item(1, 33.335, true)];
    let charges = price_order(&[line(1, 1)], &menu, &ChargeInput::default()).unwrap();

    // One cent off either way still passes
    assert!(check_declared_total(&charges, charges.total + 0.01).is_ok());
    assert!(check_declared_total(&charges, charges.total - 0.01).is_ok());
    assert!(check_declared_total(&charges, charges.total + 0.02).is_err());
}

#[test]
fn test_discount_and_extras() {
    let menu = vec![menu_item(1, 50.0, true), menu_item(2, 25.5, true)];
    let charges = price_order(
        &[line(1, 2), line(2, 1)],
        &menu,
        &ChargeInput {
            tax: 10.0,
            discount: 5.5,
            extras: vec![
                ExtraCharge {
                    name: "delivery_fee",
                    amount: 30.0,
                },
                ExtraCharge {
                    name: "tip",
                    amount: 12.0,
                },
            ],
        },
    )
    .unwrap();

    assert_eq!(charges.subtotal, 125.5);
    assert_eq!(charges.extra_charges, 42.0);
    // 125.5 + 10 - 5.5 + 42
    assert_eq!(charges.total, 172.0);
}

#[test]
fn test_unavailable_item_rejected() {
    let menu = vec![menu_item(1, 100.0, false)];
    let err = price_order(&[line(1, 1)], &menu, &ChargeInput::default()).unwrap_err();
    assert!(matches!(
        err,
        PricingError::UnavailableItem { item_id: 1, .. }
    ));

    let app_err: shared::error::AppError = err.into();
    assert_eq!(app_err.code, shared::error::ErrorCode::MenuItemUnavailable);
}

#[test]
fn test_unknown_item_rejected() {
    let menu = vec![menu_item(1, 100.0, true)];
    let err = price_order(&[line(2, 1)], &menu, &ChargeInput::default()).unwrap_err();
    assert_eq!(err, PricingError::UnknownItem(2));
}

#[test]
fn test_empty_and_invalid_inputs() {
    let menu = vec![menu_item(1, 100.0, true)];

    assert_eq!(
        price_order(&[], &menu, &ChargeInput::default()).unwrap_err(),
        PricingError::EmptyOrder
    );
    assert!(matches!(
        price_order(&[line(1, 0)], &menu, &ChargeInput::default()).unwrap_err(),
        PricingError::InvalidQuantity { .. }
    ));
    assert!(matches!(
        price_order(&[line(1, -3)], &menu, &ChargeInput::default()).unwrap_err(),
        PricingError::InvalidQuantity { .. }
    ));
    assert!(matches!(
        price_order(
            &[line(1, 1)],
            &menu,
            &ChargeInput {
                tax: f64::NAN,
                ..Default::default()
            }
        )
        .unwrap_err(),
        PricingError::InvalidAmount { field: "tax", .. }
    ));
    assert!(matches!(
        price_order(
            &[line(1, 1)],
            &menu,
            &ChargeInput {
                discount: -1.0,
                ..Default::default()
            }
        )
        .unwrap_err(),
        PricingError::InvalidAmount {
            field: "discount",
            ..
        }
    ));
}

#[test]
fn test_rounding_half_up() {
    // 3 × 9.995 = 29.985 → 29.99 (half-up, not banker's)
    let menu = vec![menu_item(1, 9.995, true)];
    let charges = price_order(&[line(1, 3)], &menu, &ChargeInput::default()).unwrap();
    assert_eq!(charges.subtotal, 29.99);
    assert_eq!(charges.total, 29.99);
}

#[test]
fn test_accumulation_precision() {
    // 100 lines of 0.01 sum to exactly 1.00
    let menu: Vec<MenuItem> = (1..=100).map(|i| menu_item(i, 0.01, true)).collect();
    let lines: Vec<OrderLine> = (1..=100).map(|i| line(i, 1)).collect();
    let charges = price_order(&lines, &menu, &ChargeInput::default()).unwrap();
    assert_eq!(charges.subtotal, 1.0);
}
