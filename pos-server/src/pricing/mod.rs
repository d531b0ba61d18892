//! 统一定价
//!
//! 订单创建、外送创建和网关下单共用的唯一定价入口。服务端以菜单价格为
//! 准重算总额，客户端申报的 total 只用于比对，防止篡改。
//!
//! 全部运算使用 `Decimal`，最后四舍五入 (half-up) 到两位小数再转回
//! `f64` 存储。

use std::collections::HashMap;

use rust_decimal::prelude::*;
use thiserror::Error;

use crate::db::models::{Charges, MenuItem, OrderLine};
use shared::error::{AppError, ErrorCode};

#[cfg(test)]
mod tests;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for comparing the client-declared total (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed amount for any single charge or price
const MAX_AMOUNT: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;

/// Convert an f64 into Decimal for exact arithmetic
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert a Decimal back into f64 for storage/serialization
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round to money precision, half-up
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Named extra charge (delivery fee, tip, ...)
#[derive(Debug, Clone)]
pub struct ExtraCharge {
    pub name: &'static str,
    pub amount: f64,
}

/// Client-declared charges accompanying a cart
#[derive(Debug, Clone, Default)]
pub struct ChargeInput {
    pub tax: f64,
    pub discount: f64,
    pub extras: Vec<ExtraCharge>,
}

/// Pricing failure modes
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("order has no items")]
    EmptyOrder,

    #[error("unknown menu item {0}")]
    UnknownItem(i64),

    #[error("menu item {item_id} ({name}) is unavailable")]
    UnavailableItem { item_id: i64, name: String },

    #[error("invalid quantity {quantity} for item {item_id}")]
    InvalidQuantity { item_id: i64, quantity: i32 },

    #[error("{field} must be a finite amount within range, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("total price is changed")]
    TotalMismatch { calculated: f64, declared: f64 },
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            PricingError::UnknownItem(item_id) => {
                AppError::new(ErrorCode::MenuItemNotFound).with_detail("item_id", item_id)
            }
            PricingError::UnavailableItem { item_id, ref name } => {
                AppError::new(ErrorCode::MenuItemUnavailable)
                    .with_detail("item_id", item_id)
                    .with_detail("name", name.clone())
            }
            PricingError::InvalidQuantity { item_id, quantity } => {
                AppError::validation(format!(
                    "invalid quantity {} for item {}",
                    quantity, item_id
                ))
            }
            PricingError::InvalidAmount { field, value } => AppError::validation(format!(
                "{} must be a finite amount within range, got {}",
                field, value
            )),
            PricingError::TotalMismatch {
                calculated,
                declared,
            } => AppError::new(ErrorCode::OrderTotalMismatch)
                .with_detail("calculated_total", calculated)
                .with_detail("declared_total", declared),
        }
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), PricingError> {
    if !value.is_finite() || !(0.0..=MAX_AMOUNT).contains(&value) {
        return Err(PricingError::InvalidAmount { field, value });
    }
    Ok(())
}

/// Price a cart against the menu and produce the stored charge breakdown.
///
/// Every referenced item must exist and be available; quantities must be
/// positive. `total = subtotal + tax − discount + Σ extras`.
pub fn price_order(
    lines: &[OrderLine],
    menu: &[MenuItem],
    charges: &ChargeInput,
) -> Result<Charges, PricingError> {
    if lines.is_empty() {
        return Err(PricingError::EmptyOrder);
    }
    check_amount("tax", charges.tax)?;
    check_amount("discount", charges.discount)?;
    for extra in &charges.extras {
        check_amount(extra.name, extra.amount)?;
    }

    let by_id: HashMap<i64, &MenuItem> = menu.iter().map(|m| (m.item_id, m)).collect();

    let mut subtotal = Decimal::ZERO;
    for line in lines {
        if line.quantity <= 0 || line.quantity > MAX_QUANTITY {
            return Err(PricingError::InvalidQuantity {
                item_id: line.item_id,
                quantity: line.quantity,
            });
        }
        let item = by_id
            .get(&line.item_id)
            .ok_or(PricingError::UnknownItem(line.item_id))?;
        if !item.is_available {
            return Err(PricingError::UnavailableItem {
                item_id: item.item_id,
                name: item.name.clone(),
            });
        }
        subtotal += to_decimal(item.price) * Decimal::from(line.quantity);
    }

    let subtotal = round_money(subtotal);
    let extra_charges = round_money(
        charges
            .extras
            .iter()
            .map(|e| to_decimal(e.amount))
            .sum::<Decimal>(),
    );
    let total = round_money(
        subtotal + to_decimal(charges.tax) - to_decimal(charges.discount) + extra_charges,
    );

    Ok(Charges {
        subtotal: to_f64(subtotal),
        tax: charges.tax,
        discount: charges.discount,
        extra_charges: to_f64(extra_charges),
        total: to_f64(total),
    })
}

/// Compare the computed total with the client-declared one.
///
/// Mismatch beyond the money tolerance rejects the order; the calculated
/// value is surfaced in the error details.
pub fn check_declared_total(computed: &Charges, declared: f64) -> Result<(), PricingError> {
    if !declared.is_finite() {
        return Err(PricingError::InvalidAmount {
            field: "total",
            value: declared,
        });
    }
    let diff = (to_decimal(computed.total) - to_decimal(declared)).abs();
    if diff > MONEY_TOLERANCE {
        return Err(PricingError::TotalMismatch {
            calculated: computed.total,
            declared,
        });
    }
    Ok(())
}
