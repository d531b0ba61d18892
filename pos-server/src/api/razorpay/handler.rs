//! Razorpay Checkout Handlers
//!
//! create-order 用统一定价重算购物车金额 — 和订单/外送创建完全同一条
//! 代码路径，不存在第二套舍入规则。verify-payment 按
//! `HMAC_SHA256(secret, "{order_id}|{payment_id}")` 校验回调签名。

use axum::{Json, extract::State};
use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{
    GatewayOrder, OrderLine, OrderUpdate, PaymentCreate, PaymentStatus, PaymentSubject,
};
use crate::db::repository::{
    GatewayOrderRepository, MenuItemRepository, OrderRepository, PaymentRepository,
};
use crate::pricing::{self, ChargeInput, round_money, to_decimal};
use crate::utils::{AppError, AppResult, ErrorCode};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use shared::util::{now_millis, snowflake_id};

/// Create-order request: the cart with client-declared charges
#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
    pub items: Vec<OrderLine>,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
    pub total: f64,
}

/// Create-order response consumed by the checkout widget
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub gateway_order_id: String,
    /// Amount in minor currency units
    pub amount_minor: i64,
    pub currency: &'static str,
    pub key_id: String,
}

/// Verify-payment request: gateway callback fields
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentPayload {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    /// Local order to mark paid on success (optional)
    pub order_id: Option<String>,
}

/// Verify-payment response
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
}

/// POST /api/razorpay/create-order - 网关下单
pub async fn create_order(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderPayload>,
) -> AppResult<Json<CreateOrderResponse>> {
    let menu_repo = MenuItemRepository::new(state.db.clone());
    let item_ids: Vec<i64> = payload.items.iter().map(|l| l.item_id).collect();
    let menu = menu_repo.find_by_item_ids(&item_ids).await?;

    let charges = pricing::price_order(
        &payload.items,
        &menu,
        &ChargeInput {
            tax: payload.tax,
            discount: payload.discount,
            extras: vec![],
        },
    )?;
    pricing::check_declared_total(&charges, payload.total)?;

    let amount_minor = (round_money(to_decimal(charges.total)) * Decimal::from(100))
        .to_i64()
        .ok_or_else(|| AppError::validation("total out of range"))?;

    let gateway_order = GatewayOrder {
        id: None,
        gateway_order_id: format!("order_{}", snowflake_id()),
        amount_minor,
        currency: "INR".to_string(),
        receipt: format!("rcpt_{}", snowflake_id()),
        status: "created".to_string(),
        created_at: now_millis(),
    };

    let repo = GatewayOrderRepository::new(state.db.clone());
    let created = repo.create(gateway_order).await?;

    Ok(Json(CreateOrderResponse {
        gateway_order_id: created.gateway_order_id,
        amount_minor: created.amount_minor,
        currency: "INR",
        key_id: state.config.gateway_key_id.clone(),
    }))
}

/// POST /api/razorpay/verify-payment - 校验支付回调签名
pub async fn verify_payment(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyPaymentPayload>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let repo = GatewayOrderRepository::new(state.db.clone());
    repo.find_by_gateway_order_id(&payload.razorpay_order_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::GatewayOrderNotFound)
                .with_detail("gateway_order_id", payload.razorpay_order_id.clone())
        })?;

    if !verify_signature(
        &state.config.gateway_key_secret,
        &payload.razorpay_order_id,
        &payload.razorpay_payment_id,
        &payload.razorpay_signature,
    ) {
        return Err(AppError::new(ErrorCode::GatewaySignatureInvalid));
    }

    let gateway_order = repo.mark_paid(&payload.razorpay_order_id).await?;

    // 关联的本地订单：标记已付并落一条支付记录
    if let Some(order_id) = &payload.order_id {
        let order_repo = OrderRepository::new(state.db.clone());
        let order = order_repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", order_id.clone())
            })?;

        order_repo
            .update(
                order_id,
                OrderUpdate {
                    status: None,
                    payment_status: Some(PaymentStatus::Paid),
                    payment_method: Some("razorpay".to_string()),
                },
            )
            .await?;

        let payment_repo = PaymentRepository::new(state.db.clone());
        payment_repo
            .create(PaymentCreate {
                amount: order.charges.total,
                method: "razorpay".to_string(),
                subject: PaymentSubject::Order(
                    order
                        .id
                        .as_ref()
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| order_id.clone()),
                ),
                table_number: order.table_number,
            })
            .await?;
    }

    tracing::info!(
        gateway_order = %gateway_order.gateway_order_id,
        "Gateway payment verified"
    );

    Ok(Json(VerifyPaymentResponse { verified: true }))
}

/// Razorpay-style checkout signature check:
/// `HMAC_SHA256(key_secret, "{order_id}|{payment_id}")`, hex-encoded.
/// `ring::hmac::verify` compares in constant time.
fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    let message = format!("{}|{}", order_id, payment_id);
    hmac::verify(&key, message.as_bytes(), &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
        let tag = hmac::sign(&key, format!("{}|{}", order_id, payment_id).as_bytes());
        hex::encode(tag.as_ref())
    }

    #[test]
    fn test_signature_roundtrip() {
        let sig = sign("secret-key", "order_123", "pay_456");
        assert!(verify_signature("secret-key", "order_123", "pay_456", &sig));
    }

    #[test]
    fn test_signature_rejects_tampering() {
        let sig = sign("secret-key", "order_123", "pay_456");
        // Wrong payment id
        assert!(!verify_signature("secret-key", "order_123", "pay_999", &sig));
        // Wrong secret
        assert!(!verify_signature("other-key", "order_123", "pay_456", &sig));
        // Malformed hex
        assert!(!verify_signature("secret-key", "order_123", "pay_456", "zz"));
    }
}
