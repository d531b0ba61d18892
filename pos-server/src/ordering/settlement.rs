//! 买单请求与结账
//!
//! 买单请求只是"请送账单来"的轻量标记。列表接口顺带做懒回收：
//! 该桌未付订单合计为零、或请求超过 TTL，标记即被删除，没有后台任务。
//! 确认结账是按桌的 all-or-nothing：所有未付订单、一条聚合 Payment、
//! 会话结束、桌台转 cleaning，全部在一个数据库事务里完成。

use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::models::{Payment, PaymentRequest, PaymentRequestCreate, PaymentSubject};
use crate::db::repository::{
    OrderRepository, PaymentRequestRepository, SessionRepository, TableRepository,
};
use crate::pricing::{round_money, to_decimal, to_f64};
use crate::utils::time::MINUTE_MILLIS;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::util::now_millis;

/// Outcome of confirming a payment request
#[derive(Debug, Clone)]
pub struct SettlementResult {
    pub payment: Payment,
    pub orders_settled: usize,
}

/// Sum of unpaid order totals for one table, rounded to money precision
async fn unpaid_total(state: &ServerState, table_number: i64) -> AppResult<(f64, usize)> {
    let order_repo = OrderRepository::new(state.db.clone());
    let unpaid = order_repo.find_unpaid_by_table(table_number).await?;
    let sum: Decimal = unpaid.iter().map(|o| to_decimal(o.charges.total)).sum();
    Ok((to_f64(round_money(sum)), unpaid.len()))
}

/// Create a "bring the bill" request for a table.
///
/// Nothing unpaid → the request would be garbage-collected on the next
/// list anyway, so it is rejected up front.
pub async fn create_request(
    state: &ServerState,
    payload: PaymentRequestCreate,
) -> AppResult<PaymentRequest> {
    let (amount, count) = unpaid_total(state, payload.table_number).await?;
    if count == 0 || amount <= 0.0 {
        return Err(
            AppError::new(ErrorCode::PaymentRequestStale)
                .with_detail("table_number", payload.table_number),
        );
    }

    let repo = PaymentRequestRepository::new(state.db.clone());
    Ok(repo.create(payload, amount).await?)
}

/// List open requests, refreshing amounts and lazily expiring stale ones.
///
/// A request is stale when the table has nothing unpaid or the request is
/// past the configured TTL.
pub async fn refresh_requests(state: &ServerState) -> AppResult<Vec<PaymentRequest>> {
    let repo = PaymentRequestRepository::new(state.db.clone());
    let ttl_millis = state.config.payment_request_ttl_minutes * MINUTE_MILLIS;
    let now = now_millis();

    let mut kept = Vec::new();
    for mut request in repo.find_all().await? {
        let (amount, count) = unpaid_total(state, request.table_number).await?;
        let expired = now - request.created_at > ttl_millis;

        if count == 0 || amount <= 0.0 || expired {
            if let Some(id) = &request.id {
                if let Err(e) = repo.delete(&id.to_string()).await {
                    tracing::warn!("Failed to expire payment request: {}", e);
                }
            }
            continue;
        }

        if (amount - request.amount).abs() > f64::EPSILON {
            if let Some(id) = &request.id {
                repo.set_amount(id, amount).await?;
            }
            request.amount = amount;
        }
        kept.push(request);
    }
    Ok(kept)
}

/// Confirm a payment request: settle every unpaid order of the table as
/// cash, write exactly one aggregate Payment, end the session and release
/// the table to cleaning — all in one transaction.
pub async fn confirm_request(state: &ServerState, id: &str) -> AppResult<SettlementResult> {
    let repo = PaymentRequestRepository::new(state.db.clone());
    let request = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PaymentRequestNotFound))?;
    let request_thing = request
        .id
        .clone()
        .ok_or_else(|| AppError::database("Payment request record has no id"))?;

    let order_repo = OrderRepository::new(state.db.clone());
    let unpaid = order_repo.find_unpaid_by_table(request.table_number).await?;
    if unpaid.is_empty() {
        // Nothing left to pay; drop the stale marker
        let _ = repo.delete(&request_thing.to_string()).await;
        return Err(
            AppError::new(ErrorCode::PaymentRequestStale)
                .with_detail("table_number", request.table_number),
        );
    }

    let amount: Decimal = unpaid.iter().map(|o| to_decimal(o.charges.total)).sum();
    let amount = to_f64(round_money(amount));

    let subject = match (&request.session_id, unpaid[0].id.as_ref()) {
        (Some(session_id), _) => PaymentSubject::Session(session_id.clone()),
        (None, Some(order_id)) => PaymentSubject::Order(order_id.to_string()),
        (None, None) => PaymentSubject::Session(String::new()),
    };

    let payment = Payment {
        id: None,
        amount,
        method: "cash".to_string(),
        subject,
        table_number: Some(request.table_number),
        created_at: now_millis(),
    };

    // CREATE CONTENT 里不能带 null id 字段
    let mut payment_content = serde_json::to_value(&payment)
        .map_err(|e| AppError::internal(format!("Payment serialization failed: {e}")))?;
    if let Some(obj) = payment_content.as_object_mut() {
        obj.remove("id");
    }

    state
        .db
        .query(
            "BEGIN TRANSACTION; \
             UPDATE order SET payment_status = 'paid', status = 'served', \
                 payment_method = 'cash', updated_at = $now \
                 WHERE table_number = $table_number AND payment_status = 'unpaid' \
                 AND status != 'cancelled'; \
             CREATE payment CONTENT $payment; \
             UPDATE session SET payment.status = 'paid', active = false, ended_at = $now \
                 WHERE table_number = $table_number AND active = true; \
             UPDATE dining_table SET status = 'cleaning', session_id = NONE, order_ids = [] \
                 WHERE number = $table_number; \
             DELETE $request_thing; \
             COMMIT TRANSACTION;",
        )
        .bind(("now", now_millis()))
        .bind(("table_number", request.table_number))
        .bind(("payment", payment_content))
        .bind(("request_thing", request_thing))
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .check()
        .map_err(|e| AppError::database(format!("Settlement transaction failed: {e}")))?;

    state.broadcast_tables().await;

    Ok(SettlementResult {
        payment,
        orders_settled: unpaid.len(),
    })
}

/// End a session explicitly (DELETE /api/sessions/:id): deactivate it and
/// release the table to cleaning. Not transactional with settlement — this
/// is the walk-away path, no money moves.
pub async fn end_session(state: &ServerState, session_id: &str) -> AppResult<()> {
    let session_repo = SessionRepository::new(state.db.clone());
    let session = session_repo.end(session_id).await.map_err(|e| match e {
        crate::db::repository::RepoError::NotFound(_) => {
            AppError::new(ErrorCode::SessionNotFound).with_detail("session_id", session_id)
        }
        other => other.into(),
    })?;

    let table_repo = TableRepository::new(state.db.clone());
    if let Err(e) = table_repo.release_to_cleaning(session.table_number).await {
        tracing::warn!("Failed to release table after session end: {}", e);
    }

    state.broadcast_tables().await;
    Ok(())
}
