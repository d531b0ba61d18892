//! 下单与结账流程集成测试 (内存数据库)

mod common;

use common::*;

use pos_server::ErrorCode;
use pos_server::db::models::{
    OrderStatus, PaymentRequestCreate, PaymentStatus, TableStatus,
};
use pos_server::db::repository::{
    OrderFilter, OrderRepository, PaymentRepository, PaymentRequestRepository, SessionRepository,
    TableRepository,
};
use pos_server::ordering::{confirm_request, create_request, place_order, refresh_requests};

#[tokio::test]
async fn total_mismatch_is_rejected_with_calculated_value() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 100.0).await;
    seed_table(&state, 5).await;

    // {items:[{1, ×2}], tax:18, total:200} → rejected, calculated 218 surfaced
    let err = place_order(&state, dine_in_payload(5, vec![(1, 2)], 18.0, 200.0, None))
        .await
        .expect_err("mismatched total must be rejected");
    assert_eq!(err.code, ErrorCode::OrderTotalMismatch);
    assert_eq!(err.message, "total price is changed");
    let details = err.details.expect("details");
    assert_eq!(details.get("calculated_total").unwrap(), 218.0);

    // Correct total is accepted and stored as computed
    let placed = place_order(&state, dine_in_payload(5, vec![(1, 2)], 18.0, 218.0, None))
        .await
        .expect("valid order");
    assert_eq!(placed.order.charges.total, 218.0);
    assert_eq!(placed.order.charges.subtotal, 200.0);
}

#[tokio::test]
async fn unavailable_item_is_rejected() {
    let state = test_state().await;
    let item = seed_menu_item(&state, 1, 50.0).await;
    seed_table(&state, 1).await;

    // Flip the item unavailable
    let repo = pos_server::db::repository::MenuItemRepository::new(state.db.clone());
    repo.update(
        item.item_id,
        pos_server::db::models::MenuItemUpdate {
            name: None,
            price: None,
            category: None,
            is_available: Some(false),
            is_popular: None,
            is_veg: None,
            spice_level: None,
        },
    )
    .await
    .unwrap();

    let err = place_order(&state, dine_in_payload(1, vec![(1, 1)], 0.0, 50.0, None))
        .await
        .expect_err("unavailable item must be rejected");
    assert_eq!(err.code, ErrorCode::MenuItemUnavailable);
}

#[tokio::test]
async fn sequential_dine_in_orders_reuse_the_session() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 100.0).await;
    seed_table(&state, 7).await;

    let first = place_order(&state, dine_in_payload(7, vec![(1, 1)], 0.0, 100.0, None))
        .await
        .expect("first order");
    let second = place_order(&state, dine_in_payload(7, vec![(1, 2)], 0.0, 200.0, None))
        .await
        .expect("second order");

    let first_session = first.session.expect("dine-in creates a session");
    let second_session = second.session.expect("second order has a session");
    assert_eq!(first_session.session_id, second_session.session_id);
    assert!(second_session.session_id.starts_with("S_"));

    // Both orders accumulated on the one session, bill total summed
    assert_eq!(second_session.orders.len(), 2);
    assert_eq!(second_session.payment.total, 300.0);

    // Table is occupied and points at the session
    let table_repo = TableRepository::new(state.db.clone());
    let table = table_repo.find_by_number(7).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Occupied);
    assert_eq!(table.session_id.as_deref(), Some(first_session.session_id.as_str()));
    assert_eq!(table.order_ids.len(), 2);
    assert_eq!(table.session_history, vec![first_session.session_id.clone()]);
}

#[tokio::test]
async fn conflicting_phone_is_rejected_as_occupied() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 10.0).await;
    seed_table(&state, 3).await;

    place_order(
        &state,
        dine_in_payload(3, vec![(1, 1)], 0.0, 10.0, Some("111")),
    )
    .await
    .expect("first customer");

    let err = place_order(
        &state,
        dine_in_payload(3, vec![(1, 1)], 0.0, 10.0, Some("222")),
    )
    .await
    .expect_err("second customer must be rejected");
    assert_eq!(err.code, ErrorCode::TableOccupied);

    // Same phone keeps working
    place_order(
        &state,
        dine_in_payload(3, vec![(1, 1)], 0.0, 10.0, Some("111")),
    )
    .await
    .expect("same customer reorders");
}

#[tokio::test]
async fn takeaway_orders_draw_sequential_numbers() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 20.0).await;

    let a = place_order(&state, takeaway_payload(vec![(1, 1)], 0.0, 20.0))
        .await
        .expect("takeaway a");
    let b = place_order(&state, takeaway_payload(vec![(1, 1)], 0.0, 20.0))
        .await
        .expect("takeaway b");

    assert_eq!(a.order.sequence, Some(1));
    assert_eq!(b.order.sequence, Some(2));
    assert!(a.session.is_none());

    let repo = OrderRepository::new(state.db.clone());
    let takeaway = repo.find_takeaway().await.unwrap();
    assert_eq!(takeaway.len(), 2);
}

#[tokio::test]
async fn settlement_pays_all_unpaid_orders_once() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 100.0).await;
    seed_table(&state, 9).await;

    place_order(&state, dine_in_payload(9, vec![(1, 1)], 0.0, 100.0, None))
        .await
        .expect("order 1");
    place_order(&state, dine_in_payload(9, vec![(1, 2)], 0.0, 200.0, None))
        .await
        .expect("order 2");

    // Table-side "bring the bill"
    let request = create_request(
        &state,
        PaymentRequestCreate {
            table_number: 9,
            session_id: None,
        },
    )
    .await
    .expect("payment request");
    assert_eq!(request.amount, 300.0);

    let request_id = request.id.as_ref().unwrap().to_string();
    let result = confirm_request(&state, &request_id).await.expect("confirm");
    assert_eq!(result.orders_settled, 2);
    assert_eq!(result.payment.amount, 300.0);
    assert_eq!(result.payment.method, "cash");

    // Every order is now paid + served + cash
    let order_repo = OrderRepository::new(state.db.clone());
    let orders = order_repo
        .find_all(OrderFilter {
            table_number: Some(9),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(orders.len(), 2);
    for order in &orders {
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.status, OrderStatus::Served);
        assert_eq!(order.payment_method.as_deref(), Some("cash"));
    }

    // Exactly one aggregate payment record
    let payment_repo = PaymentRepository::new(state.db.clone());
    let payments = payment_repo.find_all().await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 300.0);

    // Request is gone, session ended, table released to cleaning
    let request_repo = PaymentRequestRepository::new(state.db.clone());
    assert!(request_repo.find_all().await.unwrap().is_empty());

    let session_repo = SessionRepository::new(state.db.clone());
    assert!(session_repo.find_active_by_table(9).await.unwrap().is_none());

    let table_repo = TableRepository::new(state.db.clone());
    let table = table_repo.find_by_number(9).await.unwrap().unwrap();
    assert_eq!(table.status, TableStatus::Cleaning);
    assert!(table.order_ids.is_empty());

    // Confirming again is stale
    let err = confirm_request(&state, &request_id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PaymentRequestNotFound);
}

#[tokio::test]
async fn stale_requests_are_garbage_collected_on_list() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 50.0).await;
    seed_table(&state, 4).await;

    place_order(&state, dine_in_payload(4, vec![(1, 1)], 0.0, 50.0, None))
        .await
        .expect("order");

    create_request(
        &state,
        PaymentRequestCreate {
            table_number: 4,
            session_id: None,
        },
    )
    .await
    .expect("request");

    // Settle the table's orders out of band (admin PATCH path)
    let order_repo = OrderRepository::new(state.db.clone());
    let orders = order_repo.find_unpaid_by_table(4).await.unwrap();
    for order in orders {
        order_repo
            .update(
                &order.id.unwrap().to_string(),
                pos_server::db::models::OrderUpdate {
                    status: None,
                    payment_status: Some(PaymentStatus::Paid),
                    payment_method: Some("card".to_string()),
                },
            )
            .await
            .unwrap();
    }

    // The zero-balance request disappears on the next poll
    let kept = refresh_requests(&state).await.expect("refresh");
    assert!(kept.is_empty());

    let request_repo = PaymentRequestRepository::new(state.db.clone());
    assert!(request_repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn request_for_settled_table_is_rejected() {
    let state = test_state().await;
    seed_table(&state, 2).await;

    let err = create_request(
        &state,
        PaymentRequestCreate {
            table_number: 2,
            session_id: None,
        },
    )
    .await
    .expect_err("nothing unpaid");
    assert_eq!(err.code, ErrorCode::PaymentRequestStale);
}
