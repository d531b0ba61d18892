//! 预订冲突与桌台可用性集成测试 (内存数据库)

mod common;

use common::*;

use chrono::{Duration, Utc};
use pos_server::ErrorCode;
use pos_server::db::models::{ReservationCreate, ReservationStatus, ReservationUpdate};
use pos_server::db::repository::ReservationRepository;
use pos_server::ordering::{
    AvailabilityQuery, available_tables, create_reservation, place_order,
};

/// Tomorrow at the given hour, as the (date, time) string pair the API takes
fn tomorrow_at(hour: u32) -> (String, String) {
    let date = (Utc::now() + Duration::days(1)).date_naive();
    (date.format("%Y-%m-%d").to_string(), format!("{:02}:00", hour))
}

fn reservation_payload(
    tables: Vec<i64>,
    date: String,
    time: String,
    duration: Option<i64>,
) -> ReservationCreate {
    ReservationCreate {
        customer_name: "Asha".to_string(),
        phone: Some("9000000000".to_string()),
        date,
        time,
        guests: 2,
        table_numbers: Some(tables),
        table_number: None,
        duration_minutes: duration,
    }
}

#[tokio::test]
async fn overlapping_reservation_on_shared_table_is_rejected() {
    let state = test_state().await;
    seed_table(&state, 1).await;
    seed_table(&state, 2).await;
    seed_table(&state, 3).await;

    let (date, time) = tomorrow_at(19);
    create_reservation(
        &state,
        reservation_payload(vec![1, 2], date.clone(), time, Some(60)),
    )
    .await
    .expect("first reservation");

    // Tables {2,3} at 19:30 overlaps the 19:00-20:00 hold on table 2
    let err = create_reservation(
        &state,
        reservation_payload(vec![2, 3], date.clone(), "19:30".to_string(), Some(60)),
    )
    .await
    .expect_err("overlap must be rejected");
    assert_eq!(err.code, ErrorCode::ReservationConflict);

    // Disjoint tables at the same hour are fine
    create_reservation(
        &state,
        reservation_payload(vec![3], date.clone(), "19:30".to_string(), Some(60)),
    )
    .await
    .expect("disjoint tables");

    // Back-to-back on the same table (20:00 after a 19:00+60min) is fine
    create_reservation(
        &state,
        reservation_payload(vec![1], date, "20:00".to_string(), Some(60)),
    )
    .await
    .expect("adjacent window");
}

#[tokio::test]
async fn reservation_against_live_seating_is_rejected() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 10.0).await;
    seed_table(&state, 5).await;

    // Someone is eating at table 5 right now
    place_order(&state, dine_in_payload(5, vec![(1, 1)], 0.0, 10.0, None))
        .await
        .expect("live order");

    // Booking table 5 for "right now" conflicts with the live session
    let now = Utc::now() + Duration::minutes(10);
    let payload = reservation_payload(
        vec![5],
        now.format("%Y-%m-%d").to_string(),
        now.format("%H:%M").to_string(),
        Some(60),
    );
    let err = create_reservation(&state, payload)
        .await
        .expect_err("live seating conflicts");
    assert_eq!(err.code, ErrorCode::ReservationConflict);
}

#[tokio::test]
async fn bad_or_past_times_are_rejected() {
    let state = test_state().await;
    seed_table(&state, 1).await;

    let err = create_reservation(
        &state,
        reservation_payload(vec![1], "tomorrow".to_string(), "19:00".to_string(), None),
    )
    .await
    .expect_err("malformed date");
    assert_eq!(err.code, ErrorCode::ReservationBadTime);

    let err = create_reservation(
        &state,
        reservation_payload(vec![1], "2020-01-01".to_string(), "19:00".to_string(), None),
    )
    .await
    .expect_err("past date");
    assert_eq!(err.code, ErrorCode::ReservationBadTime);

    let err = create_reservation(
        &state,
        reservation_payload(vec![99], tomorrow_at(19).0, "19:00".to_string(), None),
    )
    .await
    .expect_err("unknown table");
    assert_eq!(err.code, ErrorCode::TableNotFound);
}

#[tokio::test]
async fn dine_in_blocked_by_imminent_reservation() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 10.0).await;
    seed_table(&state, 8).await;

    // Reservation starting 30 minutes from now on table 8
    let soon = Utc::now() + Duration::minutes(30);
    create_reservation(
        &state,
        reservation_payload(
            vec![8],
            soon.format("%Y-%m-%d").to_string(),
            soon.format("%H:%M").to_string(),
            Some(60),
        ),
    )
    .await
    .expect("imminent reservation");

    // Walk-in for table 8 is turned away
    let err = place_order(&state, dine_in_payload(8, vec![(1, 1)], 0.0, 10.0, None))
        .await
        .expect_err("table reserved soon");
    assert_eq!(err.code, ErrorCode::TableReservedSoon);
}

#[tokio::test]
async fn availability_honours_duration_threshold_and_conflicts() {
    let state = test_state().await;
    seed_menu_item(&state, 1, 10.0).await;
    seed_table(&state, 1).await;
    seed_table(&state, 2).await;
    seed_table(&state, 3).await;

    // Occupy table 2 with a live seating
    place_order(&state, dine_in_payload(2, vec![(1, 1)], 0.0, 10.0, None))
        .await
        .expect("live order");

    // Reserve table 3 tomorrow 19:00-20:00
    let (date, time) = tomorrow_at(19);
    create_reservation(
        &state,
        reservation_payload(vec![3], date.clone(), time.clone(), Some(60)),
    )
    .await
    .expect("reservation");

    // Short window right now: occupied table 2 is excluded
    let now_short = available_tables(
        &state,
        AvailabilityQuery {
            date: None,
            time: None,
            duration: Some(30),
        },
    )
    .await
    .expect("short query");
    let numbers: Vec<i64> = now_short.iter().map(|t| t.number).collect();
    assert!(!numbers.contains(&2));
    assert!(numbers.contains(&1));

    // Long window tomorrow at 19:30: live status ignored, but the
    // reserved table 3 is excluded
    let tomorrow_long = available_tables(
        &state,
        AvailabilityQuery {
            date: Some(date.clone()),
            time: Some("19:30".to_string()),
            duration: Some(60),
        },
    )
    .await
    .expect("long query");
    let numbers: Vec<i64> = tomorrow_long.iter().map(|t| t.number).collect();
    assert_eq!(numbers, vec![1, 2]);

    // Same instant with a 30-minute ask also excludes table 3 (conflict)
    // and tables 2 (occupied, short window checks live status)
    let tomorrow_short = available_tables(
        &state,
        AvailabilityQuery {
            date: Some(date),
            time: Some("19:30".to_string()),
            duration: Some(30),
        },
    )
    .await
    .expect("short tomorrow query");
    let numbers: Vec<i64> = tomorrow_short.iter().map(|t| t.number).collect();
    assert!(!numbers.contains(&3));
    assert!(!numbers.contains(&2));
}

#[tokio::test]
async fn terminal_reservations_stop_holding_tables() {
    let state = test_state().await;
    seed_table(&state, 1).await;

    let (date, time) = tomorrow_at(19);
    let reservation = create_reservation(
        &state,
        reservation_payload(vec![1], date.clone(), time.clone(), Some(60)),
    )
    .await
    .expect("reservation");
    assert_eq!(reservation.status, ReservationStatus::Pending);

    // Cancel it directly through the repository
    let repo = ReservationRepository::new(state.db.clone());
    let id = reservation.id.as_ref().unwrap().to_string();
    repo.update(
        &id,
        ReservationUpdate {
            status: Some(ReservationStatus::Cancelled),
            guests: None,
            table_numbers: None,
            payment: None,
        },
    )
    .await
    .expect("cancel");

    // The slot opens up again
    create_reservation(
        &state,
        reservation_payload(vec![1], date, time, Some(60)),
    )
    .await
    .expect("slot reopened");
}
