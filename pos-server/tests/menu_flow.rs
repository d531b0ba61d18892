//! 菜单与桌台管理集成测试 (内存数据库)

mod common;

use common::*;

use pos_server::db::models::{ActivityKind, ActivityStatus, MenuItemCreate, MenuItemUpdate};
use pos_server::db::repository::{MenuItemRepository, RepoError, TableRepository};

#[tokio::test]
async fn menu_item_round_trip() {
    let state = test_state().await;
    let repo = MenuItemRepository::new(state.db.clone());

    let created = repo
        .create(
            1,
            MenuItemCreate {
                item_id: Some(1),
                name: "Paneer Tikka".to_string(),
                price: 240.0,
                category: "starters".to_string(),
                is_available: Some(true),
                is_popular: Some(true),
                is_veg: Some(true),
                spice_level: Some(2),
            },
        )
        .await
        .expect("create");
    assert_eq!(created.item_id, 1);

    // Appears in both listings with identical name/price
    let default_list = repo.find_all(false).await.unwrap();
    let all_list = repo.find_all(true).await.unwrap();
    for list in [&default_list, &all_list] {
        let item = list.iter().find(|m| m.item_id == 1).expect("listed");
        assert_eq!(item.name, "Paneer Tikka");
        assert_eq!(item.price, 240.0);
    }

    // Unavailable items drop out of the default listing only
    repo.update(
        1,
        MenuItemUpdate {
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
    assert!(repo.find_all(false).await.unwrap().is_empty());
    assert_eq!(repo.find_all(true).await.unwrap().len(), 1);

    // Deleting removes it from both listings
    repo.delete(1).await.unwrap();
    assert!(repo.find_all(false).await.unwrap().is_empty());
    assert!(repo.find_all(true).await.unwrap().is_empty());

    // Duplicate numeric ids are rejected while one exists
    repo.create(
        2,
        MenuItemCreate {
            item_id: Some(2),
            name: "Dal".to_string(),
            price: 120.0,
            category: "mains".to_string(),
            is_available: None,
            is_popular: None,
            is_veg: None,
            spice_level: None,
        },
    )
    .await
    .unwrap();
    let err = repo
        .create(
            2,
            MenuItemCreate {
                item_id: Some(2),
                name: "Dal again".to_string(),
                price: 130.0,
                category: "mains".to_string(),
                is_available: None,
                is_popular: None,
                is_veg: None,
                spice_level: None,
            },
        )
        .await
        .expect_err("duplicate id");
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn at_most_one_active_cleaning_per_table() {
    let state = test_state().await;
    let table = seed_table(&state, 1).await;
    let id = table.id.as_ref().unwrap().to_string();

    let repo = TableRepository::new(state.db.clone());
    let table = repo
        .add_activity(&id, ActivityKind::Cleaning, Some("spill".to_string()))
        .await
        .expect("first cleaning");
    assert_eq!(table.activities.len(), 1);

    // A second active cleaning is refused
    let err = repo
        .add_activity(&id, ActivityKind::Cleaning, None)
        .await
        .expect_err("second active cleaning");
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Other activity kinds coexist with the active cleaning
    repo.add_activity(&id, ActivityKind::Inspection, None)
        .await
        .expect("inspection alongside cleaning");

    // Closing the cleaning reopens the slot; the list stays append-only
    let activity_id = table.activities[0].activity_id.clone();
    let table = repo
        .close_activity(&id, &activity_id, ActivityStatus::Completed)
        .await
        .expect("complete cleaning");
    assert_eq!(table.activities.len(), 2);
    assert_eq!(table.activities[0].status, ActivityStatus::Completed);
    assert!(table.activities[0].ended_at.is_some());

    repo.add_activity(&id, ActivityKind::Cleaning, None)
        .await
        .expect("new cleaning after completion");

    // Closing twice is refused
    let err = repo
        .close_activity(&id, &activity_id, ActivityStatus::Cancelled)
        .await
        .expect_err("already closed");
    assert!(matches!(err, RepoError::Duplicate(_)));
}
