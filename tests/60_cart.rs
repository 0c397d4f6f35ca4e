mod common;

use atelier_api::services::cart::MAX_ITEM_QUANTITY;
use atelier_api::services::CartService;

#[tokio::test]
async fn repeat_adds_merge_into_one_line() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let service = CartService::new(&pool);

    let user_id = common::seed_user(&pool).await;
    let design_id = common::seed_design(&pool, "active").await;

    let first = service
        .add_item(user_id, design_id, 4, None)
        .await
        .expect("first add");
    assert_eq!(first.quantity, 4);

    let merged = service
        .add_item(user_id, design_id, 4, None)
        .await
        .expect("second add");
    assert_eq!(merged.id, first.id, "adds merge into the existing line");
    assert_eq!(merged.quantity, 8);

    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE design_id = $1")
        .bind(design_id)
        .fetch_one(&pool)
        .await
        .expect("line count");
    assert_eq!(lines, 1);

    common::remove_design(&pool, design_id).await;
    common::remove_user(&pool, user_id).await;
}

#[tokio::test]
async fn merged_total_cannot_pass_the_cap() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let service = CartService::new(&pool);

    let user_id = common::seed_user(&pool).await;
    let design_id = common::seed_design(&pool, "active").await;

    service
        .add_item(user_id, design_id, 8, None)
        .await
        .expect("first add");

    let over = service.add_item(user_id, design_id, 3, None).await.unwrap_err();
    assert_eq!(over.status_code(), 400);

    let quantity: i32 = sqlx::query_scalar("SELECT quantity FROM cart_items WHERE design_id = $1")
        .bind(design_id)
        .fetch_one(&pool)
        .await
        .expect("quantity");
    assert_eq!(quantity, 8, "rejected add must leave the line untouched");

    let topped = service
        .add_item(user_id, design_id, 2, None)
        .await
        .expect("add up to the cap");
    assert_eq!(topped.quantity, MAX_ITEM_QUANTITY);

    let over = service.add_item(user_id, design_id, 1, None).await.unwrap_err();
    assert_eq!(over.status_code(), 400);

    common::remove_design(&pool, design_id).await;
    common::remove_user(&pool, user_id).await;
}

#[tokio::test]
async fn hidden_designs_cannot_be_added() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let service = CartService::new(&pool);

    let user_id = common::seed_user(&pool).await;
    let design_id = common::seed_design(&pool, "inactive").await;

    let err = service.add_item(user_id, design_id, 1, None).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    common::remove_design(&pool, design_id).await;
    common::remove_user(&pool, user_id).await;
}
