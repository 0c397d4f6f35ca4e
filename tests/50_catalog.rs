mod common;

use atelier_api::services::catalog::{AddImage, CatalogService};
use atelier_api::services::FavoritesService;
use atelier_api::storage::{MemoryStore, ObjectStore};
use uuid::Uuid;

fn image_payload(object_key: &str, is_primary: bool) -> AddImage {
    AddImage {
        object_key: object_key.to_string(),
        is_primary,
        alt_text: None,
        caption: None,
        image_type: None,
        file_size: None,
        width: None,
        height: None,
        content_type: Some("image/jpeg".to_string()),
    }
}

#[tokio::test]
async fn hidden_design_images_read_as_missing() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let store = MemoryStore::new();
    let service = CatalogService::new(&pool, &store);

    let design_id = common::seed_design(&pool, "draft").await;
    sqlx::query(
        "INSERT INTO design_images (id, design_id, object_key, is_primary) VALUES ($1, $2, $3, true)",
    )
    .bind(Uuid::new_v4())
    .bind(design_id)
    .bind(format!("designs/images/{}.jpg", Uuid::new_v4()))
    .execute(&pool)
    .await
    .expect("seed image");

    // A draft design must be indistinguishable from a missing one
    let err = service.list_images(design_id, false).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    let images = service
        .list_images(design_id, true)
        .await
        .expect("admin listing");
    assert_eq!(images.len(), 1);

    common::remove_design(&pool, design_id).await;
}

#[tokio::test]
async fn set_primary_keeps_a_single_cover() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let store = MemoryStore::new();
    let service = CatalogService::new(&pool, &store);

    let user_id = common::seed_user(&pool).await;
    let design_id = common::seed_design(&pool, "active").await;

    store
        .put("designs/images/cover-a.jpg", b"a", "image/jpeg")
        .await
        .expect("put");
    store
        .put("designs/images/cover-b.jpg", b"b", "image/jpeg")
        .await
        .expect("put");

    let first = service
        .add_image(design_id, image_payload("designs/images/cover-a.jpg", false), user_id)
        .await
        .expect("first image");
    assert!(first.is_primary, "first image becomes the cover");

    let second = service
        .add_image(design_id, image_payload("designs/images/cover-b.jpg", false), user_id)
        .await
        .expect("second image");
    assert!(!second.is_primary);

    service
        .set_primary(design_id, second.id)
        .await
        .expect("set primary");

    let primaries: Vec<Uuid> =
        sqlx::query_scalar("SELECT id FROM design_images WHERE design_id = $1 AND is_primary")
            .bind(design_id)
            .fetch_all(&pool)
            .await
            .expect("primaries");
    assert_eq!(primaries, vec![second.id]);

    common::remove_design(&pool, design_id).await;
    common::remove_user(&pool, user_id).await;
}

#[tokio::test]
async fn favorite_toggle_restores_like_count() {
    let Some(pool) = common::try_pool().await else {
        return;
    };
    let service = FavoritesService::new(&pool);

    let user_id = common::seed_user(&pool).await;
    let design_id = common::seed_design(&pool, "active").await;

    service.add(user_id, design_id).await.expect("add favorite");
    assert_eq!(common::like_count(&pool, design_id).await, 1);

    let duplicate = service.add(user_id, design_id).await.unwrap_err();
    assert_eq!(duplicate.status_code(), 400);
    assert_eq!(
        common::like_count(&pool, design_id).await,
        1,
        "rejected add must not bump the counter"
    );

    service
        .remove(user_id, design_id)
        .await
        .expect("remove favorite");
    assert_eq!(common::like_count(&pool, design_id).await, 0);

    let missing = service.remove(user_id, design_id).await.unwrap_err();
    assert_eq!(missing.status_code(), 400);
    assert_eq!(common::like_count(&pool, design_id).await, 0);

    common::remove_design(&pool, design_id).await;
    common::remove_user(&pool, user_id).await;
}
