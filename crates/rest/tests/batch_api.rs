//! Batch operations: per-item isolation, deferred registration and limits.

mod common;

use http::StatusCode;
use serde_json::json;
use strata_rest::handlers::{batch_create, batch_delete, batch_read, batch_update, create_object};

use common::fixtures::{body, custom, invalid_custom, user};
use common::harness::TestContext;

/// Creates `count` dogs and returns their ids.
async fn seed_dogs(ctx: &TestContext, app: &strata_persistence::tenant::App, count: usize) -> Vec<String> {
    let items: Vec<_> = (0..count).map(|i| custom("dog", &format!("dog-{i}"))).collect();
    let response = batch_create(&ctx.state, app, &body(json!(items))[..])
        .await
        .unwrap();
    response
        .objects()
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_batch_create_drops_invalid_items() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", true).await;

    let payload = json!([
        custom("dog", "Rex"),
        invalid_custom("cat"),
        "not an object",
        {"name": "no type"},
        custom("bird", "Tweety")
    ]);
    let response = batch_create(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let created = response.objects();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["type"], json!("dog"));
    assert_eq!(created[1]["type"], json!("bird"));
    for object in created {
        assert_eq!(object["appid"], json!("acme"));
        assert_eq!(object["shardkey"], json!("acme"));
        assert!(object["id"].is_string());
    }
    assert_eq!(ctx.storage.count(&app.identifier()), 2);
}

#[tokio::test]
async fn test_batch_create_defers_registration() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;

    let payload = json!([custom("dog", "Rex"), invalid_custom("cat"), custom("bird", "Tweety")]);
    batch_create(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();

    assert_eq!(ctx.executor.pending(), 1);
    assert!(ctx.reload(&app).await.datatypes().is_empty());

    ctx.run_background().await;

    let app = ctx.reload(&app).await;
    let datatypes = app.datatypes();
    assert_eq!(datatypes.get("dogs").map(String::as_str), Some("dog"));
    assert_eq!(datatypes.get("birds").map(String::as_str), Some("bird"));
    assert!(!datatypes.contains_key("cats"));
}

#[tokio::test]
async fn test_batch_create_nothing_valid() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;

    let response = batch_create(&ctx.state, &app, &body(json!([invalid_custom("cat")]))[..])
        .await
        .unwrap();

    assert!(response.objects().is_empty());
    assert_eq!(ctx.executor.pending(), 0);
    assert_eq!(ctx.storage.count(&app.identifier()), 0);
}

#[tokio::test]
async fn test_batch_create_rejects_non_array_body() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;

    let err = batch_create(&ctx.state, &app, &body(custom("dog", "Rex"))[..])
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err = batch_create(&ctx.state, &app, &b""[..]).await.unwrap_err();
    assert_eq!(err.body().message, "Missing request body.");
}

#[tokio::test]
async fn test_batch_read_preserves_order() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    let ids = seed_dogs(&ctx, &app, 3).await;

    let request = vec![ids[2].clone(), "missing".to_string(), ids[0].clone()];
    let response = batch_read(&ctx.state, &app, &request).await.unwrap();

    let found: Vec<_> = response
        .objects()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(found, vec![ids[2].as_str(), ids[0].as_str()]);
}

#[tokio::test]
async fn test_batch_read_missing_ids() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;

    let err = batch_read(&ctx.state, &app, &[]).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.body().message, "Missing ids.");
}

#[tokio::test]
async fn test_batch_update_skips_locked_fields() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    let created = create_object(&ctx.state, &app, None, &body(user("fb:1", "ann@example.com"))[..])
        .await
        .unwrap()
        .body()
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let payload = json!([
        {"id": id, "type": "user", "identifier": "fb:2", "email": "not-an-email"},
        {"type": "user", "email": "no-id@example.com"},
        {"id": id, "email": "no-type@example.com"}
    ]);
    let response = batch_update(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.objects().len(), 1);

    let stored = ctx.stored(&app, id).await.unwrap().to_field_map();
    assert_eq!(stored["identifier"], json!("fb:1"));
    // Batch updates are not validated.
    assert_eq!(stored["email"], json!("not-an-email"));
    assert_eq!(stored["appid"], json!("acme"));
}

#[tokio::test]
async fn test_batch_update_ignores_unknown_ids() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    let ids = seed_dogs(&ctx, &app, 1).await;

    let payload = json!([
        {"id": "missing", "type": "dog", "name": "Ghost"},
        {"id": ids[0], "type": "dog", "name": "Renamed"}
    ]);
    batch_update(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();

    assert_eq!(ctx.storage.count(&app.identifier()), 1);
    let stored = ctx.stored(&app, &ids[0]).await.unwrap().to_field_map();
    assert_eq!(stored["name"], json!("Renamed"));
    assert_eq!(stored["color"], json!("brown"));
}

#[tokio::test]
async fn test_batch_delete_limit() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    let ids = seed_dogs(&ctx, &app, 3).await;

    let mut request = ids.clone();
    request.extend((0..3).map(|i| format!("extra-{i}")));
    assert_eq!(request.len(), ctx.state.max_batch_delete() + 1);

    let err = batch_delete(&ctx.state, &app, &request).await.unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        err.body().message,
        "Limit reached. Maximum number of items to delete is 5"
    );
    assert_eq!(ctx.storage.count(&app.identifier()), 3);
}

#[tokio::test]
async fn test_batch_delete() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", true).await;
    let ids = seed_dogs(&ctx, &app, 3).await;

    let request = vec![ids[0].clone(), ids[2].clone(), "missing".to_string()];
    let response = batch_delete(&ctx.state, &app, &request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_none());
    assert_eq!(ctx.storage.count(&app.identifier()), 1);
    assert!(ctx.stored(&app, &ids[1]).await.is_some());

    let err = batch_delete(&ctx.state, &app, &[]).await.unwrap_err();
    assert_eq!(err.body().message, "Missing ids.");
}

#[tokio::test]
async fn test_batch_is_scoped_to_app() {
    let ctx = TestContext::new();
    let acme = ctx.app("acme", false).await;
    let other = ctx.app("other", false).await;
    let ids = seed_dogs(&ctx, &acme, 2).await;

    let response = batch_read(&ctx.state, &other, &ids).await.unwrap();
    assert!(response.objects().is_empty());

    batch_delete(&ctx.state, &other, &ids).await.unwrap();
    assert_eq!(ctx.storage.count(&acme.identifier()), 2);
}

#[tokio::test]
async fn test_batch_create_drops_taken_ids() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    create_object(&ctx.state, &app, None, &body(json!({"type": "dog", "id": "d1"}))[..])
        .await
        .unwrap();

    let payload = json!([
        custom("dog", "Rex"),
        {"type": "dog", "id": "d1", "name": "Impostor"},
        {"type": "dog", "id": "d2", "name": "First"},
        {"type": "dog", "id": "d2", "name": "Second"},
        custom("dog", "Fido")
    ]);
    let response = batch_create(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let names: Vec<_> = response
        .objects()
        .iter()
        .map(|o| o["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Rex", "First", "Fido"]);
    assert_eq!(ctx.storage.count(&app.identifier()), 4);

    let d1 = ctx.stored(&app, "d1").await.unwrap();
    assert_eq!(d1.meta().name, None);
    let d2 = ctx.stored(&app, "d2").await.unwrap();
    assert_eq!(d2.meta().name.as_deref(), Some("First"));
}

#[tokio::test]
async fn test_batch_update_responds_with_projections() {
    let ctx = TestContext::new();
    let app = ctx.app("acme", false).await;
    let ids = seed_dogs(&ctx, &app, 1).await;

    let payload = json!([
        {"id": ids[0], "type": "dog", "name": "Renamed"},
        {"id": "missing", "type": "dog", "name": "Ghost"}
    ]);
    let response = batch_update(&ctx.state, &app, &body(payload)[..])
        .await
        .unwrap();

    let objects = response.objects();
    assert_eq!(objects.len(), 2);
    for object in objects {
        assert!(!object.contains_key("color"));
        assert!(!object.contains_key("timestamp"));
    }
    assert_eq!(objects[0]["name"], json!("Renamed"));
    assert_eq!(objects[1]["id"], json!("missing"));
}
