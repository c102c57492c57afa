//! Gallery API integration tests.
//!
//! Run with: `cargo test -p gallery-api --test gallery_test -- --ignored`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::{admin_token, token_with_roles, user_token};
use helpers::{api_path, setup_test_app};
use serde_json::{json, Value};

async fn create_folder(app: &helpers::TestApp, title: &str, parent_id: Option<i64>) -> i64 {
    let response = app
        .client()
        .post(&api_path("/folders"))
        .authorization_bearer(admin_token())
        .json(&json!({ "title": title, "parent_id": parent_id }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json::<Value>()["header"]["id"]
        .as_i64()
        .expect("folder id")
}

#[tokio::test]
#[ignore]
async fn test_empty_gallery_front_page() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/gallery?page=0")).await;
    assert_eq!(response.status_code(), 200);

    let body = response.json::<Value>();
    assert_eq!(body["all_photos"]["current_page"], 1);
    assert_eq!(body["all_photos"]["row_count"], 0);
    assert_eq!(body["all_photos"]["page_count"], 0);
    assert_eq!(body["context"]["page_title"], "Gallery");
}

#[tokio::test]
#[ignore]
async fn test_upload_browse_comment_and_delete() {
    let app = setup_test_app().await;
    let client = app.client();

    let holidays = create_folder(&app, "Holidays", None).await;
    let iceland = create_folder(&app, "Iceland", Some(holidays)).await;

    let png = helpers::fixtures::create_png();
    let form = MultipartForm::new()
        .add_text("parent_folder", iceland.to_string())
        .add_part(
            "files",
            Part::bytes(png.clone())
                .file_name("C:\\Users\\me\\beach.png")
                .mime_type("image/png"),
        )
        .add_part(
            "files",
            Part::bytes(b"not a photo".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );
    let response = client
        .post(&api_path("/uploads"))
        .authorization_bearer(admin_token())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);
    let body = response.json::<Value>();
    assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
    let photo_id = body["items"][0]["header"]["id"].as_i64().expect("photo id");
    assert_eq!(body["items"][0]["file_name"], "beach.png");

    // Stored under the folder chain, root first
    let stored = app.stored_path(&format!("{}/{}/beach.png", holidays, iceland));
    assert!(stored.exists());

    let detail = client
        .get(&api_path(&format!("/items/{}", photo_id)))
        .await
        .json::<Value>();
    assert_eq!(detail["context"]["page_title"], "beach.png");
    assert_eq!(detail["context"]["breadcrumbs"][0]["title"], "Holidays");
    assert_eq!(detail["context"]["breadcrumbs"][1]["title"], "Iceland");

    let file = client
        .get(&api_path(&format!("/items/{}/file", photo_id)))
        .await;
    assert_eq!(file.status_code(), 200);
    assert_eq!(file.as_bytes().to_vec(), png);
    assert_eq!(
        file.header("content-disposition"),
        "attachment;filename=beach.png"
    );

    let inverted = client
        .get(&api_path(&format!("/items/{}/effects/Invert", photo_id)))
        .await;
    assert_eq!(inverted.status_code(), 200);
    assert_eq!(inverted.header("content-type"), "image/png");
    assert_ne!(inverted.as_bytes().to_vec(), png);

    let comment = client
        .post(&api_path(&format!("/items/{}/comments", photo_id)))
        .authorization_bearer(user_token())
        .json(&json!({ "content": "Lovely light" }))
        .await;
    assert_eq!(comment.status_code(), 201);
    let comment = comment.json::<Value>();
    assert_eq!(comment["user_name"], "Uma User");

    let deleted = client
        .delete(&api_path(&format!("/comments/{}", comment["id"])))
        .authorization_bearer(admin_token())
        .await;
    assert_eq!(deleted.status_code(), 200);
    assert_eq!(deleted.json::<Value>()["media_item_id"], photo_id);

    let removed = client
        .delete(&api_path(&format!("/photos/{}", photo_id)))
        .authorization_bearer(admin_token())
        .await;
    assert_eq!(removed.status_code(), 200);
    assert_eq!(removed.json::<Value>()["redirect_to"], iceland);
    assert!(!stored.exists());

    let gone = client
        .get(&api_path(&format!("/items/{}", photo_id)))
        .await;
    assert_eq!(gone.status_code(), 404);
}

#[tokio::test]
#[ignore]
async fn test_role_checks() {
    let app = setup_test_app().await;
    let client = app.client();
    let body = json!({ "title": "Secret" });

    let anonymous = client.post(&api_path("/folders")).json(&body).await;
    assert_eq!(anonymous.status_code(), 401);

    let forged = client
        .post(&api_path("/folders"))
        .authorization_bearer("not-a-token")
        .json(&body)
        .await;
    assert_eq!(forged.status_code(), 401);

    let user = client
        .post(&api_path("/folders"))
        .authorization_bearer(user_token())
        .json(&body)
        .await;
    assert_eq!(user.status_code(), 403);

    let folder_id = create_folder(&app, "Public", None).await;

    let roleless = client
        .post(&api_path(&format!("/items/{}/comments", folder_id)))
        .authorization_bearer(token_with_roles("guest", "Guest", &[]))
        .json(&json!({ "content": "Hello there" }))
        .await;
    assert_eq!(roleless.status_code(), 403);

    let too_short = client
        .post(&api_path(&format!("/items/{}/comments", folder_id)))
        .authorization_bearer(user_token())
        .json(&json!({ "content": "hey" }))
        .await;
    assert_eq!(too_short.status_code(), 400);
}

#[tokio::test]
#[ignore]
async fn test_missing_items_and_folder_effects() {
    let app = setup_test_app().await;
    let client = app.client();

    let missing = client.get(&api_path("/items/4242")).await;
    assert_eq!(missing.status_code(), 404);
    assert_eq!(missing.json::<Value>()["code"], "NOT_FOUND");

    let folder_id = create_folder(&app, "Albums", None).await;
    let effect = client
        .get(&api_path(&format!("/items/{}/effects/Sepia", folder_id)))
        .await;
    assert_eq!(effect.status_code(), 400);

    let orphan = client
        .post(&api_path("/folders"))
        .authorization_bearer(admin_token())
        .json(&json!({ "title": "Orphan", "parent_id": 4242 }))
        .await;
    assert_eq!(orphan.status_code(), 404);
}

#[tokio::test]
#[ignore]
async fn test_upload_keeps_file_names_with_inner_dots() {
    let app = setup_test_app().await;
    let summer = create_folder(&app, "Summer", None).await;

    let png = helpers::fixtures::create_png();
    let form = MultipartForm::new()
        .add_text("parent_folder", summer.to_string())
        .add_part(
            "files",
            Part::bytes(png.clone())
                .file_name("first.png")
                .mime_type("image/png"),
        )
        .add_part(
            "files",
            Part::bytes(png.clone())
                .file_name("summer..beach.png")
                .mime_type("image/png"),
        );
    let response = app
        .client()
        .post(&api_path("/uploads"))
        .authorization_bearer(admin_token())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201);

    let body = response.json::<Value>();
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["items"][1]["file_name"], "summer..beach.png");
    assert!(app
        .stored_path(&format!("{}/summer..beach.png", summer))
        .exists());
}

#[tokio::test]
#[ignore]
async fn test_health_reports_database_and_storage() {
    let app = setup_test_app().await;

    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");
    assert_eq!(body["storage"], "healthy");
    assert_eq!(body["storage_backend"], "local");
}
