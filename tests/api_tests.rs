mod common;

use reqwest::StatusCode;
use serde_json::json;

// ── Meta ────────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

#[tokio::test]
async fn root_describes_application() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Appointment Manager");
    assert_eq!(body["license"]["name"], "MIT");
    assert_eq!(body["docs_url"], "/openapi.json");

    common::cleanup(app).await;
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/openapi.json")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["servers"][0]["url"], common::PREFIX);
    assert!(body["paths"]["/users/{id}"].is_object());

    common::cleanup(app).await;
}

// ── Users ───────────────────────────────────────────────────────

#[tokio::test]
async fn create_user_returns_row_without_password() {
    let app = common::spawn_app().await;

    let user = app.create_user("Lucas@Example.com").await;
    assert!(user["id"].as_i64().unwrap() > 0);
    assert_eq!(user["email"], "lucas@example.com");
    assert_eq!(user["is_active"], true);
    assert!(user["role"].is_null());
    assert!(user["created_at"].is_string());
    assert!(user["updated_at"].is_string());
    assert!(user.get("password").is_none());

    let stored: String = sqlx::query_scalar("SELECT password FROM users WHERE id = $1")
        .bind(user["id"].as_i64().unwrap() as i32)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(stored.starts_with("$argon2id$"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn create_user_with_role() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .post(
            "/users/",
            &json!({
                "email": "pro@example.com",
                "password": "password123",
                "role": "professional",
                "is_active": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["role"], "professional");
    assert_eq!(body["is_active"], false);

    common::cleanup(app).await;
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = common::spawn_app().await;
    app.create_user("dup@example.com").await;

    let (body, status) = app
        .post(
            "/users/",
            &json!({ "email": "DUP@example.com", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "User already exists. Check parameters");
    assert_eq!(app.count_rows("users").await, 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .post(
            "/users/",
            &json!({ "email": "not-an-email", "password": "password123" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("email"));
    assert_eq!(app.count_rows("users").await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.api("/users/"))
        .header("content-type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["detail"].is_string());
    assert_eq!(app.count_rows("users").await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn unknown_user_is_404() {
    let app = common::spawn_app().await;

    let (body, status) = app.get("/users/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User with id 4242 does not exist");

    let (_, status) = app.patch("/users/4242", &json!({ "is_active": false })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, status) = app.delete("/users/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn malformed_path_and_query_answer_with_detail() {
    let app = common::spawn_app().await;

    let (body, status) = app.get("/users/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (body, status) = app.get("/users/?skip=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (body, status) = app.get("/profiles/?limit=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    common::cleanup(app).await;
}

#[tokio::test]
async fn list_users_pages_by_skip_and_limit() {
    let app = common::spawn_app().await;
    let first = app.create_user("first@example.com").await;
    let second = app.create_user("second@example.com").await;

    let (body, status) = app.get("/users/?skip=0&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], first["id"]);

    let (body, _) = app.get("/users/?skip=1&limit=1").await;
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], second["id"]);

    // Both spellings of the collection path are served.
    let (body, status) = app.get("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    common::cleanup(app).await;
}

#[tokio::test]
async fn list_users_filters_by_role_and_activity() {
    let app = common::spawn_app().await;
    app.create_user("plain@example.com").await;
    let (pro, _) = app
        .post(
            "/users/",
            &json!({ "email": "pro@example.com", "password": "password123", "role": "professional" }),
        )
        .await;

    let (body, status) = app.get("/users/?role=professional").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], pro["id"]);

    let (body, _) = app.get("/users/?is_active=false").await;
    assert!(body.as_array().unwrap().is_empty());

    common::cleanup(app).await;
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = common::spawn_app().await;
    let user = app.create_user("patch@example.com").await;
    let id = user["id"].as_i64().unwrap();

    let (body, status) = app
        .patch(&format!("/users/{id}"), &json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["is_active"], false);
    assert_eq!(body["email"], "patch@example.com");
    assert_eq!(body["created_at"], user["created_at"]);

    let (body, _) = app.get(&format!("/users/{id}")).await;
    assert_eq!(body["is_active"], false);
    assert_eq!(body["email"], "patch@example.com");

    common::cleanup(app).await;
}

#[tokio::test]
async fn patch_with_null_role_clears_it() {
    let app = common::spawn_app().await;
    let (user, _) = app
        .post(
            "/users/",
            &json!({ "email": "role@example.com", "password": "password123", "role": "consumer" }),
        )
        .await;
    let id = user["id"].as_i64().unwrap();

    // A missing role is left alone.
    let (body, status) = app
        .patch(&format!("/users/{id}"), &json!({ "is_active": false }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "consumer");

    let (body, status) = app.patch(&format!("/users/{id}"), &json!({ "role": null })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["role"].is_null());

    let (body, _) = app.get(&format!("/users/{id}")).await;
    assert!(body["role"].is_null());

    common::cleanup(app).await;
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
    let app = common::spawn_app().await;
    app.create_user("taken@example.com").await;
    let user = app.create_user("free@example.com").await;
    let id = user["id"].as_i64().unwrap();

    let (_, status) = app
        .patch(&format!("/users/{id}"), &json!({ "email": "taken@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

#[tokio::test]
async fn delete_user_removes_it_and_its_profile() {
    let app = common::spawn_app().await;
    let user = app.create_user("gone@example.com").await;
    let id = user["id"].as_i64().unwrap();
    app.create_profile(id, "Ada", "Lovelace").await;

    let (body, status) = app.delete(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "gone@example.com");

    let (_, status) = app.get(&format!("/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count_rows("profiles").await, 0);

    common::cleanup(app).await;
}

// ── Profiles ────────────────────────────────────────────────────

#[tokio::test]
async fn user_profile_lookup() {
    let app = common::spawn_app().await;
    let user = app.create_user("owner@example.com").await;
    let id = user["id"].as_i64().unwrap();

    let (_, status) = app.get(&format!("/users/{id}/profile")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let profile = app.create_profile(id, "Grace", "Hopper").await;
    let (body, status) = app.get(&format!("/users/{id}/profile")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], profile["id"]);
    assert_eq!(body["user_id"], id);

    let (_, status) = app.get("/users/999/profile").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn profile_for_missing_user_is_404() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .post(
            "/profiles/",
            &json!({ "first_name": "No", "last_name": "Owner", "user_id": 77 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User with id 77 does not exist");
    assert_eq!(app.count_rows("profiles").await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn profile_names_must_not_be_empty() {
    let app = common::spawn_app().await;
    let user = app.create_user("blank@example.com").await;

    let (_, status) = app
        .post(
            "/profiles/",
            &json!({ "first_name": "", "last_name": "X", "user_id": user["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    common::cleanup(app).await;
}

#[tokio::test]
async fn list_profiles_matches_first_or_last_name() {
    let app = common::spawn_app().await;
    let a = app.create_user("a@example.com").await;
    let b = app.create_user("b@example.com").await;
    let c = app.create_user("c@example.com").await;
    app.create_profile(a["id"].as_i64().unwrap(), "Ana", "Smith").await;
    app.create_profile(b["id"].as_i64().unwrap(), "John", "Danae").await;
    app.create_profile(c["id"].as_i64().unwrap(), "Bob", "Stone").await;

    let (body, status) = app.get("/profiles/?name=AN").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ana", "John"]);

    let (body, _) = app.get("/profiles/?skip=2").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn profile_update_and_delete() {
    let app = common::spawn_app().await;
    let user = app.create_user("edit@example.com").await;
    let profile = app
        .create_profile(user["id"].as_i64().unwrap(), "Alan", "Turing")
        .await;
    let id = profile["id"].as_i64().unwrap();

    let (body, status) = app
        .patch(&format!("/profiles/{id}/"), &json!({ "last_name": "Kay" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Alan");
    assert_eq!(body["last_name"], "Kay");

    let (_, status) = app.delete(&format!("/profiles/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status) = app.get(&format!("/profiles/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The owner survives its profile.
    let (_, status) = app.get(&format!("/users/{}", user["id"])).await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}
