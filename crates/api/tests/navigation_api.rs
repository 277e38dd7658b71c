//! HTTP-level integration tests for `GET /api/v1/navigation/menu`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, build_test_app_with_cache, get, post_json, put_json,
    token_for,
};
use coursehub_api::cache::TaggedCache;
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn titles(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("navigation should be an array")
        .iter()
        .map(|i| i["title"].as_str().unwrap().to_string())
        .collect()
}

async fn navigation_for(pool: &PgPool, role: &str) -> Value {
    let token = token_for(role);
    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/navigation/menu",
        Some(&token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Test: built-in fallback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fallback_per_role(pool: PgPool) {
    let admin = navigation_for(&pool, "admin").await;
    let admin_titles = titles(&admin);
    assert_eq!(admin_titles.first().map(String::as_str), Some("Dashboard"));
    assert_eq!(admin_titles.last().map(String::as_str), Some("Profile"));
    assert!(admin_titles.contains(&"Courses".to_string()));
    assert_eq!(admin[0]["url"], "/admin/dashboard");

    let instructor = navigation_for(&pool, "instructor").await;
    assert!(titles(&instructor).contains(&"Earnings".to_string()));

    let student = navigation_for(&pool, "student").await;
    assert!(titles(&student).contains(&"Wishlist".to_string()));
    assert!(!titles(&student).contains(&"Earnings".to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_role_gets_shared_items(pool: PgPool) {
    let items = navigation_for(&pool, "guest").await;
    assert_eq!(titles(&items), vec!["Dashboard", "Profile"]);
    assert_eq!(items[0]["url"], "/dashboard");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_requires_authentication(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/navigation/menu", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: persisted menu
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_persisted_menu_replaces_fallback(pool: PgPool) {
    let token = admin_token();
    let cache = Arc::new(TaggedCache::new(Duration::from_secs(300)));
    let app = || build_test_app_with_cache(pool.clone(), Arc::clone(&cache));

    // Cached fallback first; creating the menu must invalidate it.
    let student = token_for("student");
    let response = get(app(), "/api/v1/navigation/menu", Some(&student)).await;
    assert!(titles(&body_json(response).await["data"]).contains(&"Wishlist".to_string()));

    let response = post_json(
        app(),
        "/api/v1/menus",
        Some(&token),
        json!({ "name": "Student menu", "location": "student_navigation" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let menu_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let items_uri = format!("/api/v1/menus/{menu_id}/items");
    let response = post_json(
        app(),
        &items_uri,
        Some(&token),
        json!({ "title": "Learning", "url": "/learn", "icon": "graduation-cap" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let learning = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app(),
        &items_uri,
        Some(&token),
        json!({ "title": "Settings", "url": "/learn/settings", "parent_id": learning }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        app(),
        "/api/v1/navigation/menu?path=/learn/settings",
        Some(&student),
    )
    .await;
    let data = body_json(response).await["data"].clone();

    assert_eq!(titles(&data), vec!["Learning"]);
    assert_eq!(data[0]["icon"], "graduation-cap");
    assert_eq!(data[0]["has_children"], true);
    assert_eq!(data[0]["is_active"], true);
    assert_eq!(data[0]["children"][0]["icon"], "settings"); // from the title map
    assert_eq!(data[0]["children"][0]["is_active"], true);

    // Other roles keep their fallback.
    let instructor = navigation_for(&pool, "instructor").await;
    assert!(titles(&instructor).contains(&"Earnings".to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_menu_falls_back(pool: PgPool) {
    let token = admin_token();
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/menus",
        Some(&token),
        json!({ "name": "Admin menu", "location": "admin_navigation" }),
    )
    .await;
    let menu_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/menus/{menu_id}"),
        Some(&token),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let admin = navigation_for(&pool, "admin").await;
    assert!(titles(&admin).contains(&"Courses".to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cross_menu_parent_returns_422(pool: PgPool) {
    let token = admin_token();
    let mut menu_ids = Vec::new();
    for location in ["admin_navigation", "student_navigation"] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/menus",
            Some(&token),
            json!({ "name": location, "location": location }),
        )
        .await;
        menu_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/menus/{}/items", menu_ids[0]),
        Some(&token),
        json!({ "title": "Reports" }),
    )
    .await;
    let foreign = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool),
        &format!("/api/v1/menus/{}/items", menu_ids[1]),
        Some(&token),
        json!({ "title": "Sub", "parent_id": foreign }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
