//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use coursehub_api::error::AppError;
use coursehub_core::error::CoreError;
use coursehub_db::error::RepoError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Category",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Category with id 42 not found");
}

#[tokio::test]
async fn business_rule_errors_return_422() {
    let cases = [
        (CoreError::Validation("bad".into()), "VALIDATION_ERROR"),
        (
            CoreError::CircularReference("Category 'A' cannot be its own parent".into()),
            "CIRCULAR_REFERENCE",
        ),
        (
            CoreError::HasChildren("Category 'A' has child categories".into()),
            "HAS_CHILDREN",
        ),
        (
            CoreError::HasDependents("Category 'A' has 2 courses".into()),
            "HAS_DEPENDENTS",
        ),
    ];

    for (err, code) in cases {
        let message = match &err {
            CoreError::Validation(m)
            | CoreError::CircularReference(m)
            | CoreError::HasChildren(m)
            | CoreError::HasDependents(m) => m.clone(),
            _ => unreachable!(),
        };
        let (status, json) = error_to_response(AppError::Core(err)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], code);
        assert_eq!(json["error"], message);
    }
}

#[tokio::test]
async fn repo_rule_error_keeps_its_mapping() {
    let err: AppError = RepoError::Rule(CoreError::HasChildren(
        "Menu item 'Reports' has child items".into(),
    ))
    .into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "HAS_CHILDREN");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("Category name 'A' is already taken".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn auth_errors_return_401_and_403() {
    let (status, _) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("Admin role required".into())))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn database_error_is_sanitized() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, _) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
