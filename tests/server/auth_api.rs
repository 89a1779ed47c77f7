use reqwest::{Client, Method, StatusCode};
use scranbook::application::errors::ErrorResponse;

use crate::helpers::{ALICE_TOKEN, FRONTEND_ORIGIN, image_form, save_recipe, soup, spawn_app};

const PROTECTED_ROUTES: &[(&str, &str)] = &[
    ("POST", "/parse-image"),
    ("POST", "/upload-image"),
    ("POST", "/recipes"),
    ("GET", "/recipes"),
    ("GET", "/recipes/some-id"),
    ("DELETE", "/recipes/some-id"),
];

#[tokio::test]
async fn every_route_requires_a_bearer_token() {
    let app = spawn_app().await;
    let client = Client::new();

    for (method, path) in PROTECTED_ROUTES {
        let method = Method::from_bytes(method.as_bytes()).unwrap();
        let response = client
            .request(method.clone(), app.api_url(path))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {path} without a token should return 401"
        );
        let body: ErrorResponse = response.json().await.expect("Failed to parse response");
        assert!(!body.detail.is_empty());
    }
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/recipes"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.detail, "Invalid or expired token");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/recipes"))
        .header("Authorization", format!("Token {ALICE_TOKEN}"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_requests_have_no_side_effects() {
    let app = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(app.api_url("/recipes"))
        .json(&soup())
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(app.api_url("/upload-image"))
        .multipart(image_form("soup.png", "image/png", vec![1, 2, 3]))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .post(app.api_url("/parse-image"))
        .multipart(image_form("soup.png", "image/png", vec![1, 2, 3]))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.recipe_repo.recipe_count(), 0);
    assert!(app.image_store.objects().is_empty());
    assert!(
        app.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty(),
        "the model must not be called for unauthenticated requests"
    );
}

#[tokio::test]
async fn unauthenticated_delete_keeps_the_recipe() {
    let app = spawn_app().await;
    let id = save_recipe(&app, ALICE_TOKEN, &soup()).await;

    let response = Client::new()
        .delete(app.api_url(&format!("/recipes/{id}")))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.recipe_repo.recipe_count(), 1);
}

#[tokio::test]
async fn cors_preflight_allows_the_frontend_origin() {
    let app = spawn_app().await;

    let response = Client::new()
        .request(Method::OPTIONS, app.api_url("/recipes"))
        .header("Origin", FRONTEND_ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers["access-control-allow-origin"].to_str().unwrap(),
        FRONTEND_ORIGIN
    );
    assert_eq!(
        headers["access-control-allow-credentials"].to_str().unwrap(),
        "true"
    );
    assert!(
        headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("authorization")
    );
}

#[tokio::test]
async fn cors_ignores_other_origins() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/recipes"))
        .header("Origin", "https://evil.example")
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .expect("Failed to execute request");

    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = spawn_app().await;

    let response = Client::new()
        .get(app.api_url("/recipes"))
        .bearer_auth(ALICE_TOKEN)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
}
