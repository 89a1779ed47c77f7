use std::sync::Arc;

use axum::http::HeaderValue;
use reqwest::multipart::{Form, Part};
use scranbook::application::routes::app_router;
use scranbook::application::state::{AppState, AppStateConfig};
use scranbook::domain::ids::UserId;
use scranbook::domain::users::User;
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use wiremock::MockServer;

use crate::fakes::{FakeIdentity, InMemoryImageStore, InMemoryRecipeRepository};

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const OPENAI_KEY: &str = "test-openai-key";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";
pub const MODEL_PATH: &str = "/v1/chat/completions";

pub struct TestApp {
    pub address: String,
    pub alice: UserId,
    pub bob: UserId,
    pub recipe_repo: Arc<InMemoryRecipeRepository>,
    pub image_store: Arc<InMemoryImageStore>,
    pub mock_server: MockServer,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let mock_server = MockServer::start().await;

    let alice = UserId::new(uuid::Uuid::new_v4().to_string());
    let bob = UserId::new(uuid::Uuid::new_v4().to_string());
    let identity = FakeIdentity::default()
        .with_user(
            ALICE_TOKEN,
            User::new(alice.clone(), Some("alice@example.com".to_string())),
        )
        .with_user(BOB_TOKEN, User::new(bob.clone(), None));

    let recipe_repo = Arc::new(InMemoryRecipeRepository::default());
    let image_store = Arc::new(InMemoryImageStore::default());

    let state = AppState::new(
        Arc::new(identity),
        image_store.clone(),
        recipe_repo.clone(),
        AppStateConfig {
            openai_url: format!("{}{MODEL_PATH}", mock_server.uri()),
            openai_api_key: OPENAI_KEY.to_string(),
            openai_model: "gpt-4o".to_string(),
            allowed_origin: HeaderValue::from_static(FRONTEND_ORIGIN),
        },
    );

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{}", local_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        alice,
        bob,
        recipe_repo,
        image_store,
        mock_server,
        server_handle,
    }
}

/// Multipart form with a single `file` part.
pub fn image_form(filename: &str, content_type: &str, bytes: Vec<u8>) -> Form {
    let part = Part::bytes(bytes)
        .file_name(filename.to_string())
        .mime_str(content_type)
        .expect("valid content type");
    Form::new().part("file", part)
}

pub fn soup() -> serde_json::Value {
    serde_json::json!({
        "name": "Soup",
        "ingredients": [
            { "name": "Water", "amount": 1, "unit": "l" },
            { "name": "Salt", "amount": 0.5, "unit": "tsp" }
        ],
        "steps": ["Boil water", "Add salt"],
        "image_url": null
    })
}

/// POST a recipe as `token` and return its id.
pub async fn save_recipe(app: &TestApp, token: &str, payload: &serde_json::Value) -> String {
    let response = reqwest::Client::new()
        .post(app.api_url("/recipes"))
        .bearer_auth(token)
        .json(payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    body["id"]
        .as_str()
        .expect("response carries an id")
        .to_string()
}
