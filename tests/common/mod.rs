#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use pearmonie_client::api::ApiClient;
use pearmonie_client::config::AppConfig;
use pearmonie_client::models::LoginRequest;
use pearmonie_client::session::SessionStore;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "Secret#123";

#[derive(Clone)]
struct StubUser {
    id: i64,
    name: String,
    email: String,
    password: String,
}

/// In-memory backend state; tests reach in to seed data or inject failures
#[derive(Default)]
pub struct StubState {
    users: Vec<StubUser>,
    tokens: HashMap<String, i64>,
    pub products: Vec<Value>,
    next_product_id: i64,
    pub fail_list: bool,
    pub fail_delete: HashSet<i64>,
    pub last_product_body: Option<Value>,
}

impl StubState {
    pub fn tokens_contains(&self, token: &str) -> bool {
        self.tokens.contains_key(token)
    }
}

type Shared = Arc<Mutex<StubState>>;

pub struct StubServer {
    pub port: u16,
    pub base_url: String,
    pub state: Shared,
}

impl StubServer {
    /// Seed `count` products named "Item 1".."Item N"; even ids are Tools, odd ids Paint
    pub fn seed_products(&self, count: i64) {
        let mut state = self.state.lock().unwrap();
        for _ in 0..count {
            state.next_product_id += 1;
            let id = state.next_product_id;
            let kind = if id % 2 == 0 { "Tools" } else { "Paint" };
            state.products.push(json!({
                "id": id,
                "name": format!("Item {}", id),
                "model": format!("M-{}", id),
                "type": kind,
                "store": "North",
                "price": "9.99",
                "image": format!("https://img/{}.png", id),
                "stock": 5,
                "user": 1
            }));
        }
    }

    pub fn product_count(&self) -> usize {
        self.state.lock().unwrap().products.len()
    }

    pub fn client(&self) -> Result<ApiClient> {
        let config = AppConfig::for_base_url(&self.base_url);
        Ok(ApiClient::new(&config.api, SessionStore::in_memory(7))?)
    }

    /// A client already logged in as the seeded user
    pub async fn logged_in_client(&self) -> Result<ApiClient> {
        let client = self.client()?;
        client
            .login(&LoginRequest {
                email: EMAIL.to_string(),
                password: PASSWORD.to_string(),
                remember_me: false,
            })
            .await?;
        Ok(client)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if client.get(format!("{}/api/home/", self.base_url)).send().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("stub server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start a fresh stub API on an unused port inside the current test runtime
pub async fn ensure_server() -> Result<StubServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    state.lock().unwrap().users.push(StubUser {
        id: 1,
        name: "Ada Lovelace".to_string(),
        email: EMAIL.to_string(),
        password: PASSWORD.to_string(),
    });

    let app = Router::new()
        .route("/api/home/", get(home))
        .route("/api/login/", post(login))
        .route("/api/signup/", post(signup))
        .route("/api/logout/", post(logout))
        .route("/api/forgot-password/", post(forgot_password))
        .route("/api/verify-otp", post(verify_otp))
        .route("/api/dashboard/", get(dashboard))
        .route("/api/products/", get(list_products).post(create_product))
        .route("/api/products/:id/", put(update_product).delete(delete_product))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind stub server")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = StubServer { port, base_url, state };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Base URL nothing listens on
pub fn dead_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Token "))
        .map(str::to_string)
}

fn authenticate(state: &StubState, headers: &HeaderMap) -> Result<i64, Response> {
    bearer(headers)
        .and_then(|token| state.tokens.get(&token).copied())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Authentication credentials were not provided." })),
            )
                .into_response()
        })
}

fn user_json(user: &StubUser) -> Value {
    json!({ "id": user.id, "name": user.name, "email": user.email })
}

async fn home(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    let found = bearer(&headers).and_then(|token| {
        let user_id = state.tokens.get(&token)?;
        let user = state.users.iter().find(|u| u.id == *user_id)?;
        Some((token, user_json(user)))
    });
    match found {
        Some((token, user)) => Json(json!({ "authenticated": true, "token": token, "user": user })).into_response(),
        None => Json(json!({ "authenticated": false })).into_response(),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(user) = state.users.iter().find(|u| u.email == email).cloned() else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "User not found" }))).into_response();
    };
    if user.password != password {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Incorrect password" }))).into_response();
    }

    let token = uuid::Uuid::new_v4().simple().to_string();
    state.tokens.insert(token.clone(), user.id);
    Json(json!({ "token": token, "user": user_json(&user) })).into_response()
}

async fn signup(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.users.iter().any(|u| u.email == email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "email": "user with this email already exists." } })),
        )
            .into_response();
    }

    let user = StubUser {
        id: state.users.len() as i64 + 1,
        name: body["name"].as_str().unwrap_or_default().to_string(),
        email,
        password: body["password"].as_str().unwrap_or_default().to_string(),
    };
    let token = uuid::Uuid::new_v4().simple().to_string();
    state.tokens.insert(token.clone(), user.id);
    let response = json!({ "token": token, "user": user_json(&user) });
    state.users.push(user);
    (StatusCode::CREATED, Json(response)).into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }
    if let Some(token) = bearer(&headers) {
        state.tokens.remove(&token);
    }
    Json(json!({ "message": "Successfully logged out" })).into_response()
}

async fn forgot_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    if state.users.iter().any(|u| u.email == email) {
        Json(json!({ "message": "Reset email sent" })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User with provided email does not exist" })),
        )
            .into_response()
    }
}

async fn verify_otp(Json(_body): Json<Value>) -> Response {
    Json(json!({ "message": "OTP verified" })).into_response()
}

async fn dashboard(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }
    let low_stock = state
        .products
        .iter()
        .filter(|p| p["stock"].as_i64().unwrap_or_default() < 10)
        .count();
    Json(json!([
        { "title": "Total Products", "description": state.products.len().to_string() },
        { "title": "Low Stock Items", "description": low_stock.to_string() },
    ]))
    .into_response()
}

async fn list_products(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let state = state.lock().unwrap();
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }
    if state.fail_list {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "database unavailable" }))).into_response();
    }
    Json(Value::Array(state.products.clone())).into_response()
}

/// Mirror the server serializer: price comes back as two-decimal text
fn stored_product(id: i64, body: &Value, user: Option<i64>) -> Value {
    let mut product = body.clone();
    product["id"] = json!(id);
    if let Some(price) = body["price"].as_f64() {
        product["price"] = json!(format!("{:.2}", price));
    }
    if let Some(user) = user {
        product["user"] = json!(user);
    }
    product
}

async fn create_product(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    let user_id = match authenticate(&state, &headers) {
        Ok(id) => id,
        Err(rejection) => return rejection,
    };
    state.last_product_body = Some(body.clone());

    let name = body["name"].as_str().unwrap_or_default();
    if state.products.iter().any(|p| p["name"] == name) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "name": ["products with this name already exists."] })),
        )
            .into_response();
    }

    state.next_product_id += 1;
    let product = stored_product(state.next_product_id, &body, Some(user_id));
    state.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }
    state.last_product_body = Some(body.clone());

    let Some(existing) = state.products.iter_mut().find(|p| p["id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response();
    };
    let user = existing["user"].as_i64();
    *existing = stored_product(id, &body, user);
    Json(existing.clone()).into_response()
}

async fn delete_product(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let mut state = state.lock().unwrap();
    if let Err(rejection) = authenticate(&state, &headers) {
        return rejection;
    }
    if state.fail_delete.contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("could not delete product {}", id) })),
        )
            .into_response();
    }
    let before = state.products.len();
    state.products.retain(|p| p["id"] != id);
    if state.products.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
