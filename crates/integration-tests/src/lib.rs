//! End-to-end test harness for DevBurger.
//!
//! Starts an in-process mock of the DevBurger REST API that records every
//! write it receives, then serves the real storefront and admin routers
//! against it on ephemeral ports. Tests drive both sites with a
//! cookie-keeping `reqwest` client, the same way a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p devburger-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const CUSTOMER_EMAIL: &str = "maria@devburger.com";
pub const ADMIN_EMAIL: &str = "admin@devburger.com";
pub const PASSWORD: &str = "123456";
pub const CUSTOMER_TOKEN: &str = "customer-token";
pub const ADMIN_TOKEN: &str = "admin-token";

/// Ids of the seeded orders, one per status.
pub const PLACED_ORDER: &str = "6650f0c2e4b0a1b2c3d4e5f1";
pub const READY_ORDER: &str = "6650f0c2e4b0a1b2c3d4e5f2";
pub const DELIVERED_ORDER: &str = "6650f0c2e4b0a1b2c3d4e5f3";

// =============================================================================
// Recorded Requests
// =============================================================================

/// One part of a recorded multipart body.
#[derive(Debug, Clone)]
pub struct RecordedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl RecordedPart {
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

#[derive(Debug, Clone)]
pub enum RecordedBody {
    Json(Value),
    Multipart(Vec<RecordedPart>),
}

/// A write the mock API received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub token: Option<String>,
    pub body: RecordedBody,
}

impl RecordedRequest {
    /// A multipart field by name.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&RecordedPart> {
        match &self.body {
            RecordedBody::Multipart(parts) => parts.iter().find(|p| p.name == name),
            RecordedBody::Json(_) => None,
        }
    }

    #[must_use]
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            RecordedBody::Json(value) => Some(value),
            RecordedBody::Multipart(_) => None,
        }
    }
}

// =============================================================================
// Mock API
// =============================================================================

#[derive(Default)]
struct MockState {
    requests: Vec<RecordedRequest>,
    orders: Vec<Value>,
    tokens_revoked: bool,
}

type Shared = Arc<Mutex<MockState>>;

/// Handle to a running mock DevBurger API.
#[derive(Clone)]
pub struct MockApi {
    url: Url,
    state: Shared,
}

impl MockApi {
    /// Start the mock on an ephemeral port with the seed catalog and orders.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            orders: seed_orders(),
            ..MockState::default()
        }));

        let router = Router::new()
            .route("/categories", get(list_categories).post(create_category))
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", put(update_product))
            .route("/orders", get(list_orders).post(create_order))
            .route("/orders/{id}", put(update_order))
            .route("/sessions", axum::routing::post(login))
            .route("/users", axum::routing::post(register))
            .with_state(Arc::clone(&state));

        let (listener, addr) = bind().await;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/").parse().unwrap(),
            state,
        }
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Every write received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// The latest write to `method path`.
    #[must_use]
    pub fn last(&self, method: &str, path: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
    }

    /// Make every bearer token fail from now on, as if it had expired.
    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().tokens_revoked = true;
    }
}

fn categories() -> Value {
    json!([
        { "id": 1, "name": "Hambúrgueres", "path": "burger.png",
          "url": "http://localhost:3001/category-file/burger.png" },
        { "id": 2, "name": "Bebidas", "path": "drinks.png",
          "url": "http://localhost:3001/category-file/drinks.png" }
    ])
}

fn products() -> Value {
    json!([
        { "id": 1, "name": "X-Salada", "price": 2500, "category_id": 1,
          "category": { "id": 1, "name": "Hambúrgueres" },
          "path": "x-salada.png", "url": "http://localhost:3001/product-file/x-salada.png",
          "offer": true },
        { "id": 2, "name": "Coca-Cola", "price": 800, "category_id": 2,
          "category": { "id": 2, "name": "Bebidas" },
          "path": "coca.png", "url": "http://localhost:3001/product-file/coca.png",
          "offer": false }
    ])
}

fn seed_orders() -> Vec<Value> {
    let order = |id: &str, customer: &str, status: &str, day: u32| {
        json!({
            "_id": id,
            "user": { "id": format!("user-{day}"), "name": customer },
            "products": [
                { "id": 1, "name": "X-Salada", "price": 2500, "category": "Hambúrgueres",
                  "url": "http://localhost:3001/product-file/x-salada.png", "quantity": 2 }
            ],
            "status": status,
            "createdAt": format!("2024-11-{day:02}T19:45:00.000Z"),
        })
    };

    vec![
        order(PLACED_ORDER, "Ana Placed", "Pedido realizado", 1),
        order(READY_ORDER, "Bruno Ready", "Pedido pronto", 2),
        order(DELIVERED_ORDER, "Carla Delivered", "Pedido entregue", 3),
    ]
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Token invalid" })),
    )
        .into_response()
}

/// The caller's token, if it is one the mock accepts.
fn authorize(state: &Shared, headers: &HeaderMap, admin_only: bool) -> Option<String> {
    let token = bearer(headers)?;
    if state.lock().unwrap().tokens_revoked {
        return None;
    }
    match token.as_str() {
        ADMIN_TOKEN => Some(token),
        CUSTOMER_TOKEN if !admin_only => Some(token),
        _ => None,
    }
}

fn record(state: &Shared, method: &'static str, path: String, token: Option<String>, body: RecordedBody) {
    state.lock().unwrap().requests.push(RecordedRequest {
        method,
        path,
        token,
        body,
    });
}

async fn read_parts(mut multipart: Multipart) -> Vec<RecordedPart> {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(RecordedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    parts
}

async fn list_categories() -> Json<Value> {
    Json(categories())
}

async fn list_products() -> Json<Value> {
    Json(products())
}

async fn create_category(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    let Some(token) = authorize(&state, &headers, true) else {
        return unauthorized();
    };
    let parts = read_parts(multipart).await;
    record(&state, "POST", "/categories".into(), Some(token), RecordedBody::Multipart(parts));
    (StatusCode::CREATED, Json(json!({ "id": 3 }))).into_response()
}

async fn create_product(State(state): State<Shared>, headers: HeaderMap, multipart: Multipart) -> Response {
    let Some(token) = authorize(&state, &headers, true) else {
        return unauthorized();
    };
    let parts = read_parts(multipart).await;
    record(&state, "POST", "/products".into(), Some(token), RecordedBody::Multipart(parts));
    (StatusCode::CREATED, Json(json!({ "id": 3 }))).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Response {
    let Some(token) = authorize(&state, &headers, true) else {
        return unauthorized();
    };
    let parts = read_parts(multipart).await;
    record(&state, "PUT", format!("/products/{id}"), Some(token), RecordedBody::Multipart(parts));
    StatusCode::OK.into_response()
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if authorize(&state, &headers, false).is_none() {
        return unauthorized();
    }
    Json(Value::Array(state.lock().unwrap().orders.clone())).into_response()
}

async fn create_order(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let Some(token) = authorize(&state, &headers, false) else {
        return unauthorized();
    };
    record(&state, "POST", "/orders".into(), Some(token), RecordedBody::Json(body));
    (StatusCode::CREATED, Json(json!({ "_id": "6650f0c2e4b0a1b2c3d4e5f9" }))).into_response()
}

async fn update_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let Some(token) = authorize(&state, &headers, true) else {
        return unauthorized();
    };
    record(&state, "PUT", format!("/orders/{id}"), Some(token), RecordedBody::Json(body.clone()));

    let mut guard = state.lock().unwrap();
    let Some(order) = guard.orders.iter_mut().find(|o| o["_id"] == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Order not found" }))).into_response();
    };
    order["status"] = body["status"].clone();
    Json(json!({ "message": "Status updated sucessfully" })).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let user = match (body["email"].as_str(), body["password"].as_str()) {
        (Some(CUSTOMER_EMAIL), Some(PASSWORD)) => json!({
            "id": "2c6f5a4e-0000-4000-8000-000000000001",
            "name": "Maria Silva",
            "email": CUSTOMER_EMAIL,
            "admin": false,
            "token": CUSTOMER_TOKEN,
        }),
        (Some(ADMIN_EMAIL), Some(PASSWORD)) => json!({
            "id": "2c6f5a4e-0000-4000-8000-000000000002",
            "name": "Rodolfo Admin",
            "email": ADMIN_EMAIL,
            "admin": true,
            "token": ADMIN_TOKEN,
        }),
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Make sure your email or password are correct" })),
            )
                .into_response();
        }
    };
    Json(user).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if matches!(body["email"].as_str(), Some(CUSTOMER_EMAIL | ADMIN_EMAIL)) {
        return (StatusCode::CONFLICT, Json(json!({ "error": "User already exists" }))).into_response();
    }
    record(&state, "POST", "/users".into(), None, RecordedBody::Json(body));
    StatusCode::CREATED.into_response()
}

// =============================================================================
// Sites Under Test
// =============================================================================

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Serve a site router. Peer addresses are exposed for the rate limiters.
fn serve(listener: TcpListener, router: Router) {
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
}

/// Start the storefront against `api`, returning its base URL.
pub async fn start_storefront(api: &MockApi) -> String {
    use devburger_storefront::{app, config::StorefrontConfig, state::AppState};

    let (listener, addr) = bind().await;
    let base_url = format!("http://{addr}");
    let config = StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: base_url.clone(),
        session_secret: SecretString::from("s".repeat(48)),
        api_url: api.url().clone(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
    };
    serve(listener, app(AppState::new(config).unwrap()));
    base_url
}

/// Start the admin panel against `api`, returning its base URL.
pub async fn start_admin(api: &MockApi) -> String {
    use devburger_admin::{app, config::AdminConfig, state::AppState};

    let (listener, addr) = bind().await;
    let base_url = format!("http://{addr}");
    let config = AdminConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: base_url.clone(),
        session_secret: SecretString::from("a".repeat(48)),
        api_url: api.url().clone(),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
    };
    serve(listener, app(AppState::new(config).unwrap()));
    base_url
}

/// A cookie-keeping client that follows redirects like a browser.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap()
}

/// Log in through a site's `/auth/login` form.
pub async fn log_in(client: &reqwest::Client, base_url: &str, email: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/auth/login"))
        .form(&[("email", email), ("password", PASSWORD)])
        .send()
        .await
        .unwrap()
}
