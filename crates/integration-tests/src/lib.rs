//! Integration test support for Kapee.
//!
//! [`MockApi`] is an in-process stand-in for the shop backend, served by
//! `axum` on an ephemeral localhost port. It keeps accounts, orders and
//! newsletter subscribers in memory and counts hits per route so tests can
//! assert that a call was (or was not) made.
//!
//! # Seeded accounts
//!
//! | id   | name         | email               | password       | role    |
//! |------|--------------|---------------------|----------------|---------|
//! | `u1` | Grace Hopper | `grace@example.com` | `admin-pass`   | `Admin` |
//! | `u2` | Ada Lovelace | `ada@example.com`   | `shopper-pass` | `user`  |
//!
//! A login token is `token-<id>`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kapee-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

use kapee_storefront::api::ApiClient;

pub const ADMIN_EMAIL: &str = "grace@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const SHOPPER_EMAIL: &str = "ada@example.com";
pub const SHOPPER_PASSWORD: &str = "shopper-pass";

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone)]
struct Account {
    id: String,
    name: String,
    email: String,
    password: String,
    role: String,
}

impl Account {
    fn token(&self) -> String {
        format!("token-{}", self.id)
    }

    fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }

    fn auth_response(&self) -> Value {
        json!({
            "user": {
                "id": self.id,
                "fullname": self.name,
                "email": self.email,
                "userRole": self.role,
            },
            "token": self.token(),
        })
    }

    fn managed_view(&self) -> Value {
        json!({
            "_id": self.id,
            "username": self.name,
            "email": self.email,
            "role": self.role,
        })
    }
}

#[derive(Debug, Default)]
struct MockState {
    accounts: Vec<Account>,
    next_account: u32,
    orders: Vec<Value>,
    subscribers: Vec<String>,
    hits: HashMap<&'static str, usize>,
    fail_orders: bool,
}

impl MockState {
    fn seeded() -> Self {
        let mut state = Self::default();
        state.add_account("Grace Hopper", ADMIN_EMAIL, ADMIN_PASSWORD, "Admin");
        state.add_account("Ada Lovelace", SHOPPER_EMAIL, SHOPPER_PASSWORD, "user");
        state
    }

    fn add_account(&mut self, name: &str, email: &str, password: &str, role: &str) -> &Account {
        self.next_account += 1;
        self.accounts.push(Account {
            id: format!("u{}", self.next_account),
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
            role: role.to_owned(),
        });
        self.accounts.last().unwrap()
    }

    fn hit(&mut self, route: &'static str) {
        *self.hits.entry(route).or_default() += 1;
    }

    fn bearer(&self, headers: &HeaderMap) -> Option<&Account> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        self.accounts.iter().find(|a| a.token() == token)
    }

    /// `Ok(())` for an admin bearer, otherwise the rejection to send.
    fn require_admin(&self, headers: &HeaderMap) -> Result<(), Response> {
        match self.bearer(headers) {
            Some(account) if account.is_admin() => Ok(()),
            Some(_) => Err(reject(StatusCode::FORBIDDEN, "Admin access required")),
            None => Err(reject(StatusCode::UNAUTHORIZED, "Not authorized, no token")),
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap()
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn str_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

// =============================================================================
// Handlers
// =============================================================================

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.hit("POST /api/users/login");

    let email = str_field(&body, "email").unwrap_or_default();
    let password = str_field(&body, "password").unwrap_or_default();
    match state
        .accounts
        .iter()
        .find(|a| a.email == email && a.password == password)
    {
        Some(account) => Json(account.auth_response()).into_response(),
        None => reject(StatusCode::UNAUTHORIZED, "Invalid credentials"),
    }
}

/// Serves both storefront sign-up (`fullname`) and admin account creation
/// (`username` + `role`).
async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.hit("POST /api/users/register");

    let email = str_field(&body, "email").unwrap_or_default().to_owned();
    if email.is_empty() {
        return reject(StatusCode::BAD_REQUEST, "Email is required");
    }
    if state.accounts.iter().any(|a| a.email == email) {
        return reject(StatusCode::BAD_REQUEST, "User already exists");
    }

    let name = str_field(&body, "fullname")
        .or_else(|| str_field(&body, "username"))
        .unwrap_or_default()
        .to_owned();
    let password = str_field(&body, "password").unwrap_or_default().to_owned();
    let role = str_field(&body, "role").unwrap_or("user").to_owned();

    let account = state.add_account(&name, &email, &password, &role);
    (StatusCode::CREATED, Json(account.auth_response())).into_response()
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.hit("GET /api/users/users");
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }

    let users: Vec<Value> = state.accounts.iter().map(Account::managed_view).collect();
    Json(users).into_response()
}

async fn update_user(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.hit("PUT /api/users/users/{id}");
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }

    let Some(account) = state.accounts.iter_mut().find(|a| a.id == id) else {
        return reject(StatusCode::NOT_FOUND, "User not found");
    };
    if let Some(name) = str_field(&body, "username") {
        name.clone_into(&mut account.name);
    }
    if let Some(email) = str_field(&body, "email") {
        email.clone_into(&mut account.email);
    }
    if let Some(password) = str_field(&body, "password") {
        password.clone_into(&mut account.password);
    }
    if let Some(role) = str_field(&body, "role") {
        role.clone_into(&mut account.role);
    }
    Json(account.managed_view()).into_response()
}

async fn delete_user(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = lock(&state);
    state.hit("DELETE /api/users/users/{id}");
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }

    let before = state.accounts.len();
    state.accounts.retain(|a| a.id != id);
    if state.accounts.len() == before {
        return reject(StatusCode::NOT_FOUND, "User not found");
    }
    Json(json!({ "message": "User deleted" })).into_response()
}

async fn list_orders(State(state): State<Shared>) -> Response {
    let mut state = lock(&state);
    state.hit("GET /api/orders/create");
    Json(state.orders.clone()).into_response()
}

async fn create_order(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.hit("POST /api/orders/create");
    if state.fail_orders {
        return reject(StatusCode::INTERNAL_SERVER_ERROR, "Order service down");
    }

    body["_id"] = json!(uuid::Uuid::new_v4().simple().to_string());
    state.orders.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    state.hit("PUT /api/orders/create/{id}");

    let Some(order) = state.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return reject(StatusCode::NOT_FOUND, "Order not found");
    };
    if let Some(status) = body.get("status") {
        order["status"] = status.clone();
    }
    Json(order.clone()).into_response()
}

async fn delete_order(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    state.hit("DELETE /api/orders/create/{id}");

    let before = state.orders.len();
    state.orders.retain(|o| o["_id"] != id.as_str());
    if state.orders.len() == before {
        return reject(StatusCode::NOT_FOUND, "Order not found");
    }
    Json(json!({ "message": "Order deleted" })).into_response()
}

async fn subscribe(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.hit("POST /api/subscribe");

    let email = str_field(&body, "email").unwrap_or_default().to_owned();
    if state.subscribers.contains(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Email already subscribed" })),
        )
            .into_response();
    }
    state.subscribers.push(email);
    (StatusCode::CREATED, Json(json!({ "message": "Subscribed" }))).into_response()
}

async fn admin_me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = lock(&state);
    state.hit("GET /api/admin/me");
    if let Err(rejection) = state.require_admin(&headers) {
        return rejection;
    }
    let name = state.bearer(&headers).map(|a| a.name.clone());
    Json(json!({ "name": name })).into_response()
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/users/login", post(login))
        .route("/api/users/register", post(register))
        .route("/api/users/users", get(list_users))
        .route("/api/users/users/{id}", put(update_user).delete(delete_user))
        .route("/api/orders/create", get(list_orders).post(create_order))
        .route(
            "/api/orders/create/{id}",
            put(update_order).delete(delete_order),
        )
        .route("/api/subscribe", post(subscribe))
        .route("/api/admin/me", get(admin_me))
        .with_state(state)
}

// =============================================================================
// Server
// =============================================================================

/// A running mock shop API. The server stops when this is dropped.
pub struct MockApi {
    base_url: Url,
    state: Shared,
    task: JoinHandle<()>,
}

impl MockApi {
    /// Start a server with the seeded accounts on an ephemeral port.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::seeded()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = router(Arc::clone(&state));
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
            task,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// A storefront API client pointed at this server.
    #[must_use]
    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(self.base_url()).unwrap()
    }

    /// How many requests reached `route` (e.g. `"POST /api/users/register"`).
    #[must_use]
    pub fn hits(&self, route: &str) -> usize {
        lock(&self.state).hits.get(route).copied().unwrap_or(0)
    }

    /// Make order creation fail with a 500 until switched back.
    pub fn fail_orders(&self, fail: bool) {
        lock(&self.state).fail_orders = fail;
    }

    /// Store `order` as-is, as if another client had created it.
    pub fn insert_order(&self, order: Value) {
        lock(&self.state).orders.push(order);
    }

    /// Orders as stored by the server.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state).orders.clone()
    }

    #[must_use]
    pub fn subscribers(&self) -> Vec<String> {
        lock(&self.state).subscribers.clone()
    }

    /// The bearer token the server issues for `email`.
    #[must_use]
    pub fn token_for(&self, email: &str) -> Option<String> {
        lock(&self.state)
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(Account::token)
    }
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}
