//! Integration test support for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! [`MockStockApi`] serves `GET /stock/{id}` and `GET /products/{id}` from
//! in-memory tables on an ephemeral loopback port, so tests exercise the
//! real `StockClient` over HTTP without any external service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rocketshoes_cart::{StockApiConfig, StockClient};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory stock/product API.
#[derive(Clone, Default)]
pub struct MockStockApi {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    stock: Mutex<HashMap<i32, i64>>,
    products: Mutex<HashMap<i32, Value>>,
    failing: AtomicBool,
    required_token: Mutex<Option<String>>,
    stock_hits: AtomicUsize,
    product_hits: AtomicUsize,
}

/// A running mock server. The server stops when this is dropped.
pub struct RunningApi {
    pub addr: SocketAddr,
    pub api: MockStockApi,
    handle: JoinHandle<()>,
}

impl Drop for RunningApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl RunningApi {
    /// Base URL of the server, e.g. `http://127.0.0.1:49152/`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// A `StockClient` pointed at this server.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> StockClient {
        let config = StockApiConfig::new(&self.base_url()).expect("valid mock URL");
        StockClient::new(&config).expect("client builds")
    }
}

impl MockStockApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with the given stock level.
    #[must_use]
    pub fn with_product(self, id: i32, title: &str, price: f64, stock: i64) -> Self {
        self.set_stock(id, stock);
        lock(&self.inner.products).insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.rocketshoes.test/{id}.jpg"),
            }),
        );
        self
    }

    /// Register a stock level without product metadata.
    pub fn set_stock(&self, id: i32, amount: i64) {
        lock(&self.inner.stock).insert(id, amount);
    }

    /// Make every request answer 500 until reset.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Require `Authorization: Bearer <token>` on every request.
    #[must_use]
    pub fn requiring_token(self, token: &str) -> Self {
        *lock(&self.inner.required_token) = Some(format!("Bearer {token}"));
        self
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.inner.stock_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.inner.product_hits.load(Ordering::SeqCst)
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/stock/{id}", get(stock_handler))
            .route("/products/{id}", get(product_handler))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral loopback port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(self) -> RunningApi {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let router = self.router();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        RunningApi {
            addr,
            api: self,
            handle,
        }
    }

    /// Common request gate: failure mode and token check.
    fn gate(&self, headers: &HeaderMap) -> Option<Response> {
        if self.inner.failing.load(Ordering::SeqCst) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "stock backend down").into_response());
        }
        let required = lock(&self.inner.required_token).clone();
        if let Some(required) = required {
            let presented = headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());
            if presented != Some(required.as_str()) {
                return Some(StatusCode::UNAUTHORIZED.into_response());
            }
        }
        None
    }
}

async fn stock_handler(
    State(api): State<MockStockApi>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    api.inner.stock_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(rejection) = api.gate(&headers) {
        return rejection;
    }
    let amount = lock(&api.inner.stock).get(&id).copied();
    match amount {
        Some(amount) => Json(json!({ "id": id, "amount": amount })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product_handler(
    State(api): State<MockStockApi>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    api.inner.product_hits.fetch_add(1, Ordering::SeqCst);
    if let Some(rejection) = api.gate(&headers) {
        return rejection;
    }
    let product = lock(&api.inner.products).get(&id).cloned();
    match product {
        Some(product) => Json(product).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
