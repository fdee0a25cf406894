//! # Store API
//!
//! The REST endpoints the storefront uses, behind the [`StoreApi`] trait.
//!
//! ## Endpoints
//! ```text
//! ┌──────────────────────────────┬──────────┬──────────────────────────────┐
//! │ path                         │ auth     │ returns                      │
//! ├──────────────────────────────┼──────────┼──────────────────────────────┤
//! │ GET  /products?featured=true │ -        │ ProductsResponse             │
//! │ GET  /products?<query>       │ -        │ ProductsResponse             │
//! │ GET  /products/:id           │ -        │ SingleProductResponse        │
//! │ POST /auth/local/register    │ -        │ AuthResponse                 │
//! │ POST /auth/local             │ -        │ AuthResponse                 │
//! │ POST /orders                 │ Bearer   │ (ignored)                    │
//! │ GET  /orders?page=N          │ Bearer   │ OrdersResponse               │
//! └──────────────────────────────┴──────────┴──────────────────────────────┘
//! ```
//!
//! Error bodies look like `{"error": {"message": "..."}}`; the message is
//! surfaced as-is so it can be shown to the user.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use comfy_core::{CheckoutInfo, OrdersResponse, Product, ProductQuery, ProductsResponse, SingleProductResponse, User};

use crate::config::ClientConfig;
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `POST /auth/local`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Username or e-mail.
    pub identifier: String,
    pub password: String,
}

/// Body of `POST /auth/local/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful auth response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: AuthUser,
}

/// User block of an auth response (other fields ignored).
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub username: String,
}

impl AuthResponse {
    /// The session record kept in local state.
    pub fn into_user(self) -> User {
        User {
            username: self.user.username,
            jwt: self.jwt,
        }
    }
}

/// `{"data": ...}` envelope of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
struct OrderEnvelope<'a> {
    data: &'a CheckoutInfo,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

// =============================================================================
// Trait
// =============================================================================

/// The store's REST API.
///
/// Each call is a single request: no retries, no caching.
#[allow(async_fn_in_trait)]
pub trait StoreApi {
    /// Landing-page products.
    async fn featured_products(&self) -> StoreResult<ProductsResponse>;

    /// Filtered, paginated listing.
    async fn products(&self, query: &ProductQuery) -> StoreResult<ProductsResponse>;

    /// One product by id.
    async fn product(&self, id: u64) -> StoreResult<Product>;

    async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse>;

    async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse>;

    /// Places an order for the bearer of `token`.
    async fn create_order(&self, token: &str, order: &CheckoutInfo) -> StoreResult<()>;

    /// One page of the bearer's order history.
    async fn orders(&self, token: &str, page: u32) -> StoreResult<OrdersResponse>;
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`StoreApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStoreApi {
    /// Builds a client from configuration.
    pub fn new(config: &ClientConfig) -> StoreResult<Self> {
        let base_url = config.base_url()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        debug!(base_url = %base_url, timeout_secs = config.timeout.as_secs(), "Store API client ready");

        Ok(HttpStoreApi { client, base_url })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> StoreResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(request = %what, error = %e, "Request failed");
            StoreError::from(e)
        })?;

        let response = Self::check_status(what, response).await?;
        let body = response.json::<T>().await?;
        Ok(body)
    }

    /// Turns an error status into a `StoreError` carrying the API's message.
    async fn check_status(what: &str, response: Response) -> StoreResult<Response> {
        let status = response.status();
        if status.is_success() {
            debug!(request = %what, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        warn!(request = %what, status = status.as_u16(), message = %message, "API error");

        Err(match status {
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
            _ => StoreError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

impl StoreApi for HttpStoreApi {
    async fn featured_products(&self) -> StoreResult<ProductsResponse> {
        let request = self
            .client
            .get(self.url("/products"))
            .query(&[("featured", "true")]);
        self.send("featured products", request).await
    }

    async fn products(&self, query: &ProductQuery) -> StoreResult<ProductsResponse> {
        let request = self
            .client
            .get(self.url("/products"))
            .query(&query.to_params());
        self.send("products", request).await
    }

    async fn product(&self, id: u64) -> StoreResult<Product> {
        let request = self.client.get(self.url(&format!("/products/{}", id)));
        let response: SingleProductResponse = self.send("product", request).await?;
        Ok(response.data)
    }

    async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse> {
        let request = self
            .client
            .post(self.url("/auth/local/register"))
            .json(request);
        self.send("register", request).await
    }

    async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse> {
        let request = self.client.post(self.url("/auth/local")).json(request);
        self.send("login", request).await
    }

    async fn create_order(&self, token: &str, order: &CheckoutInfo) -> StoreResult<()> {
        let request = self
            .client
            .post(self.url("/orders"))
            .bearer_auth(token)
            .json(&OrderEnvelope { data: order });

        let response = request.send().await?;
        Self::check_status("create order", response).await?;
        Ok(())
    }

    async fn orders(&self, token: &str, page: u32) -> StoreResult<OrdersResponse> {
        let request = self
            .client
            .get(self.url("/orders"))
            .bearer_auth(token)
            .query(&[("page", page.to_string())]);
        self.send("orders", request).await
    }
}
