//! DevBurger REST API client implementation.
//!
//! Uses `reqwest` for HTTP. Caches categories and products using `moka`
//! (60-second TTL) because every storefront page reads them.

use std::sync::Arc;
use std::time::Duration;

use devburger_core::{Category, Order, OrderId, OrderRequest, OrderStatus, Product, ProductId};
use moka::future::Cache;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::{CacheKey, CacheValue};
use crate::types::{AuthToken, CategoryPayload, NewUser, ProductPayload, SessionUser};
use crate::ApiError;

/// Catalog cache lifetime.
const CATALOG_TTL: Duration = Duration::from_secs(60);

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the DevBurger REST API.
///
/// Cheap to clone; all clones share the connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(CATALOG_TTL)
            .build();

        // Url::join drops the last path segment unless it ends with '/'
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                cache,
            }),
        })
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// `<base>/<collection>/<id>`, with `id` percent-encoded as one segment.
    fn item_url(&self, collection: &str, id: &str) -> Result<Url, ApiError> {
        // `Url` drops dot segments, which would address the collection itself
        if matches!(id, "" | "." | "..") {
            return Err(ApiError::NotFound(format!("{collection}/{id}")));
        }
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(collection)
            .push(id);
        Ok(url)
    }

    /// Send a request and map non-success statuses to [`ApiError`].
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_server_error() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "DevBurger API returned server error"
            );
        } else {
            debug!(status = %status, "DevBurger API rejected request");
        }
        Err(ApiError::from_status(status, &body))
    }

    /// Send a request and decode a JSON body.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse DevBurger API response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    fn authed(&self, request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request.bearer_auth(token.expose())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET /categories`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let request = self.inner.client.get(self.url("categories")?);
        let categories: Vec<Category> = self.send_json(request).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let request = self.inner.client.get(self.url("products")?);
        let products: Vec<Product> = self.send_json(request).await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Find one product in `GET /products`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. A missing product is
    /// `Ok(None)`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        Ok(self
            .list_products()
            .await?
            .into_iter()
            .find(|product| product.id == id))
    }

    /// Uncached `GET /categories`, used by readiness probes.
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable or answers with a failure.
    pub async fn ping(&self) -> Result<(), ApiError> {
        let request = self.inner.client.get(self.url("categories")?);
        self.send(request).await.map(|_| ())
    }

    /// Drop cached catalog reads.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate(&CacheKey::Categories).await;
        self.inner.cache.invalidate(&CacheKey::Products).await;
    }

    /// `POST /products` (multipart).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    #[instrument(skip(self, token, payload), fields(name = %payload.name))]
    pub async fn create_product(
        &self,
        token: &AuthToken,
        payload: ProductPayload,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(self.inner.client.post(self.url("products")?), token)
            .multipart(payload.into_form()?);
        self.send(request).await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    /// `PUT /products/:id` (multipart).
    ///
    /// Returns the updated product when the API echoes it back.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update or the request fails.
    #[instrument(skip(self, token, payload), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &AuthToken,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Option<Product>, ApiError> {
        let request = self
            .authed(
                self.inner.client.put(self.item_url("products", &id.to_string())?),
                token,
            )
            .multipart(payload.into_form()?);
        let response = self.send(request).await?;
        let text = response.text().await?;
        self.invalidate_catalog().await;
        Ok(serde_json::from_str(&text).ok())
    }

    /// `POST /categories` (multipart).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the category or the request fails.
    #[instrument(skip(self, token, payload), fields(name = %payload.name))]
    pub async fn create_category(
        &self,
        token: &AuthToken,
        payload: CategoryPayload,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(self.inner.client.post(self.url("categories")?), token)
            .multipart(payload.into_form()?);
        self.send(request).await?;
        self.invalidate_catalog().await;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &AuthToken) -> Result<Vec<Order>, ApiError> {
        let request = self.authed(self.inner.client.get(self.url("orders")?), token);
        self.send_json(request).await
    }

    /// `POST /orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the request fails.
    #[instrument(skip(self, token, order), fields(lines = order.products.len()))]
    pub async fn create_order(
        &self,
        token: &AuthToken,
        order: &OrderRequest,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(self.inner.client.post(self.url("orders")?), token)
            .json(order);
        self.send(request).await?;
        Ok(())
    }

    /// `PUT /orders/:id` with a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update or the request fails.
    #[instrument(skip(self, token), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &AuthToken,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(
                self.inner.client.put(self.item_url("orders", id.as_str())?),
                token,
            )
            .json(&json!({ "status": status }));
        self.send(request).await?;
        Ok(())
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// `POST /sessions`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] or [`ApiError::BadRequest`] for bad
    /// credentials, or another error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("sessions")?)
            .json(&json!({ "email": email, "password": password }));
        self.send_json(request).await
    }

    /// `POST /users`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] when the email is already registered,
    /// or another error if the request fails.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<(), ApiError> {
        let request = self.inner.client.post(self.url("users")?).json(user);
        self.send(request).await?;
        Ok(())
    }
}
