//! POS backend client implementation.
//!
//! Uses `reqwest` for HTTP with canonical JSON payloads outbound and the
//! tolerant [`super::wire`] layer inbound. Customer and item lists are cached
//! with `moka` (60-second TTL) and invalidated on every mutation.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use tillside_core::{CustomerId, ItemCode, OrderId};

use crate::config::{BackendConfig, BackendFlavor};

use super::BackendError;
use super::cache::{CacheKey, CacheValue};
use super::types::{Counts, Customer, Item, NewOrder, Order, OrderLine};
use super::wire::{self, CustomerWire, ItemWire, OrderLineWire, OrderWire};

/// How long cached customer/item lists stay fresh.
const CACHE_TTL: Duration = Duration::from_secs(60);

// =============================================================================
// PosClient
// =============================================================================

/// Client for the POS backend REST API.
///
/// Cheaply cloneable; all clones share the same connection pool and cache.
#[derive(Clone)]
pub struct PosClient {
    inner: Arc<PosClientInner>,
}

struct PosClientInner {
    client: reqwest::Client,
    base_url: String,
    flavor: BackendFlavor,
    api_token: Option<String>,
    cache: Cache<CacheKey, CacheValue>,
}

impl PosClient {
    /// Create a new backend client from configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(PosClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                flavor: config.flavor,
                api_token: config
                    .api_token
                    .as_ref()
                    .map(|token| token.expose_secret().to_string()),
                cache,
            }),
        }
    }

    // =========================================================================
    // HTTP plumbing
    // =========================================================================

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.inner.client.request(method, url);
        if let Some(token) = &self.inner.api_token {
            request = request.bearer_auth(token);
        }
        request
    }

    /// Execute a request and return the body, mapping non-success statuses
    /// to typed errors (404 becomes [`BackendError::NotFound`]).
    async fn check(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        let path = response.url().path().to_string();
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(path));
        }
        if !status.is_success() {
            tracing::error!(
                status = %status,
                path = %path,
                body = %text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(BackendError::status(status.as_u16(), &text));
        }

        Ok(text)
    }

    async fn get_text(&self, url: Url) -> Result<String, BackendError> {
        let response = self.request(Method::GET, url).send().await?;
        Self::check(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self.request(method, url).json(body).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn send_empty(&self, method: Method, url: Url) -> Result<(), BackendError> {
        let response = self.request(method, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// List all customers (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is unparseable.
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<Customer>, BackendError> {
        if let Some(CacheValue::Customers(customers)) =
            self.inner.cache.get(&CacheKey::Customers).await
        {
            debug!("Cache hit for customers");
            return Ok(customers);
        }

        let url = endpoints::customers_list(&self.inner.base_url, self.inner.flavor)?;
        let body = self.get_text(url).await?;
        let customers = wire::parse_list(&body, CustomerWire::into_domain)?;

        self.inner
            .cache
            .insert(CacheKey::Customers, CacheValue::Customers(customers.clone()))
            .await;

        Ok(customers)
    }

    /// Look up a single customer in the cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list fetch fails.
    pub async fn find_customer(&self, id: &CustomerId) -> Result<Option<Customer>, BackendError> {
        let customers = self.list_customers().await?;
        Ok(customers.into_iter().find(|c| &c.id == id))
    }

    /// Save (upsert) a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, customer), fields(id = %customer.id))]
    pub async fn save_customer(&self, customer: &Customer) -> Result<(), BackendError> {
        let url = endpoints::customers_save(&self.inner.base_url, self.inner.flavor)?;
        self.send_json(Method::POST, url, customer).await?;
        self.inner.cache.invalidate(&CacheKey::Customers).await;
        Ok(())
    }

    /// Delete a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_customer(&self, id: &CustomerId) -> Result<(), BackendError> {
        let url = endpoints::customer_delete(&self.inner.base_url, self.inner.flavor, id)?;
        self.send_empty(Method::DELETE, url).await?;
        self.inner.cache.invalidate(&CacheKey::Customers).await;
        Ok(())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// List all stock items (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is unparseable.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>, BackendError> {
        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&CacheKey::Items).await {
            debug!("Cache hit for items");
            return Ok(items);
        }

        let url = endpoints::items_list(&self.inner.base_url, self.inner.flavor)?;
        let body = self.get_text(url).await?;
        let items = wire::parse_list(&body, ItemWire::into_domain)?;

        self.inner
            .cache
            .insert(CacheKey::Items, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Look up a single item in the cached list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list fetch fails.
    pub async fn find_item(&self, code: &ItemCode) -> Result<Option<Item>, BackendError> {
        let items = self.list_items().await?;
        Ok(items.into_iter().find(|i| &i.code == code))
    }

    /// Create a new item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, item), fields(code = %item.code))]
    pub async fn save_item(&self, item: &Item) -> Result<(), BackendError> {
        let url = endpoints::items_save(&self.inner.base_url, self.inner.flavor)?;
        self.send_json(Method::POST, url, item).await?;
        self.inner.cache.invalidate(&CacheKey::Items).await;
        Ok(())
    }

    /// Update an existing item.
    ///
    /// The REST backend takes the full record via `PUT /api/products` with no
    /// code in the path; the legacy backend has no update endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the flavor is legacy.
    #[instrument(skip(self, item), fields(code = %item.code))]
    pub async fn update_item(&self, item: &Item) -> Result<(), BackendError> {
        let url = endpoints::items_update(&self.inner.base_url, self.inner.flavor)?;
        self.send_json(Method::PUT, url, item).await?;
        self.inner.cache.invalidate(&CacheKey::Items).await;
        Ok(())
    }

    /// Delete an item by code (query-parameter convention).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn delete_item(&self, code: &ItemCode) -> Result<(), BackendError> {
        let url = endpoints::item_delete(&self.inner.base_url, self.inner.flavor, code)?;
        self.send_empty(Method::DELETE, url).await?;
        self.inner.cache.invalidate(&CacheKey::Items).await;
        Ok(())
    }

    // =========================================================================
    // Orders (not cached - mutable state)
    // =========================================================================

    /// List all order headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is unparseable.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, BackendError> {
        let url = endpoints::orders_list(&self.inner.base_url, self.inner.flavor)?;
        let body = self.get_text(url).await?;
        Ok(wire::parse_list(&body, OrderWire::into_domain)?)
    }

    /// Fetch the detail lines of one order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is unknown, the request fails, or the
    /// flavor is legacy.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn order_details(&self, id: &OrderId) -> Result<Vec<OrderLine>, BackendError> {
        let url = endpoints::order_details(&self.inner.base_url, self.inner.flavor, id)?;
        let body = self.get_text(url).await?;
        Ok(wire::parse_list(&body, OrderLineWire::into_domain)?)
    }

    /// Place a composed order.
    ///
    /// Invalidate the item cache on success: stock levels just changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the flavor is legacy.
    #[instrument(skip(self, order), fields(id = %order.order_id, lines = order.order_details.len()))]
    pub async fn place_order(&self, order: &NewOrder) -> Result<(), BackendError> {
        let url = endpoints::orders_create(&self.inner.base_url, self.inner.flavor)?;
        self.send_json(Method::POST, url, order).await?;
        self.inner.cache.invalidate(&CacheKey::Items).await;
        Ok(())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Entity counts for the dashboard badges.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three list fetches fails.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<Counts, BackendError> {
        let (customers, items, orders) = tokio::try_join!(
            self.list_customers(),
            self.list_items(),
            self.list_orders()
        )?;

        Ok(Counts {
            customers: customers.len(),
            items: items.len(),
            orders: orders.len(),
        })
    }

    /// Cheap reachability probe for the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend does not answer the customer list URL.
    pub async fn ping(&self) -> Result<(), BackendError> {
        let url = endpoints::customers_list(&self.inner.base_url, self.inner.flavor)?;
        let response = self.request(Method::GET, url).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Drop all cached lists.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

// =============================================================================
// Endpoint construction
// =============================================================================

/// Pure URL builders for both backend conventions. Kept free of I/O so the
/// whole routing table is unit-testable.
mod endpoints {
    use url::Url;

    use tillside_core::{CustomerId, ItemCode, OrderId};

    use crate::backend::BackendError;
    use crate::config::BackendFlavor;

    /// Append path segments to the configured origin, percent-encoding each
    /// segment (codes are operator-entered and may contain anything).
    fn with_segments(base: &str, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(base)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_option(base: &str, resource: &str, option: &str) -> Result<Url, BackendError> {
        let mut url = with_segments(base, &[resource])?;
        url.query_pairs_mut().append_pair("option", option);
        Ok(url)
    }

    pub fn customers_list(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "customers"]),
            BackendFlavor::Legacy => with_option(base, "customer", "GetAll"),
        }
    }

    pub fn customers_save(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "customers"]),
            BackendFlavor::Legacy => with_option(base, "customer", "SaveCustomer"),
        }
    }

    pub fn customer_delete(
        base: &str,
        flavor: BackendFlavor,
        id: &CustomerId,
    ) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "customers", id.as_str()]),
            BackendFlavor::Legacy => {
                let mut url = with_option(base, "customer", "Delete")?;
                url.query_pairs_mut().append_pair("customerId", id.as_str());
                Ok(url)
            }
        }
    }

    pub fn items_list(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "products"]),
            BackendFlavor::Legacy => with_option(base, "item", "GetAll"),
        }
    }

    pub fn items_save(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "products"]),
            BackendFlavor::Legacy => with_option(base, "item", "SaveItem"),
        }
    }

    pub fn items_update(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "products"]),
            BackendFlavor::Legacy => Err(BackendError::Unsupported("item update")),
        }
    }

    pub fn item_delete(
        base: &str,
        flavor: BackendFlavor,
        code: &ItemCode,
    ) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => {
                let mut url = with_segments(base, &["api", "products"])?;
                url.query_pairs_mut().append_pair("code", code.as_str());
                Ok(url)
            }
            BackendFlavor::Legacy => {
                let mut url = with_option(base, "item", "Delete")?;
                url.query_pairs_mut().append_pair("itemId", code.as_str());
                Ok(url)
            }
        }
    }

    pub fn orders_list(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "orders"]),
            BackendFlavor::Legacy => with_option(base, "order", "GetAll"),
        }
    }

    pub fn order_details(
        base: &str,
        flavor: BackendFlavor,
        id: &OrderId,
    ) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "orders", id.as_str()]),
            // The legacy servlet surface is read-only for orders and has no
            // per-order endpoint.
            BackendFlavor::Legacy => Err(BackendError::Unsupported("order details")),
        }
    }

    pub fn orders_create(base: &str, flavor: BackendFlavor) -> Result<Url, BackendError> {
        match flavor {
            BackendFlavor::Rest => with_segments(base, &["api", "orders"]),
            BackendFlavor::Legacy => Err(BackendError::Unsupported("order placement")),
        }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    mod tests {
        use super::*;

        const BASE: &str = "http://localhost:8081";
        const PREFIXED: &str = "http://localhost:8081/Pos_JavaEE";

        #[test]
        fn test_rest_endpoints() {
            assert_eq!(
                customers_list(BASE, BackendFlavor::Rest).unwrap().as_str(),
                "http://localhost:8081/api/customers"
            );
            assert_eq!(
                items_list(BASE, BackendFlavor::Rest).unwrap().as_str(),
                "http://localhost:8081/api/products"
            );
            assert_eq!(
                orders_list(BASE, BackendFlavor::Rest).unwrap().as_str(),
                "http://localhost:8081/api/orders"
            );
            assert_eq!(
                order_details(BASE, BackendFlavor::Rest, &OrderId::new("D001"))
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/api/orders/D001"
            );
        }

        #[test]
        fn test_rest_delete_conventions() {
            // Customers delete by path, items delete by query parameter.
            assert_eq!(
                customer_delete(BASE, BackendFlavor::Rest, &CustomerId::new("C001"))
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/api/customers/C001"
            );
            assert_eq!(
                item_delete(BASE, BackendFlavor::Rest, &ItemCode::new("I001"))
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/api/products?code=I001"
            );
        }

        #[test]
        fn test_path_segments_are_percent_encoded() {
            let url =
                customer_delete(BASE, BackendFlavor::Rest, &CustomerId::new("C 1/x")).unwrap();
            assert_eq!(url.as_str(), "http://localhost:8081/api/customers/C%201%2Fx");
        }

        #[test]
        fn test_base_with_context_path() {
            assert_eq!(
                customers_list(PREFIXED, BackendFlavor::Rest).unwrap().as_str(),
                "http://localhost:8081/Pos_JavaEE/api/customers"
            );
            assert_eq!(
                customers_list(PREFIXED, BackendFlavor::Legacy)
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/Pos_JavaEE/customer?option=GetAll"
            );
        }

        #[test]
        fn test_legacy_endpoints() {
            assert_eq!(
                customers_save(BASE, BackendFlavor::Legacy).unwrap().as_str(),
                "http://localhost:8081/customer?option=SaveCustomer"
            );
            assert_eq!(
                customer_delete(BASE, BackendFlavor::Legacy, &CustomerId::new("C001"))
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/customer?option=Delete&customerId=C001"
            );
            assert_eq!(
                item_delete(BASE, BackendFlavor::Legacy, &ItemCode::new("I001"))
                    .unwrap()
                    .as_str(),
                "http://localhost:8081/item?option=Delete&itemId=I001"
            );
        }

        #[test]
        fn test_legacy_order_mutations_unsupported() {
            assert!(matches!(
                orders_create(BASE, BackendFlavor::Legacy),
                Err(BackendError::Unsupported(_))
            ));
            assert!(matches!(
                order_details(BASE, BackendFlavor::Legacy, &OrderId::new("D001")),
                Err(BackendError::Unsupported(_))
            ));
            assert!(matches!(
                items_update(BASE, BackendFlavor::Legacy),
                Err(BackendError::Unsupported(_))
            ));
        }
    }
}
