//! HTTP client for the Anihan API.
//!
//! Every endpoint has a typed method. The session token and signed-in user
//! are kept in a [`Cache`], as are the last successful listings of each
//! collection, which are served when the server can't be reached.
//!
//! # Example
//!
//! ```rust,ignore
//! use anihan_client::AnihanClient;
//! use anihan_cache::Cache;
//!
//! let client = AnihanClient::new(
//!     "http://localhost:3000/api/v1",
//!     Cache::open("data/client-cache.json")?,
//! )?;
//!
//! client.login("vendor@anihan.com", "vendor123").await?;
//!
//! // Served from the cache when offline
//! let inventory = client.inventory().await?;
//! ```

mod error;
mod response;

pub use error::FetchError;
pub use response::Envelope;

use anihan_cache::Cache;
use anihan_market::catalog::{InventoryItem, Product};
use anihan_market::checkout::{Delivery, Order};
use anihan_market::user::User;
use anihan_market::waste::{
    SourceWasteSubmission, WasteCategory, WasteStats, WasteSubmission, WasteType,
};
use anihan_market::{
    DeliveryId, InventoryItemId, OrderId, ProductId, SourceSubmissionId, UserId,
    WasteCategoryId, WasteSubmissionId,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Cache keys, shared with the browser frontend's local storage.
pub mod keys {
    pub const TOKEN: &str = "anihan_token";
    pub const USER: &str = "anihan_user";
    pub const USERS: &str = "anihan_users";
    pub const PRODUCTS: &str = "anihan_products";
    pub const ORDERS: &str = "anihan_orders";
    pub const WASTE_TYPES: &str = "anihan_waste_types";
    pub const WASTE_CATEGORIES: &str = "anihan_waste_categories";
    pub const SUBMISSIONS: &str = "anihan_submissions";
    pub const SOURCE_SUBMISSIONS: &str = "anihan_source_waste_submissions";
    pub const INVENTORY: &str = "anihan_inventory";
}

/// The account and token returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedIn {
    pub user: User,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: User,
}

/// Typed client for the `/api/v1` endpoints.
#[derive(Debug, Clone)]
pub struct AnihanClient {
    http: reqwest::Client,
    base_url: String,
    cache: Cache,
}

impl AnihanClient {
    /// Default request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>, cache: Cache) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| FetchError::RequestError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// The offline cache.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The stored session token.
    pub fn token(&self) -> Result<Option<String>, FetchError> {
        Ok(self.cache.get(keys::TOKEN)?)
    }

    /// Store a session token.
    pub fn set_token(&self, token: &str) -> Result<(), FetchError> {
        Ok(self.cache.set(keys::TOKEN, &token)?)
    }

    /// The signed-in user as last returned by the server.
    pub fn stored_user(&self) -> Result<Option<User>, FetchError> {
        Ok(self.cache.get(keys::USER)?)
    }

    /// Forget the token and signed-in user.
    pub fn clear_session(&self) -> Result<(), FetchError> {
        self.cache.delete(keys::TOKEN)?;
        self.cache.delete(keys::USER)?;
        Ok(())
    }

    // Auth

    /// Sign in, storing the token and user.
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedIn, FetchError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let signed_in: SignedIn = self.post("/auth/login", &body).await?;
        self.remember(&signed_in)?;
        Ok(signed_in)
    }

    /// Register an account. Consumers are signed in immediately.
    pub async fn register<B: Serialize + ?Sized>(&self, body: &B) -> Result<SignedIn, FetchError> {
        let signed_in: SignedIn = self.post("/auth/register", body).await?;
        self.remember(&signed_in)?;
        Ok(signed_in)
    }

    /// Sign out. The local session is cleared even when the call fails.
    pub async fn logout(&self) -> Result<(), FetchError> {
        let result = self.send(Method::POST, "/auth/logout", None).await;
        self.clear_session()?;
        if let Err(e) = result {
            warn!(error = %e, "logout request failed");
        }
        Ok(())
    }

    pub async fn me(&self) -> Result<User, FetchError> {
        let envelope: UserEnvelope = self.get("/auth/me").await?;
        Ok(envelope.user)
    }

    pub async fn update_profile<B: Serialize + ?Sized>(&self, body: &B) -> Result<User, FetchError> {
        let envelope: UserEnvelope = self.put("/auth/profile", body).await?;
        self.cache.set(keys::USER, &envelope.user)?;
        Ok(envelope.user)
    }

    pub async fn users(&self) -> Result<Vec<User>, FetchError> {
        self.collection("/auth/users", keys::USERS).await
    }

    pub async fn update_user_status<B: Serialize + ?Sized>(
        &self,
        id: UserId,
        body: &B,
    ) -> Result<User, FetchError> {
        self.put(&format!("/auth/users/{id}/status"), body).await
    }

    pub async fn update_user<B: Serialize + ?Sized>(
        &self,
        id: UserId,
        body: &B,
    ) -> Result<User, FetchError> {
        self.put(&format!("/auth/users/{id}"), body).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<String, FetchError> {
        self.delete(&format!("/auth/users/{id}")).await
    }

    // Products

    pub async fn products(&self) -> Result<Vec<Product>, FetchError> {
        self.collection("/products", keys::PRODUCTS).await
    }

    pub async fn product(&self, id: ProductId) -> Result<Product, FetchError> {
        self.get(&format!("/products/{id}")).await
    }

    pub async fn create_product<B: Serialize + ?Sized>(&self, body: &B) -> Result<Product, FetchError> {
        self.post("/products", body).await
    }

    pub async fn update_product<B: Serialize + ?Sized>(
        &self,
        id: ProductId,
        body: &B,
    ) -> Result<Product, FetchError> {
        self.put(&format!("/products/{id}"), body).await
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<String, FetchError> {
        self.delete(&format!("/products/{id}")).await
    }

    // Orders and deliveries

    pub async fn orders(&self) -> Result<Vec<Order>, FetchError> {
        self.collection("/orders", keys::ORDERS).await
    }

    pub async fn orders_for_user(&self, user_id: UserId) -> Result<Vec<Order>, FetchError> {
        self.get(&format!("/orders?user_id={user_id}")).await
    }

    pub async fn order(&self, id: OrderId) -> Result<Order, FetchError> {
        self.get(&format!("/orders/{id}")).await
    }

    pub async fn create_order<B: Serialize + ?Sized>(&self, body: &B) -> Result<Order, FetchError> {
        self.post("/orders", body).await
    }

    pub async fn update_order<B: Serialize + ?Sized>(
        &self,
        id: OrderId,
        body: &B,
    ) -> Result<Order, FetchError> {
        self.put(&format!("/orders/{id}"), body).await
    }

    pub async fn cancel_order(&self, id: OrderId) -> Result<Order, FetchError> {
        self.post(&format!("/orders/{id}/cancel"), &serde_json::json!({}))
            .await
    }

    pub async fn delete_order(&self, id: OrderId) -> Result<String, FetchError> {
        self.delete(&format!("/orders/{id}")).await
    }

    pub async fn deliveries(&self, order_id: OrderId) -> Result<Vec<Delivery>, FetchError> {
        self.get(&format!("/orders/{order_id}/deliveries")).await
    }

    pub async fn create_delivery<B: Serialize + ?Sized>(
        &self,
        order_id: OrderId,
        body: &B,
    ) -> Result<Delivery, FetchError> {
        self.post(&format!("/orders/{order_id}/deliveries"), body)
            .await
    }

    pub async fn update_delivery<B: Serialize + ?Sized>(
        &self,
        id: DeliveryId,
        body: &B,
    ) -> Result<Delivery, FetchError> {
        self.put(&format!("/deliveries/{id}"), body).await
    }

    pub async fn delete_delivery(&self, id: DeliveryId) -> Result<String, FetchError> {
        self.delete(&format!("/deliveries/{id}")).await
    }

    // Waste

    pub async fn waste_types(&self) -> Result<Vec<WasteType>, FetchError> {
        self.collection("/waste/types", keys::WASTE_TYPES).await
    }

    pub async fn create_waste_type<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<WasteType, FetchError> {
        self.post("/waste/types", body).await
    }

    pub async fn waste_categories(&self) -> Result<Vec<WasteCategory>, FetchError> {
        self.collection("/waste/categories", keys::WASTE_CATEGORIES)
            .await
    }

    pub async fn create_waste_category<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<WasteCategory, FetchError> {
        self.post("/waste/categories", body).await
    }

    pub async fn update_waste_category<B: Serialize + ?Sized>(
        &self,
        id: WasteCategoryId,
        body: &B,
    ) -> Result<WasteCategory, FetchError> {
        self.put(&format!("/waste/categories/{id}"), body).await
    }

    pub async fn delete_waste_category(&self, id: WasteCategoryId) -> Result<String, FetchError> {
        self.delete(&format!("/waste/categories/{id}")).await
    }

    pub async fn waste_submissions(&self) -> Result<Vec<WasteSubmission>, FetchError> {
        self.collection("/waste/submissions", keys::SUBMISSIONS).await
    }

    pub async fn waste_stats(&self) -> Result<WasteStats, FetchError> {
        self.get("/waste/submissions/stats").await
    }

    pub async fn create_waste_submission<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<WasteSubmission, FetchError> {
        self.post("/waste/submissions", body).await
    }

    pub async fn update_waste_submission<B: Serialize + ?Sized>(
        &self,
        id: WasteSubmissionId,
        body: &B,
    ) -> Result<WasteSubmission, FetchError> {
        self.put(&format!("/waste/submissions/{id}"), body).await
    }

    pub async fn delete_waste_submission(&self, id: WasteSubmissionId) -> Result<String, FetchError> {
        self.delete(&format!("/waste/submissions/{id}")).await
    }

    pub async fn source_submissions(&self) -> Result<Vec<SourceWasteSubmission>, FetchError> {
        self.collection("/waste/source-submissions", keys::SOURCE_SUBMISSIONS)
            .await
    }

    pub async fn create_source_submission<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<SourceWasteSubmission, FetchError> {
        self.post("/waste/source-submissions", body).await
    }

    pub async fn update_source_submission<B: Serialize + ?Sized>(
        &self,
        id: SourceSubmissionId,
        body: &B,
    ) -> Result<SourceWasteSubmission, FetchError> {
        self.put(&format!("/waste/source-submissions/{id}"), body)
            .await
    }

    pub async fn review_source_submission<B: Serialize + ?Sized>(
        &self,
        id: SourceSubmissionId,
        body: &B,
    ) -> Result<SourceWasteSubmission, FetchError> {
        self.post(&format!("/waste/source-submissions/{id}/review"), body)
            .await
    }

    pub async fn delete_source_submission(
        &self,
        id: SourceSubmissionId,
    ) -> Result<String, FetchError> {
        self.delete(&format!("/waste/source-submissions/{id}")).await
    }

    pub async fn inventory(&self) -> Result<Vec<InventoryItem>, FetchError> {
        self.collection("/waste/inventory", keys::INVENTORY).await
    }

    pub async fn inventory_for_vendor(
        &self,
        vendor_id: UserId,
    ) -> Result<Vec<InventoryItem>, FetchError> {
        self.get(&format!("/waste/inventory?vendor_id={vendor_id}"))
            .await
    }

    pub async fn create_inventory_item<B: Serialize + ?Sized>(
        &self,
        body: &B,
    ) -> Result<InventoryItem, FetchError> {
        self.post("/waste/inventory", body).await
    }

    pub async fn update_inventory_item<B: Serialize + ?Sized>(
        &self,
        id: InventoryItemId,
        body: &B,
    ) -> Result<InventoryItem, FetchError> {
        self.put(&format!("/waste/inventory/{id}"), body).await
    }

    pub async fn adjust_inventory<B: Serialize + ?Sized>(
        &self,
        id: InventoryItemId,
        body: &B,
    ) -> Result<InventoryItem, FetchError> {
        self.post(&format!("/waste/inventory/{id}/adjust"), body)
            .await
    }

    pub async fn delete_inventory_item(&self, id: InventoryItemId) -> Result<String, FetchError> {
        self.delete(&format!("/waste/inventory/{id}")).await
    }

    /// Check that the server is up, returning its status message.
    pub async fn health(&self) -> Result<String, FetchError> {
        let url = format!("{}/health", self.server_root());
        let response = self.http.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let envelope = Envelope::parse(status, &body)?.error_for_status(status)?;
        Ok(envelope.message().to_string())
    }

    // Plumbing

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.send(Method::GET, path, None).await?.data()
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await?.data()
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PUT, path, Some(body)).await?.data()
    }

    async fn delete(&self, path: &str) -> Result<String, FetchError> {
        let envelope = self.send(Method::DELETE, path, None).await?;
        Ok(envelope.message().to_string())
    }

    /// List a collection, falling back to the cached copy when offline.
    async fn collection<T>(&self, path: &str, key: &str) -> Result<Vec<T>, FetchError>
    where
        T: DeserializeOwned + Serialize,
    {
        match self.get::<Vec<T>>(path).await {
            Ok(items) => {
                self.cache.set(key, &items)?;
                Ok(items)
            }
            Err(e) if e.is_offline() => match self.cache.get::<Vec<T>>(key)? {
                Some(items) => {
                    warn!(path, key, error = %e, "server unreachable, serving cached collection");
                    Ok(items)
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Envelope, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "api request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = self.token()? {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Envelope::parse(status, &bytes)?.error_for_status(status)
    }

    fn remember(&self, signed_in: &SignedIn) -> Result<(), FetchError> {
        if let Some(token) = &signed_in.token {
            self.set_token(token)?;
            self.cache.set(keys::USER, &signed_in.user)?;
        }
        Ok(())
    }

    /// `/health` lives beside the versioned API root.
    fn server_root(&self) -> &str {
        self.base_url
            .strip_suffix("/api/v1")
            .unwrap_or(&self.base_url)
    }
}
