//! HTTP client for the storefront backend REST API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::domain::aggregates::{Order, OrderRequest, OrderResponse, OrderSource, RegisteredUser, RegistrationForm};
use crate::domain::listing::{ProductSource, QueryParams, QueryValue};
use crate::domain::store::{CartStore, SessionStore};
use crate::{CartSnapshot, Paginated, Product, Result, Review, StorefrontError, User};

#[derive(Clone, Debug, Deserialize)]
pub struct PaymentInitiation {
    #[serde(rename = "paymentUrl")]
    pub payment_url: Option<String>,
    #[serde(rename = "paymentReference")]
    pub payment_reference: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PaymentStatus {
    pub status: String,
    pub reference_number: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse { token: String, user: LoginUser }

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: u64,
    #[serde(default)]
    username: Option<String>,
    email: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> { email: &'a str, password: &'a str }

#[derive(Debug, Serialize)]
struct AddToCart { product_id: u64, quantity: u32 }

#[derive(Debug, Serialize)]
struct NewReview<'a> { product: u64, rating: u8, comment: &'a str }

#[derive(Clone, Debug)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    cart: Arc<CartStore>,
}

impl StorefrontClient {
    pub fn new(config: &Config, session: Arc<SessionStore>, cart: Arc<CartStore>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| StorefrontError::Config(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.trim_end_matches('/').to_string(), session, cart })
    }

    pub fn session(&self) -> &Arc<SessionStore> { &self.session }
    pub fn cart_store(&self) -> &Arc<CartStore> { &self.cart }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.session.token() {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Token {token}"));
        }
        req
    }

    /// Adds `user_country` for locality-aware ranking.
    fn with_user_country(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.user_country() {
            Some(country) => req.query(&[("user_country", country.as_str())]),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    fn require_login(&self) -> Result<()> {
        if self.session.is_logged_in() { Ok(()) } else { Err(StorefrontError::NotAuthenticated) }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    pub async fn products(&self, params: &QueryParams) -> Result<Paginated<Product>> {
        let mut req = self.request(Method::GET, "/products/").query(&params.to_pairs());
        if !params.contains("user_country") { req = self.with_user_country(req); }
        let page: Paginated<Product> = self.send(req).await.inspect_err(|e| error!(error = %e, "error fetching products"))?;
        debug!(count = page.count, returned = page.results.len(), "fetched products");
        Ok(page)
    }

    /// Products available in the shopper's own country; unfiltered when the country is unknown.
    pub async fn local_products(&self, params: &QueryParams) -> Result<Paginated<Product>> {
        let Some(country) = self.session.user_country() else {
            warn!("no user country available for local products");
            return self.products(params).await;
        };
        let mut params = params.clone();
        params.insert("country", QueryValue::text(country.as_str()));
        self.products(&params).await
    }

    pub async fn product(&self, slug: &str) -> Result<Product> {
        self.send(self.request(Method::GET, &format!("/products/{slug}/"))).await
    }

    pub async fn featured_products(&self) -> Result<Vec<Product>> {
        self.send(self.with_user_country(self.request(Method::GET, "/products/featured/"))).await
    }

    pub async fn recommended_products(&self) -> Result<Vec<Product>> {
        self.send(self.with_user_country(self.request(Method::GET, "/recommended-products/"))).await
    }

    pub async fn similar_products(&self, product_id: u64) -> Result<Vec<Product>> {
        self.send(self.with_user_country(self.request(Method::GET, &format!("/similar-products/{product_id}/")))).await
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    pub async fn cart(&self) -> Result<CartSnapshot> { self.send(self.request(Method::GET, "/cart/")).await }

    /// Sends a cart mutation and publishes the returned items to the cart store.
    async fn mutate_cart(&self, req: RequestBuilder) -> Result<CartSnapshot> {
        let cart: CartSnapshot = self.send(req).await.inspect_err(|e| error!(error = %e, "error updating cart"))?;
        self.cart.replace(cart.items.clone());
        Ok(cart)
    }

    pub async fn add_to_cart(&self, product_id: u64, quantity: u32) -> Result<CartSnapshot> {
        self.mutate_cart(self.request(Method::POST, "/cart/").json(&AddToCart { product_id, quantity })).await
    }

    pub async fn update_cart_item(&self, item_id: u64, quantity: u32) -> Result<CartSnapshot> {
        self.mutate_cart(self.request(Method::PUT, &format!("/cart/{item_id}/")).json(&serde_json::json!({ "quantity": quantity }))).await
    }

    pub async fn remove_from_cart(&self, item_id: u64) -> Result<CartSnapshot> {
        self.mutate_cart(self.request(Method::DELETE, &format!("/cart/{item_id}/"))).await
    }

    /// Loads the server cart into the cart store when signed in.
    pub async fn load_cart(&self) -> Result<()> {
        if !self.session.is_logged_in() { return Ok(()); }
        let cart = self.cart().await?;
        self.cart.replace(cart.items);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Reviews
    // -------------------------------------------------------------------------

    pub async fn product_reviews(&self, product_id: u64) -> Result<Paginated<Review>> {
        let req = self.request(Method::GET, "/reviews/").query(&[("product", product_id)]);
        self.send(req).await
    }

    pub async fn add_review(&self, product_id: u64, rating: u8, comment: &str) -> Result<Review> {
        self.require_login()?;
        let req = self.request(Method::POST, "/reviews/").json(&NewReview { product: product_id, rating, comment });
        self.send(req).await
    }

    pub async fn mark_review_helpful(&self, review_id: u64) -> Result<Review> {
        self.require_login()?;
        self.send(self.request(Method::POST, &format!("/reviews/{review_id}/helpful/")).json(&serde_json::json!({}))).await
    }

    // -------------------------------------------------------------------------
    // Orders and payments
    // -------------------------------------------------------------------------

    pub async fn checkout(&self, order: &OrderRequest) -> Result<OrderResponse> {
        self.send(self.request(Method::POST, "/checkout/").json(order)).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>> { self.send(self.request(Method::GET, "/orders/")).await }

    pub async fn order(&self, order_id: u64) -> Result<Order> {
        self.send(self.request(Method::GET, &format!("/orders/{order_id}/"))).await
    }

    pub async fn process_payment(&self, order_id: u64) -> Result<PaymentInitiation> {
        self.send(self.request(Method::POST, "/payments/process/").json(&serde_json::json!({ "orderId": order_id }))).await
    }

    pub async fn verify_payment(&self, reference: &str) -> Result<PaymentStatus> {
        self.send(self.request(Method::GET, &format!("/payments/verify/{reference}/"))).await
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    /// Signs in and records the user in the session store.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let resp: LoginResponse = self.send(self.request(Method::POST, "/auth/login/").json(&Credentials { email, password })).await?;
        let user = User {
            id: resp.user.id,
            name: resp.user.username.unwrap_or_else(|| resp.user.email.clone()),
            email: resp.user.email,
            token: resp.token,
            country: resp.user.country,
            city: resp.user.city,
            state: resp.user.state,
        };
        self.session.login(user.clone())?;
        info!(user_id = user.id, "signed in");
        Ok(user)
    }

    /// Creates an account; invalid forms are rejected without a request.
    pub async fn register(&self, form: &RegistrationForm) -> Result<RegisteredUser> {
        let details = form.validated()?;
        let user: RegisteredUser = self.send(self.request(Method::POST, "/auth/register/").json(details)).await?;
        info!(email = %user.email, "registered");
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> { self.session.logout() }
}

#[async_trait]
impl ProductSource for StorefrontClient {
    async fn list_products(&self, params: &QueryParams) -> Result<Paginated<Product>> { self.products(params).await }
}

#[async_trait]
impl OrderSource for StorefrontClient {
    async fn fetch_order(&self, order_id: u64) -> Result<Order> { self.order(order_id).await }
}

/// Keeps the client's cart store in step with the session: reload on sign-in, empty on sign-out.
pub async fn sync_cart_with_session(client: Arc<StorefrontClient>) {
    let mut session = client.session().subscribe();
    loop {
        let logged_in = session.borrow_and_update().is_some();
        if logged_in {
            if let Err(e) = client.load_cart().await { error!(error = %e, "error loading cart"); }
        } else {
            client.cart_store().clear();
        }
        if session.changed().await.is_err() { break; }
    }
}

fn api_error(status: StatusCode, body: &str) -> StorefrontError {
    if status == StatusCode::UNAUTHORIZED { return StorefrontError::NotAuthenticated; }
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").or_else(|| v.get("message")).and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("Error Code: {}, Message: {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown")));
    StorefrontError::Api { status: status.as_u16(), message }
}
