//! # Storefront Session
//!
//! Owns the live storefront state and drives every user-visible operation.
//!
//! ## State Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront<A: StoreApi, S: KeyValueStore, N: Notifier>                 │
//! │                                                                         │
//! │   cart:  CartState      ──┐                                             │
//! │   user:  Option<User>   ──┼── mutated through &mut self only            │
//! │   theme: Theme          ──┘                                             │
//! │                                                                         │
//! │  command ──► ledger / API call ──► CartChange / result                  │
//! │                                       │                                 │
//! │                                       ├── real change? commit to S      │
//! │                                       └── notice?      send to N        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Start-up
//! [`Storefront::restore`] reads the `cart`, `user` and `theme` records once.
//! A record that fails to parse is logged and replaced by its default, so a
//! corrupted file never blocks the store from opening.
//!
//! ## Failures
//! API failures are notified and returned; state that existed before the call
//! is left as it was. A cart change whose commit fails is rolled back, so the
//! live cart always matches the stored record. Nothing is retried.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use comfy_core::pagination::{PageListStyle, PaginationControls};
use comfy_core::types::{visible_links, NavLink};
use comfy_core::validation::{validate_checkout, validate_login, validate_registration};
use comfy_core::{
    CartChange, CartItem, CartState, CheckoutInfo, Order, PaginationMeta, Product, ProductQuery,
    ProductsMeta, Theme, User, CART_STORAGE_KEY, THEME_STORAGE_KEY, USER_STORAGE_KEY,
};
use comfy_db::KeyValueStore;

use crate::api::{LoginRequest, RegisterRequest, StoreApi};
use crate::error::{StoreError, StoreResult};
use crate::notify::Notifier;

/// Path of the product listing.
pub const PRODUCTS_PATH: &str = "/products";

/// Path of the order history.
pub const ORDERS_PATH: &str = "/orders";

// =============================================================================
// Notices
// =============================================================================

pub const NOTICE_WELCOME_GUEST: &str = "Welcome Guest User";
pub const NOTICE_LOGIN_SUCCESS: &str = "Login successful";
pub const NOTICE_LOGGED_OUT: &str = "Logged Out";
pub const NOTICE_REGISTERED: &str = "Registered";
pub const NOTICE_REGISTRATION_FAILED: &str = "Registration Failed";
pub const NOTICE_FILL_ALL_FIELDS: &str = "please fill out all fields";
pub const NOTICE_LOGIN_TO_ORDER: &str = "please login to place an order";
pub const NOTICE_CART_EMPTY: &str = "Your cart is empty";
pub const NOTICE_ORDER_PLACED: &str = "order placed";
pub const NOTICE_ORDER_FAILED: &str = "order failed";
pub const NOTICE_LOGIN_TO_VIEW_ORDERS: &str = "You must be logged in to view orders";

// =============================================================================
// View Models
// =============================================================================

/// One page of the product listing, ready to render.
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub meta: ProductsMeta,
    /// The filters the listing was fetched with (echoed back to the form).
    pub params: ProductQuery,
    /// `"N product(s)"`.
    pub caption: String,
    /// `None` when there's a single page.
    pub pagination: Option<PaginationControls>,
}

impl ProductListing {
    /// True when the filters matched nothing.
    pub fn is_empty(&self) -> bool {
        self.meta.pagination.total == 0
    }
}

/// One page of the order history, ready to render.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    pub orders: Vec<Order>,
    pub meta: PaginationMeta,
    /// Compact page list; `None` when there's a single page.
    pub pagination: Option<PaginationControls>,
}

// =============================================================================
// Storefront
// =============================================================================

/// The storefront session.
pub struct Storefront<A, S, N> {
    api: A,
    store: S,
    notifier: N,
    cart: CartState,
    user: Option<User>,
    theme: Theme,
}

impl<A, S, N> Storefront<A, S, N>
where
    A: StoreApi,
    S: KeyValueStore,
    N: Notifier,
{
    /// A fresh session with nothing restored.
    pub fn new(api: A, store: S, notifier: N) -> Self {
        Storefront {
            api,
            store,
            notifier,
            cart: CartState::default(),
            user: None,
            theme: Theme::default(),
        }
    }

    /// Opens a session from persisted local state.
    pub async fn restore(api: A, store: S, notifier: N) -> StoreResult<Self> {
        let cart = match read_json::<CartState, _>(&store, CART_STORAGE_KEY).await? {
            Some(mut cart) => {
                cart.reconcile();
                cart
            }
            None => CartState::default(),
        };

        let user = read_json::<User, _>(&store, USER_STORAGE_KEY).await?;

        let theme = match store.get_item(THEME_STORAGE_KEY).await? {
            Some(raw) => raw.parse::<Theme>().unwrap_or_else(|e| {
                warn!(value = %raw, error = %e, "Ignoring stored theme");
                Theme::default()
            }),
            None => Theme::default(),
        };

        info!(
            items = cart.num_items_in_cart,
            logged_in = user.is_some(),
            theme = %theme,
            "Storefront restored"
        );

        Ok(Storefront {
            api,
            store,
            notifier,
            cart,
            user,
            theme,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Navigation entries for the current login state.
    pub fn nav_links(&self) -> Vec<NavLink> {
        visible_links(self.is_logged_in())
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Writes the cart record.
    pub async fn commit(&self) -> StoreResult<()> {
        let raw = serde_json::to_string(&self.cart)?;
        self.store.set_item(CART_STORAGE_KEY, &raw).await?;
        debug!(items = self.cart.num_items_in_cart, "Cart committed");
        Ok(())
    }

    /// Commits a ledger change, restoring `before` when the write fails.
    async fn apply_cart_change(
        &mut self,
        before: CartState,
        change: CartChange,
    ) -> StoreResult<CartChange> {
        if change.is_change() {
            if let Err(e) = self.commit().await {
                warn!(error = %e, "Cart commit failed, rolling back");
                self.cart = before;
                return Err(e);
            }
        }
        if let Some(notice) = change.notice() {
            self.notifier.success(notice);
        }
        Ok(change)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a line (merging on `cart_id`), then commits and notifies.
    pub async fn add_to_cart(&mut self, item: CartItem) -> StoreResult<CartChange> {
        let before = self.cart.clone();
        let change = self.cart.add_item(item)?;
        self.apply_cart_change(before, change).await
    }

    /// Fetches a product and adds `amount` of it in `color` (first colour if
    /// `None`).
    pub async fn add_product_to_cart(
        &mut self,
        product_id: u64,
        color: Option<&str>,
        amount: u32,
    ) -> StoreResult<CartChange> {
        let product = self.api.product(product_id).await?;
        let item = CartItem::from_product(&product, color, amount)?;
        self.add_to_cart(item).await
    }

    /// Removes a line. Unknown ids change nothing.
    pub async fn remove_from_cart(&mut self, cart_id: &str) -> StoreResult<CartChange> {
        let before = self.cart.clone();
        let change = self.cart.remove_item(cart_id);
        self.apply_cart_change(before, change).await
    }

    /// Sets a line's amount. Unknown ids and unchanged amounts change nothing.
    pub async fn edit_cart_item(&mut self, cart_id: &str, amount: u32) -> StoreResult<CartChange> {
        let before = self.cart.clone();
        let change = self.cart.edit_item(cart_id, amount)?;
        self.apply_cart_change(before, change).await
    }

    /// Empties the cart and persists the empty state.
    pub async fn clear_cart(&mut self) -> StoreResult<CartChange> {
        let before = self.cart.clone();
        let change = self.cart.clear();
        self.apply_cart_change(before, change).await
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Changes and persists the theme preference.
    pub async fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.store.set_item(THEME_STORAGE_KEY, theme.as_str()).await?;
        self.theme = theme;
        debug!(theme = %theme, "Theme updated");
        Ok(())
    }

    // =========================================================================
    // User Session
    // =========================================================================

    /// Logs in and persists the session.
    pub async fn login(&mut self, identifier: &str, password: &str) -> StoreResult<&User> {
        if let Err(e) = validate_login(identifier, password) {
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let request = LoginRequest {
            identifier: identifier.trim().to_string(),
            password: password.to_string(),
        };

        let user = match self.api.login(&request).await {
            Ok(response) => response.into_user(),
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        };

        let raw = serde_json::to_string(&user)?;
        self.store.set_item(USER_STORAGE_KEY, &raw).await?;

        self.notifier.success(if user.is_guest() {
            NOTICE_WELCOME_GUEST
        } else {
            NOTICE_LOGIN_SUCCESS
        });
        info!(username = %user.username, "Logged in");

        Ok(self.user.insert(user))
    }

    /// Forgets the user and empties the cart.
    ///
    /// Each record changes in memory only after its write succeeded.
    pub async fn logout(&mut self) -> StoreResult<()> {
        let before = self.cart.clone();
        self.cart.clear();
        if let Err(e) = self.commit().await {
            self.cart = before;
            return Err(e);
        }

        self.store.remove_item(USER_STORAGE_KEY).await?;
        self.user = None;

        self.notifier.success(NOTICE_LOGGED_OUT);
        info!("Logged out");
        Ok(())
    }

    /// Creates an account. The user still has to log in afterwards.
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> StoreResult<()> {
        if let Err(e) = validate_registration(username, email, password) {
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let request = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.api.register(&request).await {
            Ok(_) => {
                self.notifier.success(NOTICE_REGISTERED);
                info!(username = %request.username, "Registered");
                Ok(())
            }
            Err(e) => {
                let message = match &e {
                    StoreError::Api { message, .. } => message.as_str(),
                    _ => NOTICE_REGISTRATION_FAILED,
                };
                self.notifier.error(message);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Products for the landing page.
    pub async fn featured_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.api.featured_products().await?.data)
    }

    /// One page of the product listing for the given query string.
    pub async fn products(&self, search: &str) -> StoreResult<ProductListing> {
        let params = ProductQuery::from_search(search);
        let response = self.api.products(&params).await?;

        let meta = response.meta.pagination;
        let pagination = PaginationControls::build(
            meta.page,
            meta.page_count,
            search,
            PRODUCTS_PATH,
            PageListStyle::Full,
        );

        Ok(ProductListing {
            caption: response.count_caption(),
            products: response.data,
            meta: response.meta,
            params,
            pagination,
        })
    }

    /// A single product.
    pub async fn product(&self, id: u64) -> StoreResult<Product> {
        self.api.product(id).await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    fn require_user(&self, notice: &str) -> StoreResult<&User> {
        match &self.user {
            Some(user) => Ok(user),
            None => {
                self.notifier.error(notice);
                Err(StoreError::unauthorized(notice))
            }
        }
    }

    /// Places an order for the current cart.
    ///
    /// ## Checks (in order)
    /// 1. name and address present
    /// 2. a user is logged in
    /// 3. the cart is not empty
    ///
    /// On success the cart is cleared; on failure it is kept. Once the API
    /// accepted the order it counts as placed, even if the cleared cart
    /// can't be stored.
    pub async fn checkout(&mut self, name: &str, address: &str) -> StoreResult<CheckoutInfo> {
        if let Err(e) = validate_checkout(name, address) {
            self.notifier.error(NOTICE_FILL_ALL_FIELDS);
            return Err(e.into());
        }

        let token = self.require_user(NOTICE_LOGIN_TO_ORDER)?.jwt.clone();

        if self.cart.is_empty() {
            self.notifier.error(NOTICE_CART_EMPTY);
            return Err(StoreError::validation(NOTICE_CART_EMPTY));
        }

        let info = CheckoutInfo::from_cart(name, address, &self.cart);

        if let Err(e) = self.api.create_order(&token, &info).await {
            warn!(error = %e, "Order failed");
            self.notifier.error(NOTICE_ORDER_FAILED);
            return Err(e);
        }

        self.cart.clear();
        if let Err(e) = self.commit().await {
            warn!(error = %e, "Order placed but the cleared cart was not stored");
        }
        self.notifier.success(NOTICE_ORDER_PLACED);
        info!(total = %info.order_total, items = info.num_items_in_cart, "Order placed");

        Ok(info)
    }

    /// One page of the user's order history.
    pub async fn orders(&self, search: &str) -> StoreResult<OrderHistory> {
        let token = self.require_user(NOTICE_LOGIN_TO_VIEW_ORDERS)?.jwt.clone();
        let page = ProductQuery::from_search(search).page_or_first();

        let response = self.api.orders(&token, page).await?;
        let meta = response.meta.pagination;
        let pagination = PaginationControls::build(
            meta.page,
            meta.page_count,
            search,
            ORDERS_PATH,
            PageListStyle::Compact,
        );

        Ok(OrderHistory {
            orders: response.data,
            meta,
            pagination,
        })
    }
}

/// Reads a JSON record, treating a malformed one as absent.
async fn read_json<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore,
{
    let Some(raw) = store.get_item(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key = %key, error = %e, "Ignoring malformed stored record");
            Ok(None)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use chrono::{TimeZone, Utc};
    use comfy_core::{
        Money, OrderAttributes, OrdersMeta, OrdersResponse, ProductAttributes, ProductsResponse,
    };
    use comfy_db::{DbError, DbResult, MemoryStore};

    use crate::api::{AuthResponse, AuthUser};
    use crate::error::ErrorCode;
    use crate::notify::{NoticeLevel, RecordingNotifier};

    // -------------------------------------------------------------------------
    // Fake API
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FakeApi {
        products: Vec<Product>,
        page_count: u32,
        fail_orders: bool,
        reject_register: Option<String>,
        placed: Mutex<Vec<(String, CheckoutInfo)>>,
        order_pages: Mutex<Vec<u32>>,
        queries: Mutex<Vec<ProductQuery>>,
    }

    fn product(id: u64, price: i64, colors: &[&str]) -> Product {
        Product {
            id,
            attributes: ProductAttributes {
                title: format!("product {}", id),
                company: "modenza".to_string(),
                description: String::new(),
                featured: id == 1,
                category: "Tables".to_string(),
                image: format!("https://img/{}.jpg", id),
                price: Money::from_cents(price),
                shipping: false,
                colors: colors.iter().map(|c| c.to_string()).collect(),
            },
        }
    }

    fn meta(page: u32, page_count: u32, total: u32) -> PaginationMeta {
        PaginationMeta {
            page,
            page_size: 10,
            page_count,
            total,
        }
    }

    impl FakeApi {
        fn with_products() -> Self {
            FakeApi {
                products: vec![product(1, 2000, &["#33FF57"]), product(3, 1000, &["#FF5733", "#000"])],
                page_count: 1,
                ..FakeApi::default()
            }
        }
    }

    impl StoreApi for FakeApi {
        async fn featured_products(&self) -> StoreResult<ProductsResponse> {
            let data: Vec<Product> = self
                .products
                .iter()
                .filter(|p| p.attributes.featured)
                .cloned()
                .collect();
            Ok(ProductsResponse {
                meta: ProductsMeta {
                    pagination: meta(1, 1, data.len() as u32),
                    categories: vec![],
                    companies: vec![],
                },
                data,
            })
        }

        async fn products(&self, query: &ProductQuery) -> StoreResult<ProductsResponse> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(ProductsResponse {
                data: self.products.clone(),
                meta: ProductsMeta {
                    pagination: meta(query.page_or_first(), self.page_count, self.products.len() as u32),
                    categories: vec!["all".to_string(), "Tables".to_string()],
                    companies: vec!["all".to_string(), "modenza".to_string()],
                },
            })
        }

        async fn product(&self, id: u64) -> StoreResult<Product> {
            self.products
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| StoreError::NotFound(format!("Product not found: {}", id)))
        }

        async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse> {
            if let Some(message) = &self.reject_register {
                return Err(StoreError::Api {
                    status: 400,
                    message: message.clone(),
                });
            }
            Ok(AuthResponse {
                jwt: "new-token".to_string(),
                user: AuthUser {
                    username: request.username.clone(),
                },
            })
        }

        async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse> {
            if request.password != "secret" {
                return Err(StoreError::Api {
                    status: 400,
                    message: "Invalid identifier or password".to_string(),
                });
            }
            Ok(AuthResponse {
                jwt: format!("jwt-{}", request.identifier),
                user: AuthUser {
                    username: request.identifier.clone(),
                },
            })
        }

        async fn create_order(&self, token: &str, order: &CheckoutInfo) -> StoreResult<()> {
            if self.fail_orders {
                return Err(StoreError::Api {
                    status: 500,
                    message: "Internal Server Error".to_string(),
                });
            }
            self.placed.lock().unwrap().push((token.to_string(), order.clone()));
            Ok(())
        }

        async fn orders(&self, _token: &str, page: u32) -> StoreResult<OrdersResponse> {
            self.order_pages.lock().unwrap().push(page);
            Ok(OrdersResponse {
                data: vec![Order {
                    id: 11,
                    attributes: OrderAttributes {
                        name: "Anna".to_string(),
                        address: "1 Main St".to_string(),
                        cart_items: vec![],
                        num_items_in_cart: 2,
                        order_total: "$27.00".to_string(),
                        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
                    },
                }],
                meta: OrdersMeta {
                    pagination: meta(page, 9, 90),
                },
            })
        }
    }

    // -------------------------------------------------------------------------
    // Store with switchable write failures
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_writes: AtomicBool,
    }

    impl FailingStore {
        fn fail(&self) {
            self.fail_writes.store(true, Ordering::SeqCst);
        }

        fn check(&self) -> DbResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(DbError::QueryFailed("disk I/O error".to_string()));
            }
            Ok(())
        }
    }

    impl KeyValueStore for FailingStore {
        async fn get_item(&self, key: &str) -> DbResult<Option<String>> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
            self.check()?;
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> DbResult<()> {
            self.check()?;
            self.inner.remove_item(key).await
        }
    }

    type FailingFront = Storefront<FakeApi, FailingStore, RecordingNotifier>;

    async fn failing_front_with_cart() -> FailingFront {
        let mut front = Storefront::new(
            FakeApi::with_products(),
            FailingStore::default(),
            RecordingNotifier::new(),
        );
        front.login("anna", "secret").await.unwrap();
        front.add_product_to_cart(3, None, 2).await.unwrap();
        front.store().fail();
        front
    }

    fn failing_stored_cart(front: &FailingFront) -> CartState {
        serde_json::from_str(&front.store().inner.snapshot(CART_STORAGE_KEY).unwrap()).unwrap()
    }

    type TestFront = Storefront<FakeApi, MemoryStore, RecordingNotifier>;

    fn storefront(api: FakeApi) -> TestFront {
        Storefront::new(api, MemoryStore::new(), RecordingNotifier::new())
    }

    async fn logged_in(api: FakeApi) -> TestFront {
        let mut front = storefront(api);
        front.login("anna", "secret").await.unwrap();
        front
    }

    fn stored_cart(front: &TestFront) -> CartState {
        serde_json::from_str(&front.store().snapshot(CART_STORAGE_KEY).unwrap()).unwrap()
    }

    // -------------------------------------------------------------------------
    // Restore
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_restore_empty_store() {
        let front = Storefront::restore(FakeApi::default(), MemoryStore::new(), RecordingNotifier::new())
            .await
            .unwrap();

        assert_eq!(front.cart(), &CartState::default());
        assert!(front.user().is_none());
        assert_eq!(front.theme(), Theme::System);
    }

    #[tokio::test]
    async fn test_restore_reads_all_records() {
        let mut cart = CartState::default();
        cart.add_item(CartItem::from_product(&product(3, 1000, &["#FF5733"]), None, 2).unwrap())
            .unwrap();

        let store = MemoryStore::with_items([
            (CART_STORAGE_KEY.to_string(), serde_json::to_string(&cart).unwrap()),
            (USER_STORAGE_KEY.to_string(), r#"{"username":"demo user","jwt":"t"}"#.to_string()),
            (THEME_STORAGE_KEY.to_string(), "dark".to_string()),
        ]);

        let front = Storefront::restore(FakeApi::default(), store, RecordingNotifier::new())
            .await
            .unwrap();

        assert_eq!(front.cart(), &cart);
        assert!(front.user().unwrap().is_guest());
        assert_eq!(front.theme(), Theme::Dark);
        assert_eq!(front.nav_links().len(), 6);
    }

    #[tokio::test]
    async fn test_restore_tolerates_corrupt_records() {
        let store = MemoryStore::with_items([
            (CART_STORAGE_KEY, "{not json"),
            (USER_STORAGE_KEY, "[]"),
            (THEME_STORAGE_KEY, "purple"),
        ]);

        let front = Storefront::restore(FakeApi::default(), store, RecordingNotifier::new())
            .await
            .unwrap();

        assert_eq!(front.cart(), &CartState::default());
        assert!(front.user().is_none());
        assert_eq!(front.theme(), Theme::System);
        assert_eq!(front.nav_links().len(), 4);
    }

    #[tokio::test]
    async fn test_restore_caps_oversized_amounts() {
        let raw = r##"{
            "cartItems": [{"cartID":"a","productID":3,"title":"t","image":"i",
                           "price":"100","amount":4294967295,"productColor":"#000","company":"c"},
                          {"cartID":"a","productID":3,"title":"t","image":"i",
                           "price":"100","amount":2,"productColor":"#000","company":"c"}],
            "numItemsInCart": 0, "cartTotal": 0, "shipping": 500, "tax": 0, "orderTotal": 0
        }"##;
        let store = MemoryStore::with_items([(CART_STORAGE_KEY, raw)]);

        let front = Storefront::restore(FakeApi::default(), store, RecordingNotifier::new())
            .await
            .unwrap();

        assert_eq!(front.cart().cart_items.len(), 1);
        assert_eq!(front.cart().num_items_in_cart, 999);
        assert_eq!(front.cart().cart_total.cents(), 99_900);
        assert!(front.cart().is_consistent());
    }

    #[tokio::test]
    async fn test_restore_repairs_inconsistent_totals() {
        let raw = r##"{
            "cartItems": [{"cartID":"3#000","productID":3,"title":"t","image":"i",
                           "price":"1000","amount":2,"productColor":"#000","company":"c"}],
            "numItemsInCart": 7, "cartTotal": 1, "shipping": 500, "tax": 0, "orderTotal": 0
        }"##;
        let store = MemoryStore::with_items([(CART_STORAGE_KEY, raw)]);

        let front = Storefront::restore(FakeApi::default(), store, RecordingNotifier::new())
            .await
            .unwrap();

        assert_eq!(front.cart().num_items_in_cart, 2);
        assert_eq!(front.cart().cart_total.cents(), 2000);
        assert_eq!(front.cart().order_total.cents(), 2700);
        assert!(front.cart().is_consistent());
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_cart_operations_commit_and_notify() {
        let mut front = storefront(FakeApi::with_products());

        front.add_product_to_cart(1, None, 1).await.unwrap();
        front.add_product_to_cart(3, Some("#FF5733"), 2).await.unwrap();

        let cart = stored_cart(&front);
        assert_eq!(cart.cart_total.cents(), 4000);
        assert_eq!(cart.tax.cents(), 400);
        assert_eq!(cart.order_total.cents(), 4900);

        let change = front.remove_from_cart("1#33FF57").await.unwrap();
        assert_eq!(change, CartChange::Removed { cart_id: "1#33FF57".to_string() });

        let change = front.edit_cart_item("3#FF5733", 1).await.unwrap();
        assert!(change.is_change());

        let cart = stored_cart(&front);
        assert_eq!(cart.cart_total.cents(), 1000);
        assert_eq!(cart.order_total.cents(), 1600);
        assert_eq!(&cart, front.cart());

        assert_eq!(
            front.notifier().messages(),
            vec!["Item added to cart", "Item added to cart", "Item removed from the cart", "Amount Updated"]
        );
    }

    #[tokio::test]
    async fn test_noop_changes_do_not_commit_or_notify() {
        let mut front = storefront(FakeApi::with_products());

        let change = front.remove_from_cart("missing").await.unwrap();
        assert_eq!(change, CartChange::Unchanged);
        assert!(front.store().snapshot(CART_STORAGE_KEY).is_none());
        assert!(front.notifier().messages().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_amount_leaves_state_untouched() {
        let mut front = storefront(FakeApi::with_products());
        front.add_product_to_cart(3, None, 1).await.unwrap();

        let err = front.edit_cart_item("3#FF5733", 0).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(front.cart().num_items_in_cart, 1);

        let err = front.add_product_to_cart(3, Some("#ABCDEF"), 1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_unknown_product_is_not_found() {
        let mut front = storefront(FakeApi::with_products());
        let err = front.add_product_to_cart(99, None, 1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(front.cart().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cart_persists_empty_state() {
        let mut front = storefront(FakeApi::with_products());
        front.add_product_to_cart(1, None, 3).await.unwrap();

        assert_eq!(front.clear_cart().await.unwrap(), CartChange::Cleared);
        assert_eq!(stored_cart(&front), CartState::default());
    }

    // -------------------------------------------------------------------------
    // Theme & Session
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_set_theme_persists() {
        let mut front = storefront(FakeApi::default());
        front.set_theme(Theme::Light).await.unwrap();

        assert_eq!(front.theme(), Theme::Light);
        assert_eq!(front.store().snapshot(THEME_STORAGE_KEY).as_deref(), Some("light"));
    }

    #[tokio::test]
    async fn test_login_notices() {
        let mut front = storefront(FakeApi::default());

        let user = front.login("demo user", "secret").await.unwrap();
        assert_eq!(user.jwt, "jwt-demo user");
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_WELCOME_GUEST));

        front.login("anna", "secret").await.unwrap();
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_LOGIN_SUCCESS));

        let stored: User = serde_json::from_str(&front.store().snapshot(USER_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored.username, "anna");
    }

    #[tokio::test]
    async fn test_login_failure_keeps_previous_state() {
        let mut front = storefront(FakeApi::default());

        let err = front.login("anna", "wrong").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert!(front.user().is_none());
        assert!(front.store().snapshot(USER_STORAGE_KEY).is_none());
        assert_eq!(
            front.notifier().notices().last().map(|n| n.level),
            Some(NoticeLevel::Error)
        );

        let err = front.login("  ", "secret").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_logout_clears_user_and_cart() {
        let mut front = logged_in(FakeApi::with_products()).await;
        front.add_product_to_cart(1, None, 1).await.unwrap();

        front.logout().await.unwrap();

        assert!(front.user().is_none());
        assert!(front.cart().is_empty());
        assert!(front.store().snapshot(USER_STORAGE_KEY).is_none());
        assert_eq!(stored_cart(&front), CartState::default());
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_LOGGED_OUT));
    }

    #[tokio::test]
    async fn test_register() {
        let mut front = storefront(FakeApi::default());
        front.register("anna", "anna@example.com", "pw").await.unwrap();
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_REGISTERED));
        assert!(front.user().is_none());

        let mut front = storefront(FakeApi {
            reject_register: Some("Email or Username are already taken".to_string()),
            ..FakeApi::default()
        });
        let err = front.register("anna", "anna@example.com", "pw").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(
            front.notifier().last_message().as_deref(),
            Some("Email or Username are already taken")
        );

        let err = front.register("anna", "not-an-email", "pw").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    // -------------------------------------------------------------------------
    // Catalogue
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_featured_products() {
        let front = storefront(FakeApi::with_products());
        let featured = front.featured_products().await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, 1);
    }

    #[tokio::test]
    async fn test_products_listing_with_pagination() {
        let front = storefront(FakeApi {
            page_count: 3,
            ..FakeApi::with_products()
        });

        let listing = front.products("?category=Tables&page=2").await.unwrap();

        assert_eq!(listing.caption, "2 products");
        assert_eq!(listing.params.category.as_deref(), Some("Tables"));
        assert_eq!(listing.params.page, Some(2));
        assert!(!listing.is_empty());

        let controls = listing.pagination.unwrap();
        assert_eq!(controls.prev_url, "/products?category=Tables&page=1");
        assert_eq!(controls.next_url, "/products?category=Tables&page=3");
        assert_eq!(controls.entries.len(), 3);

        let queries = front.api().queries.lock().unwrap().clone();
        assert_eq!(queries[0].category.as_deref(), Some("Tables"));
    }

    #[tokio::test]
    async fn test_single_page_listing_has_no_controls() {
        let front = storefront(FakeApi::with_products());
        let listing = front.products("").await.unwrap();
        assert!(listing.pagination.is_none());
    }

    // -------------------------------------------------------------------------
    // Checkout & Orders
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_checkout_requires_fields_first() {
        let mut front = storefront(FakeApi::with_products());

        let err = front.checkout("Anna", "   ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_FILL_ALL_FIELDS));
    }

    #[tokio::test]
    async fn test_checkout_requires_user() {
        let mut front = storefront(FakeApi::with_products());
        front.add_product_to_cart(1, None, 1).await.unwrap();

        let err = front.checkout("Anna", "1 Main St").await.unwrap_err();
        assert!(err.requires_login());
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_LOGIN_TO_ORDER));
        assert_eq!(front.cart().num_items_in_cart, 1);
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let mut front = logged_in(FakeApi::with_products()).await;
        let err = front.checkout("Anna", "1 Main St").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(front.api().placed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_success_clears_cart() {
        let mut front = logged_in(FakeApi::with_products()).await;
        front.add_product_to_cart(1, None, 1).await.unwrap();

        let info = front.checkout(" Anna ", "1 Main St").await.unwrap();

        assert_eq!(info.name, "Anna");
        assert_eq!(info.charge_total.cents(), 2700);
        assert_eq!(info.order_total, "$27.00");
        assert_eq!(info.num_items_in_cart, 1);

        let placed = front.api().placed.lock().unwrap().clone();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].0, "jwt-anna");

        assert!(front.cart().is_empty());
        assert_eq!(stored_cart(&front), CartState::default());
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_ORDER_PLACED));
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_cart() {
        let mut front = logged_in(FakeApi {
            fail_orders: true,
            ..FakeApi::with_products()
        })
        .await;
        front.add_product_to_cart(1, None, 2).await.unwrap();
        let before = front.cart().clone();

        let err = front.checkout("Anna", "1 Main St").await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ApiError);
        assert_eq!(front.cart(), &before);
        assert_eq!(stored_cart(&front), before);
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_ORDER_FAILED));
    }

    // -------------------------------------------------------------------------
    // Store write failures
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_failed_commit_rolls_cart_back() {
        let mut front = failing_front_with_cart().await;
        let before = front.cart().clone();
        let notices = front.notifier().messages().len();

        let err = front.add_product_to_cart(1, None, 1).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
        assert!(front.edit_cart_item("3#FF5733", 5).await.is_err());
        assert!(front.remove_from_cart("3#FF5733").await.is_err());
        assert!(front.clear_cart().await.is_err());

        assert_eq!(front.cart(), &before);
        assert_eq!(failing_stored_cart(&front), before);
        assert_eq!(front.notifier().messages().len(), notices);
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_session() {
        let mut front = failing_front_with_cart().await;
        let before = front.cart().clone();

        assert!(front.logout().await.is_err());

        assert!(front.is_logged_in());
        assert_eq!(front.cart(), &before);
        assert_eq!(failing_stored_cart(&front), before);
    }

    #[tokio::test]
    async fn test_checkout_counts_order_when_cart_write_fails() {
        let mut front = failing_front_with_cart().await;

        let info = front.checkout("Anna", "1 Main St").await.unwrap();

        assert_eq!(info.num_items_in_cart, 2);
        assert_eq!(front.api().placed.lock().unwrap().len(), 1);
        assert!(front.cart().is_empty());
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_ORDER_PLACED));
    }

    #[tokio::test]
    async fn test_orders_require_user() {
        let front = storefront(FakeApi::default());
        let err = front.orders("").await.unwrap_err();
        assert!(err.requires_login());
        assert_eq!(front.notifier().last_message().as_deref(), Some(NOTICE_LOGIN_TO_VIEW_ORDERS));
    }

    #[tokio::test]
    async fn test_orders_use_compact_pagination() {
        let front = logged_in(FakeApi::default()).await;

        let history = front.orders("?page=5").await.unwrap();

        assert_eq!(*front.api().order_pages.lock().unwrap(), vec![5]);
        assert_eq!(history.orders.len(), 1);
        assert_eq!(history.meta.page_count, 9);

        let controls = history.pagination.unwrap();
        assert_eq!(controls.entries.len(), 5);
        assert_eq!(controls.prev_url, "/orders?page=4");
        assert_eq!(controls.next_url, "/orders?page=6");
    }
}
