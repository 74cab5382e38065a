//! Session operations: login, registration, logout and session restore.

use serde_json::Value;
use tracing::{debug, info, warn};

use shopfront_core::demo::demo_user;
use shopfront_core::validation::{validate_credentials, validate_registration};
use shopfront_core::{AuthResponse, Cart, Credentials, Registration, User, UserEnvelope};

use super::Store;
use crate::error::ClientResult;
use crate::http::ApiRequest;
use crate::storage::{CART_KEY, TOKEN_KEY};

impl Store {
    /// Signs in and installs the session.
    ///
    /// The token is persisted before the user is published.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthResponse> {
        validate_credentials(credentials)?;
        let _loading = self.loading.begin();

        let request = ApiRequest::post("/auth/login").json(credentials)?;
        let response: AuthResponse = self.api.fetch(request).await?;

        self.storage.set(TOKEN_KEY, &response.token)?;
        self.user.send_replace(Some(response.user.clone()));

        info!(user_id = response.user.id, role = %response.user.role, "Logged in");
        Ok(response)
    }

    /// Creates an account. Does not sign in.
    pub async fn register(&self, registration: &Registration) -> ClientResult<Value> {
        validate_registration(registration)?;
        let _loading = self.loading.begin();

        let request = ApiRequest::post("/auth/register").json(registration)?;
        let response = self.api.request(request).await?;

        info!(email = %registration.email, "Registered account");
        Ok(response)
    }

    /// Ends the session.
    ///
    /// The in-memory cart is emptied. The saved cart is only deleted when
    /// `session.logout_clears_saved_cart` is set, so by default it comes back
    /// on the next start.
    pub fn logout(&self) -> ClientResult<()> {
        self.storage.remove(TOKEN_KEY)?;
        self.user.send_replace(None);

        let _cart = self.cart_write_lock();
        if self.config.session.logout_clears_saved_cart {
            self.storage.remove(CART_KEY)?;
        }
        self.publish_cart(Cart::new());

        info!("Logged out");
        Ok(())
    }

    /// Restores the session from a saved token.
    ///
    /// ## Behavior
    /// - No token: nothing happens
    /// - `GET /auth/me` succeeds: the user is installed
    /// - It fails: the token is dropped and the error returned; in demo mode
    ///   the demo user is installed instead
    pub async fn initialize_auth(&self) -> ClientResult<Option<User>> {
        if self.storage.get(TOKEN_KEY)?.is_none() {
            debug!("No saved session");
            return Ok(None);
        }

        let _loading = self.loading.begin();
        match self.api.fetch::<UserEnvelope>(ApiRequest::get("/auth/me")).await {
            Ok(envelope) => {
                let user = envelope.into_inner();
                info!(user_id = user.id, "Session restored");
                self.user.send_replace(Some(user.clone()));
                Ok(Some(user))
            }
            Err(err) if self.config.is_demo_mode() => {
                warn!(error = %err, "Session check failed, using demo user");
                let user = demo_user();
                self.user.send_replace(Some(user.clone()));
                Ok(Some(user))
            }
            Err(err) => {
                warn!(error = %err, "Session check failed, dropping saved token");
                self.storage.remove(TOKEN_KEY)?;
                self.user.send_replace(None);
                Err(err)
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.borrow().as_ref().is_some_and(User::is_admin)
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::storage::{KeyValueStore, MemoryStorage, CART_KEY, TOKEN_KEY};
    use crate::store::Store;
    use crate::testing::MockApi;
    use shopfront_core::{Credentials, Money, Product, ProductId, Registration, Role};

    fn store_for(api: &MockApi, storage: Arc<MemoryStorage>) -> Store {
        Store::new(ClientConfig::with_base_url(api.base_url()), storage).unwrap()
    }

    fn ana() -> serde_json::Value {
        json!({"id": 7, "name": "Ana", "email": "ana@example.com", "role": "customer"})
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let api = MockApi::start().await;
        api.respond("POST", "/auth/login", 200, json!({"token": "abc", "user": ana()}));

        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());

        let response = store
            .login(&Credentials::new("ana@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(response.token, "abc");
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert!(!store.is_loading());

        let sent = api.last_request().unwrap();
        assert_eq!(sent.body, json!({"email": "ana@example.com", "password": "secret"}));

        store.logout().unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(store.current_user().is_none());
    }

    #[tokio::test]
    async fn test_login_failure_keeps_state() {
        let api = MockApi::start().await;
        api.respond("POST", "/auth/login", 401, json!({"message": "bad credentials"}));

        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());

        let err = store
            .login(&Credentials::new("ana@example.com", "wrong"))
            .await
            .unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(!store.is_authenticated());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_login_validation_skips_network() {
        let api = MockApi::start().await;
        let store = store_for(&api, Arc::new(MemoryStorage::new()));

        let err = store.login(&Credentials::new("nope", "x")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_loading_while_login_in_flight() {
        let api = MockApi::start().await;
        api.respond("POST", "/auth/login", 200, json!({"token": "abc", "user": ana()}));
        let gate = api.gate();

        let store = Arc::new(store_for(&api, Arc::new(MemoryStorage::new())));
        let mut loading = store.subscribe_loading();

        let task = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .login(&Credentials::new("ana@example.com", "secret"))
                    .await
            })
        };

        loading.wait_for(|on| *on).await.unwrap();
        assert!(store.is_loading());

        gate.notify_one();
        task.await.unwrap().unwrap();
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_register_does_not_sign_in() {
        let api = MockApi::start().await;
        api.respond("POST", "/auth/register", 201, json!({"message": "created"}));
        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());

        let registration = Registration {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
            password_confirmation: "secret".to_string(),
        };
        let response = store.register(&registration).await.unwrap();

        assert_eq!(response["message"], "created");
        assert!(!store.is_authenticated());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(api.last_request().unwrap().body["password_confirmation"], "secret");
    }

    #[tokio::test]
    async fn test_logout_keeps_saved_cart_by_default() {
        let api = MockApi::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());

        let mug = Product::new(ProductId::new(1), "Mug", Money::from_cents(1000));
        store.add_to_cart(&mug, 1).unwrap();
        store.logout().unwrap();

        assert!(store.cart().is_empty());
        assert_eq!(store.cart_item_count(), 0);
        assert!(storage.get(CART_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_can_clear_saved_cart() {
        let api = MockApi::start().await;
        let storage = Arc::new(MemoryStorage::new());
        let mut config = ClientConfig::with_base_url(api.base_url());
        config.session.logout_clears_saved_cart = true;
        let store = Store::new(config, storage.clone()).unwrap();

        let mug = Product::new(ProductId::new(1), "Mug", Money::from_cents(1000));
        store.add_to_cart(&mug, 1).unwrap();
        store.logout().unwrap();

        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_initialize_auth_without_token_is_noop() {
        let api = MockApi::start().await;
        let store = store_for(&api, Arc::new(MemoryStorage::new()));

        assert_eq!(store.initialize_auth().await.unwrap(), None);
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_initialize_auth_accepts_bare_user() {
        let api = MockApi::start().await;
        api.respond("GET", "/auth/me", 200, ana());
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "abc").unwrap();
        let store = store_for(&api, storage);

        let user = store.initialize_auth().await.unwrap().unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(
            api.last_request().unwrap().header("authorization"),
            Some("Bearer abc")
        );
    }

    #[tokio::test]
    async fn test_initialize_auth_failure_drops_token() {
        let api = MockApi::start().await;
        api.respond("GET", "/auth/me", 401, json!({}));
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "stale").unwrap();
        let store = store_for(&api, storage.clone());

        let err = store.initialize_auth().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_initialize_auth_demo_mode_installs_demo_user() {
        let api = MockApi::start().await;
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "abc").unwrap();
        let mut config = ClientConfig::with_base_url(api.base_url());
        config.session.demo_mode = true;
        let store = Store::new(config, storage.clone()).unwrap();

        let user = store.initialize_auth().await.unwrap().unwrap();
        assert_eq!(user.name, "Usuario Demo");
        assert_eq!(user.role, Role::Customer);
        assert!(storage.get(TOKEN_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_admin_role() {
        let api = MockApi::start().await;
        api.respond(
            "POST",
            "/auth/login",
            200,
            json!({"token": "t", "user": {"id": 1, "name": "Root", "email": "root@example.com", "role": "admin"}}),
        );
        let store = store_for(&api, Arc::new(MemoryStorage::new()));

        store
            .login(&Credentials::new("root@example.com", "pw"))
            .await
            .unwrap();
        assert!(store.is_admin());
    }
}
