//! Checkout and order history.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use shopfront_core::{CoreError, Order, OrderListing};

use super::{FetchStatus, Store};
use crate::error::{ClientError, ClientResult};
use crate::http::ApiRequest;

impl Store {
    /// Submits the current cart as an order.
    ///
    /// The body is `{items, total}` merged with the fields of `details`
    /// (shipping address, payment method, ...). Fields in `details` win.
    /// On success the cart is cleared; on failure it is left as it was.
    ///
    /// ## Errors
    /// - [`ClientError::EmptyCart`] when there is nothing to order
    /// - [`CoreError::InvalidPayload`] when `details` is not a JSON object
    pub async fn create_order<D>(&self, details: &D) -> ClientResult<Value>
    where
        D: Serialize + ?Sized,
    {
        let cart = self.cart();
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let extra = match serde_json::to_value(details)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(CoreError::InvalidPayload(format!(
                    "order details must be an object, got {}",
                    other
                ))
                .into())
            }
        };

        let mut payload = Map::new();
        payload.insert("items".to_string(), serde_json::to_value(cart.items())?);
        payload.insert("total".to_string(), serde_json::to_value(cart.total())?);
        payload.extend(extra);

        let _loading = self.loading.begin();
        let response = self
            .api
            .request(ApiRequest::post("/orders").with_body(Value::Object(payload)))
            .await?;

        info!(lines = cart.line_count(), total = %cart.total(), "Order placed");

        // The order already exists server-side.
        if let Err(e) = self.clear_cart() {
            error!(error = %e, "Order placed but the cart could not be cleared");
        }

        Ok(response)
    }

    /// Replaces the order history with the API's list.
    pub async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        let _loading = self.loading.begin();

        match self.api.fetch::<OrderListing>(ApiRequest::get("/orders")).await {
            Ok(listing) => {
                let orders = listing.into_vec();
                debug!(count = orders.len(), "Fetched orders");
                self.orders.send_replace(orders.clone());
                self.orders_status.send_replace(FetchStatus::loaded_now());
                Ok(orders)
            }
            Err(err) if self.config.is_demo_mode() => {
                warn!(error = %err, "Order fetch failed, showing no orders");
                self.orders.send_replace(Vec::new());
                self.orders_status.send_replace(FetchStatus::Placeholder);
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(error = %err, "Order fetch failed");
                self.orders_status.send_replace(FetchStatus::failed(&err));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::config::ClientConfig;
    use crate::error::ClientError;
    use crate::storage::{KeyValueStore, MemoryStorage, CART_KEY};
    use crate::store::{FetchStatus, Store};
    use crate::testing::MockApi;
    use shopfront_core::{CoreError, Money, Product, ProductId};

    fn store_for(api: &MockApi, storage: Arc<MemoryStorage>) -> Store {
        Store::new(ClientConfig::with_base_url(api.base_url()), storage).unwrap()
    }

    fn fill_cart(store: &Store) {
        let mug = Product::new(ProductId::new(1), "Mug", Money::from_cents(1000));
        let tee = Product::new(ProductId::new(2), "Tee", Money::from_cents(1500));
        store.add_to_cart(&mug, 2).unwrap();
        store.add_to_cart(&tee, 1).unwrap();
    }

    #[tokio::test]
    async fn test_create_order_sends_cart_and_clears_it() {
        let api = MockApi::start().await;
        api.respond("POST", "/orders", 201, json!({"order": {"id": 55, "status": "pending"}}));
        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());
        fill_cart(&store);

        let response = store
            .create_order(&json!({"shipping_address": "Calle 1", "payment_method": "card"}))
            .await
            .unwrap();

        assert_eq!(response["order"]["id"], 55);
        let body = api.last_request().unwrap().body;
        assert_eq!(body["total"], 35);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["quantity"], 2);
        assert_eq!(body["shipping_address"], "Calle 1");

        assert!(store.cart().is_empty());
        assert_eq!(storage.get(CART_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_order_details_override_defaults() {
        let api = MockApi::start().await;
        api.respond("POST", "/orders", 201, json!({}));
        let store = store_for(&api, Arc::new(MemoryStorage::new()));
        fill_cart(&store);

        store.create_order(&json!({"total": 1})).await.unwrap();
        assert_eq!(api.last_request().unwrap().body["total"], 1);
    }

    #[tokio::test]
    async fn test_create_order_failure_keeps_cart() {
        let api = MockApi::start().await;
        api.respond("POST", "/orders", 422, json!({"message": "invalid"}));
        let storage = Arc::new(MemoryStorage::new());
        let store = store_for(&api, storage.clone());
        fill_cart(&store);
        let before = store.cart();

        let err = store.create_order(&json!({})).await.unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(store.cart(), before);
        assert!(storage.get(CART_KEY).unwrap().is_some());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_cart() {
        let api = MockApi::start().await;
        let store = store_for(&api, Arc::new(MemoryStorage::new()));

        let err = store.create_order(&json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyCart));
        assert!(api.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_rejects_non_object_details() {
        let api = MockApi::start().await;
        let store = store_for(&api, Arc::new(MemoryStorage::new()));
        fill_cart(&store);

        let err = store.create_order(&json!(["nope"])).await.unwrap_err();
        assert!(matches!(err, ClientError::Core(CoreError::InvalidPayload(_))));

        api.respond("POST", "/orders", 201, json!({}));
        store.create_order(&()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_orders_shapes() {
        let api = MockApi::start().await;
        api.respond("GET", "/orders", 200, json!({"orders": [{"id": 1, "total": 35}]}));
        let store = store_for(&api, Arc::new(MemoryStorage::new()));

        let orders = store.fetch_orders().await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, Some(Money::from_cents(3500)));
        assert!(store.orders_status().is_loaded());

        api.respond("GET", "/orders", 200, json!([{"id": 1}, {"id": 2}]));
        assert_eq!(store.fetch_orders().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_orders_failure_keeps_previous_list() {
        let api = MockApi::start().await;
        api.respond("GET", "/orders", 200, json!([{"id": 1}]));
        let store = store_for(&api, Arc::new(MemoryStorage::new()));
        store.fetch_orders().await.unwrap();

        api.respond("GET", "/orders", 500, json!({}));
        assert!(store.fetch_orders().await.is_err());
        assert_eq!(store.orders().len(), 1);
        assert!(matches!(store.orders_status(), FetchStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_orders_demo_mode() {
        let api = MockApi::start().await;
        api.respond("GET", "/orders", 500, json!({}));
        let mut config = ClientConfig::with_base_url(api.base_url());
        config.session.demo_mode = true;
        let store = Store::new(config, Arc::new(MemoryStorage::new())).unwrap();

        assert!(store.fetch_orders().await.unwrap().is_empty());
        assert_eq!(store.orders_status(), FetchStatus::Placeholder);
    }
}
