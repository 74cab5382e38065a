//! # Catalog Operations
//!
//! Product listing, lookup and the admin create/update/delete calls.
//!
//! ## Failure Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  operation            on API failure                                    │
//! │  ─────────            ──────────────                                    │
//! │  fetch_products       status = Failed, Err           (default)         │
//! │                       demo products, Placeholder, Ok (demo mode)       │
//! │  get_product_by_id    cached product if present, else Err              │
//! │  create/update/delete Err, local list untouched                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use shopfront_core::demo::demo_products;
use shopfront_core::validation::validate_product_draft;
use shopfront_core::{Product, ProductDraft, ProductEnvelope, ProductFilters, ProductId, ProductListing};

use super::{FetchStatus, Store};
use crate::error::ClientResult;
use crate::http::ApiRequest;

/// Distinct non-empty categories in first-seen order.
fn derive_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !product.category.is_empty() && !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

impl Store {
    /// Replaces the catalog with the API's listing for `filters`.
    pub async fn fetch_products(&self, filters: &ProductFilters) -> ClientResult<Vec<Product>> {
        let _loading = self.loading.begin();

        let request = ApiRequest::get("/products").with_query(filters.pairs());
        match self.api.fetch::<ProductListing>(request).await {
            Ok(listing) => {
                let products = listing.into_vec();
                debug!(count = products.len(), "Fetched products");
                self.set_products(products.clone(), FetchStatus::loaded_now());
                Ok(products)
            }
            Err(err) if self.config.is_demo_mode() => {
                warn!(error = %err, "Product fetch failed, using demo catalog");
                let products = demo_products();
                self.set_products(products.clone(), FetchStatus::Placeholder);
                Ok(products)
            }
            Err(err) => {
                warn!(error = %err, "Product fetch failed");
                self.products_status.send_replace(FetchStatus::failed(&err));
                Err(err)
            }
        }
    }

    /// Looks up one product, falling back to the cached catalog.
    pub async fn get_product_by_id(&self, id: ProductId) -> ClientResult<Product> {
        let request = ApiRequest::get(format!("/products/{}", id));
        match self.api.fetch::<ProductEnvelope>(request).await {
            Ok(envelope) => Ok(envelope.into_inner()),
            Err(err) => {
                let cached = self.products.borrow().iter().find(|p| p.id == id).cloned();
                match cached {
                    Some(product) => {
                        warn!(product_id = %id, error = %err, "Product lookup failed, using cached copy");
                        Ok(product)
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Creates a product and puts it at the front of the catalog.
    pub async fn create_product(&self, draft: &ProductDraft) -> ClientResult<Product> {
        validate_product_draft(draft)?;
        let _loading = self.loading.begin();

        let request = ApiRequest::post("/admin/products").json(draft)?;
        let product = self.api.fetch::<ProductEnvelope>(request).await?.into_inner();

        self.modify_products(|products| products.insert(0, product.clone()));
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Updates a product and replaces the cached copy, if there is one.
    pub async fn update_product(&self, id: ProductId, draft: &ProductDraft) -> ClientResult<Product> {
        validate_product_draft(draft)?;
        let _loading = self.loading.begin();

        let request = ApiRequest::put(format!("/admin/products/{}", id)).json(draft)?;
        let product = self.api.fetch::<ProductEnvelope>(request).await?.into_inner();

        self.modify_products(|products| {
            if let Some(slot) = products.iter_mut().find(|p| p.id == id) {
                *slot = product.clone();
            }
        });
        info!(product_id = %id, "Product updated");
        Ok(product)
    }

    /// Deletes a product and drops it from the catalog.
    pub async fn delete_product(&self, id: ProductId) -> ClientResult<()> {
        let _loading = self.loading.begin();

        self.api
            .request(ApiRequest::delete(format!("/admin/products/{}", id)))
            .await?;

        self.modify_products(|products| products.retain(|p| p.id != id));
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    fn set_products(&self, products: Vec<Product>, status: FetchStatus) {
        self.modify_products(|current| *current = products);
        self.products_status.send_replace(status);
    }

    fn modify_products<F: FnOnce(&mut Vec<Product>)>(&self, change: F) {
        self.products.send_modify(change);
        let categories = derive_categories(&self.products.borrow());
        self.categories.send_if_modified(|current| {
            if *current == categories {
                return false;
            }
            *current = categories;
            true
        });
    }
}
