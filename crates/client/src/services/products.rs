use stockmaster_core::ProductId;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::{ActiveListItem, Product, ProductInput, WarehouseStock};

const BASE: &str = "/products";

/// List all active products.
pub async fn list(api: &ApiClient) -> ClientResult<Vec<Product>> {
    api.get(BASE).await
}

/// `{ id, name }` pairs for selectors.
pub async fn active_list(api: &ApiClient) -> ClientResult<Vec<ActiveListItem<ProductId>>> {
    api.get(&format!("{BASE}/active-list")).await
}

pub async fn create(api: &ApiClient, input: &ProductInput) -> ClientResult<Product> {
    api.post(BASE, input).await
}

pub async fn update(api: &ApiClient, id: ProductId, input: &ProductInput) -> ClientResult<Product> {
    api.put(&format!("{BASE}/{id}"), input).await
}

/// Soft-delete: the product moves to the inactive list and can be restored.
pub async fn delete(api: &ApiClient, id: ProductId) -> ClientResult<()> {
    api.delete(&format!("{BASE}/{id}")).await
}

/// Per-warehouse stock for one product.
pub async fn stock_by_warehouse(api: &ApiClient, id: ProductId) -> ClientResult<Vec<WarehouseStock>> {
    api.get(&format!("{BASE}/{id}/stock")).await
}
