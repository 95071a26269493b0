use stockmaster_core::WarehouseId;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::{ActiveListItem, Warehouse, WarehouseInput};

const BASE: &str = "/warehouses";

pub async fn list(api: &ApiClient) -> ClientResult<Vec<Warehouse>> {
    api.get(BASE).await
}

pub async fn active_list(api: &ApiClient) -> ClientResult<Vec<ActiveListItem<WarehouseId>>> {
    api.get(&format!("{BASE}/active-list")).await
}

pub async fn create(api: &ApiClient, input: &WarehouseInput) -> ClientResult<Warehouse> {
    api.post(BASE, input).await
}

pub async fn update(api: &ApiClient, id: WarehouseId, input: &WarehouseInput) -> ClientResult<Warehouse> {
    api.put(&format!("{BASE}/{id}"), input).await
}

/// Soft-delete (the backend refuses while the warehouse still holds stock).
pub async fn delete(api: &ApiClient, id: WarehouseId) -> ClientResult<()> {
    api.delete(&format!("{BASE}/{id}")).await
}
