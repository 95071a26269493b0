use stockmaster_core::DomainError;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::{MovementKind, MovementRequest, StockMovement, TransferReceipt, TransferRequest};

const BASE: &str = "/movements";

/// Movement history, newest first as served by the backend.
pub async fn history(api: &ApiClient) -> ClientResult<Vec<StockMovement>> {
    api.get(BASE).await
}

/// Register an entry (stock in).
pub async fn register_entry(api: &ApiClient, req: &MovementRequest) -> ClientResult<StockMovement> {
    register(api, MovementKind::Entry, req).await
}

/// Register an exit (stock out). The backend rejects exits above the
/// available stock.
pub async fn register_exit(api: &ApiClient, req: &MovementRequest) -> ClientResult<StockMovement> {
    register(api, MovementKind::Exit, req).await
}

async fn register(api: &ApiClient, kind: MovementKind, req: &MovementRequest) -> ClientResult<StockMovement> {
    if req.quantity <= 0 {
        return Err(DomainError::validation("quantity must be greater than zero").into());
    }

    let path = match kind {
        MovementKind::Entry => "entry",
        MovementKind::Exit => "exit",
        MovementKind::Transfer => {
            return Err(DomainError::validation("transfers go through register_transfer").into());
        }
    };

    tracing::debug!(?kind, product_id = %req.product_id, warehouse_id = %req.warehouse_id, "registering movement");
    api.post(&format!("{BASE}/{path}"), req).await
}

/// Move stock between two warehouses.
///
/// Any 2xx counts as registered; the receipt is empty when the backend sends
/// no usable body.
pub async fn register_transfer(api: &ApiClient, req: &TransferRequest) -> ClientResult<TransferReceipt> {
    api.post_lenient(&format!("{BASE}/transfer"), req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::session::test_support::guard_with_store;
    use stockmaster_core::{ProductId, UserId, WarehouseId};

    fn request(quantity: i64) -> MovementRequest {
        MovementRequest {
            product_id: ProductId::new(1),
            warehouse_id: WarehouseId::new(1),
            quantity,
            user_id: UserId::new(1),
            motive: "count".to_string(),
        }
    }

    #[tokio::test]
    async fn non_positive_quantity_never_reaches_the_network() {
        let (guard, _store) = guard_with_store();
        for quantity in [0, -3] {
            let err = register_entry(guard.api(), &request(quantity)).await.unwrap_err();
            assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))), "{err:?}");
            let err = register_exit(guard.api(), &request(quantity)).await.unwrap_err();
            assert!(matches!(err, ClientError::Domain(DomainError::Validation(_))), "{err:?}");
        }
    }
}
