//! Stock transfer form: selection rules and client-side validation.
//!
//! The backend re-checks everything; this only keeps obviously invalid
//! requests from being sent.

use serde::Serialize;
use thiserror::Error;

use stockmaster_core::{ProductId, UserId, WarehouseId};

use crate::services::movements;
use crate::session::SessionGuard;
use crate::types::{ActiveListItem, TransferReceipt, TransferRequest, WarehouseStock};

/// Shown when a rejected transfer carries no backend message.
pub const TRANSFER_FAILURE: &str = "Could not register the transfer. Check the stock and the data.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("the origin warehouse has no stock of this product")]
    OriginUnavailable,

    #[error("insufficient stock at origin: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("no active session")]
    NoSession,

    /// The backend refused the transfer; carries the message to show.
    #[error("{0}")]
    Rejected(String),
}

/// A warehouse that currently holds the selected product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OriginOption {
    pub warehouse_id: WarehouseId,
    pub name: String,
    pub available: i64,
}

/// Warehouses with stock > 0 for the product, named from the stock row or,
/// failing that, from the active warehouse list.
pub fn available_origins(
    stock: &[WarehouseStock],
    warehouses: &[ActiveListItem<WarehouseId>],
) -> Vec<OriginOption> {
    stock
        .iter()
        .filter(|row| row.current_stock > 0)
        .map(|row| {
            let name = row
                .warehouse_name
                .clone()
                .or_else(|| {
                    warehouses
                        .iter()
                        .find(|w| w.id == row.warehouse_id)
                        .map(|w| w.name.clone())
                })
                .unwrap_or_else(|| format!("Warehouse {}", row.warehouse_id));
            OriginOption {
                warehouse_id: row.warehouse_id,
                name,
                available: row.current_stock,
            }
        })
        .collect()
}

/// Every warehouse except the selected origin.
pub fn destination_options(
    warehouses: &[ActiveListItem<WarehouseId>],
    origin: Option<WarehouseId>,
) -> Vec<&ActiveListItem<WarehouseId>> {
    warehouses
        .iter()
        .filter(|w| Some(w.id) != origin)
        .collect()
}

/// In-progress transfer form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferDraft {
    product: Option<ProductId>,
    origin: Option<WarehouseId>,
    destination: Option<WarehouseId>,
    quantity: Option<i64>,
    motive: String,
}

impl TransferDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(&self) -> Option<ProductId> {
        self.product
    }

    pub fn origin(&self) -> Option<WarehouseId> {
        self.origin
    }

    pub fn destination(&self) -> Option<WarehouseId> {
        self.destination
    }

    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    pub fn motive(&self) -> &str {
        &self.motive
    }

    /// Choosing a product invalidates every stock-dependent field.
    pub fn select_product(&mut self, product: ProductId) {
        self.product = Some(product);
        self.origin = None;
        self.destination = None;
        self.quantity = None;
    }

    pub fn select_origin(&mut self, origin: WarehouseId) {
        if self.destination == Some(origin) {
            self.destination = None;
        }
        self.origin = Some(origin);
    }

    pub fn select_destination(&mut self, destination: WarehouseId) {
        if self.origin == Some(destination) {
            self.origin = None;
        }
        self.destination = Some(destination);
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = Some(quantity);
    }

    pub fn set_motive(&mut self, motive: impl Into<String>) {
        self.motive = motive.into();
    }

    /// Deselect the origin if reloaded stock no longer lists it.
    pub fn retain_available_origin(&mut self, origins: &[OriginOption]) {
        if let Some(origin) = self.origin {
            if !origins.iter().any(|o| o.warehouse_id == origin) {
                tracing::debug!(%origin, "origin lost its stock; deselecting");
                self.origin = None;
            }
        }
    }

    /// Check the form against the current origin options and build the
    /// request body.
    pub fn validate(&self, origins: &[OriginOption], user_id: UserId) -> Result<TransferRequest, TransferError> {
        let motive = self.motive.trim();

        let mut missing = Vec::new();
        if self.product.is_none() {
            missing.push("product");
        }
        if self.origin.is_none() {
            missing.push("origin");
        }
        if self.destination.is_none() {
            missing.push("destination");
        }
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        if motive.is_empty() {
            missing.push("motive");
        }

        let (Some(product_id), Some(origin), Some(destination), Some(quantity)) =
            (self.product, self.origin, self.destination, self.quantity)
        else {
            return Err(TransferError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(TransferError::MissingFields(missing));
        }

        if quantity <= 0 {
            return Err(TransferError::NonPositiveQuantity);
        }

        let available = origins
            .iter()
            .find(|o| o.warehouse_id == origin)
            .map(|o| o.available)
            .ok_or(TransferError::OriginUnavailable)?;
        if quantity > available {
            return Err(TransferError::InsufficientStock {
                available,
                requested: quantity,
            });
        }

        Ok(TransferRequest {
            product_id,
            origin_warehouse_id: origin,
            destination_warehouse_id: destination,
            quantity,
            motive: motive.to_string(),
            user_id,
        })
    }
}

/// Validate `draft` as the signed-in user and send it.
///
/// Backend rejections come back as [`TransferError::Rejected`] with the
/// backend's message, or [`TRANSFER_FAILURE`] when it gave none.
pub async fn submit(
    guard: &SessionGuard,
    draft: &TransferDraft,
    origins: &[OriginOption],
) -> Result<TransferReceipt, TransferError> {
    let user = guard.require_user().map_err(|_| TransferError::NoSession)?;
    let request = draft.validate(origins, user.id)?;

    match movements::register_transfer(guard.api(), &request).await {
        Ok(receipt) => {
            tracing::info!(
                product_id = %request.product_id,
                origin = %request.origin_warehouse_id,
                destination = %request.destination_warehouse_id,
                quantity = request.quantity,
                "transfer registered"
            );
            Ok(receipt)
        }
        Err(err) => {
            tracing::warn!(error = %err, "transfer rejected");
            Err(TransferError::Rejected(err.user_message(TRANSFER_FAILURE)))
        }
    }
}
