//! Wire types for the StockMaster REST API (camelCase on the wire).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use stockmaster_core::{MovementId, ProductId, UserId, WarehouseId};

/// `{ id, name }` pairs served by the `active-list` endpoints for selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveListItem<Id> {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, alias = "category")]
    pub category_name: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default, alias = "minimumStock")]
    pub min_stock: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category_name: String,
    /// Only meaningful on create: where the initial quantity lands.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<WarehouseId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_quantity: Option<i64>,
    pub min_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseInput {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A user record as listed by the admin screens (not the session identity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(alias = "userId")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub email: String,
    /// Omitted on update to keep the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "ENTRADA")]
    Entry,
    #[serde(rename = "SALIDA")]
    Exit,
    #[serde(rename = "TRANSFERENCIA", alias = "TRANSFER")]
    Transfer,
}

/// One row of the movement history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default)]
    pub id: Option<MovementId>,
    #[serde(alias = "type")]
    pub movement_type: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub movement_date: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, alias = "reason")]
    pub motive: Option<String>,
}

/// Body of `POST /movements/entry` and `POST /movements/exit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub warehouse_id: WarehouseId,
    pub quantity: i64,
    pub user_id: UserId,
    pub motive: String,
}

/// Body of `POST /movements/transfer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub product_id: ProductId,
    pub origin_warehouse_id: WarehouseId,
    pub destination_warehouse_id: WarehouseId,
    pub quantity: i64,
    pub motive: String,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    #[serde(default)]
    pub transfer_reference: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Current stock of one product in one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseStock {
    pub warehouse_id: WarehouseId,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub current_stock: i64,
}

/// Backends have sent stock as a number, a numeric string or null; anything
/// unusable counts as zero.
fn lenient_quantity<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn record_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("record id is not an integer")),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!("unexpected record id: {other}"))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockRow {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    pub current_stock: i64,
    pub minimum_stock: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReportRow {
    pub movement_date: String,
    pub product_name: String,
    pub movement_type: String,
    pub quantity: i64,
    #[serde(default)]
    pub warehouse_name: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSellingRow {
    #[serde(default)]
    pub position: Option<u32>,
    pub product_name: String,
    pub units_sold: i64,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub average_price: Option<f64>,
}

impl TopSellingRow {
    /// Reported average, or revenue / units when the backend omits it.
    pub fn effective_average_price(&self) -> f64 {
        match (self.average_price, self.total_revenue) {
            (Some(avg), _) if avg != 0.0 => avg,
            (_, Some(revenue)) if self.units_sold > 0 => revenue / self.units_sold as f64,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub low_stock: i64,
    pub total_movements: i64,
    pub total_sold: i64,
    pub total_revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A soft-deleted record offered for restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InactiveRecord {
    #[serde(deserialize_with = "record_id")]
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
