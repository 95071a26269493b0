use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::{LowStockRow, MovementReportRow, TopSellingRow};

/// Products at or below their minimum stock.
pub async fn low_stock(api: &ApiClient) -> ClientResult<Vec<LowStockRow>> {
    api.get("/reports/low-stock").await
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DateRange {
    start_date: String,
    end_date: String,
}

/// Movements between two dates, both inclusive.
pub async fn movements(api: &ApiClient, from: NaiveDate, to: NaiveDate) -> ClientResult<Vec<MovementReportRow>> {
    let range = DateRange {
        start_date: from.format("%Y-%m-%d").to_string(),
        end_date: to.format("%Y-%m-%d").to_string(),
    };
    api.get_with_query("/reports/movements", &range).await
}

/// Best-selling products.
pub async fn sales(api: &ApiClient) -> ClientResult<Vec<TopSellingRow>> {
    api.get("/reports/sales").await
}

/// Render a backend timestamp as `dd/mm/yyyy HH:MM`.
///
/// Accepts RFC 3339 and naive ISO timestamps; anything else is returned
/// unchanged.
pub fn format_movement_datetime(raw: &str) -> String {
    const DISPLAY: &str = "%d/%m/%Y %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(DISPLAY).to_string();
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_iso_timestamps() {
        assert_eq!(format_movement_datetime("2024-03-05T09:07:44"), "05/03/2024 09:07");
        assert_eq!(format_movement_datetime("2024-03-05T09:07:44.123456"), "05/03/2024 09:07");
        assert_eq!(format_movement_datetime("2024-12-31T23:59:00-05:00"), "31/12/2024 23:59");
        assert_eq!(format_movement_datetime("2024-01-02 08:00:00"), "02/01/2024 08:00");
    }

    #[test]
    fn unknown_formats_pass_through() {
        assert_eq!(format_movement_datetime("yesterday"), "yesterday");
    }
}
