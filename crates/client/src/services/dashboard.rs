use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::DashboardSummary;

/// Metrics shown on the reports dashboard cards.
pub async fn summary(api: &ApiClient) -> ClientResult<DashboardSummary> {
    api.get("/dashboard/summary").await
}
