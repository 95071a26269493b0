use std::fmt;
use std::str::FromStr;

use futures::future::try_join_all;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use stockmaster_core::DomainError;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::InactiveRecord;

/// Resources that support soft delete and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoverableResource {
    Products,
    Warehouses,
    Users,
}

impl RecoverableResource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Warehouses => "warehouses",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for RecoverableResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoverableResource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "products" => Ok(Self::Products),
            "warehouses" => Ok(Self::Warehouses),
            "users" => Ok(Self::Users),
            other => Err(DomainError::validation(format!("unknown resource: {other}"))),
        }
    }
}

pub async fn inactive(api: &ApiClient, resource: RecoverableResource) -> ClientResult<Vec<InactiveRecord>> {
    api.get(&format!("/{resource}/inactive")).await
}

/// Restore every id concurrently; fails if any single restore fails.
pub async fn restore(api: &ApiClient, resource: RecoverableResource, ids: &[i64]) -> ClientResult<()> {
    let body = serde_json::json!({});
    try_join_all(ids.iter().map(|id| {
        let path = format!("/{resource}/{id}/restore");
        let body = &body;
        async move { api.send_ignoring_body(Method::PUT, &path, body).await }
    }))
    .await?;

    tracing::info!(%resource, count = ids.len(), "records restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resource_names() {
        assert_eq!("Products".parse::<RecoverableResource>().unwrap(), RecoverableResource::Products);
        assert_eq!(" users ".parse::<RecoverableResource>().unwrap(), RecoverableResource::Users);
        assert!("movements".parse::<RecoverableResource>().is_err());
        assert_eq!(RecoverableResource::Warehouses.to_string(), "warehouses");
    }
}
