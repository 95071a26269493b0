use stockmaster_core::UserId;

use crate::error::ClientResult;
use crate::http::ApiClient;
use crate::types::{UserAccount, UserInput};

const BASE: &str = "/users";

pub async fn list(api: &ApiClient) -> ClientResult<Vec<UserAccount>> {
    api.get(BASE).await
}

pub async fn create(api: &ApiClient, input: &UserInput) -> ClientResult<UserAccount> {
    api.post(BASE, input).await
}

pub async fn update(api: &ApiClient, id: UserId, input: &UserInput) -> ClientResult<UserAccount> {
    api.put(&format!("{BASE}/{id}"), input).await
}

pub async fn delete(api: &ApiClient, id: UserId) -> ClientResult<()> {
    api.delete(&format!("{BASE}/{id}")).await
}
