//! Session guard: the single source of truth for "is there a usable
//! authenticated session right now".
//!
//! Expiry handling is split into a read-only query ([`SessionGuard::session_state`])
//! and the one explicit mutation ([`SessionGuard::purge_if_expired`]).
//! [`SessionGuard::is_authenticated`] sequences the two, so every reader sees
//! either a valid session or none at all.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stockmaster_auth::{GateDecision, Role, UserIdentity, check_expiry, evaluate, normalize_identity};

use crate::error::{ClientError, ClientResult};
use crate::http::ApiClient;
use crate::storage::{SessionStore, TOKEN_KEY, USER_KEY};

/// What storage says about the session, without changing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No token stored.
    Absent,
    /// Token stored and not expired.
    Active,
    /// Token stored but expired or undecodable.
    Expired,
}

/// A freshly established session, as returned by login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserIdentity,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: Value,
}

#[derive(Clone, Debug)]
pub struct SessionGuard {
    api: ApiClient,
}

impl SessionGuard {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn store(&self) -> &Arc<dyn SessionStore> {
        self.api.store()
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// Bad credentials come back as [`ClientError::Api`] carrying the
    /// backend's message verbatim.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let resp: LoginResponse = match self
            .api
            .post("/auth/login", &LoginRequest { email, password })
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(email, error = %err, "login failed");
                return Err(err);
            }
        };

        let user = normalize_identity(resp.user.clone())
            .map_err(|e| ClientError::Decode(format!("login response user: {e}")))?;

        self.store().set(TOKEN_KEY, &resp.token);
        self.store().set(USER_KEY, &resp.user.to_string());
        tracing::info!(user_id = %user.id, role = %user.role, "logged in");

        Ok(Session {
            token: resp.token,
            user,
        })
    }

    /// Drop the persisted session. Safe to call with no session.
    pub fn logout(&self) {
        self.store().remove(TOKEN_KEY);
        self.store().remove(USER_KEY);
        tracing::info!("session cleared");
    }

    pub fn token(&self) -> Option<String> {
        self.store().get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Read-only view of the stored session.
    pub fn session_state(&self) -> SessionState {
        match self.token() {
            None => SessionState::Absent,
            Some(token) if check_expiry(&token, Utc::now()) => SessionState::Active,
            Some(_) => SessionState::Expired,
        }
    }

    /// Purge the stored session if its token is expired; returns the state
    /// observed before purging.
    pub fn purge_if_expired(&self) -> SessionState {
        let state = self.session_state();
        if state == SessionState::Expired {
            tracing::warn!("stored token expired; purging session");
            self.logout();
        }
        state
    }

    /// `true` only for a stored, unexpired token. An expired one is purged
    /// first.
    pub fn is_authenticated(&self) -> bool {
        self.purge_if_expired() == SessionState::Active
    }

    /// The signed-in identity, normalized; `None` without a usable session.
    ///
    /// A live token whose stored user is missing or unusable is purged, so
    /// no token lingers without an identity.
    pub fn current_user(&self) -> Option<UserIdentity> {
        if !self.is_authenticated() {
            return None;
        }

        let identity = match self.store().get(USER_KEY) {
            None => Err("no user stored next to the token".to_string()),
            Some(raw) => serde_json::from_str::<Value>(&raw)
                .map_err(|e| format!("stored user is not valid JSON: {e}"))
                .and_then(|value| normalize_identity(value).map_err(|e| e.to_string())),
        };

        match identity {
            Ok(identity) => Some(identity),
            Err(reason) => {
                tracing::warn!(%reason, "stored user cannot be used; purging session");
                self.logout();
                None
            }
        }
    }

    /// Run the route gate for a route restricted to `permitted` roles.
    pub fn authorize(&self, permitted: Option<&[Role]>) -> GateDecision {
        evaluate(self.current_user().as_ref(), permitted)
    }

    /// Identity required by write actions that record the acting user.
    pub fn require_user(&self) -> ClientResult<UserIdentity> {
        self.current_user().ok_or(ClientError::NoSession)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryStore;

    /// Unsigned-looking but structurally valid JWT with the given `exp`.
    pub fn token_with_exp(exp: i64) -> String {
        use jsonwebtoken::{Algorithm, EncodingKey, Header};
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "sub": "ana@stockmaster.test", "exp": exp }),
            &EncodingKey::from_secret(b"server-secret"),
        )
        .unwrap()
    }

    pub fn guard_with_store() -> (SessionGuard, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/api");
        let api = ApiClient::new(&config, store.clone()).unwrap();
        (SessionGuard::new(api), store)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use proptest::prelude::*;
    use stockmaster_core::UserId;

    #[test]
    fn no_token_is_not_authenticated() {
        let (guard, store) = guard_with_store();
        assert_eq!(guard.session_state(), SessionState::Absent);
        assert!(!guard.is_authenticated());
        assert!(guard.current_user().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn logout_twice_leaves_storage_empty() {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, "t");
        store.set(USER_KEY, "{}");
        guard.logout();
        assert!(store.is_empty());
        guard.logout();
        assert!(store.is_empty());
    }

    #[test]
    fn session_state_does_not_mutate() {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, &token_with_exp(Utc::now().timestamp() - 10));
        assert_eq!(guard.session_state(), SessionState::Expired);
        assert!(store.get(TOKEN_KEY).is_some());
    }

    #[test]
    fn malformed_token_fails_closed_and_is_purged() {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, "garbage");
        store.set(USER_KEY, r#"{"id":1,"role":"OPERADOR"}"#);
        assert!(!guard.is_authenticated());
        assert!(store.is_empty());
    }

    #[test]
    fn current_user_normalizes_alternate_id() {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, &token_with_exp(Utc::now().timestamp() + 600));
        store.set(USER_KEY, r#"{"userId":21,"role":"OPERADOR","name":"Ana"}"#);

        let user = guard.current_user().unwrap();
        assert_eq!(user.id, UserId::new(21));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("userId").is_none());
    }

    #[test]
    fn unusable_user_purges_the_session() {
        for user in [Some("{oops"), Some(r#"{"name":"no id"}"#), None] {
            let (guard, store) = guard_with_store();
            store.set(TOKEN_KEY, &token_with_exp(Utc::now().timestamp() + 600));
            if let Some(user) = user {
                store.set(USER_KEY, user);
            }
            assert!(guard.current_user().is_none(), "user {user:?}");
            assert!(store.is_empty(), "user {user:?}");
            assert!(!guard.is_authenticated());
        }
    }

    #[test]
    fn authorize_denies_operator_on_admin_route() {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, &token_with_exp(Utc::now().timestamp() + 600));
        store.set(USER_KEY, r#"{"id":2,"role":"OPERADOR"}"#);
        assert!(matches!(
            guard.authorize(Some(&[Role::ADMINISTRATOR])),
            GateDecision::Denied(_)
        ));
        assert!(guard.authorize(None).is_allowed());
    }

    proptest! {
        #[test]
        fn expired_tokens_are_rejected_and_purged(secs_ago in 0i64..1_000_000) {
            let (guard, store) = guard_with_store();
            store.set(TOKEN_KEY, &token_with_exp(Utc::now().timestamp() - secs_ago));
            prop_assert!(!guard.is_authenticated());
            prop_assert!(store.get(TOKEN_KEY).is_none());
        }

        #[test]
        fn live_tokens_are_accepted_unchanged(secs_ahead in 5i64..1_000_000) {
            let (guard, store) = guard_with_store();
            let token = token_with_exp(Utc::now().timestamp() + secs_ahead);
            store.set(TOKEN_KEY, &token);
            store.set(USER_KEY, r#"{"id":1,"role":"ADMINISTRADOR"}"#);
            prop_assert!(guard.is_authenticated());
            prop_assert_eq!(store.get(TOKEN_KEY), Some(token));
            prop_assert!(store.get(USER_KEY).is_some());
        }
    }
}
