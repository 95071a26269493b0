//! Route authorization gate.
//!
//! Evaluated once per navigation. It reads identity, never mutates a session,
//! and returns a tagged decision the caller renders.

use serde::Serialize;

use stockmaster_core::UserId;

use crate::{Role, UserIdentity};

/// Where unauthenticated navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Notice rendered in place when the role is not permitted.
pub const ACCESS_DENIED_NOTICE: &str = "Access denied. You do not have the required permissions.";

/// Values injected into every view rendered behind the gate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    pub user_role: Role,
    pub user_id: UserId,
    #[serde(skip)]
    pub identity: UserIdentity,
}

/// Why a navigation was denied (kept for display and audit logs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenied {
    pub role: Role,
    pub permitted: Vec<Role>,
}

impl AccessDenied {
    pub fn notice(&self) -> &'static str {
        ACCESS_DENIED_NOTICE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GateDecision {
    /// Render the view inside the standard chrome.
    Allowed(PageContext),
    /// Render the static denial notice; terminal for this navigation.
    Denied(AccessDenied),
    /// Leave for another path; terminal for this navigation.
    Redirect { to: &'static str },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed(_))
    }
}

/// Decide whether a protected view may render.
///
/// `permitted` is the route's static allow-list. `None` or an empty list means
/// any authenticated user. Membership is exact string equality on the role.
pub fn evaluate(identity: Option<&UserIdentity>, permitted: Option<&[Role]>) -> GateDecision {
    let Some(identity) = identity else {
        return GateDecision::Redirect { to: LOGIN_PATH };
    };

    if let Some(permitted) = permitted.filter(|roles| !roles.is_empty()) {
        if !permitted.iter().any(|r| r == &identity.role) {
            tracing::debug!(role = %identity.role, "navigation denied by role gate");
            return GateDecision::Denied(AccessDenied {
                role: identity.role.clone(),
                permitted: permitted.to_vec(),
            });
        }
    }

    GateDecision::Allowed(PageContext {
        user_role: identity.role.clone(),
        user_id: identity.id,
        identity: identity.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::Map;

    fn identity(role: Role) -> UserIdentity {
        UserIdentity {
            id: UserId::new(5),
            role,
            name: Some("Ana Ruiz".to_string()),
            email: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn no_identity_redirects_to_login() {
        let decision = evaluate(None, Some(&[Role::ADMINISTRATOR]));
        assert_eq!(decision, GateDecision::Redirect { to: "/login" });
        assert_eq!(evaluate(None, None), GateDecision::Redirect { to: LOGIN_PATH });
    }

    #[test]
    fn operator_on_admin_route_is_denied_in_place() {
        let user = identity(Role::OPERATOR);
        match evaluate(Some(&user), Some(&[Role::ADMINISTRATOR])) {
            GateDecision::Denied(denied) => {
                assert_eq!(denied.role, Role::OPERATOR);
                assert_eq!(denied.notice(), ACCESS_DENIED_NOTICE);
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn permitted_role_gets_page_context() {
        let user = identity(Role::OPERATOR);
        let decision = evaluate(Some(&user), Some(&[Role::ADMINISTRATOR, Role::OPERATOR]));
        let GateDecision::Allowed(ctx) = decision else {
            panic!("expected allowed");
        };
        assert_eq!(ctx.user_role, Role::OPERATOR);
        assert_eq!(ctx.user_id, UserId::new(5));

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json, serde_json::json!({ "userRole": "OPERADOR", "userId": 5 }));
    }

    #[test]
    fn missing_or_empty_role_list_admits_any_authenticated_user() {
        let user = identity(Role::new("AUDITOR"));
        assert!(evaluate(Some(&user), None).is_allowed());
        assert!(evaluate(Some(&user), Some(&[])).is_allowed());
    }

    proptest! {
        #[test]
        fn allowed_iff_role_in_list(role in "[A-Z]{3,12}", listed in proptest::bool::ANY) {
            let user = identity(Role::new(role.clone()));
            let mut permitted = vec![Role::new("SOMEONE_ELSE")];
            if listed {
                permitted.push(Role::new(role));
            }
            let decision = evaluate(Some(&user), Some(&permitted));
            prop_assert_eq!(decision.is_allowed(), listed);
        }
    }
}
