//! Route table, sidebar chrome and per-navigation decisions.

use serde::Serialize;

use stockmaster_auth::{AccessDenied, GateDecision, LOGIN_PATH, PageContext, Role};

use crate::session::SessionGuard;

const ADMIN_ONLY: &[Role] = &[Role::ADMINISTRATOR];
const STAFF: &[Role] = &[Role::ADMINISTRATOR, Role::OPERATOR];

/// A navigable view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSpec {
    pub path: &'static str,
    pub title: &'static str,
    /// `None` for public routes; otherwise the gate's allow-list.
    pub roles: Option<&'static [Role]>,
    /// Listed in the navigation sidebar.
    pub in_sidebar: bool,
}

impl RouteSpec {
    pub fn is_public(&self) -> bool {
        self.roles.is_none()
    }

    pub fn permits(&self, role: &Role) -> bool {
        self.roles.is_none_or(|roles| roles.contains(role))
    }
}

pub const ROUTES: &[RouteSpec] = &[
    RouteSpec { path: LOGIN_PATH, title: "Login", roles: None, in_sidebar: false },
    RouteSpec { path: "/users", title: "Users", roles: Some(ADMIN_ONLY), in_sidebar: true },
    RouteSpec { path: "/products", title: "Products", roles: Some(STAFF), in_sidebar: true },
    RouteSpec { path: "/warehouses", title: "Warehouses", roles: Some(STAFF), in_sidebar: true },
    RouteSpec { path: "/movements", title: "Movements", roles: Some(STAFF), in_sidebar: true },
    RouteSpec { path: "/movements/transfer", title: "Transfer", roles: Some(STAFF), in_sidebar: false },
    RouteSpec { path: "/reports", title: "Reports", roles: Some(ADMIN_ONLY), in_sidebar: true },
    RouteSpec { path: "/recovery", title: "Recovery", roles: Some(ADMIN_ONLY), in_sidebar: false },
];

/// Resolve `path` to the most specific route (segment-wise prefix match).
pub fn find_route(path: &str) -> Option<&'static RouteSpec> {
    let path = normalize(path);
    ROUTES
        .iter()
        .filter(|route| is_under(route.path, path))
        .max_by_key(|route| route.path.len())
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

fn is_under(prefix: &str, path: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarEntry {
    pub title: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Standard chrome around every protected view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chrome {
    pub sidebar: Vec<SidebarEntry>,
    pub user_name: String,
    pub user_role: String,
    pub user_initials: String,
}

/// Sidebar entries visible to `role`, with the one owning `current_path`
/// marked active.
pub fn sidebar_for(role: &Role, current_path: &str) -> Vec<SidebarEntry> {
    let current = normalize(current_path);
    ROUTES
        .iter()
        .filter(|route| route.in_sidebar && !route.is_public() && route.permits(role))
        .map(|route| SidebarEntry {
            title: route.title,
            path: route.path,
            active: is_under(route.path, current),
        })
        .collect()
}

fn chrome_for(ctx: &PageContext, current_path: &str) -> Chrome {
    Chrome {
        sidebar: sidebar_for(&ctx.user_role, current_path),
        user_name: ctx.identity.display_name().to_string(),
        user_role: ctx.user_role.to_string(),
        user_initials: ctx.identity.initials(),
    }
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    /// Public view, no chrome.
    Public { route: &'static RouteSpec },
    /// Protected view inside the chrome, with the injected page context.
    Render {
        route: &'static RouteSpec,
        chrome: Chrome,
        context: PageContext,
    },
    /// In-place denial notice.
    Denied {
        route: &'static RouteSpec,
        denied: AccessDenied,
    },
    Redirect { to: &'static str },
    NotFound,
}

/// Decide what a navigation to `path` shows.
///
/// `/` always goes to the login view. Protected routes go through the gate,
/// which purges an expired session before deciding.
pub fn navigate(guard: &SessionGuard, path: &str) -> Navigation {
    if normalize(path) == "/" {
        return Navigation::Redirect { to: LOGIN_PATH };
    }

    let Some(route) = find_route(path) else {
        return Navigation::NotFound;
    };

    if route.is_public() {
        return Navigation::Public { route };
    }

    match guard.authorize(route.roles) {
        GateDecision::Allowed(context) => Navigation::Render {
            route,
            chrome: chrome_for(&context, path),
            context,
        },
        GateDecision::Denied(denied) => Navigation::Denied { route, denied },
        GateDecision::Redirect { to } => Navigation::Redirect { to },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::{guard_with_store, token_with_exp};
    use crate::storage::{SessionStore, TOKEN_KEY, USER_KEY};

    fn signed_in_as(role: &str) -> SessionGuard {
        let (guard, store) = guard_with_store();
        store.set(TOKEN_KEY, &token_with_exp(chrono::Utc::now().timestamp() + 600));
        store.set(
            USER_KEY,
            &format!(r#"{{"id":4,"role":"{role}","name":"Juan Pérez"}}"#),
        );
        guard
    }

    #[test]
    fn longest_prefix_wins() {
        assert_eq!(find_route("/movements/transfer").unwrap().title, "Transfer");
        assert_eq!(find_route("/movements").unwrap().title, "Movements");
        assert_eq!(find_route("/warehouses/edit/1").unwrap().title, "Warehouses");
        assert_eq!(find_route("/products/?page=2").unwrap().title, "Products");
        assert!(find_route("/productsx").is_none());
        assert!(find_route("/nowhere").is_none());
    }

    #[test]
    fn no_session_redirects_every_protected_route() {
        let (guard, _store) = guard_with_store();
        for route in ROUTES.iter().filter(|r| !r.is_public()) {
            assert_eq!(
                navigate(&guard, route.path),
                Navigation::Redirect { to: "/login" },
                "route {}",
                route.path
            );
        }
    }

    #[test]
    fn root_redirects_and_login_is_public() {
        let guard = signed_in_as("ADMINISTRADOR");
        assert_eq!(navigate(&guard, "/"), Navigation::Redirect { to: "/login" });
        assert!(matches!(navigate(&guard, "/login"), Navigation::Public { .. }));
        assert_eq!(navigate(&guard, "/missing"), Navigation::NotFound);
    }

    #[test]
    fn operator_is_denied_admin_views_without_redirect() {
        let guard = signed_in_as("OPERADOR");
        match navigate(&guard, "/users") {
            Navigation::Denied { route, denied } => {
                assert_eq!(route.path, "/users");
                assert_eq!(denied.role, Role::OPERATOR);
            }
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn render_injects_context_and_filters_sidebar() {
        let guard = signed_in_as("OPERADOR");
        let Navigation::Render { chrome, context, .. } = navigate(&guard, "/warehouses/edit/3") else {
            panic!("expected render");
        };

        assert_eq!(context.user_role, Role::OPERATOR);
        assert_eq!(context.user_id.get(), 4);
        let titles: Vec<_> = chrome.sidebar.iter().map(|e| e.title).collect();
        assert_eq!(titles, ["Products", "Warehouses", "Movements"]);
        let active: Vec<_> = chrome.sidebar.iter().filter(|e| e.active).map(|e| e.path).collect();
        assert_eq!(active, ["/warehouses"]);
        assert_eq!(chrome.user_initials, "JP");
    }

    #[test]
    fn admin_sees_every_sidebar_entry() {
        let entries = sidebar_for(&Role::ADMINISTRATOR, "/reports");
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().any(|e| e.path == "/reports" && e.active));
    }
}
