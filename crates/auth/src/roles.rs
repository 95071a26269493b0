use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used by the route gate.
///
/// Roles are opaque strings issued by the backend; membership checks are exact
/// string comparisons, so `"administrador"` is not `ADMINISTRADOR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Full access, including users, reports and recovery (`ADMINISTRADOR`).
    pub const ADMINISTRATOR: Role = Role(Cow::Borrowed("ADMINISTRADOR"));

    /// Day-to-day stock operations (`OPERADOR`).
    pub const OPERATOR: Role = Role(Cow::Borrowed("OPERADOR"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_use_backend_spelling() {
        assert_eq!(Role::ADMINISTRATOR.as_str(), "ADMINISTRADOR");
        assert_eq!(Role::OPERATOR.to_string(), "OPERADOR");
    }

    #[test]
    fn comparison_is_exact() {
        assert_eq!(Role::new("OPERADOR"), Role::OPERATOR);
        assert_ne!(Role::new("operador"), Role::OPERATOR);
    }
}
