//! Identity of the signed-in user, as persisted next to the token.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use stockmaster_core::UserId;

use crate::Role;

/// Primary-key field name some backend payloads use instead of `id`.
pub const ALTERNATE_ID_FIELD: &str = "userId";

const DEFAULT_DISPLAY_NAME: &str = "User";

/// Identity derived from the login response.
///
/// Read-only from the client's perspective: the backend owns these values and
/// the client only forwards `id` and `role` to views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Any other fields the backend attached (kept as-is).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("stored identity is not a JSON object")]
    NotAnObject,

    #[error("stored identity is invalid: {0}")]
    Invalid(String),
}

impl UserIdentity {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }

    /// Up to two upper-cased initials of the display name ("Juan Pérez" -> "JP").
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Build a [`UserIdentity`] from the raw stored user object.
///
/// When `id` is missing but [`ALTERNATE_ID_FIELD`] is present, its value is
/// moved onto `id` and the alternate field is dropped. When both are present
/// the canonical `id` wins and the alternate is still dropped.
pub fn normalize_identity(raw: Value) -> Result<UserIdentity, IdentityError> {
    let Value::Object(mut fields) = raw else {
        return Err(IdentityError::NotAnObject);
    };

    if let Some(alternate) = fields.remove(ALTERNATE_ID_FIELD) {
        let canonical_missing = fields.get("id").is_none_or(Value::is_null);
        if canonical_missing {
            fields.insert("id".to_string(), alternate);
        }
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| IdentityError::Invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn alternate_key_is_mapped_onto_id_and_removed() {
        let identity = normalize_identity(json!({
            "userId": 12,
            "role": "OPERADOR",
            "name": "Ana Ruiz"
        }))
        .unwrap();

        assert_eq!(identity.id, UserId::new(12));
        let out = serde_json::to_value(&identity).unwrap();
        assert_eq!(out["id"], json!(12));
        assert!(out.get(ALTERNATE_ID_FIELD).is_none());
    }

    #[test]
    fn canonical_id_wins_over_alternate() {
        let identity = normalize_identity(json!({
            "id": 3,
            "userId": 99,
            "role": "ADMINISTRADOR"
        }))
        .unwrap();
        assert_eq!(identity.id, UserId::new(3));
        assert!(!identity.extra.contains_key(ALTERNATE_ID_FIELD));
    }

    #[test]
    fn null_id_falls_back_to_alternate() {
        let identity = normalize_identity(json!({
            "id": null,
            "userId": "8",
            "role": "OPERADOR"
        }))
        .unwrap();
        assert_eq!(identity.id, UserId::new(8));
    }

    #[test]
    fn extra_fields_are_preserved() {
        let identity = normalize_identity(json!({
            "id": 1,
            "role": "OPERADOR",
            "initials": "AR"
        }))
        .unwrap();
        assert_eq!(identity.extra.get("initials"), Some(&json!("AR")));
    }

    #[test]
    fn missing_id_or_role_is_invalid() {
        assert!(matches!(
            normalize_identity(json!({ "role": "OPERADOR" })),
            Err(IdentityError::Invalid(_))
        ));
        assert!(matches!(
            normalize_identity(json!({ "id": 1 })),
            Err(IdentityError::Invalid(_))
        ));
        assert_eq!(normalize_identity(json!("nope")), Err(IdentityError::NotAnObject));
    }

    #[test]
    fn initials_and_default_name() {
        let mut identity = normalize_identity(json!({
            "id": 1,
            "role": "ADMINISTRADOR",
            "name": "juan carlos pérez"
        }))
        .unwrap();
        assert_eq!(identity.initials(), "JC");

        identity.name = None;
        assert_eq!(identity.display_name(), "User");
        assert_eq!(identity.initials(), "U");
    }
}
