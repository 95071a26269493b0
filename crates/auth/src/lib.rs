//! `stockmaster-auth`: pure session/authorization policy for the StockMaster client.
//!
//! This crate is intentionally decoupled from HTTP and storage: it decodes
//! token claims, normalizes stored identities and decides route access.

pub mod claims;
pub mod gate;
pub mod identity;
pub mod roles;

pub use claims::{TokenClaims, TokenError, check_expiry, decode_unverified, validate_claims};
pub use gate::{ACCESS_DENIED_NOTICE, AccessDenied, GateDecision, LOGIN_PATH, PageContext, evaluate};
pub use identity::{ALTERNATE_ID_FIELD, IdentityError, UserIdentity, normalize_identity};
pub use roles::Role;
