//! `stockmaster-client`
//!
//! **Responsibility:** client side of the StockMaster inventory backend.
//!
//! This crate provides:
//! - A session store adapter (the only place session state is persisted)
//! - The shared HTTP client (bearer token out, sliding renewal in)
//! - The session guard and its inactivity timer
//! - The route table and per-navigation gate decisions
//! - Thin REST services and the stock-transfer form workflow
//!
//! The backend is the authority for every business rule; the client only
//! validates forms and decides what to render.

pub mod config;
pub mod error;
pub mod http;
pub mod inactivity;
pub mod routes;
pub mod services;
pub mod session;
pub mod storage;
pub mod transfer;
pub mod types;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use inactivity::{ActivitySignal, ForcedLogout, InactivityTimer};
pub use routes::{Chrome, Navigation, RouteSpec, navigate};
pub use session::{Session, SessionGuard, SessionState};
pub use storage::{FileStore, MemoryStore, SessionStore};
