//! HTTP glue around the verification engine
//!
//! Exposes issue/redeem over actix-web plus the small admin surface. All
//! verification semantics live in `vc_core`; handlers only translate
//! requests and outcomes.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
