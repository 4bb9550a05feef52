//! # HTTP Server Module
//!
//! JSON API over the calculation dispatcher, built on axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/derivative?equation=...` - derivative with respect to x
//! - `/api/integral?equation=...` - indefinite integral, display form ends with `+ C`
//! - `/api/limit?equation=...&to=...` - limit as x approaches `to` (default `0`)
//!   The limit is two-sided: `1/x` at `0` is `does not exist`, not the one-sided `oo`
//!   a right-hand default would give.
//!
//! Every calculus endpoint also accepts `include_ai=false` to skip the explanation call.

pub mod calculus_routes;
pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;

pub use calculus_routes::{ApiResponse, CalculusState};
pub use config::HttpServerConfig;
pub use errors::ErrorResponse;
pub use server::HttpServer;
