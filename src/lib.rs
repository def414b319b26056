//! FleexStack sample application.
//!
//! A small HTTP service used to verify deployments: every endpoint reports
//! read-only process metadata (version, environment, uptime, memory, hostname)
//! as JSON.
//!
//! # Endpoints
//!
//! ```text
//! GET /                 greeting, version, feature list
//! GET /health           liveness, uptime
//! GET /api/info         runtime, platform, memory
//! GET /api/deployment   deployment timestamp and hostname
//! *                     404 {"error": "Not Found", "path": ...}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`process`]: Process metrics provider
//! - [`api`]: HTTP handlers, dispatcher and OpenAPI document
//! - [`server`]: Listener startup and shutdown
//! - [`shutdown`]: Termination signals

pub mod api;
pub mod config;
pub mod error;
pub mod process;
pub mod server;
pub mod shutdown;

pub use config::Config;
pub use error::{AppError, Result};
