//! HTTP host for the Keyhole URL shortener.
//!
//! The gateway authenticates requests with an `X-API-Key` header against an
//! explicitly configured key set, then hands the URL to the resolution
//! pipeline. Everything the host needs — listen address, base URL, backend
//! selection, API keys, telemetry endpoint — arrives as configuration.

pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod telemetry;
