//! # parley-server
//!
//! HTTP and WebSocket front end for the Parley chat relay.
//!
//! - [`config`] - Layered server configuration
//! - [`handlers`] - Login, channel listing, and the WebSocket session loop
//! - [`metrics`] - Prometheus instrumentation

pub mod config;
pub mod handlers;
pub mod metrics;
