//! HTTP API: configuration, routing, and the authentication/authorization
//! middleware in front of every route.

pub mod app;
pub mod authz;
pub mod config;
pub mod middleware;
