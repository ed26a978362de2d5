//! HTTP API: bearer authentication, RBAC gates, and the routes they protect.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;

#[cfg(test)]
pub(crate) mod test_support;
