//! # Bistro server
//! This crate hosts the HTTP server for the Bistro restaurant ordering backend. It is responsible for:
//! Issuing access tokens and guarding protected routes with them.
//! Translating HTTP requests into calls on the engine APIs and mapping the results (and errors) back to JSON.
//! Creating payment intents on the payment gateway.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/v1/...`: The user, menu, cart and payment routes. See [routes](routes/index.html).

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
