//! # Fiscus API Server Library
//!
//! This library provides the core functionality for the Fiscus API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Tower layers applied to the whole router
//! - `routes`: API route handlers
//! - `validation`: Request body validation helpers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod validation;
