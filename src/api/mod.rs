//! API Module
//!
//! HTTP handlers and routing for the admin API.
//!
//! # Endpoints
//! - `GET /stores/:provider/:id` - List a cache store's entries
//! - `GET /stores/:provider/:id/entries/:key` - Read one entry
//! - `PUT /stores/:provider/:id/entries/:key` - Store one entry
//! - `DELETE /stores/:provider/:id/entries/:key` - Remove one entry
//! - `DELETE /stores/:provider/:id` - Clear a cache store
//! - `POST /notify` - Fire the notification channel
//! - `GET /stats` - Memoization statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
