//! API Module
//!
//! Operator inspection endpoints over a shared cache.
//!
//! This is a demo/ops host, not part of the cache contract. Application code
//! talks to [`Cache`](crate::Cache) directly; these routes only let an
//! operator poke at one store whose lifecycle the server owns, and they may
//! change without notice.
//!
//! # Endpoints
//! - `PUT /set` - Store a JSON value
//! - `GET /get/:key` - Retrieve a value with its remaining TTL
//! - `GET /has/:key` - Check for a live key without counting a lookup
//! - `DELETE /del/:key` - Delete a key
//! - `GET /keys?pattern=` - List live keys, optionally glob-filtered
//! - `DELETE /keys?pattern=` - Delete every key matching a glob
//! - `DELETE /clear` - Drop all entries
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
