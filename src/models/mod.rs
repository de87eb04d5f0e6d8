//! Request and Response models for the cache inspection API
//!
//! Wire shapes for the demo/ops HTTP host in [`api`](crate::api) only. They
//! are not the cache's interface; values in the cache itself are opaque and
//! never serialized by it.

pub mod requests;
pub mod responses;

pub use requests::{PatternQuery, SetRequest};
pub use responses::{
    DeletePatternResponse, DeleteResponse, ErrorResponse, GetResponse, HasResponse,
    HealthResponse, KeysResponse, SetResponse, StatsResponse,
};
