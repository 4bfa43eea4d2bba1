//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request handler: response builders,
//! Content-Type lookup, and the cache-disabling header set.

pub mod mime;
pub mod no_cache;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_options_response,
};
