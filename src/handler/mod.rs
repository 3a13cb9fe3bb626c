//! Request handler module
//!
//! Responsible for request routing dispatch. The relay itself lives in `crate::relay`.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
